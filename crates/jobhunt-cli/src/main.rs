//! `jobhunt` - ATS board scanning and company auto-discovery.
//!
//! A thin shell: it loads configuration and the registry, wires the library
//! crates together, and prints tab-separated results on stdout. Logs go to
//! stderr.

mod cli;
mod output;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command, DiscoverArgs, ScanArgs, SearchArgs};
use jobhunt_ats::{AtsResolver, BoardScraper};
use jobhunt_core::{naming, AppConfig, Posting};
use jobhunt_http::{HttpFetcher, ReqwestFetcher};
use jobhunt_registry::{AggregatorCompany, AtsCompany, MergeEngine, RegistryStore};
use jobhunt_scanner::{
    dedup_by_job_url, AtsDiscovery, CommandSearchProvider, CommandWebSearch, JobSearch,
    KeywordFilter, LinkVerifier, ScanOrchestrator, ScanReport, SearchProvider,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,jobhunt=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Everything a command needs, built once per run.
struct App {
    config: AppConfig,
    store: RegistryStore,
    fetcher: Arc<dyn HttpFetcher>,
}

impl App {
    fn new(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => {
                let mut config = AppConfig::load_from(path)
                    .with_context(|| format!("loading config {}", path.display()))?;
                config.apply_env_overrides();
                config.validate()?;
                config
            }
            None => AppConfig::load_with_env().context("loading config")?,
        };

        let registry_path = match &cli.registry {
            Some(path) => path.clone(),
            None => config.registry_path()?,
        };

        let fetcher: Arc<dyn HttpFetcher> = Arc::new(ReqwestFetcher::new(&config.scanning)?);

        Ok(Self {
            config,
            store: RegistryStore::new(registry_path),
            fetcher,
        })
    }

    fn resolver(&self) -> AtsResolver {
        AtsResolver::new(self.fetcher.clone(), &self.config.scanning)
    }

    fn search_provider(&self) -> Option<Arc<dyn SearchProvider>> {
        CommandSearchProvider::from_config(&self.config.search)
            .map(|provider| Arc::new(provider) as Arc<dyn SearchProvider>)
    }

    async fn resolve(&self, target: &str) -> Option<jobhunt_ats::AtsIdentity> {
        let resolver = self.resolver();
        if looks_like_url(target) {
            resolver.resolve_url(target).await
        } else {
            resolver.resolve_name(target).await
        }
    }
}

/// URL-looking input goes through the URL strategies; anything else is a
/// company name.
fn looks_like_url(input: &str) -> bool {
    let input = input.trim();
    input.contains("://")
        || (!input.contains(char::is_whitespace) && input.contains('.') && input.contains('/'))
}

fn list(app: &App) -> Result<()> {
    let registry = app.store.load()?;
    for company in &registry.ats_companies {
        println!("{}", output::ats_line(company));
    }
    for company in &registry.aggregator_companies {
        println!("{}", output::aggregator_line(company));
    }
    Ok(())
}

async fn resolve(app: &App, target: &str) -> Result<()> {
    let Some(identity) = app.resolve(target).await else {
        bail!("no ATS board found for {target}");
    };
    println!(
        "{}\t{}\t{}",
        identity.token, identity.board_url, identity.vendor
    );
    Ok(())
}

async fn add(app: &App, target: &str, name: Option<String>, keywords: Vec<String>) -> Result<()> {
    let Some(identity) = app.resolve(target).await else {
        bail!("no ATS board found for {target}");
    };

    let mut registry = app.store.load()?;
    let company = AtsCompany {
        keywords,
        ..AtsCompany::new(
            name.unwrap_or_else(|| naming::capitalize_first(&identity.token)),
            identity.board_url,
            identity.vendor,
        )
    };
    println!("{}", output::ats_line(&company));

    registry.add_ats(company)?;
    app.store.save(&registry)?;
    Ok(())
}

fn add_aggregator(
    app: &App,
    name: String,
    location: Option<String>,
    keywords: Vec<String>,
) -> Result<()> {
    let mut registry = app.store.load()?;
    let company = AggregatorCompany {
        location,
        keywords,
        ..AggregatorCompany::new(name)
    };
    println!("{}", output::aggregator_line(&company));

    registry.add_aggregator(company)?;
    app.store.save(&registry)?;
    Ok(())
}

fn remove(app: &App, name: &str) -> Result<()> {
    let mut registry = app.store.load()?;
    let removed = registry.remove(name)?;
    app.store.save(&registry)?;
    info!(name, removed, "removed company");
    Ok(())
}

async fn scan(app: &App, args: &ScanArgs) -> Result<()> {
    let registry = app.store.load()?;
    let scraper =
        BoardScraper::new(app.fetcher.clone()).with_timeout(app.config.scanning.board_timeout());
    let mut orchestrator = ScanOrchestrator::new(scraper)
        .with_max_concurrent_scans(app.config.scanning.concurrent_scans);
    let provider = app.search_provider();
    if let Some(provider) = &provider {
        orchestrator = orchestrator.with_search_provider(provider.clone());
    }

    let filter = KeywordFilter::new(&args.keywords);
    let filter = (!filter.is_empty()).then_some(&filter);
    let mut report = ScanReport::default();

    if !args.aggregators_only {
        report.extend(orchestrator.scan_ats_companies(&registry, filter).await);
    }
    if !args.ats_only {
        if provider.is_none() && !args.aggregators_only {
            if !registry.aggregator_companies.is_empty() {
                warn!("search.command is not configured, skipping aggregator companies");
            }
        } else {
            report.extend(
                orchestrator
                    .scan_aggregator_companies(&registry, &app.config.search)
                    .await?,
            );
        }
    }

    for failure in report.failures() {
        warn!(
            company = %failure.company,
            error = failure.error.as_deref().unwrap_or_default(),
            "company scan failed"
        );
    }

    for posting in dedup_by_job_url(report.into_postings()) {
        println!("{}", output::posting_line(&posting));
    }
    Ok(())
}

async fn search(app: &App, args: SearchArgs) -> Result<()> {
    let Some(provider) = app.search_provider() else {
        bail!("search.command is not configured");
    };

    let mut config = app.config.search.clone();
    if let Some(location) = args.location {
        config.location = location;
    }
    if !args.sites.is_empty() {
        config.sites = args.sites;
    }
    if !args.job_types.is_empty() {
        config.job_types = args.job_types;
    }
    if args.remote {
        config.is_remote = true;
    }
    if let Some(hours) = args.hours_old {
        config.hours_old = hours;
    }
    if let Some(results) = args.results {
        config.results_wanted = results;
    }

    let outcome = JobSearch::new(provider, config)
        .with_max_concurrent(app.config.scanning.concurrent_scans)
        .run(&args.terms)
        .await;
    for failure in &outcome.failures {
        warn!(
            term = %failure.term,
            job_type = ?failure.job_type,
            error = %failure.error,
            "search query failed"
        );
    }

    if args.verify_links {
        let statuses = LinkVerifier::new(app.fetcher.clone())
            .with_timeout(app.config.scanning.verify_timeout())
            .with_max_concurrent(app.config.scanning.concurrent_scans)
            .verify_all(&outcome.postings)
            .await;
        for (posting, status) in outcome.postings.iter().zip(&statuses) {
            println!("{}", output::verified_posting_line(posting, status));
        }
    } else {
        for posting in &outcome.postings {
            println!("{}", output::posting_line(posting));
        }
    }

    if args.auto_add {
        auto_add(app, &outcome.postings).await?;
    }

    Ok(())
}

async fn discover(app: &App, args: &DiscoverArgs) -> Result<()> {
    let Some(engine) = CommandWebSearch::from_config(&app.config.discovery) else {
        bail!("discovery.command is not configured");
    };

    let mut discovery = AtsDiscovery::new(Arc::new(engine), &app.config.discovery);
    if let Some(results) = args.results {
        discovery = discovery.with_results_per_host(results);
    }

    let outcome = discovery.discover(&args.keyword).await;
    let postings = dedup_by_job_url(outcome.postings);
    for posting in &postings {
        println!("{}", output::posting_line(posting));
    }

    if args.auto_add {
        auto_add(app, &postings).await?;
    }
    Ok(())
}

async fn auto_add(app: &App, postings: &[Posting]) -> Result<()> {
    let mut registry = app.store.load()?;
    let added = MergeEngine::new(app.resolver())
        .merge_new_companies(&mut registry, &app.store, postings)
        .await?;
    info!(added, registry = %app.store.path().display(), "auto-discovery finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let app = App::new(&cli)?;

    match cli.command {
        Command::List => list(&app),
        Command::Resolve { target } => resolve(&app, &target).await,
        Command::Add {
            target,
            name,
            keywords,
        } => add(&app, &target, name, keywords).await,
        Command::AddAggregator {
            name,
            location,
            keywords,
        } => add_aggregator(&app, name, location, keywords),
        Command::Remove { name } => remove(&app, &name),
        Command::Scan(args) => scan(&app, &args).await,
        Command::Search(args) => search(&app, args).await,
        Command::Discover(args) => discover(&app, &args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_url() {
        assert!(looks_like_url("https://www.acme.com/careers"));
        assert!(looks_like_url("jobs.lever.co/acme"));
        assert!(!looks_like_url("Acme, Inc."));
        assert!(!looks_like_url("Acme Corp."));
        assert!(!looks_like_url("acme.com"));
    }
}
