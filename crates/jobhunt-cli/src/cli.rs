//! Command-line definition.

use clap::{Args, Parser, Subcommand};
use jobhunt_core::JobType;
use std::path::PathBuf;

/// Aggregate job postings from ATS boards and job search sites.
#[derive(Parser, Debug)]
#[command(name = "jobhunt", version, about)]
pub struct Cli {
    /// Config file (default: ~/.config/jobhunt/config.toml)
    #[arg(long, global = true, env = "JOBHUNT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Registry file (default: companies.toml in the data directory)
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every monitored company
    List,

    /// Find the ATS board behind a URL or company name
    Resolve {
        /// Posting/careers URL, or a company name to probe
        target: String,
    },

    /// Resolve a URL or company name and monitor its ATS board
    Add {
        /// Posting/careers URL, or a company name to probe
        target: String,

        /// Display name (default: the board token, capitalized)
        #[arg(long)]
        name: Option<String>,

        /// Only keep postings whose title contains one of these
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },

    /// Monitor a company through job search sites
    AddAggregator {
        /// Company name, also used as the search term
        name: String,

        /// Search location
        #[arg(long)]
        location: Option<String>,

        /// Only keep postings whose title contains one of these
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },

    /// Stop monitoring a company
    Remove {
        /// Company name (case and corporate suffixes are ignored)
        name: String,
    },

    /// Scan every monitored company
    Scan(ScanArgs),

    /// Search job sites for one or more comma-separated terms
    Search(SearchArgs),

    /// Find postings on ATS boards through site-restricted web search
    Discover(DiscoverArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Only keep postings whose title contains one of these; replaces each
    /// company's own keywords
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,

    /// Scan ATS boards only
    #[arg(long, conflicts_with = "aggregators_only")]
    pub ats_only: bool,

    /// Scan aggregator companies only
    #[arg(long)]
    pub aggregators_only: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Comma-separated search terms
    pub terms: String,

    /// Search location
    #[arg(long)]
    pub location: Option<String>,

    /// Job sites to search (repeatable)
    #[arg(long = "site")]
    pub sites: Vec<String>,

    /// Job types: fulltime, parttime, contract, internship, temporary
    #[arg(long = "job-type")]
    pub job_types: Vec<JobType>,

    /// Remote postings only
    #[arg(long)]
    pub remote: bool,

    /// Only postings newer than this many hours
    #[arg(long)]
    pub hours_old: Option<u32>,

    /// Results wanted per site
    #[arg(long)]
    pub results: Option<u32>,

    /// Check each posting's direct application link
    #[arg(long)]
    pub verify_links: bool,

    /// Register companies behind the results that use an ATS board
    #[arg(long)]
    pub auto_add: bool,
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Keyword to look for on ATS boards
    pub keyword: String,

    /// Postings kept per ATS host
    #[arg(long)]
    pub results: Option<u32>,

    /// Register the companies behind the postings found
    #[arg(long)]
    pub auto_add: bool,
}
