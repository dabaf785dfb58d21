//! Tab-separated output lines.

use jobhunt_core::Posting;
use jobhunt_registry::{AggregatorCompany, AtsCompany};
use jobhunt_scanner::LinkStatus;

/// Tabs and newlines inside a field would break the columns.
fn field(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

pub fn posting_line(posting: &Posting) -> String {
    let date = posting
        .date_posted
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    [
        field(&posting.company),
        field(&posting.title),
        field(&posting.location),
        field(&posting.job_url),
        posting.source.to_string(),
        date,
    ]
    .join("\t")
}

pub fn verified_posting_line(posting: &Posting, status: &LinkStatus) -> String {
    format!(
        "{}\t{}\t{}",
        posting_line(posting),
        status,
        status.url_to_use().unwrap_or_default()
    )
}

pub fn ats_line(company: &AtsCompany) -> String {
    format!(
        "ats\t{}\t{}\t{}\t{}",
        field(&company.name),
        company.vendor,
        field(&company.url),
        field(&company.keywords.join(","))
    )
}

pub fn aggregator_line(company: &AggregatorCompany) -> String {
    format!(
        "aggregator\t{}\t{}\t{}",
        field(&company.name),
        field(company.location.as_deref().unwrap_or_default()),
        field(&company.keywords.join(","))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobhunt_core::{AtsVendor, PostingSource};

    #[test]
    fn test_posting_line() {
        let posting = Posting::new(
            "Acme",
            "Chemist\tII",
            "Boston, MA",
            "https://jobs.lever.co/acme/1",
            PostingSource::Ats(AtsVendor::Lever),
        );
        assert_eq!(
            posting_line(&posting),
            "Acme\tChemist II\tBoston, MA\thttps://jobs.lever.co/acme/1\tlever\t"
        );

        let status = LinkStatus::Ok {
            final_url: "https://acme.test/apply".to_string(),
        };
        assert!(verified_posting_line(&posting, &status).ends_with("\t200 OK\thttps://acme.test/apply"));
    }

    #[test]
    fn test_registry_lines() {
        let company = AtsCompany {
            keywords: vec!["scientist".to_string(), "chemist".to_string()],
            ..AtsCompany::new("Acme", "https://jobs.lever.co/acme", AtsVendor::Lever)
        };
        assert_eq!(
            ats_line(&company),
            "ats\tAcme\tlever\thttps://jobs.lever.co/acme\tscientist,chemist"
        );
        assert_eq!(
            aggregator_line(&AggregatorCompany::new("CDC")),
            "aggregator\tCDC\t\t"
        );
    }
}
