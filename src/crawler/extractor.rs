//! Record extractor for registry detail pages
//!
//! This module turns one detail page into a [`BusinessRecord`] plus the URL of
//! the next page. Extraction never fails: every missing or malformed piece of
//! structure degrades to its default ("N/A", no filing details, no annual
//! reports, no next URL) and the record is still returned.

use crate::crawler::selectors::{
    find_span, first_match, next_sibling_named, trimmed_text, ADDRESS_RULES,
    ANNUAL_REPORTS_CAPTION, NAME_RULES, NEXT_LINK_TITLE,
};
use crate::storage::{AnnualReport, BusinessRecord, FilingDetail, NOT_AVAILABLE};
use scraper::{Html, Selector};

/// Label in the filing information block that carries the entity status
pub const STATUS_LABEL: &str = "Status";

/// Everything read from one detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// The record to persist
    pub record: BusinessRecord,

    /// Absolute URL of the next detail page, if the page links to one
    pub next_url: Option<String>,
}

/// Parses a detail page and extracts its record and next link
///
/// # Arguments
///
/// * `html` - The page body
/// * `base_origin` - Origin prepended to the path-only "Next On List" link
///
/// # Example
///
/// ```
/// use bizreg::crawler::extract_page;
///
/// let html = r#"<div class="corporationName"><p>LLC</p><p>ACME LLC</p></div>
///               <a title="Next On List" href="/Inquiry/Next?id=2">Next</a>"#;
/// let page = extract_page(html, "https://search.sunbiz.org");
/// assert_eq!(page.record.name, "ACME LLC");
/// assert_eq!(
///     page.next_url.as_deref(),
///     Some("https://search.sunbiz.org/Inquiry/Next?id=2")
/// );
/// ```
pub fn extract_page(html: &str, base_origin: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        record: extract_record(&document),
        next_url: extract_next_url(&document, base_origin),
    }
}

/// Extracts the business record from a parsed detail page
pub fn extract_record(document: &Html) -> BusinessRecord {
    let name = first_match(NAME_RULES, document).unwrap_or_else(|| {
        tracing::debug!("No corporation name found, using {}", NOT_AVAILABLE);
        NOT_AVAILABLE.to_string()
    });

    let filing_details = extract_filing_details(document);
    let status = status_from(&filing_details);

    let principal_address = first_match(ADDRESS_RULES, document).unwrap_or_else(|| {
        tracing::debug!("No address found for '{}', using {}", name, NOT_AVAILABLE);
        NOT_AVAILABLE.to_string()
    });

    let annual_reports = extract_annual_reports(document);

    BusinessRecord {
        name,
        status,
        principal_address,
        filing_details,
        annual_reports,
    }
}

/// Extracts label/value pairs from the filing information block
///
/// Each `<label>` is paired with the first following sibling `<span>`; labels
/// without one are skipped. Document order and duplicate labels are kept.
pub fn extract_filing_details(document: &Html) -> Vec<FilingDetail> {
    let (Ok(container_selector), Ok(label_selector)) = (
        Selector::parse("div.filingInformation > span > div"),
        Selector::parse("label"),
    ) else {
        return Vec::new();
    };

    let Some(container) = document.select(&container_selector).next() else {
        tracing::debug!("No filing information block found");
        return Vec::new();
    };

    container
        .select(&label_selector)
        .filter_map(|label| {
            let value = next_sibling_named(label, "span")?;
            Some(FilingDetail::new(trimmed_text(label), trimmed_text(value)))
        })
        .collect()
}

/// Status is the filing attribute labelled "Status"
///
/// When the label repeats, the last value wins.
pub fn status_from(filing_details: &[FilingDetail]) -> String {
    filing_details
        .iter()
        .rev()
        .find(|detail| detail.label == STATUS_LABEL)
        .map(|detail| detail.value.clone())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Extracts (year, filed date) rows from the annual reports table
///
/// The table is the first sibling `<table>` after the "Annual Reports"
/// caption. Its first row is a header; rows without exactly two cells are
/// skipped.
pub fn extract_annual_reports(document: &Html) -> Vec<AnnualReport> {
    let (Ok(row_selector), Ok(cell_selector)) = (Selector::parse("tr"), Selector::parse("td"))
    else {
        return Vec::new();
    };

    let Some(table) = find_span(document, |s| s.contains(ANNUAL_REPORTS_CAPTION))
        .and_then(|caption| next_sibling_named(caption, "table"))
    else {
        tracing::debug!("No annual reports table found");
        return Vec::new();
    };

    table
        .select(&row_selector)
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            match cells.as_slice() {
                [year, filed] => Some(AnnualReport::new(trimmed_text(*year), trimmed_text(*filed))),
                _ => None,
            }
        })
        .collect()
}

/// Finds the "Next On List" link and makes it absolute
///
/// The registry returns path-only links, so the target is appended verbatim
/// to `base_origin`. A link without an href (or with an empty one) ends the
/// chain.
pub fn extract_next_url(document: &Html, base_origin: &str) -> Option<String> {
    let selector = Selector::parse(&format!("a[title=\"{}\"]", NEXT_LINK_TITLE)).ok()?;

    let link = document.select(&selector).next()?;
    match link.value().attr("href") {
        Some(href) if !href.is_empty() => Some(format!("{}{}", base_origin, href)),
        _ => {
            tracing::debug!("\"{}\" link has no target", NEXT_LINK_TITLE);
            None
        }
    }
}
