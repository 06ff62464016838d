//! Console views of the stored registry
//!
//! A listing of every business and a detail view with fixed-width tables for
//! the filing details and annual reports of one business.

use crate::output::traits::BusinessSummary;
use crate::storage::BusinessRow;

const LABEL_MAX: usize = 18;
const VALUE_MAX: usize = 21;
const RULE_WIDTH: usize = 60;

/// Shortens `text` to `max` characters followed by ".." when it is longer
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}..", head)
    } else {
        text.to_string()
    }
}

fn header(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{}\n   {}\n{}\n", rule, title, rule)
}

/// Formats the id, name and status of every business
pub fn format_listing(businesses: &[BusinessRow]) -> String {
    let mut out = header("BUSINESS REGISTRY DATABASE");
    out.push_str(&format!("{:<5} | {:<40} | {}\n", "ID", "NAME", "STATUS"));
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    for business in businesses {
        out.push_str(&format!(
            "{:<5} | {:<40} | {}\n",
            business.id, business.name, business.status
        ));
    }

    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    out
}

/// Formats one business with its filing details and annual reports
pub fn format_detail(summary: &BusinessSummary) -> String {
    let business = &summary.business;
    let mut out = header(&format!("DETAILS FOR: {}", business.name));
    out.push_str(&format!("ID: {}\n", business.id));
    out.push_str(&format!("STATUS: {}\n", business.status));
    out.push_str(&format!("ADDRESS: {}\n", business.principal_address));

    let rule = format!("   {}\n", "-".repeat(50));
    out.push_str("\n   --- FILING DETAILS ---\n");
    out.push_str(&rule);
    out.push_str(&format!("   | {:<20} | {:<23} |\n", "Label", "Value"));
    out.push_str(&rule);
    if summary.filing_details.is_empty() {
        out.push_str("   | (No filing details found)                    |\n");
    }
    for detail in &summary.filing_details {
        out.push_str(&format!(
            "   | {:<20} | {:<23} |\n",
            truncate(&detail.label, LABEL_MAX),
            truncate(&detail.value, VALUE_MAX)
        ));
    }
    out.push_str(&rule);

    let rule = format!("   {}\n", "-".repeat(35));
    out.push_str("\n   --- ANNUAL REPORTS ---\n");
    out.push_str(&rule);
    out.push_str(&format!("   | {:<10} | {:<18} |\n", "Year", "Date Filed"));
    out.push_str(&rule);
    if summary.annual_reports.is_empty() {
        out.push_str("   | (No reports found)              |\n");
    }
    for report in &summary.annual_reports {
        out.push_str(&format!(
            "   | {:<10} | {:<18} |\n",
            report.year, report.filed_date
        ));
    }
    out.push_str(&rule);
    out
}
