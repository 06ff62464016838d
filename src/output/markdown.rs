//! Markdown summary generation
//!
//! This module renders every stored business with its filing details and
//! annual reports as one markdown document.

use crate::output::stats::CrawlStatistics;
use crate::output::traits::{BusinessSummary, OutputResult};
use chrono::Utc;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary to `output_path`
///
/// # Arguments
///
/// * `summaries` - Every business with its children, in id order
/// * `stats` - Table counts shown in the overview section
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    summaries: &[BusinessSummary],
    stats: &CrawlStatistics,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(summaries, stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!(
        "Wrote summary of {} businesses to {}",
        summaries.len(),
        output_path.display()
    );
    Ok(())
}

/// Formats the summary as markdown
pub fn format_markdown_summary(summaries: &[BusinessSummary], stats: &CrawlStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Business Registry Summary\n\n");
    md.push_str(&format!(
        "_Generated {}_\n\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str("## Overview\n\n");
    md.push_str(&format!("- **Businesses**: {}\n", stats.businesses));
    md.push_str(&format!("- **Filing Details**: {}\n", stats.filing_details));
    md.push_str(&format!("- **Annual Reports**: {}\n\n", stats.annual_reports));

    md.push_str("## Businesses\n\n");
    if summaries.is_empty() {
        md.push_str("_No businesses stored._\n");
        return md;
    }

    md.push_str("| ID | Name | Status |\n");
    md.push_str("|----|------|--------|\n");
    for summary in summaries {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            summary.business.id,
            escape_cell(&summary.business.name),
            escape_cell(&summary.business.status)
        ));
    }
    md.push('\n');

    for summary in summaries {
        format_business_section(&mut md, summary);
    }

    md
}

fn format_business_section(md: &mut String, summary: &BusinessSummary) {
    let business = &summary.business;
    md.push_str(&format!("### {} (#{})\n\n", business.name, business.id));
    md.push_str(&format!("- **Status**: {}\n", business.status));
    md.push_str(&format!(
        "- **Principal Address**: {}\n\n",
        business.principal_address
    ));

    if !summary.filing_details.is_empty() {
        md.push_str("**Filing Details**\n\n");
        md.push_str("| Label | Value |\n");
        md.push_str("|-------|-------|\n");
        for detail in &summary.filing_details {
            md.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&detail.label),
                escape_cell(&detail.value)
            ));
        }
        md.push('\n');
    }

    if !summary.annual_reports.is_empty() {
        md.push_str("**Annual Reports**\n\n");
        md.push_str("| Year | Date Filed |\n");
        md.push_str("|------|------------|\n");
        for report in &summary.annual_reports {
            md.push_str(&format!(
                "| {} | {} |\n",
                escape_cell(&report.year),
                escape_cell(&report.filed_date)
            ));
        }
        md.push('\n');
    }
}

/// Keeps a value on one table row
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\r', '\n'], "<br>")
}
