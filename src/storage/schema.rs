//! Database schema definitions
//!
//! Column order in each table is part of the on-disk contract.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per visited detail page
CREATE TABLE IF NOT EXISTS businesses (
    id INTEGER PRIMARY KEY,
    name TEXT,
    status TEXT,
    principal_address TEXT
);

-- Label/value pairs from the filing information block
CREATE TABLE IF NOT EXISTS filing_details (
    id INTEGER PRIMARY KEY,
    business_id INTEGER NOT NULL,
    label TEXT,
    value TEXT,
    FOREIGN KEY(business_id) REFERENCES businesses(id)
);

CREATE INDEX IF NOT EXISTS idx_filing_details_business ON filing_details(business_id);

-- Rows from the annual reports table
CREATE TABLE IF NOT EXISTS annual_reports (
    id INTEGER PRIMARY KEY,
    business_id INTEGER NOT NULL,
    year TEXT,
    filed_date TEXT,
    FOREIGN KEY(business_id) REFERENCES businesses(id)
);

CREATE INDEX IF NOT EXISTS idx_annual_reports_business ON annual_reports(business_id);
"#;

/// Initializes the database schema
///
/// Safe to call on a database that already has the tables.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
