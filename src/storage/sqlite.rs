//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{AnnualReport, BusinessRecord, BusinessRow, FilingDetail};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
///
/// Holds a single connection for the lifetime of a crawl; it is closed when
/// the storage is dropped.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path` and initializes the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        let storage = Self { conn };
        storage.initialize()?;
        Ok(storage)
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let storage = Self { conn };
        storage.initialize()?;
        Ok(storage)
    }

    fn count_rows(&self, table: &str) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }
}

impl Storage for SqliteStorage {
    fn initialize(&self) -> StorageResult<()> {
        initialize_schema(&self.conn)?;
        Ok(())
    }

    fn save_business(&mut self, record: &BusinessRecord) -> StorageResult<i64> {
        // Dropping the transaction without commit rolls everything back
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO businesses (name, status, principal_address) VALUES (?1, ?2, ?3)",
            params![record.name, record.status, record.principal_address],
        )?;
        let business_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO filing_details (business_id, label, value) VALUES (?1, ?2, ?3)",
            )?;
            for detail in &record.filing_details {
                stmt.execute(params![business_id, detail.label, detail.value])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO annual_reports (business_id, year, filed_date) VALUES (?1, ?2, ?3)",
            )?;
            for report in &record.annual_reports {
                stmt.execute(params![business_id, report.year, report.filed_date])?;
            }
        }

        tx.commit()?;
        Ok(business_id)
    }

    fn list_businesses(&self) -> StorageResult<Vec<BusinessRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, status, principal_address FROM businesses ORDER BY id")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(BusinessRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    status: row.get(2)?,
                    principal_address: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn get_business(&self, business_id: i64) -> StorageResult<Option<BusinessRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, status, principal_address FROM businesses WHERE id = ?1",
                params![business_id],
                |row| {
                    Ok(BusinessRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        status: row.get(2)?,
                        principal_address: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(row)
    }

    fn get_filing_details(&self, business_id: i64) -> StorageResult<Vec<FilingDetail>> {
        let mut stmt = self.conn.prepare(
            "SELECT label, value FROM filing_details WHERE business_id = ?1 ORDER BY id",
        )?;

        let details = stmt
            .query_map(params![business_id], |row| {
                Ok(FilingDetail {
                    label: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }

    fn get_annual_reports(&self, business_id: i64) -> StorageResult<Vec<AnnualReport>> {
        let mut stmt = self.conn.prepare(
            "SELECT year, filed_date FROM annual_reports WHERE business_id = ?1 ORDER BY id",
        )?;

        let reports = stmt
            .query_map(params![business_id], |row| {
                Ok(AnnualReport {
                    year: row.get(0)?,
                    filed_date: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reports)
    }

    fn count_businesses(&self) -> StorageResult<u64> {
        self.count_rows("businesses")
    }

    fn count_filing_details(&self) -> StorageResult<u64> {
        self.count_rows("filing_details")
    }

    fn count_annual_reports(&self) -> StorageResult<u64> {
        self.count_rows("annual_reports")
    }

    fn count_orphans(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM filing_details f
                 WHERE NOT EXISTS (SELECT 1 FROM businesses b WHERE b.id = f.business_id))
              + (SELECT COUNT(*) FROM annual_reports a
                 WHERE NOT EXISTS (SELECT 1 FROM businesses b WHERE b.id = a.business_id))",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use tempfile::TempDir;

    fn sample_record() -> BusinessRecord {
        BusinessRecord {
            name: "BLACK FROG LLC".to_string(),
            status: "ACTIVE".to_string(),
            principal_address: "123 MAIN ST MIAMI, FL 33101".to_string(),
            filing_details: vec![
                FilingDetail::new("Document Number", "L23000007214"),
                FilingDetail::new("Status", "ACTIVE"),
            ],
            annual_reports: vec![
                AnnualReport::new("2022", "01/15/2022"),
                AnnualReport::new("2023", "02/01/2023"),
                AnnualReport::new("2024", "03/20/2024"),
            ],
        }
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_save_business_returns_id() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let id = storage.save_business(&sample_record()).unwrap();
        assert!(id > 0);
        assert_eq!(storage.count_businesses().unwrap(), 1);
    }

    #[test]
    fn test_children_round_trip_in_order() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let record = sample_record();
        let id = storage.save_business(&record).unwrap();

        assert_eq!(storage.get_filing_details(id).unwrap(), record.filing_details);
        assert_eq!(storage.get_annual_reports(id).unwrap(), record.annual_reports);

        let row = storage.get_business(id).unwrap().unwrap();
        assert_eq!(row.name, "BLACK FROG LLC");
        assert_eq!(row.status, "ACTIVE");
        assert_eq!(row.principal_address, "123 MAIN ST MIAMI, FL 33101");
    }

    #[test]
    fn test_duplicate_labels_are_kept() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let record = BusinessRecord {
            filing_details: vec![
                FilingDetail::new("Event", "AMENDMENT"),
                FilingDetail::new("Event", "REINSTATEMENT"),
            ],
            ..BusinessRecord::default()
        };
        let id = storage.save_business(&record).unwrap();

        let details = storage.get_filing_details(id).unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[1].value, "REINSTATEMENT");
    }

    #[test]
    fn test_children_are_scoped_to_their_business() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = storage.save_business(&sample_record()).unwrap();
        let second = storage.save_business(&BusinessRecord::default()).unwrap();

        assert_ne!(first, second);
        assert_eq!(storage.get_filing_details(first).unwrap().len(), 2);
        assert!(storage.get_filing_details(second).unwrap().is_empty());
        assert!(storage.get_annual_reports(second).unwrap().is_empty());
        assert_eq!(storage.count_orphans().unwrap(), 0);
    }

    #[test]
    fn test_failed_child_insert_rolls_back_parent() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_year BEFORE INSERT ON annual_reports
                 WHEN NEW.year = 'BAD'
                 BEGIN SELECT RAISE(ABORT, 'rejected annual report'); END;",
            )
            .unwrap();

        let mut record = sample_record();
        record.annual_reports.push(AnnualReport::new("BAD", "never"));

        let result = storage.save_business(&record);
        assert!(matches!(result, Err(StorageError::Sqlite(_))));

        assert_eq!(storage.count_businesses().unwrap(), 0);
        assert_eq!(storage.count_filing_details().unwrap(), 0);
        assert_eq!(storage.count_annual_reports().unwrap(), 0);

        // The connection is still usable after the rollback
        let id = storage.save_business(&sample_record()).unwrap();
        assert!(storage.get_business(id).unwrap().is_some());
    }

    #[test]
    fn test_list_businesses_in_id_order() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        for name in ["A", "B", "C"] {
            let record = BusinessRecord {
                name: name.to_string(),
                ..BusinessRecord::default()
            };
            storage.save_business(&record).unwrap();
        }

        let names: Vec<_> = storage
            .list_businesses()
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_get_missing_business() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage.get_business(42).unwrap().is_none());
    }

    #[test]
    fn test_initialize_twice_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.db");

        {
            let mut storage = SqliteStorage::new(&path).unwrap();
            storage.save_business(&sample_record()).unwrap();
            storage.initialize().unwrap();
            assert_eq!(storage.count_businesses().unwrap(), 1);
        }

        // Reopening runs initialize() again on the existing file
        let storage = SqliteStorage::new(&path).unwrap();
        assert_eq!(storage.count_businesses().unwrap(), 1);
        assert_eq!(storage.count_annual_reports().unwrap(), 3);
    }

    #[test]
    fn test_reruns_append_parallel_rows() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        storage.save_business(&sample_record()).unwrap();
        storage.save_business(&sample_record()).unwrap();
        assert_eq!(storage.count_businesses().unwrap(), 2);
        assert_eq!(storage.count_filing_details().unwrap(), 4);
    }
}
