// SQLite-backed record store.
//
// One row per natural key. The reconciliation engine reads through the
// `RecordLookup` seam; writes happen one insert or update per classified
// record so a partial failure leaves previously written rows intact.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::reconcile::{RecordLookup, StoredRecord};
use crate::record::{CanonicalRecord, Gender, RecordKey};

pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Self::setup(&conn)?;
        Ok(RecordStore { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::setup(&conn)?;
        Ok(RecordStore { conn })
    }

    fn setup(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS wso_records (
                id TEXT PRIMARY KEY,
                wso TEXT NOT NULL,
                age_category TEXT NOT NULL,
                gender TEXT NOT NULL,
                weight_class TEXT NOT NULL,
                snatch_record INTEGER,
                cj_record INTEGER,
                total_record INTEGER,
                updated_at TEXT NOT NULL,
                UNIQUE(wso, age_category, gender, weight_class)
            )",
            [],
        )
        .context("Failed to create wso_records table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_wso_records_wso ON wso_records(wso)",
            [],
        )
        .context("Failed to create wso index")?;

        Ok(())
    }

    /// Insert a fresh record; returns the generated row id.
    pub fn insert(&self, record: &CanonicalRecord) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.conn
            .execute(
                "INSERT INTO wso_records
                    (id, wso, age_category, gender, weight_class,
                     snatch_record, cj_record, total_record, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    record.wso,
                    record.age_category,
                    record.gender.as_str(),
                    record.weight_class,
                    record.snatch_record.map(|v| v as i64),
                    record.cj_record.map(|v| v as i64),
                    record.total_record.map(|v| v as i64),
                    Utc::now().to_rfc3339(),
                ],
            )
            .with_context(|| format!("Failed to insert record {}", record.key()))?;
        Ok(id)
    }

    /// Overwrite the lift fields of an existing row.
    pub fn update(&self, id: &str, record: &CanonicalRecord) -> Result<()> {
        let updated = self
            .conn
            .execute(
                "UPDATE wso_records
                 SET snatch_record = ?1, cj_record = ?2, total_record = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    record.snatch_record.map(|v| v as i64),
                    record.cj_record.map(|v| v as i64),
                    record.total_record.map(|v| v as i64),
                    Utc::now().to_rfc3339(),
                    id,
                ],
            )
            .with_context(|| format!("Failed to update record {}", record.key()))?;

        if updated == 0 {
            bail!("No stored record with id {}", id);
        }
        Ok(())
    }

    /// All stored records for one region, ordered by natural key.
    pub fn records_for_wso(&self, wso: &str) -> Result<Vec<StoredRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, wso, age_category, gender, weight_class,
                    snatch_record, cj_record, total_record
             FROM wso_records
             WHERE wso = ?1
             ORDER BY age_category, gender, weight_class",
        )?;

        let rows = stmt
            .query_map(params![wso], row_to_stored)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read stored records")?;
        Ok(rows)
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM wso_records", [], |r| r.get(0))?;
        Ok(count)
    }
}

impl RecordLookup for RecordStore {
    fn find(&self, key: &RecordKey) -> Result<Option<StoredRecord>> {
        let stored = self
            .conn
            .query_row(
                "SELECT id, wso, age_category, gender, weight_class,
                        snatch_record, cj_record, total_record
                 FROM wso_records
                 WHERE wso = ?1 AND age_category = ?2 AND gender = ?3 AND weight_class = ?4",
                params![key.wso, key.age_category, key.gender.as_str(), key.weight_class],
                row_to_stored,
            )
            .optional()
            .with_context(|| format!("Failed to look up record {}", key))?;
        Ok(stored)
    }
}

fn row_to_stored(row: &Row<'_>) -> rusqlite::Result<StoredRecord> {
    let gender_text: String = row.get(3)?;
    let gender = match gender_text.as_str() {
        "Men" => Gender::Men,
        "Women" => Gender::Women,
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                format!("unknown gender {:?}", other).into(),
            ))
        }
    };

    let lift = |idx: usize| -> rusqlite::Result<Option<u32>> {
        Ok(row.get::<_, Option<i64>>(idx)?.map(|v| v as u32))
    };

    let mut record = CanonicalRecord::new(
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        gender,
        row.get::<_, String>(4)?,
    );
    record.snatch_record = lift(5)?;
    record.cj_record = lift(6)?;
    record.total_record = lift(7)?;

    Ok(StoredRecord {
        id: row.get(0)?,
        record,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(class: &str, snatch: Option<u32>) -> CanonicalRecord {
        let mut r = CanonicalRecord::new("Ohio", "U15", Gender::Women, class);
        r.snatch_record = snatch;
        r
    }

    #[test]
    fn test_insert_and_find_round_trip() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut record = rec("49", Some(50));
        record.cj_record = Some(62);
        record.total_record = Some(112);

        let id = store.insert(&record).unwrap();

        let found = store.find(&record.key()).unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.record, record);
    }

    #[test]
    fn test_find_missing_is_none() {
        let store = RecordStore::open_in_memory().unwrap();
        assert!(store.find(&rec("49", None).key()).unwrap().is_none());
    }

    #[test]
    fn test_update_overwrites_lifts() {
        let store = RecordStore::open_in_memory().unwrap();
        let record = rec("55", Some(48));
        let id = store.insert(&record).unwrap();

        let mut newer = record.clone();
        newer.snatch_record = Some(52);
        newer.total_record = Some(115);
        store.update(&id, &newer).unwrap();

        let found = store.find(&record.key()).unwrap().unwrap();
        assert_eq!(found.record.snatch_record, Some(52));
        assert_eq!(found.record.total_record, Some(115));
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let store = RecordStore::open_in_memory().unwrap();
        assert!(store.update("missing", &rec("49", None)).is_err());
    }

    #[test]
    fn test_null_lifts_round_trip() {
        let store = RecordStore::open_in_memory().unwrap();
        let record = rec("59", None);
        store.insert(&record).unwrap();

        let found = store.find(&record.key()).unwrap().unwrap();
        assert!(found.record.is_empty());
    }

    #[test]
    fn test_records_for_wso_scoped_and_ordered() {
        let store = RecordStore::open_in_memory().unwrap();
        store.insert(&rec("55", Some(48))).unwrap();
        store.insert(&rec("49", Some(50))).unwrap();

        let other = CanonicalRecord::new("Florida", "Senior", Gender::Men, "89");
        store.insert(&other).unwrap();

        let rows = store.records_for_wso("Ohio").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record.weight_class, "49");
        assert_eq!(rows[1].record.weight_class, "55");
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");
        {
            let store = RecordStore::open(&path).unwrap();
            store.insert(&rec("45", Some(40))).unwrap();
        }
        let store = RecordStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
