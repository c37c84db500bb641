//! SQLite ingestion sink
//!
//! A local stand-in for the catalog service with the same contract: records
//! are upserted on `global_id`, and a section's meeting rows are replaced in
//! the same transaction, so resubmitting never duplicates anything.

use crate::catalog::{
    CourseDetailsRecord, MeetingDetail, SectionInformation, SectionKind, Suitability,
};
use crate::sink::schema::initialize_schema;
use crate::sink::traits::{IngestionSink, SinkError, SinkResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed sink
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Opens (or creates) the database at `path`
    pub fn new(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts or replaces one section and its meeting rows
    pub fn upsert(&self, record: &CourseDetailsRecord) -> SinkResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        let kind = SectionKind::from_schedule_type(&record.schedule_type);

        tx.execute(
            "INSERT INTO course_sections (
                global_id, registration_term, crn, subject_code, related_offering,
                section_key, section_kind, long_title, short_title, course_description,
                course_credit_value, schedule_type, registration_status, section_type,
                suitability, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
             ON CONFLICT(global_id) DO UPDATE SET
                registration_term = excluded.registration_term,
                crn = excluded.crn,
                subject_code = excluded.subject_code,
                related_offering = excluded.related_offering,
                section_key = excluded.section_key,
                section_kind = excluded.section_kind,
                long_title = excluded.long_title,
                short_title = excluded.short_title,
                course_description = excluded.course_description,
                course_credit_value = excluded.course_credit_value,
                schedule_type = excluded.schedule_type,
                registration_status = excluded.registration_status,
                section_type = excluded.section_type,
                suitability = excluded.suitability,
                updated_at = excluded.updated_at",
            params![
                record.global_id,
                record.registration_term,
                record.crn,
                record.subject_code,
                record.related_offering,
                record.section_key,
                kind.to_db_string(),
                record.long_title,
                record.short_title,
                record.course_description,
                record.course_credit_value,
                record.schedule_type,
                record.registration_status,
                record.section_information.section_type,
                record.section_information.suitability.as_str(),
                now,
            ],
        )?;

        tx.execute(
            "DELETE FROM meeting_details WHERE global_id = ?1",
            params![record.global_id],
        )?;

        for (position, meeting) in record.meeting_details.iter().enumerate() {
            tx.execute(
                "INSERT INTO meeting_details
                 (global_id, position, meeting_date, days, time, schedule_type, instructor)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.global_id,
                    position as i64,
                    meeting.meeting_date,
                    meeting.days.join(" "),
                    meeting.time,
                    meeting.schedule_type,
                    meeting.instructor,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Number of stored sections
    pub fn count_sections(&self) -> SinkResult<u64> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM course_sections", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Loads one section with its meeting rows
    pub fn get_section(&self, global_id: &str) -> SinkResult<Option<CourseDetailsRecord>> {
        let conn = self.lock()?;

        let record = conn
            .query_row(
                "SELECT global_id, registration_term, crn, subject_code, related_offering,
                 section_key, long_title, short_title, course_description,
                 course_credit_value, schedule_type, registration_status, section_type,
                 suitability
                 FROM course_sections WHERE global_id = ?1",
                params![global_id],
                |row| {
                    let suitability: String = row.get(13)?;
                    Ok(CourseDetailsRecord {
                        global_id: row.get(0)?,
                        registration_term: row.get(1)?,
                        crn: row.get(2)?,
                        subject_code: row.get(3)?,
                        related_offering: row.get(4)?,
                        section_key: row.get(5)?,
                        long_title: row.get(6)?,
                        short_title: row.get(7)?,
                        course_description: row.get(8)?,
                        course_credit_value: row.get(9)?,
                        schedule_type: row.get(10)?,
                        registration_status: row.get(11)?,
                        section_information: SectionInformation {
                            section_type: row.get(12)?,
                            suitability: if suitability == Suitability::NOT_SUITABLE_MARKER {
                                Suitability::NotSuitable
                            } else {
                                Suitability::Suitable
                            },
                        },
                        meeting_details: Vec::new(),
                    })
                },
            )
            .optional()?;

        let mut record = match record {
            Some(record) => record,
            None => return Ok(None),
        };

        let mut stmt = conn.prepare(
            "SELECT meeting_date, days, time, schedule_type, instructor
             FROM meeting_details WHERE global_id = ?1 ORDER BY position",
        )?;
        let meetings = stmt.query_map(params![global_id], |row| {
            let days: String = row.get(1)?;
            Ok(MeetingDetail {
                meeting_date: row.get(0)?,
                days: days.split_whitespace().map(str::to_string).collect(),
                time: row.get(2)?,
                schedule_type: row.get(3)?,
                instructor: row.get(4)?,
            })
        })?;

        for meeting in meetings {
            record.meeting_details.push(meeting?);
        }

        Ok(Some(record))
    }

    /// Relationship kind stored for a section
    pub fn section_kind(&self, global_id: &str) -> SinkResult<Option<String>> {
        let conn = self.lock()?;
        let kind = conn
            .query_row(
                "SELECT section_kind FROM course_sections WHERE global_id = ?1",
                params![global_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(kind)
    }

    fn lock(&self) -> SinkResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SinkError::Storage(format!("Failed to lock database: {}", e)))
    }
}

#[async_trait]
impl IngestionSink for SqliteSink {
    async fn submit(&self, record: &CourseDetailsRecord) -> SinkResult<()> {
        self.upsert(record)
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CourseDetailsRecord {
        CourseDetailsRecord {
            registration_term: "F".to_string(),
            crn: "30001".to_string(),
            subject_code: "ACCT 5001 A".to_string(),
            long_title: "Financial Accounting".to_string(),
            course_credit_value: 0.25,
            schedule_type: "Seminar".to_string(),
            global_id: "F30001".to_string(),
            related_offering: "ACCT 5001".to_string(),
            section_key: "A".to_string(),
            meeting_details: vec![
                MeetingDetail {
                    meeting_date: "Sep 06 2024 to Oct 20 2024".to_string(),
                    days: vec!["Tue".to_string()],
                    time: "14:35-17:25".to_string(),
                    schedule_type: "Seminar".to_string(),
                    instructor: "J. Doe".to_string(),
                },
                MeetingDetail {
                    meeting_date: "Oct 21 2024 to Dec 06 2024".to_string(),
                    days: vec!["Tue".to_string(), "Thu".to_string()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_upsert_and_load() {
        let sink = SqliteSink::new_in_memory().unwrap();
        let record = sample_record();
        sink.upsert(&record).unwrap();

        assert_eq!(sink.count_sections().unwrap(), 1);
        let loaded = sink.get_section("F30001").unwrap().unwrap();
        assert_eq!(loaded, record);
        assert_eq!(sink.section_kind("F30001").unwrap().as_deref(), Some("lecture"));
    }

    #[test]
    fn test_resubmit_replaces() {
        let sink = SqliteSink::new_in_memory().unwrap();
        let mut record = sample_record();
        sink.upsert(&record).unwrap();

        record.long_title = "Financial Accounting II".to_string();
        record.schedule_type = "Tutorial".to_string();
        record.meeting_details.truncate(1);
        sink.upsert(&record).unwrap();
        sink.upsert(&record).unwrap();

        assert_eq!(sink.count_sections().unwrap(), 1);
        let loaded = sink.get_section("F30001").unwrap().unwrap();
        assert_eq!(loaded.long_title, "Financial Accounting II");
        assert_eq!(loaded.meeting_details.len(), 1);
        assert_eq!(
            sink.section_kind("F30001").unwrap().as_deref(),
            Some("tutorial")
        );
    }

    #[test]
    fn test_missing_section() {
        let sink = SqliteSink::new_in_memory().unwrap();
        assert!(sink.get_section("W1").unwrap().is_none());
        assert!(sink.section_kind("W1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submit_through_trait() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let sink = SqliteSink::new(file.path()).unwrap();
        let dyn_sink: &dyn IngestionSink = &sink;

        dyn_sink.submit(&sample_record()).await.unwrap();
        assert_eq!(dyn_sink.name(), "sqlite");
        assert_eq!(sink.count_sections().unwrap(), 1);
    }
}
