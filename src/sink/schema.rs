//! Database schema for the local catalog sink

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per course section, keyed by the crawler's idempotency key
CREATE TABLE IF NOT EXISTS course_sections (
    global_id TEXT PRIMARY KEY,
    registration_term TEXT NOT NULL,
    crn TEXT NOT NULL,
    subject_code TEXT NOT NULL,
    related_offering TEXT NOT NULL,
    section_key TEXT NOT NULL,
    section_kind TEXT NOT NULL,
    long_title TEXT NOT NULL,
    short_title TEXT NOT NULL,
    course_description TEXT NOT NULL,
    course_credit_value REAL NOT NULL,
    schedule_type TEXT NOT NULL,
    registration_status TEXT NOT NULL,
    section_type TEXT NOT NULL,
    suitability TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sections_offering
    ON course_sections(registration_term, related_offering);

-- Meeting rows of a section, replaced wholesale on every upsert
CREATE TABLE IF NOT EXISTS meeting_details (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    global_id TEXT NOT NULL REFERENCES course_sections(global_id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    meeting_date TEXT NOT NULL,
    days TEXT NOT NULL,
    time TEXT NOT NULL,
    schedule_type TEXT NOT NULL,
    instructor TEXT NOT NULL,
    UNIQUE(global_id, position)
);

CREATE INDEX IF NOT EXISTS idx_meetings_section ON meeting_details(global_id);
"#;

/// Creates the tables if they do not exist yet
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
