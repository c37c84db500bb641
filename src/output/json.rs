//! JSON dump of harvested records

use crate::catalog::CourseDetailsRecord;
use crate::output::OutputResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every record as one pretty-printed JSON array
pub fn write_records_json(
    records: &[CourseDetailsRecord],
    output_path: &Path,
) -> OutputResult<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_records_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.json");
        let records = vec![
            CourseDetailsRecord {
                crn: "30001".to_string(),
                global_id: "F30001".to_string(),
                ..Default::default()
            },
            CourseDetailsRecord {
                crn: "30002".to_string(),
                global_id: "F30002".to_string(),
                ..Default::default()
            },
        ];

        write_records_json(&records, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Vec<CourseDetailsRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded, records);
        assert!(content.contains("\"CRN\": \"30001\""));
    }

    #[test]
    fn test_write_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.json");
        write_records_json(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
