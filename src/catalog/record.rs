use serde::{Deserialize, Serialize};
use std::fmt;

/// One academic registration period offered by the source site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Site-specific term code (e.g. "202430")
    pub code: String,

    /// Human readable name (e.g. "Fall 2024 (September-December)")
    pub display_name: String,
}

impl Term {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} ({})", self.display_name, self.code)
        }
    }
}

/// Whether a section may be taken by online students
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Suitability {
    #[default]
    #[serde(rename = "SUITABLE FOR ONLINE STUDENTS")]
    Suitable,

    #[serde(rename = "NOT SUITABLE FOR ONLINE STUDENTS")]
    NotSuitable,
}

impl Suitability {
    /// The marker phrase the detail page carries for unsuitable sections
    pub const NOT_SUITABLE_MARKER: &'static str = "NOT SUITABLE FOR ONLINE STUDENTS";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suitable => "SUITABLE FOR ONLINE STUDENTS",
            Self::NotSuitable => Self::NOT_SUITABLE_MARKER,
        }
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionInformation {
    /// Free text from the "Section Information:" cell, may be empty
    pub section_type: String,
    pub suitability: Suitability,
}

/// One scheduled meeting row of a section, in page order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeetingDetail {
    pub meeting_date: String,
    pub days: Vec<String>,
    pub time: String,
    pub schedule_type: String,
    pub instructor: String,
}

/// A single course section as published to the catalog store
///
/// `global_id` (term letter + CRN) is the idempotency key the sink upserts on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseDetailsRecord {
    /// Single letter term code: "F", "W" or "S"
    pub registration_term: String,

    #[serde(rename = "CRN")]
    pub crn: String,

    pub subject_code: String,
    pub long_title: String,
    pub short_title: String,
    pub course_description: String,
    pub course_credit_value: f64,
    pub schedule_type: String,
    pub registration_status: String,
    pub section_information: SectionInformation,
    pub meeting_details: Vec<MeetingDetail>,
    pub global_id: String,

    /// Subject and course number without the section (e.g. "COMP 5001")
    pub related_offering: String,

    /// First character of the section token, or "$" when there is none
    pub section_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_display() {
        let term = Term::new("202430", "Fall 2024");
        assert_eq!(term.to_string(), "Fall 2024 (202430)");
        assert_eq!(Term::new("202430", "").to_string(), "202430");
    }

    #[test]
    fn test_suitability_wire_names() {
        let json = serde_json::to_string(&Suitability::NotSuitable).unwrap();
        assert_eq!(json, "\"NOT SUITABLE FOR ONLINE STUDENTS\"");

        let parsed: Suitability =
            serde_json::from_str("\"SUITABLE FOR ONLINE STUDENTS\"").unwrap();
        assert_eq!(parsed, Suitability::Suitable);
    }

    #[test]
    fn test_record_field_names() {
        let record = CourseDetailsRecord {
            registration_term: "F".to_string(),
            crn: "30001".to_string(),
            global_id: "F30001".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["CRN"], "30001");
        assert_eq!(value["global_id"], "F30001");
        assert_eq!(
            value["section_information"]["suitability"],
            "SUITABLE FOR ONLINE STUDENTS"
        );
        assert!(value["meeting_details"].as_array().unwrap().is_empty());
        assert!(value.get("crn").is_none());
    }
}
