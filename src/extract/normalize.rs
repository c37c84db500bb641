//! Record normalization
//!
//! Converts the raw strings pulled out of a detail page into the typed record
//! shape. Nothing in here fails: malformed input degrades to an empty or
//! default value.

use crate::catalog::{CourseDetailsRecord, MeetingDetail, SectionInformation};

/// Section key used when the subject text has no section token
pub const MISSING_SECTION_KEY: &str = "$";

/// Removes embedded newlines and trims surrounding whitespace
pub fn clean_text(text: &str) -> String {
    text.replace(['\n', '\r'], "").trim().to_string()
}

/// Maps a term display name to its single letter code
///
/// "Winter" is checked before "Summer"; anything else (including "Spring" or
/// garbled text) is treated as Fall.
pub fn term_letter(text: &str) -> &'static str {
    if text.contains("Winter") {
        "W"
    } else if text.contains("Summer") {
        "S"
    } else {
        "F"
    }
}

/// Parses a credit value such as ".25" or "1.0"
///
/// Empty, malformed, non-finite and negative values all become 0.
pub fn parse_credit_value(raw: &str) -> f64 {
    let cleaned = clean_text(raw);
    if cleaned.is_empty() {
        return 0.0;
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(0.0)
}

/// First two whitespace-separated tokens of the subject text ("COMP 5001")
pub fn related_offering(subject_text: &str) -> String {
    let tokens: Vec<&str> = subject_text.split_whitespace().take(2).collect();
    if tokens.len() < 2 {
        return String::new();
    }
    tokens.join(" ")
}

/// First character of the third token of the subject text, or "$"
pub fn section_key(subject_text: &str) -> String {
    subject_text
        .split_whitespace()
        .nth(2)
        .and_then(|token| token.chars().next())
        .map(|c| c.to_string())
        .unwrap_or_else(|| MISSING_SECTION_KEY.to_string())
}

/// Idempotency key for the sink: term letter followed by the CRN
pub fn global_id(term_letter: &str, crn: &str) -> String {
    format!("{}{}", term_letter, crn)
}

/// Splits a days cell ("Tue Thu") into its day codes
pub fn split_days(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Applies [`clean_text`] to every string field of a record, nested ones included
pub fn normalize_record(record: CourseDetailsRecord) -> CourseDetailsRecord {
    CourseDetailsRecord {
        registration_term: clean_text(&record.registration_term),
        crn: clean_text(&record.crn),
        subject_code: clean_text(&record.subject_code),
        long_title: clean_text(&record.long_title),
        short_title: clean_text(&record.short_title),
        course_description: clean_text(&record.course_description),
        course_credit_value: record.course_credit_value,
        schedule_type: clean_text(&record.schedule_type),
        registration_status: clean_text(&record.registration_status),
        section_information: SectionInformation {
            section_type: clean_text(&record.section_information.section_type),
            suitability: record.section_information.suitability,
        },
        meeting_details: record
            .meeting_details
            .into_iter()
            .map(normalize_meeting)
            .collect(),
        global_id: clean_text(&record.global_id),
        related_offering: clean_text(&record.related_offering),
        section_key: clean_text(&record.section_key),
    }
}

fn normalize_meeting(meeting: MeetingDetail) -> MeetingDetail {
    MeetingDetail {
        meeting_date: clean_text(&meeting.meeting_date),
        days: meeting
            .days
            .iter()
            .map(|day| clean_text(day))
            .filter(|day| !day.is_empty())
            .collect(),
        time: clean_text(&meeting.time),
        schedule_type: clean_text(&meeting.schedule_type),
        instructor: clean_text(&meeting.instructor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("\n  ACCT 5001 A\n"), "ACCT 5001 A");
        assert_eq!(clean_text("Fund\namentals"), "Fundamentals");
        assert_eq!(clean_text("a\r\nb"), "ab");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n \t "), "");
    }

    #[test]
    fn test_clean_text_idempotent() {
        for input in [
            "  plain  ",
            "\n\nline\nbreaks\n",
            " \n leading",
            "inner  spaces  kept",
            "\t tabs \t",
            "",
        ] {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_term_letter() {
        assert_eq!(term_letter("Winter 2024 (January-April)"), "W");
        assert_eq!(term_letter("Summer 2024 (May-August)"), "S");
        assert_eq!(term_letter("Fall 2024 (September-December)"), "F");
        assert_eq!(term_letter("Spring 2024"), "F");
        assert_eq!(term_letter("@@garbled@@"), "F");
        assert_eq!(term_letter(""), "F");
    }

    #[test]
    fn test_term_letter_winter_wins() {
        assert_eq!(term_letter("Summer/Winter bridge"), "W");
        assert_eq!(term_letter("Winter and Summer"), "W");
    }

    #[test]
    fn test_parse_credit_value() {
        assert_eq!(parse_credit_value(".25"), 0.25);
        assert_eq!(parse_credit_value("\n.5\n"), 0.5);
        assert_eq!(parse_credit_value("1.0"), 1.0);
        assert_eq!(parse_credit_value(""), 0.0);
        assert_eq!(parse_credit_value("\n"), 0.0);
        assert_eq!(parse_credit_value("abc"), 0.0);
        assert_eq!(parse_credit_value("NaN"), 0.0);
        assert_eq!(parse_credit_value("inf"), 0.0);
        assert_eq!(parse_credit_value("-1"), 0.0);
    }

    #[test]
    fn test_related_offering() {
        assert_eq!(related_offering("COMP 5001 A"), "COMP 5001");
        assert_eq!(related_offering("\n  ACCT 5001 A\n"), "ACCT 5001");
        assert_eq!(related_offering("COMP 5001"), "COMP 5001");
        assert_eq!(related_offering("COMP"), "");
        assert_eq!(related_offering(""), "");
    }

    #[test]
    fn test_section_key() {
        assert_eq!(section_key("COMP 5001 A"), "A");
        assert_eq!(section_key("COMP 1405 B2"), "B");
        assert_eq!(section_key("COMP 5001"), "$");
        assert_eq!(section_key(""), "$");
    }

    #[test]
    fn test_global_id_stable() {
        assert_eq!(global_id("F", "30001"), "F30001");
        assert_eq!(global_id("F", "30001"), global_id("F", "30001"));
        assert_ne!(global_id("W", "30001"), global_id("F", "30001"));
    }

    #[test]
    fn test_split_days() {
        assert_eq!(split_days("Tue"), vec!["Tue"]);
        assert_eq!(split_days(" Mon  Wed \n"), vec!["Mon", "Wed"]);
        assert!(split_days("").is_empty());
    }

    #[test]
    fn test_normalize_record_nested() {
        let record = CourseDetailsRecord {
            crn: "\n30001\n".to_string(),
            section_information: SectionInformation {
                section_type: "  for MBA\nstudents ".to_string(),
                ..Default::default()
            },
            meeting_details: vec![MeetingDetail {
                meeting_date: "\nSep 06, 2023 to Oct 20, 2023\n".to_string(),
                days: vec!["Tue\n".to_string(), " ".to_string()],
                time: " 14:35 - 17:25 ".to_string(),
                schedule_type: "Seminar\n".to_string(),
                instructor: "\nJ. Doe".to_string(),
            }],
            ..Default::default()
        };

        let normalized = normalize_record(record);
        assert_eq!(normalized.crn, "30001");
        assert_eq!(normalized.section_information.section_type, "for MBAstudents");

        let meeting = &normalized.meeting_details[0];
        assert_eq!(meeting.meeting_date, "Sep 06, 2023 to Oct 20, 2023");
        assert_eq!(meeting.days, vec!["Tue"]);
        assert_eq!(meeting.time, "14:35 - 17:25");
        assert_eq!(meeting.schedule_type, "Seminar");
        assert_eq!(meeting.instructor, "J. Doe");
    }
}
