//! Parsers for the registration site's pages
//!
//! Each function takes the raw markup of one response and returns typed
//! values. None of them fail: a page that lacks the expected elements yields
//! empty results.

use crate::catalog::{CourseDetailsRecord, MeetingDetail, SectionInformation, Suitability, Term};
use crate::extract::cells::{cell_text, marker_rows, FieldExtractor};
use crate::extract::normalize::{
    clean_text, global_id, normalize_record, parse_credit_value, related_offering, section_key,
    split_days, term_letter,
};
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Label whose presence marks a course details table
pub const REGISTRATION_TERM_LABEL: &str = "Registration Term:";

/// Class carried by the first cell of every meeting row
pub const MEETING_ROW_CLASS: &str = "default";

/// Option values that stand for "no selection" in the subject list
const PLACEHOLDER_VALUES: [&str; 2] = ["dummy", "%"];

/// Extracted contents of the term-selection page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPage {
    /// Hidden `session_id` form value, empty if the page had none
    pub token: String,

    /// Terms offered in the `term_code` select, in page order
    pub terms: Vec<Term>,
}

/// Parses the term-selection page
pub fn parse_session_page(html: &str) -> SessionPage {
    let document = Html::parse_document(html);

    let token = Selector::parse("input[name='session_id']")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .find_map(|input| input.value().attr("value"))
                .map(|value| value.trim().to_string())
        })
        .unwrap_or_default();

    let mut terms = Vec::new();
    if let Ok(selector) = Selector::parse("select[name='term_code'] option") {
        for option in document.select(&selector) {
            let code = option.value().attr("value").unwrap_or("").trim();
            if code.is_empty() {
                continue;
            }
            terms.push(Term::new(code, clean_text(&cell_text(&option))));
        }
    }

    SessionPage { token, terms }
}

/// Parses the search-fields page into the subject codes offered for a term
pub fn parse_subjects(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut subjects = Vec::new();

    if let Ok(selector) = Selector::parse("select[name='sel_subj'] option") {
        for option in document.select(&selector) {
            let value = option.value().attr("value").unwrap_or("").trim();
            if value.is_empty() || PLACEHOLDER_VALUES.contains(&value) {
                continue;
            }
            if !subjects.iter().any(|s| s == value) {
                subjects.push(value.to_string());
            }
        }
    }

    subjects
}

/// Parses a course-search result page into its set of CRNs
///
/// The same CRN is often linked more than once on a page; the set collapses
/// those. A "no courses found" page simply has no matching links.
pub fn parse_crns(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut crns = BTreeSet::new();

    if let Ok(selector) = Selector::parse("td[style='word-wrap: break-word'] a[href]") {
        for anchor in document.select(&selector) {
            if let Some(crn) = anchor.value().attr("href").and_then(crn_from_href) {
                crns.insert(crn);
            }
        }
    }

    crns
}

/// Takes the value after the last `=` of a detail link
fn crn_from_href(href: &str) -> Option<String> {
    let (_, crn) = href.rsplit_once('=')?;
    let crn = crn.trim();
    if crn.is_empty() {
        None
    } else {
        Some(crn.to_string())
    }
}

/// Parses a course detail page into a normalized record
///
/// Returns `None` when the page has no "Registration Term:" label: it is not
/// a course details page and is skipped.
pub fn parse_course_details(html: &str) -> Option<CourseDetailsRecord> {
    let document = Html::parse_document(html);
    let fields = FieldExtractor::new(&document);

    if !fields.has_label(REGISTRATION_TERM_LABEL) {
        return None;
    }

    let letter = term_letter(&fields.value(REGISTRATION_TERM_LABEL));
    let crn = clean_text(&fields.value("CRN:"));
    let subject = fields.value("Subject:");

    let page_text: String = document.root_element().text().collect();
    let suitability = if page_text.contains(Suitability::NOT_SUITABLE_MARKER) {
        Suitability::NotSuitable
    } else {
        Suitability::Suitable
    };

    let record = CourseDetailsRecord {
        registration_term: letter.to_string(),
        global_id: global_id(letter, &crn),
        crn,
        subject_code: subject.clone(),
        long_title: fields.value("Long Title:"),
        short_title: fields.value("Title:"),
        course_description: fields.value("Course Description:"),
        course_credit_value: parse_credit_value(&fields.value("Course Credit Value:")),
        schedule_type: fields.value("Schedule Type:"),
        registration_status: fields.value("Status:"),
        section_information: SectionInformation {
            section_type: fields.value("Section Information:"),
            suitability,
        },
        meeting_details: parse_meeting_rows(&document),
        related_offering: related_offering(&subject),
        section_key: section_key(&subject),
    };

    Some(normalize_record(record))
}

/// Reads date, days, time, schedule type and instructor from each meeting row
fn parse_meeting_rows(document: &Html) -> Vec<MeetingDetail> {
    marker_rows(document, MEETING_ROW_CLASS)
        .into_iter()
        .map(|row| {
            let column = |index: usize| row.get(index).cloned().unwrap_or_default();
            MeetingDetail {
                meeting_date: column(0),
                days: split_days(&column(1)),
                time: column(2),
                schedule_type: column(3),
                instructor: column(4),
            }
        })
        .collect()
}
