//! Markup extraction for the legacy registration site
//!
//! This module contains:
//! - Cell lookup primitives (label → next cell, marker-class rows)
//! - Parsers for the term, subject, course-search and detail pages
//! - Normalization of extracted strings into the catalog record shape

pub mod cells;
pub mod normalize;
mod pages;

pub use cells::{marker_rows, FieldExtractor};
pub use normalize::{
    clean_text, global_id, normalize_record, parse_credit_value, related_offering, section_key,
    term_letter,
};
pub use pages::{
    parse_course_details, parse_crns, parse_session_page, parse_subjects, SessionPage,
    MEETING_ROW_CLASS, REGISTRATION_TERM_LABEL,
};
