//! Course catalog data model
//!
//! These types are the wire schema shared by the crawler and every ingestion
//! sink. The JSON field names are fixed by the sink's `add-course-details`
//! endpoint and must not drift.

mod record;
mod schedule;

pub use record::{CourseDetailsRecord, MeetingDetail, SectionInformation, Suitability, Term};
pub use schedule::{SectionKind, LECTURE_ALIASES};
