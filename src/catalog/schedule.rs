//! Schedule type classification
//!
//! The catalog store links a section to its course either as a lecture or as
//! a tutorial. Which one is decided by the section's schedule type.

use std::fmt;

/// Schedule types that are stored as lecture sections
pub const LECTURE_ALIASES: [&str; 12] = [
    "Lecture",
    "Seminar",
    "Studio",
    "Comprehensive",
    "Practicum",
    "Other",
    "Workshop",
    "PhD Thesis",
    "Masters Thesis",
    "Directed Studies",
    "Honours Essay",
    "Problem Analysis",
];

/// Relationship type between a section and its course offering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Lecture,
    Tutorial,
}

impl SectionKind {
    /// Classifies a schedule type; anything not in the alias table is a tutorial
    pub fn from_schedule_type(schedule_type: &str) -> Self {
        if LECTURE_ALIASES.contains(&schedule_type) {
            Self::Lecture
        } else {
            Self::Tutorial
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Tutorial => "tutorial",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}
