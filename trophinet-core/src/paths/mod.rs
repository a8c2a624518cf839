//! Mining of exchange paths rooted at exudates.
//!
//! Enumeration and classification are separate stages joined by per-exudate
//! snapshots, so classification can be rerun without repeating the search.

pub mod classify;
pub mod enumerate;
pub mod graph;

pub use classify::{classify_courses, summarize, Classification, ClassifiedCourses, DaTable};
pub use enumerate::{enumerate_exudate_paths, ExudatePaths, MIN_PATH_NODES};
pub use graph::{ShortestPaths, TrophicGraph};
