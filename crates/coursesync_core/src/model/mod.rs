//! Records edited by the admin tooling and read by the sync core.
//!
//! # Responsibility
//! - Define the serialized shapes of courses, templates, assignments and
//!   uploaded lesson videos.
//! - Tolerate loosely typed JSON (numeric or string ids and durations,
//!   missing collections).
//!
//! # Invariants
//! - Module order inside a course is authoritative.
//! - Lesson identity is `id` when present, else normalized title.

pub mod course;
pub mod id;
pub mod template;
pub mod video;
