//! Template auto-assignment use-case.
//!
//! # Responsibility
//! - Give every course without an assignment the template the matcher picks.
//! - Report the assignment state of a single course.
//!
//! # Invariants
//! - Existing assignments are never replaced, dangling ones included.
//! - Last-update stamps are bumped only when the mapping changed.

use crate::matcher::match_template_for_course;
use crate::model::course::Course;
use crate::model::id::EntityId;
use crate::model::template::{Template, TemplateLookup};
use crate::store::{keys, KvStore, RecordStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum AssignmentError {
    /// Course id is blank and cannot key an assignment.
    InvalidCourseId,
    Store(StoreError),
}

impl Display for AssignmentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCourseId => write!(f, "course id must not be blank"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AssignmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidCourseId => None,
        }
    }
}

impl From<StoreError> for AssignmentError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Owned form of [`TemplateLookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignedTemplate {
    Assigned(Template),
    Unassigned,
    Dangling(EntityId),
}

/// Result of one [`AssignmentService::ensure_all_assigned`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentReport {
    /// `(course id, template id)` pairs added by this run.
    pub assigned: Vec<(EntityId, EntityId)>,
    /// Courses left unassigned because no template exists.
    pub skipped: usize,
}

impl AssignmentReport {
    pub fn changed(&self) -> bool {
        !self.assigned.is_empty()
    }
}

pub struct AssignmentService<'a, S: KvStore> {
    records: &'a RecordStore<S>,
}

impl<'a, S: KvStore> AssignmentService<'a, S> {
    pub fn new(records: &'a RecordStore<S>) -> Self {
        Self { records }
    }

    /// Assigns a template to every course that has none.
    pub fn ensure_all_assigned(&self, now_ms: i64) -> Result<AssignmentReport, AssignmentError> {
        let courses = self.records.courses()?;
        let templates = self.records.templates()?;
        let mut assignments = self.records.assignments()?;
        let mut report = AssignmentReport::default();

        for course in &courses {
            if course.id.is_blank() {
                report.skipped += 1;
                continue;
            }
            if assignments.contains(&course.id) {
                continue;
            }
            match match_template_for_course(course, &templates) {
                Some(template) => {
                    assignments.assign(course.id.clone(), template.id.clone());
                    report
                        .assigned
                        .push((course.id.clone(), template.id.clone()));
                }
                None => report.skipped += 1,
            }
        }

        if report.changed() {
            self.records.save_assignments(&assignments)?;
            self.records.set_last_update(keys::TEMPLATES_LAST_UPDATE, now_ms)?;
            self.records.set_last_update(keys::COURSES_LAST_UPDATE, now_ms)?;
        }
        info!(
            "event=ensure_assignments module=service status=ok assigned={} skipped={}",
            report.assigned.len(),
            report.skipped
        );
        Ok(report)
    }

    /// Assignment state of `course`.
    pub fn assigned_template(&self, course: &Course) -> Result<AssignedTemplate, AssignmentError> {
        if course.id.is_blank() {
            return Err(AssignmentError::InvalidCourseId);
        }
        let templates = self.records.templates()?;
        let assignments = self.records.assignments()?;
        Ok(match assignments.lookup(&course.id, &templates) {
            TemplateLookup::Assigned(template) => AssignedTemplate::Assigned(template.clone()),
            TemplateLookup::Unassigned => AssignedTemplate::Unassigned,
            TemplateLookup::Dangling(template_id) => AssignedTemplate::Dangling(template_id.clone()),
        })
    }
}
