//! Reconciliation of rendered course pages against admin data.
//!
//! # Responsibility
//! - Derive display records from authoritative course data.
//! - Emit ordered action plans per rendered region; never touch the page.
//! - Orchestrate the passes for one page (`PageReconciler`).
//!
//! # Invariants
//! - Passes are pure over their inputs.
//! - Re-running a pass on the page its previous plan produced, with
//!   unchanged data, yields only `NOOP`s or nothing.
//! - Missing data yields `ReconcileError::NotFound` and an empty plan.

pub mod action;
pub mod curriculum;
pub mod display;
pub mod overview;
pub mod summary;
pub mod titles;

use crate::config::SyncConfig;
use crate::matcher::match_course_for_page;
use crate::model::id::EntityId;
use crate::model::template::TemplateLookup;
use crate::render::RenderedPage;
use crate::store::{KvStore, RecordStore, StoreError};
use crate::sync::settings::SettingsProvider;
use action::ActionPlan;
use log::{debug, info};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use curriculum::reconcile_curriculum;
pub use summary::reconcile_summary;
pub use titles::reconcile_titles;

/// Feature flag that controls the certificate link.
pub const CERTIFICATE_FEATURE: &str = "certificateGeneration";

pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// What a pass could not find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// A collaborator the pass depends on has not loaded yet.
    Dependency(&'static str),
    Data(MissingData),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingData {
    /// No course matches the page.
    Course { page: String },
    /// The course exists but carries no lessons.
    Lessons { course: EntityId },
}

impl Display for Missing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dependency(name) => write!(f, "dependency `{name}` not loaded"),
            Self::Data(MissingData::Course { page }) => write!(f, "no course for page `{page}`"),
            Self::Data(MissingData::Lessons { course }) => {
                write!(f, "course `{course}` has no lessons")
            }
        }
    }
}

#[derive(Debug)]
pub enum ReconcileError {
    NotFound(Missing),
    Store(StoreError),
    Unexpected(String),
}

impl ReconcileError {
    /// Only absent data is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(missing) => write!(f, "not found: {missing}"),
            Self::Store(err) => write!(f, "store error: {err}"),
            Self::Unexpected(message) => write!(f, "unexpected reconcile failure: {message}"),
        }
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::Unexpected(_) => None,
        }
    }
}

impl From<StoreError> for ReconcileError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Runs every pass for one course page.
pub struct PageReconciler<'a, S: KvStore, P: SettingsProvider> {
    records: &'a RecordStore<S>,
    settings: P,
    page_id: String,
    page_keywords: BTreeMap<String, String>,
    default_platform_name: String,
}

impl<'a, S: KvStore, P: SettingsProvider> PageReconciler<'a, S, P> {
    pub fn new(
        records: &'a RecordStore<S>,
        settings: P,
        page_id: impl Into<String>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            records,
            settings,
            page_id: page_id.into(),
            page_keywords: config.page_keywords.clone(),
            default_platform_name: config.default_platform_name.clone(),
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// Plans every region of `page`.
    ///
    /// Order: fields, certificate link, template sections, curriculum (or the
    /// title-only pass when lesson injection is disabled), overview summary.
    pub fn reconcile<R: RenderedPage + ?Sized>(&self, page: &R) -> ReconcileResult<ActionPlan> {
        if !self.settings.is_ready() {
            return Err(ReconcileError::NotFound(Missing::Dependency("settings")));
        }

        let courses = self.settings.courses()?;
        let Some(course) = match_course_for_page(&self.page_id, &courses, &self.page_keywords)
        else {
            return Err(ReconcileError::NotFound(Missing::Data(MissingData::Course {
                page: self.page_id.clone(),
            })));
        };
        if course.lessons().next().is_none() {
            return Err(ReconcileError::NotFound(Missing::Data(MissingData::Lessons {
                course: course.id.clone(),
            })));
        }

        let mut plan = ActionPlan::new();
        let platform_name = self.platform_name();
        plan.append(overview::reconcile_fields(course, &platform_name, page));
        plan.append(overview::reconcile_certificate(
            self.settings.is_feature_enabled(CERTIFICATE_FEATURE),
            page,
        ));

        let templates = self.records.templates()?;
        let assignments = self.records.assignments()?;
        match assignments.lookup(&course.id, &templates) {
            TemplateLookup::Assigned(template) => {
                plan.append(overview::reconcile_sections(template, page));
            }
            TemplateLookup::Unassigned => {
                debug!(
                    "event=reconcile_sections module=reconcile status=skip course_id={} reason=unassigned",
                    course.id
                );
            }
            TemplateLookup::Dangling(template_id) => {
                debug!(
                    "event=reconcile_sections module=reconcile status=skip course_id={} template_id={} reason=dangling",
                    course.id, template_id
                );
            }
        }

        if self.records.lesson_injection_disabled()? {
            debug!("event=reconcile_curriculum module=reconcile status=skip reason=disabled");
            plan.append(reconcile_titles(course, &page.lesson_nodes()));
        } else {
            plan.append(reconcile_curriculum(course, &page.module_nodes()));
        }
        plan.append(reconcile_summary(course, &page.summary_nodes()));

        info!(
            "event=reconcile_page module=reconcile status=ok page={} course_id={} actions={} effective={}",
            self.page_id,
            course.id,
            plan.len(),
            plan.effective().count()
        );
        Ok(plan)
    }

    fn platform_name(&self) -> String {
        match self.settings.setting(
            "general",
            "platformName",
            Value::String(self.default_platform_name.clone()),
        ) {
            Value::String(name) if !name.trim().is_empty() => name,
            _ => self.default_platform_name.clone(),
        }
    }
}
