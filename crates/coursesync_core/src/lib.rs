//! Course page synchronization core.
//! Keeps rendered course pages consistent with admin-edited course data.

pub mod config;
pub mod db;
pub mod logging;
pub mod matcher;
pub mod model;
pub mod reconcile;
pub mod render;
pub mod service;
pub mod store;
pub mod sync;

pub use config::{ConfigError, SyncConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use matcher::{
    match_course_for_page, match_lesson_node, match_module_node, match_template_for_course,
    page_identifier,
};
pub use model::course::{Course, Lesson, LessonIdentity, LessonKind, Module};
pub use model::id::EntityId;
pub use model::template::{Assignments, Template, TemplateLookup};
pub use model::video::VideoRecord;
pub use reconcile::action::{
    Action, ActionKind, ActionPayload, ActionPlan, ActionTarget, ChangeReason,
};
pub use reconcile::display::{infer_lesson_kind, normalize_duration, LessonDisplay, ModuleDisplay};
pub use reconcile::{Missing, MissingData, PageReconciler, ReconcileError, ReconcileResult};
pub use render::{CourseField, MemoryPage, NodeDescriptor, RenderedPage, TemplateSection};
pub use service::assignment_service::{AssignmentError, AssignmentService};
pub use service::lesson_launch::{LaunchRequest, ModalOpener, ModalPlayer};
pub use store::{KvStore, MemoryStore, RecordStore, SqliteKvStore, StoreError, StoreResult};
pub use sync::{
    ChangeNotifier, Clock, ManualClock, SettingsProvider, StoreSettings, SystemClock, Trigger,
    TriggerOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
