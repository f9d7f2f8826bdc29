//! Course, module and lesson records.
//!
//! # Invariants
//! - `Course::modules` order is the rendering order.
//! - A lesson without a usable `id` is identified by its normalized title.

use crate::model::id::{
    is_truthy, null_as_empty, opt_count, opt_id, opt_text, text_or_empty, truthy_flag, EntityId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level learning unit edited by admin tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: EntityId,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Total length in hours, as entered by the admin.
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "opt_count", skip_serializing_if = "Option::is_none")]
    pub enrolled: Option<u64>,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub modules: Vec<Module>,
}

impl Course {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            difficulty: None,
            duration: None,
            enrolled: None,
            image: None,
            modules: Vec::new(),
        }
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Iterates `(module, lesson)` pairs in rendering order.
    pub fn lessons(&self) -> impl Iterator<Item = (&Module, &Lesson)> {
        self.modules
            .iter()
            .flat_map(|module| module.lessons.iter().map(move |lesson| (module, lesson)))
    }
}

/// Named, ordered group of lessons. Titles are neither unique nor stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub lessons: Vec<Lesson>,
}

impl Module {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            duration: None,
            lessons: Vec::new(),
        }
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_lesson(mut self, lesson: Lesson) -> Self {
        self.lessons.push(lesson);
        self
    }
}

/// Rendering category of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Video,
    Interactive,
    Document,
}

impl LessonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Interactive => "interactive",
            Self::Document => "document",
        }
    }

    /// Parses the admin `type` tag. Unknown tags yield `None` so the caller
    /// falls back to title inference.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "video" => Some(Self::Video),
            "interactive" | "exercise" => Some(Self::Interactive),
            "document" | "reading" => Some(Self::Document),
            _ => None,
        }
    }
}

/// How a lesson is recognised across independent edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LessonIdentity {
    ById(EntityId),
    ByTitle(String),
}

/// Smallest content unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(default, deserialize_with = "opt_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Raw admin `type` tag; see [`Lesson::declared_kind`].
    #[serde(
        rename = "type",
        default,
        deserialize_with = "opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "truthy_flag")]
    pub added_by_admin: bool,
    #[serde(default, deserialize_with = "truthy_flag")]
    pub is_admin_video: bool,
    /// Any truthy value marks the lesson as recently edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Value>,
}

impl Lesson {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            duration: None,
            kind: None,
            added_by_admin: false,
            is_admin_video: false,
            last_modified: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<EntityId>) -> Self {
        let id = id.into();
        self.id = (!id.is_blank()).then_some(id);
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_kind(mut self, kind: LessonKind) -> Self {
        self.kind = Some(kind.as_str().to_string());
        self
    }

    pub fn identity(&self) -> LessonIdentity {
        match &self.id {
            Some(id) if !id.is_blank() => LessonIdentity::ById(id.clone()),
            _ => LessonIdentity::ByTitle(crate::matcher::normalize(&self.title)),
        }
    }

    pub fn declared_kind(&self) -> Option<LessonKind> {
        self.kind.as_deref().and_then(LessonKind::parse)
    }

    /// Recently added or edited by an admin.
    pub fn is_highlighted(&self) -> bool {
        self.added_by_admin || self.last_modified.as_ref().is_some_and(is_truthy)
    }
}
