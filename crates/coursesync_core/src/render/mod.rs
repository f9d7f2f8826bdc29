//! Read-only description of what the page currently shows.
//!
//! # Responsibility
//! - Describe rendered regions as plain `NodeDescriptor` trees.
//! - Define the `RenderedPage` capability a renderer implements so the
//!   reconciler never touches a live document.
//!
//! # Invariants
//! - Descriptors are snapshots; the reconciler never mutates them.
//! - Node keys are whatever identifier attribute the renderer exposes.
//! - Lesson nodes report the kind and highlight they were drawn with; a lesson
//!   node without a kind never counts as up to date.

mod memory;

use crate::model::course::LessonKind;

pub use memory::{ApplyReport, MemoryPage};

/// Snapshot of one rendered region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDescriptor {
    /// Identifier attribute (element id, data key); may be empty.
    pub key: String,
    /// Header text, for module containers.
    pub header: Option<String>,
    /// Text of the dedicated title sub-element.
    pub title: Option<String>,
    /// Remaining own text that is neither header, title nor duration.
    pub text: String,
    pub duration: Option<String>,
    /// Lesson nodes: category the node was drawn as.
    pub kind: Option<LessonKind>,
    /// Lesson nodes: drawn with the admin highlight.
    pub highlight: bool,
    pub children: Vec<NodeDescriptor>,
}

impl NodeDescriptor {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_kind(mut self, kind: LessonKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn with_child(mut self, child: NodeDescriptor) -> Self {
        self.children.push(child);
        self
    }

    /// Title as shown to the user: title sub-element, else header.
    pub fn displayed_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.header.as_deref())
    }

    /// Whole text content of the node and its descendants, space separated.
    pub fn full_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        parts.extend(self.header.iter().cloned());
        parts.extend(self.title.iter().cloned());
        if !self.text.is_empty() {
            parts.push(self.text.clone());
        }
        parts.extend(self.duration.iter().cloned());
        parts.extend(self.children.iter().map(NodeDescriptor::full_text));
        parts.retain(|part| !part.is_empty());
        parts.join(" ")
    }
}

/// Overview regions fed from the assigned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateSection {
    /// Free-text overview paragraph (single item).
    Overview,
    LearningObjectives,
    Requirements,
    TargetAudience,
}

impl TemplateSection {
    pub const ALL: [TemplateSection; 4] = [
        Self::Overview,
        Self::LearningObjectives,
        Self::Requirements,
        Self::TargetAudience,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::LearningObjectives => "learning_objectives",
            Self::Requirements => "requirements",
            Self::TargetAudience => "target_audience",
        }
    }
}

/// Single-text regions carrying course metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CourseField {
    Title,
    /// Browser document title.
    DocumentTitle,
    Description,
    Duration,
    Enrolled,
    Difficulty,
    Image,
}

impl CourseField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::DocumentTitle => "document_title",
            Self::Description => "description",
            Self::Duration => "duration",
            Self::Enrolled => "enrolled",
            Self::Difficulty => "difficulty",
            Self::Image => "image",
        }
    }
}

/// Read capability over the live page, implemented by the renderer.
///
/// `None` from a region accessor means the page has no such region; the
/// reconciler then emits nothing for it.
pub trait RenderedPage {
    /// Curriculum module containers in document order; children are lesson nodes.
    fn module_nodes(&self) -> Vec<NodeDescriptor>;

    /// Module items of the overview summary list; children are lesson lines.
    fn summary_nodes(&self) -> Vec<NodeDescriptor>;

    fn section_items(&self, section: TemplateSection) -> Option<Vec<String>>;

    fn field_text(&self, field: CourseField) -> Option<String>;

    fn certificate_link_visible(&self) -> Option<bool>;

    /// Every curriculum lesson node, in document order.
    fn lesson_nodes(&self) -> Vec<NodeDescriptor> {
        self.module_nodes()
            .into_iter()
            .flat_map(|module| module.children)
            .collect()
    }
}
