//! Action plans emitted by reconciliation passes.

use crate::reconcile::display::{LessonDisplay, ModuleDisplay};
use crate::render::{CourseField, TemplateSection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Insert,
    Replace,
    UpdateText,
    Noop,
}

/// Why an action was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeReason {
    New,
    Changed,
    Unchanged,
}

/// Rendered region an action applies to. Node keys come from `NodeDescriptor::key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionTarget {
    /// Curriculum container; module inserts are appended here.
    Curriculum,
    /// Lesson list of a curriculum module node.
    Module(String),
    /// Header title of a curriculum module node.
    ModuleHeader(String),
    /// Title text of a curriculum lesson node.
    LessonTitle(String),
    /// Module item of the overview summary list.
    SummaryModule(String),
    /// Lesson line inside a summary module item.
    SummaryLesson(String),
    Section(TemplateSection),
    Field(CourseField),
    CertificateLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPayload {
    Module(ModuleDisplay),
    Lesson(LessonDisplay),
    /// Remove every lesson child; `removed` lists their keys in document order.
    ClearLessons { removed: Vec<String> },
    Text(String),
    Items(Vec<String>),
    Visibility(bool),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub kind: ActionKind,
    pub target: ActionTarget,
    pub payload: ActionPayload,
    pub reason: ChangeReason,
}

impl Action {
    pub fn insert(target: ActionTarget, payload: ActionPayload, reason: ChangeReason) -> Self {
        Self {
            kind: ActionKind::Insert,
            target,
            payload,
            reason,
        }
    }

    pub fn replace(target: ActionTarget, payload: ActionPayload) -> Self {
        Self {
            kind: ActionKind::Replace,
            target,
            payload,
            reason: ChangeReason::Changed,
        }
    }

    pub fn update_text(target: ActionTarget, text: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::UpdateText,
            target,
            payload: ActionPayload::Text(text.into()),
            reason: ChangeReason::Changed,
        }
    }

    pub fn noop(target: ActionTarget) -> Self {
        Self {
            kind: ActionKind::Noop,
            target,
            payload: ActionPayload::Empty,
            reason: ChangeReason::Unchanged,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.kind == ActionKind::Noop
    }
}

/// Ordered output of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionPlan {
    actions: Vec<Action>,
}

impl ActionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn append(&mut self, other: ActionPlan) {
        self.actions.extend(other.actions);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// True when applying the plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.actions.iter().all(Action::is_noop)
    }

    /// Actions that change the page.
    pub fn effective(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|action| !action.is_noop())
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions.iter().filter(|action| action.kind == kind).count()
    }
}

impl IntoIterator for ActionPlan {
    type Item = Action;
    type IntoIter = std::vec::IntoIter<Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}
