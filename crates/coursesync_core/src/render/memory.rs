//! Document-free page model that applies action plans.
//!
//! Hosts without a DOM (tests, server-side previews) use it as the renderer.
//! Actions whose target is missing are counted as skipped, never fatal.

use super::{CourseField, NodeDescriptor, RenderedPage, TemplateSection};
use crate::model::course::LessonKind;
use crate::reconcile::action::{Action, ActionKind, ActionPayload, ActionPlan, ActionTarget};
use crate::reconcile::display::{LessonDisplay, ModuleDisplay};
use crate::reconcile::summary::parse_summary_line;
use std::collections::BTreeMap;

/// In-memory page state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPage {
    pub modules: Vec<NodeDescriptor>,
    pub summary: Vec<NodeDescriptor>,
    pub sections: BTreeMap<TemplateSection, Vec<String>>,
    pub fields: BTreeMap<CourseField, String>,
    pub certificate_link_visible: Option<bool>,
}

/// Counts from one [`MemoryPage::apply`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: usize,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, plan: &ActionPlan) -> ApplyReport {
        let mut report = ApplyReport::default();
        for action in plan.actions() {
            if action.is_noop() {
                continue;
            }
            if self.apply_one(action) {
                report.applied += 1;
            } else {
                report.skipped += 1;
            }
        }
        report
    }

    fn apply_one(&mut self, action: &Action) -> bool {
        match (&action.kind, &action.target, &action.payload) {
            (ActionKind::Insert, ActionTarget::Curriculum, ActionPayload::Module(module)) => {
                self.modules.push(module_node(module));
                true
            }
            (ActionKind::Replace, ActionTarget::Module(key), ActionPayload::ClearLessons { .. }) => {
                match find_mut(&mut self.modules, key) {
                    Some(module) => {
                        module.children.clear();
                        true
                    }
                    None => false,
                }
            }
            (ActionKind::Insert, ActionTarget::Module(key), ActionPayload::Lesson(lesson)) => {
                let Some(module) = find_mut(&mut self.modules, key) else {
                    return false;
                };
                module.children.push(lesson_node(lesson));
                true
            }
            (ActionKind::UpdateText, ActionTarget::ModuleHeader(key), ActionPayload::Text(title)) => {
                match find_mut(&mut self.modules, key) {
                    Some(module) => {
                        module.header = Some(title.clone());
                        module.title = Some(title.clone());
                        true
                    }
                    None => false,
                }
            }
            (ActionKind::UpdateText, ActionTarget::LessonTitle(key), ActionPayload::Text(title)) => {
                let lesson = self
                    .modules
                    .iter_mut()
                    .flat_map(|module| module.children.iter_mut())
                    .find(|lesson| &lesson.key == key);
                match lesson {
                    Some(lesson) => {
                        lesson.title = Some(title.clone());
                        true
                    }
                    None => false,
                }
            }
            (ActionKind::Insert, ActionTarget::SummaryModule(key), ActionPayload::Lesson(lesson)) => {
                match find_mut(&mut self.summary, key) {
                    Some(item) => {
                        item.children.push(
                            NodeDescriptor::new(format!("summary-{}", lesson.key))
                                .with_text(lesson.summary_line()),
                        );
                        true
                    }
                    None => false,
                }
            }
            (ActionKind::UpdateText, ActionTarget::SummaryLesson(key), ActionPayload::Text(line)) => {
                let line_node = self
                    .summary
                    .iter_mut()
                    .flat_map(|item| item.children.iter_mut())
                    .find(|line_node| &line_node.key == key);
                match line_node {
                    Some(line_node) => {
                        line_node.text = line.clone();
                        line_node.title = parse_summary_line(line).map(|(title, _)| title);
                        true
                    }
                    None => false,
                }
            }
            (ActionKind::Replace, ActionTarget::Section(section), ActionPayload::Items(items)) => {
                self.sections.insert(*section, items.clone());
                true
            }
            (ActionKind::UpdateText, ActionTarget::Field(field), ActionPayload::Text(text)) => {
                self.fields.insert(*field, text.clone());
                true
            }
            (ActionKind::Replace, ActionTarget::CertificateLink, ActionPayload::Visibility(shown)) => {
                self.certificate_link_visible = Some(*shown);
                true
            }
            _ => false,
        }
    }

    /// Keys of curriculum lessons currently shown with the admin highlight.
    pub fn highlighted(&self) -> Vec<String> {
        self.modules
            .iter()
            .flat_map(|module| module.children.iter())
            .filter(|lesson| lesson.highlight)
            .map(|lesson| lesson.key.clone())
            .collect()
    }

    /// Kind the curriculum lesson `key` is drawn as.
    pub fn lesson_kind(&self, key: &str) -> Option<LessonKind> {
        self.modules
            .iter()
            .flat_map(|module| module.children.iter())
            .find(|lesson| lesson.key == key)
            .and_then(|lesson| lesson.kind)
    }
}

impl RenderedPage for MemoryPage {
    fn module_nodes(&self) -> Vec<NodeDescriptor> {
        self.modules.clone()
    }

    fn summary_nodes(&self) -> Vec<NodeDescriptor> {
        self.summary.clone()
    }

    fn section_items(&self, section: TemplateSection) -> Option<Vec<String>> {
        self.sections.get(&section).cloned()
    }

    fn field_text(&self, field: CourseField) -> Option<String> {
        self.fields.get(&field).cloned()
    }

    fn certificate_link_visible(&self) -> Option<bool> {
        self.certificate_link_visible
    }
}

fn find_mut<'a>(nodes: &'a mut [NodeDescriptor], key: &str) -> Option<&'a mut NodeDescriptor> {
    nodes.iter_mut().find(|node| node.key == key)
}

fn module_node(module: &ModuleDisplay) -> NodeDescriptor {
    let mut node = NodeDescriptor::new(module.key.clone())
        .with_header(module.title.clone())
        .with_title(module.title.clone())
        .with_duration(module.duration.clone());
    node.children = module.lessons.iter().map(lesson_node).collect();
    node
}

fn lesson_node(lesson: &LessonDisplay) -> NodeDescriptor {
    NodeDescriptor::new(lesson.key.clone())
        .with_title(lesson.title.clone())
        .with_duration(lesson.duration.clone())
        .with_kind(lesson.kind)
        .with_highlight(lesson.highlight)
}
