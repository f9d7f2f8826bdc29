//! Curriculum pass: full lesson-list rebuild for every resolved module.
//!
//! # Invariants
//! - Modules are visited in course order; each rendered node serves at most
//!   one module per pass.
//! - A resolved module whose lesson list already matches (key, title,
//!   duration, kind and highlight) is left alone; otherwise its list is
//!   cleared and re-inserted in lesson order.
//! - Unresolved modules are inserted whole; no per-lesson actions follow.

use crate::matcher::{match_lesson_node, match_module_node_excluding, normalize, ModuleStrategy};
use crate::model::course::{Course, Module};
use crate::reconcile::action::{Action, ActionPayload, ActionPlan, ActionTarget, ChangeReason};
use crate::reconcile::display::{LessonDisplay, ModuleDisplay};
use crate::render::NodeDescriptor;
use log::debug;
use std::collections::HashSet;

/// Brings curriculum module nodes in line with `course`.
pub fn reconcile_curriculum(course: &Course, module_nodes: &[NodeDescriptor]) -> ActionPlan {
    let mut plan = ActionPlan::new();
    let mut claimed = HashSet::new();

    for (index, module) in course.modules.iter().enumerate() {
        if module.lessons.is_empty() || normalize(&module.title).is_empty() {
            debug!(
                "event=reconcile_module module=reconcile status=skip index={} lessons={}",
                index,
                module.lessons.len()
            );
            continue;
        }

        let Some(found) = match_module_node_excluding(&module.title, module_nodes, index, &claimed)
        else {
            plan.push(Action::insert(
                ActionTarget::Curriculum,
                ActionPayload::Module(ModuleDisplay::from_module(module)),
                ChangeReason::New,
            ));
            continue;
        };
        claimed.insert(found.position);

        if matches!(
            found.strategy,
            ModuleStrategy::Position | ModuleStrategy::TextOverlap
        ) && found.node.displayed_title() != Some(module.title.as_str())
        {
            plan.push(Action::update_text(
                ActionTarget::ModuleHeader(found.node.key.clone()),
                module.title.clone(),
            ));
        }
        rebuild_lessons(&mut plan, module, found.node);
    }

    plan
}

fn rebuild_lessons(plan: &mut ActionPlan, module: &Module, node: &NodeDescriptor) {
    let target = || ActionTarget::Module(node.key.clone());
    let desired: Vec<LessonDisplay> = module.lessons.iter().map(LessonDisplay::from_lesson).collect();

    if renders_exactly(&node.children, &desired) {
        plan.push(Action::noop(target()));
        return;
    }

    plan.push(Action::replace(
        target(),
        ActionPayload::ClearLessons {
            removed: node.children.iter().map(|child| child.key.clone()).collect(),
        },
    ));
    for (lesson, display) in module.lessons.iter().zip(desired) {
        let reason = match match_lesson_node(lesson, &node.children) {
            Some(_) => ChangeReason::Changed,
            None => ChangeReason::New,
        };
        plan.push(Action::insert(target(), ActionPayload::Lesson(display), reason));
    }
}

fn renders_exactly(rendered: &[NodeDescriptor], desired: &[LessonDisplay]) -> bool {
    rendered.len() == desired.len()
        && rendered.iter().zip(desired).all(|(node, lesson)| {
            node.key == lesson.key
                && node.displayed_title() == Some(lesson.title.as_str())
                && node.duration.as_deref() == Some(lesson.duration.as_str())
                && node.kind == Some(lesson.kind)
                && node.highlight == lesson.highlight
        })
}
