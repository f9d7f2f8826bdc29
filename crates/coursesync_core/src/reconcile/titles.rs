//! Title-only pass: patch displayed lesson titles in place.
//!
//! Used where a full rebuild would be too disruptive. Emits `UPDATE_TEXT`
//! only for nodes whose displayed title differs from the resolved lesson.

use crate::matcher::{lesson_for_node, strip_admin_label};
use crate::model::course::Course;
use crate::reconcile::action::{Action, ActionPlan, ActionTarget};
use crate::render::NodeDescriptor;
use log::debug;

pub fn reconcile_titles(course: &Course, lesson_nodes: &[NodeDescriptor]) -> ActionPlan {
    let mut plan = ActionPlan::new();

    for node in lesson_nodes {
        let Some(shown) = node.displayed_title() else {
            continue;
        };
        let Some(lesson) = lesson_for_node(node, course) else {
            continue;
        };
        if strip_admin_label(shown) != lesson.title {
            debug!(
                "event=reconcile_title module=reconcile status=changed node={}",
                node.key
            );
            plan.push(Action::update_text(
                ActionTarget::LessonTitle(node.key.clone()),
                lesson.title.clone(),
            ));
        }
    }

    plan
}
