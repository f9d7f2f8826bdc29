//! Overview summary pass: targeted text patches on the module summary list.
//!
//! Summary items are never rebuilt. Missing lesson lines are appended to their
//! module item and stale lines are rewritten in place.

use crate::matcher::{normalize, strip_admin_label};
use crate::model::course::{Course, Module};
use crate::reconcile::action::{Action, ActionPayload, ActionPlan, ActionTarget, ChangeReason};
use crate::reconcile::display::LessonDisplay;
use crate::render::NodeDescriptor;
use log::debug;
use std::collections::HashSet;

const BULLET: char = '•';

/// Splits `• <title> - <duration>` into its title and duration.
pub fn parse_summary_line(line: &str) -> Option<(String, String)> {
    let body = line.trim().trim_start_matches(BULLET).trim();
    let (title, duration) = body.rsplit_once(" - ")?;
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some((title.to_string(), duration.trim().to_string()))
}

pub fn reconcile_summary(course: &Course, summary_nodes: &[NodeDescriptor]) -> ActionPlan {
    let mut plan = ActionPlan::new();
    let mut claimed_items = HashSet::new();

    for module in &course.modules {
        let wanted = normalize(&module.title);
        if wanted.is_empty() {
            continue;
        }
        let Some((position, item)) = find_item(&wanted, summary_nodes, &claimed_items) else {
            debug!(
                "event=reconcile_summary module=reconcile status=skip reason=no_item lessons={}",
                module.lessons.len()
            );
            continue;
        };
        claimed_items.insert(position);
        patch_item(&mut plan, module, item);
    }

    plan
}

fn find_item<'a>(
    wanted: &str,
    nodes: &'a [NodeDescriptor],
    claimed: &HashSet<usize>,
) -> Option<(usize, &'a NodeDescriptor)> {
    let open = || {
        nodes
            .iter()
            .enumerate()
            .filter(|(position, _)| !claimed.contains(position))
    };
    open()
        .find(|(_, node)| node.displayed_title().is_some_and(|title| normalize(title) == wanted))
        .or_else(|| open().find(|(_, node)| normalize(&node.full_text()).contains(wanted)))
}

fn patch_item(plan: &mut ActionPlan, module: &Module, item: &NodeDescriptor) {
    let shown: Vec<(String, Option<String>)> = item.children.iter().map(shown_line).collect();
    let mut claimed = HashSet::new();

    for lesson in &module.lessons {
        let wanted = normalize(&lesson.title);
        if wanted.is_empty() {
            continue;
        }
        let display = LessonDisplay::from_lesson(lesson);

        let open = || {
            shown
                .iter()
                .enumerate()
                .filter(|(position, _)| !claimed.contains(position))
        };
        let hit = open()
            .find(|(_, (title, _))| *title == wanted)
            .or_else(|| {
                open().find(|(_, (title, _))| {
                    !title.is_empty() && (title.contains(&wanted) || wanted.contains(title.as_str()))
                })
            })
            .map(|(position, _)| position);

        let Some(position) = hit else {
            plan.push(Action::insert(
                ActionTarget::SummaryModule(item.key.clone()),
                ActionPayload::Lesson(display),
                ChangeReason::New,
            ));
            continue;
        };
        claimed.insert(position);

        let child = &item.children[position];
        let current = child_title(child);
        let duration = &shown[position].1;
        if current.as_deref() != Some(display.title.as_str())
            || duration.as_deref() != Some(display.duration.as_str())
        {
            plan.push(Action::update_text(
                ActionTarget::SummaryLesson(child.key.clone()),
                display.summary_line(),
            ));
        }
    }
}

/// Normalized title and raw duration shown by one summary line.
fn shown_line(child: &NodeDescriptor) -> (String, Option<String>) {
    let parsed = parse_summary_line(&child.text);
    let title = child_title(child).unwrap_or_default();
    let duration = parsed
        .map(|(_, duration)| duration)
        .or_else(|| child.duration.clone());
    (normalize(&strip_admin_label(&title)), duration)
}

fn child_title(child: &NodeDescriptor) -> Option<String> {
    child
        .title
        .clone()
        .or_else(|| parse_summary_line(&child.text).map(|(title, _)| title))
}

#[cfg(test)]
mod tests {
    use super::parse_summary_line;

    #[test]
    fn parses_bullet_lines() {
        assert_eq!(
            parse_summary_line("• Red Flags - 15 min"),
            Some(("Red Flags".to_string(), "15 min".to_string()))
        );
        assert_eq!(
            parse_summary_line("• Before - After - 5 min"),
            Some(("Before - After".to_string(), "5 min".to_string()))
        );
        assert_eq!(parse_summary_line("no separator"), None);
        assert_eq!(parse_summary_line("•  - 5 min"), None);
    }
}
