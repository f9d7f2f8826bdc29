//! Fuzzy identity resolution between admin records and rendered nodes.
//!
//! # Responsibility
//! - Resolve template-for-course, course-for-page, module-for-node and
//!   lesson-for-node without stable identifiers.
//!
//! # Invariants
//! - Primary rule is case-insensitive substring containment; positional
//!   lookup is the secondary rule.
//! - Module strategies run in a fixed order and are never combined.
//! - Ties resolve to the earliest candidate in input order.
//! - All functions are pure.

mod page;

pub use page::{course_title_for_page, default_page_keywords, keyword_for_page, page_identifier};

use crate::model::course::{Course, Lesson, LessonIdentity};
use crate::model::template::Template;
use crate::render::NodeDescriptor;
use std::collections::{BTreeMap, HashSet};

/// Annotation appended to titles of admin-uploaded videos.
pub const ADMIN_LABEL: &str = "(Admin Video)";

/// Generic words that count as a module match when both sides contain them.
const MODULE_KEYWORD_OVERLAPS: [&str; 3] = ["identifying", "psychology", "introduction"];

/// Trimmed, lowercased form used for every comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Removes the admin-video annotation from a displayed title.
pub fn strip_admin_label(title: &str) -> String {
    title.replace(ADMIN_LABEL, "").trim().to_string()
}

fn mutually_contains(left: &str, right: &str) -> bool {
    !left.is_empty() && !right.is_empty() && (left.contains(right) || right.contains(left))
}

/// First template whose name contains, or is contained in, the course name;
/// otherwise the first template.
pub fn match_template_for_course<'a>(
    course: &Course,
    templates: &'a [Template],
) -> Option<&'a Template> {
    let course_name = normalize(&course.name);
    templates
        .iter()
        .find(|template| mutually_contains(&normalize(&template.name), &course_name))
        .or_else(|| templates.first())
}

/// Course whose name contains the keyword mapped from `page_id`.
pub fn match_course_for_page<'a>(
    page_id: &str,
    courses: &'a [Course],
    keywords: &BTreeMap<String, String>,
) -> Option<&'a Course> {
    let keyword = normalize(&keyword_for_page(page_id, keywords)?);
    if keyword.is_empty() {
        return None;
    }
    courses
        .iter()
        .find(|course| normalize(&course.name).contains(&keyword))
}

/// Strategy that resolved a module node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStrategy {
    Header,
    TitleElement,
    Position,
    TextOverlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleMatch<'a> {
    pub position: usize,
    pub node: &'a NodeDescriptor,
    pub strategy: ModuleStrategy,
}

/// Resolves the rendered container of the module at `index` titled `title`.
pub fn match_module_node<'a>(
    title: &str,
    nodes: &'a [NodeDescriptor],
    index: usize,
) -> Option<&'a NodeDescriptor> {
    match_module_node_excluding(title, nodes, index, &HashSet::new()).map(|found| found.node)
}

/// Like [`match_module_node`], skipping node positions already `claimed`.
pub fn match_module_node_excluding<'a>(
    title: &str,
    nodes: &'a [NodeDescriptor],
    index: usize,
    claimed: &HashSet<usize>,
) -> Option<ModuleMatch<'a>> {
    let wanted = normalize(title);
    if wanted.is_empty() {
        return None;
    }

    let open = || {
        nodes
            .iter()
            .enumerate()
            .filter(|(position, _)| !claimed.contains(position))
    };
    let found = |strategy| move |(position, node): (usize, &'a NodeDescriptor)| ModuleMatch {
        position,
        node,
        strategy,
    };

    // Within one strategy an exact title beats a mere containment.
    let by_text = |text: fn(&NodeDescriptor) -> Option<&str>| {
        open()
            .find(|(_, node)| text(node).is_some_and(|text| normalize(text) == wanted))
            .or_else(|| open().find(|(_, node)| text_contains(text(node), &wanted)))
    };

    if let Some(hit) = by_text(header_text) {
        return Some(found(ModuleStrategy::Header)(hit));
    }
    if let Some(hit) = by_text(title_text) {
        return Some(found(ModuleStrategy::TitleElement)(hit));
    }
    if index < nodes.len() && !claimed.contains(&index) {
        return Some(found(ModuleStrategy::Position)((index, &nodes[index])));
    }
    open()
        .find(|(_, node)| {
            let text = normalize(&node.full_text());
            text.contains(&wanted)
                || MODULE_KEYWORD_OVERLAPS
                    .iter()
                    .any(|keyword| wanted.contains(keyword) && text.contains(keyword))
        })
        .map(found(ModuleStrategy::TextOverlap))
}

fn header_text(node: &NodeDescriptor) -> Option<&str> {
    node.header.as_deref()
}

fn title_text(node: &NodeDescriptor) -> Option<&str> {
    node.title.as_deref()
}

fn text_contains(text: Option<&str>, wanted: &str) -> bool {
    text.is_some_and(|text| normalize(text).contains(wanted))
}

/// Whether `node` renders `lesson`.
///
/// Id-bearing lessons match only through the node key; the others match by
/// mutual title containment after stripping the admin annotation.
pub fn lesson_matches_node(lesson: &Lesson, node: &NodeDescriptor) -> bool {
    match lesson.identity() {
        LessonIdentity::ById(id) => !node.key.is_empty() && node.key.contains(id.as_str()),
        LessonIdentity::ByTitle(title) => node
            .displayed_title()
            .map(|shown| normalize(&strip_admin_label(shown)))
            .is_some_and(|shown| mutually_contains(&shown, &title)),
    }
}

/// First rendered node that renders `lesson`.
pub fn match_lesson_node<'a>(
    lesson: &Lesson,
    nodes: &'a [NodeDescriptor],
) -> Option<&'a NodeDescriptor> {
    nodes.iter().find(|node| lesson_matches_node(lesson, node))
}

/// Best authoritative lesson for a rendered lesson node.
///
/// Order: longest id contained in the node key, then an exact normalized title,
/// then the first mutual title containment.
pub fn lesson_for_node<'a>(node: &NodeDescriptor, course: &'a Course) -> Option<&'a Lesson> {
    let lessons: Vec<&Lesson> = course.lessons().map(|(_, lesson)| lesson).collect();

    let by_id = lessons
        .iter()
        .filter_map(|lesson| match lesson.identity() {
            LessonIdentity::ById(id) if lesson_matches_node(lesson, node) => {
                Some((id.as_str().len(), *lesson))
            }
            _ => None,
        })
        .fold(None::<(usize, &Lesson)>, |best, (len, lesson)| match best {
            Some((best_len, _)) if best_len >= len => best,
            _ => Some((len, lesson)),
        });
    if let Some((_, lesson)) = by_id {
        return Some(lesson);
    }

    let shown = normalize(&strip_admin_label(node.displayed_title()?));
    let by_title = || {
        lessons
            .iter()
            .copied()
            .filter(|lesson| matches!(lesson.identity(), LessonIdentity::ByTitle(_)))
    };
    by_title()
        .find(|lesson| normalize(&lesson.title) == shown)
        .or_else(|| by_title().find(|lesson| lesson_matches_node(lesson, node)))
}

#[cfg(test)]
mod tests {
    use super::{match_module_node_excluding, strip_admin_label, ModuleStrategy};
    use crate::render::NodeDescriptor;
    use std::collections::HashSet;

    #[test]
    fn strips_admin_label() {
        assert_eq!(strip_admin_label("Red Flags (Admin Video)"), "Red Flags");
        assert_eq!(strip_admin_label("Red Flags"), "Red Flags");
    }

    #[test]
    fn claimed_nodes_are_skipped() {
        let nodes = vec![
            NodeDescriptor::new("m0").with_header("Basics"),
            NodeDescriptor::new("m1").with_header("Basics"),
        ];
        let claimed: HashSet<usize> = [0].into_iter().collect();

        let found = match_module_node_excluding("Basics", &nodes, 5, &claimed).unwrap();
        assert_eq!(found.position, 1);
        assert_eq!(found.strategy, ModuleStrategy::Header);
    }

    #[test]
    fn claimed_position_falls_through_to_text_overlap() {
        let nodes = vec![
            NodeDescriptor::new("m0").with_header("Intro"),
            NodeDescriptor::new("m1").with_text("An introduction to the basics"),
        ];
        let claimed: HashSet<usize> = [0].into_iter().collect();

        let found =
            match_module_node_excluding("Introduction to Phishing", &nodes, 0, &claimed).unwrap();
        assert_eq!(found.position, 1);
        assert_eq!(found.strategy, ModuleStrategy::TextOverlap);
    }
}
