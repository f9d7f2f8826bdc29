//! Display records derived from authoritative lesson and module data.
//!
//! # Invariants
//! - Keyword inference tests video terms first, then interactive, then
//!   document; the first family with a hit wins.
//! - Normalized durations always carry a unit.

use crate::model::course::{Lesson, LessonKind, Module};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const VIDEO_TERMS: [&str; 9] = [
    "video",
    "analysis",
    "psychology",
    "triggers",
    "red flags",
    "urls",
    "what is",
    "history",
    "evolution",
];
const INTERACTIVE_TERMS: [&str; 3] = ["interactive", "exercise", "spot the phish"];
const DOCUMENT_TERMS: [&str; 4] = [
    "case studies",
    "document",
    "common types",
    "common types of phishing attacks",
];

const DEFAULT_LESSON_DURATION: &str = "10";
const DEFAULT_MODULE_DURATION: &str = "30";

/// What a renderer needs to draw one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDisplay {
    /// Node key: `lesson-<id>` or `lesson-<title-slug>`.
    pub key: String,
    pub lesson_id: Option<String>,
    pub title: String,
    pub duration: String,
    pub kind: LessonKind,
    pub highlight: bool,
}

impl LessonDisplay {
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            key: lesson_key(lesson),
            lesson_id: lesson.id.as_ref().map(|id| id.to_string()),
            title: lesson.title.clone(),
            duration: normalize_duration(lesson.duration.as_deref()),
            kind: lesson
                .declared_kind()
                .unwrap_or_else(|| infer_lesson_kind(&lesson.title)),
            highlight: lesson.is_highlighted(),
        }
    }

    /// Line used by the overview summary list.
    pub fn summary_line(&self) -> String {
        format!("• {} - {}", self.title, self.duration)
    }
}

/// What a renderer needs to draw a module that is not on the page yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDisplay {
    pub key: String,
    pub title: String,
    pub duration: String,
    pub lessons: Vec<LessonDisplay>,
}

impl ModuleDisplay {
    pub fn from_module(module: &Module) -> Self {
        Self {
            key: format!("module-{}", slug(&module.title)),
            title: module.title.clone(),
            duration: module_duration(module.duration.as_deref()),
            lessons: module.lessons.iter().map(LessonDisplay::from_lesson).collect(),
        }
    }
}

/// Infers the lesson kind from its title.
///
/// Titles matching no keyword are treated as videos.
pub fn infer_lesson_kind(title: &str) -> LessonKind {
    let lowered = title.to_lowercase();
    let hit = |terms: &[&str]| terms.iter().any(|term| lowered.contains(term));

    if hit(&VIDEO_TERMS) {
        LessonKind::Video
    } else if hit(&INTERACTIVE_TERMS) {
        LessonKind::Interactive
    } else if hit(&DOCUMENT_TERMS) {
        LessonKind::Document
    } else {
        LessonKind::Video
    }
}

/// `"15"` → `"15 min"`; values already mentioning minutes pass through.
pub fn normalize_duration(raw: Option<&str>) -> String {
    let value = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_LESSON_DURATION);
    if value.contains("min") {
        value.to_string()
    } else {
        format!("{value} min")
    }
}

fn module_duration(raw: Option<&str>) -> String {
    let value = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_MODULE_DURATION);
    if value.contains("min") || value.contains("hour") {
        value.to_string()
    } else {
        format!("{value} minutes")
    }
}

pub fn lesson_key(lesson: &Lesson) -> String {
    match &lesson.id {
        Some(id) if !id.is_blank() => format!("lesson-{id}"),
        _ => format!("lesson-{}", slug(&lesson.title)),
    }
}

/// Lowercases and joins whitespace runs with `-`.
pub fn slug(text: &str) -> String {
    WHITESPACE_RE
        .replace_all(text.trim().to_lowercase().as_str(), "-")
        .into_owned()
}

/// Lowercases and joins whitespace runs with `_`; used for video ids.
pub fn snake(text: &str) -> String {
    WHITESPACE_RE
        .replace_all(text.trim().to_lowercase().as_str(), "_")
        .into_owned()
}

/// Leading whole minutes of a duration string: `"15 min"` → `Some(15)`.
pub fn leading_minutes(duration: &str) -> Option<u32> {
    let trimmed = duration.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{infer_lesson_kind, leading_minutes, normalize_duration, slug, snake, LessonDisplay};
    use crate::model::course::{Lesson, LessonKind};

    #[test]
    fn video_terms_win_over_later_families() {
        assert_eq!(
            infer_lesson_kind("Password Psychology Triggers"),
            LessonKind::Video
        );
        assert_eq!(
            infer_lesson_kind("History of the Spot the Phish exercise"),
            LessonKind::Video
        );
    }

    #[test]
    fn infers_interactive_and_document_lessons() {
        assert_eq!(infer_lesson_kind("Spot the Phish"), LessonKind::Interactive);
        assert_eq!(
            infer_lesson_kind("Common Types of Phishing Attacks"),
            LessonKind::Document
        );
        assert_eq!(infer_lesson_kind("Breach Case Studies"), LessonKind::Document);
        assert_eq!(infer_lesson_kind("Wrap-up"), LessonKind::Video);
    }

    #[test]
    fn duration_gets_a_unit_once() {
        assert_eq!(normalize_duration(Some("15")), "15 min");
        assert_eq!(normalize_duration(Some("15 min")), "15 min");
        assert_eq!(normalize_duration(Some("12 minutes")), "12 minutes");
        assert_eq!(normalize_duration(None), "10 min");
        assert_eq!(normalize_duration(Some("  ")), "10 min");
    }

    #[test]
    fn declared_type_beats_title_inference() {
        let lesson = Lesson::new("Common Types of Phishing Attacks").with_kind(LessonKind::Video);
        assert_eq!(LessonDisplay::from_lesson(&lesson).kind, LessonKind::Video);
    }

    #[test]
    fn keys_use_id_or_title_slug() {
        assert_eq!(
            LessonDisplay::from_lesson(&Lesson::new("What is  Phishing?")).key,
            "lesson-what-is-phishing?"
        );
        assert_eq!(
            LessonDisplay::from_lesson(&Lesson::new("Anything").with_id("l-7")).key,
            "lesson-l-7"
        );
        assert_eq!(slug(" Red Flags "), "red-flags");
        assert_eq!(snake("Spot  the Phish"), "spot_the_phish");
    }

    #[test]
    fn reads_leading_minutes() {
        assert_eq!(leading_minutes("15 min"), Some(15));
        assert_eq!(leading_minutes(" 7"), Some(7));
        assert_eq!(leading_minutes("about 5"), None);
        assert_eq!(leading_minutes(""), None);
    }
}
