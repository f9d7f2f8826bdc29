//! Page identity derived from the current URL.

use std::collections::BTreeMap;

const COURSE_PAGE_PREFIX: &str = "course-";

const KNOWN_PAGES: [(&str, &str); 4] = [
    ("course-phishing", "phishing"),
    ("course-password-security", "password security"),
    ("course-data-protection", "data protection"),
    ("course-social-engineering", "social engineering"),
];

const COURSE_TITLES: [(&str, &str); 3] = [
    ("password-security", "Password Security"),
    ("data-protection", "Data Protection Essentials"),
    ("social-engineering", "Social Engineering Defense"),
];
const DEFAULT_COURSE_TITLE: &str = "Phishing Awareness";

/// Built-in page identifier → course-name keyword table.
pub fn default_page_keywords() -> BTreeMap<String, String> {
    KNOWN_PAGES
        .iter()
        .map(|(page, keyword)| (page.to_string(), keyword.to_string()))
        .collect()
}

/// Trailing path segment without query, fragment or extension.
///
/// `/site/course-phishing.html?x=1` → `course-phishing`.
pub fn page_identifier(path: &str) -> Option<String> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default().trim();
    let stem = match segment.rfind('.') {
        Some(dot) if dot > 0 => &segment[..dot],
        _ => segment,
    };
    (!stem.is_empty()).then(|| stem.to_string())
}

/// Keyword for `page_id`: table entry first, else the remainder of a
/// `course-` identifier with dashes read as spaces.
pub fn keyword_for_page(page_id: &str, keywords: &BTreeMap<String, String>) -> Option<String> {
    if let Some(keyword) = keywords.get(page_id) {
        return Some(keyword.clone());
    }
    page_id
        .strip_prefix(COURSE_PAGE_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(|rest| rest.replace('-', " "))
}

/// Display name of the course a page belongs to, as written on uploaded videos.
pub fn course_title_for_page(page_id: &str) -> &'static str {
    COURSE_TITLES
        .iter()
        .find(|(fragment, _)| page_id.contains(fragment))
        .map_or(DEFAULT_COURSE_TITLE, |(_, title)| *title)
}
