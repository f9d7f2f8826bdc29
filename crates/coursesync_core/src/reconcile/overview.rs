//! Overview passes: template sections, course metadata fields and the
//! certificate link.
//!
//! Regions the page does not render, and values the data does not carry,
//! produce no action at all.

use crate::model::course::Course;
use crate::model::template::Template;
use crate::reconcile::action::{Action, ActionPayload, ActionPlan, ActionTarget};
use crate::render::{CourseField, RenderedPage, TemplateSection};

const FIELDS: [CourseField; 7] = [
    CourseField::Title,
    CourseField::DocumentTitle,
    CourseField::Description,
    CourseField::Duration,
    CourseField::Enrolled,
    CourseField::Difficulty,
    CourseField::Image,
];

/// Items `template` provides for `section`; `None` when it has nothing to show.
pub fn template_section_items(template: &Template, section: TemplateSection) -> Option<Vec<String>> {
    let items: Vec<String> = match section {
        TemplateSection::Overview => template
            .content
            .iter()
            .filter(|content| !content.trim().is_empty())
            .cloned()
            .collect(),
        TemplateSection::LearningObjectives => template.learning_objectives.clone(),
        TemplateSection::Requirements => template.requirements.clone(),
        TemplateSection::TargetAudience => template.target_audience.clone(),
    };
    (!items.is_empty()).then_some(items)
}

pub fn reconcile_sections<P: RenderedPage + ?Sized>(template: &Template, page: &P) -> ActionPlan {
    let mut plan = ActionPlan::new();
    for section in TemplateSection::ALL {
        let (Some(desired), Some(rendered)) = (
            template_section_items(template, section),
            page.section_items(section),
        ) else {
            continue;
        };
        let target = ActionTarget::Section(section);
        if desired == rendered {
            plan.push(Action::noop(target));
        } else {
            plan.push(Action::replace(target, ActionPayload::Items(desired)));
        }
    }
    plan
}

/// Text the page should show for `field`.
pub fn course_field_text(course: &Course, field: CourseField, platform_name: &str) -> Option<String> {
    let present = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let name = Some(course.name.trim()).filter(|name| !name.is_empty());

    match field {
        CourseField::Title => name.map(str::to_string),
        CourseField::DocumentTitle => name.map(|name| format!("{name} Course | {platform_name}")),
        CourseField::Description => present(&course.description),
        CourseField::Duration => present(&course.duration).map(|hours| {
            if hours.contains("hour") {
                hours
            } else {
                format!("{hours} hours")
            }
        }),
        CourseField::Enrolled => course
            .enrolled
            .filter(|count| *count > 0)
            .map(|count| format!("{} enrolled", group_thousands(count))),
        CourseField::Difficulty => present(&course.difficulty).map(|level| capitalize(&level)),
        CourseField::Image => present(&course.image),
    }
}

pub fn reconcile_fields<P: RenderedPage + ?Sized>(
    course: &Course,
    platform_name: &str,
    page: &P,
) -> ActionPlan {
    let mut plan = ActionPlan::new();
    for field in FIELDS {
        let Some(shown) = page.field_text(field) else {
            continue;
        };
        let Some(desired) = course_field_text(course, field, platform_name) else {
            continue;
        };
        if shown != desired {
            plan.push(Action::update_text(ActionTarget::Field(field), desired));
        }
    }
    plan
}

/// Shows the certificate link exactly when certificate generation is enabled.
pub fn reconcile_certificate<P: RenderedPage + ?Sized>(enabled: bool, page: &P) -> ActionPlan {
    let mut plan = ActionPlan::new();
    if let Some(visible) = page.certificate_link_visible() {
        if visible != enabled {
            plan.push(Action::replace(
                ActionTarget::CertificateLink,
                ActionPayload::Visibility(enabled),
            ));
        }
    }
    plan
}

/// `1250000` → `"1,250,000"`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{capitalize, course_field_text, group_thousands};
    use crate::model::course::Course;
    use crate::render::CourseField;

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(group_thousands(7), "7");
        assert_eq!(group_thousands(1250), "1,250");
        assert_eq!(group_thousands(1_250_000), "1,250,000");
        assert_eq!(group_thousands(100_000), "100,000");
    }

    #[test]
    fn formats_course_metadata() {
        let mut course = Course::new(1, "Phishing Awareness");
        course.duration = Some("2".into());
        course.enrolled = Some(1250);
        course.difficulty = Some("beginner".into());

        let text = |field| course_field_text(&course, field, "CyberTech");
        assert_eq!(
            text(CourseField::DocumentTitle).as_deref(),
            Some("Phishing Awareness Course | CyberTech")
        );
        assert_eq!(text(CourseField::Duration).as_deref(), Some("2 hours"));
        assert_eq!(text(CourseField::Enrolled).as_deref(), Some("1,250 enrolled"));
        assert_eq!(text(CourseField::Difficulty).as_deref(), Some("Beginner"));
        assert_eq!(text(CourseField::Description), None);
    }

    #[test]
    fn capitalizes_first_letter_only() {
        assert_eq!(capitalize("advanced level"), "Advanced level");
        assert_eq!(capitalize(""), "");
    }
}
