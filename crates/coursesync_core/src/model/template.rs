//! Overview templates and the course → template assignment mapping.

use crate::model::id::{null_as_empty, opt_text, text_or_empty, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Admin-authored overview content assignable to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: EntityId,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "opt_text", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub learning_objectives: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub requirements: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target_audience: Vec<String>,
}

impl Template {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: None,
            learning_objectives: Vec::new(),
            requirements: Vec::new(),
            target_audience: Vec::new(),
        }
    }
}

/// Course id → template id, one entry per course.
///
/// Entries may reference templates or courses that no longer exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignments(BTreeMap<EntityId, EntityId>);

impl Assignments {
    pub fn get(&self, course_id: &EntityId) -> Option<&EntityId> {
        self.0.get(course_id)
    }

    pub fn contains(&self, course_id: &EntityId) -> bool {
        self.0.contains_key(course_id)
    }

    /// Assigns `template_id`, replacing any previous assignment for the course.
    pub fn assign(&mut self, course_id: EntityId, template_id: EntityId) -> Option<EntityId> {
        self.0.insert(course_id, template_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves the template assigned to `course_id` among `templates`.
    pub fn lookup<'a>(&'a self, course_id: &EntityId, templates: &'a [Template]) -> TemplateLookup<'a> {
        match self.get(course_id) {
            None => TemplateLookup::Unassigned,
            Some(template_id) => templates
                .iter()
                .find(|template| &template.id == template_id)
                .map_or(TemplateLookup::Dangling(template_id), TemplateLookup::Assigned),
        }
    }
}

/// Outcome of resolving a course's assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateLookup<'a> {
    Assigned(&'a Template),
    Unassigned,
    /// The mapping names a template that no longer exists.
    Dangling(&'a EntityId),
}

#[cfg(test)]
mod tests {
    use super::{Assignments, Template, TemplateLookup};
    use crate::model::id::EntityId;

    #[test]
    fn lookup_distinguishes_dangling_from_unassigned() {
        let templates = vec![Template::new(7, "Phishing")];
        let mut assignments: Assignments =
            serde_json::from_str(r#"{"1": 7, "2": "99"}"#).unwrap();

        assert!(matches!(
            assignments.lookup(&EntityId::from(1), &templates),
            TemplateLookup::Assigned(template) if template.name == "Phishing"
        ));
        assert_eq!(
            assignments.lookup(&EntityId::from(2), &templates),
            TemplateLookup::Dangling(&EntityId::from("99"))
        );
        assert_eq!(
            assignments.lookup(&EntityId::from(3), &templates),
            TemplateLookup::Unassigned
        );

        assert_eq!(assignments.assign(2.into(), 7.into()), Some(EntityId::from(99)));
        assert_eq!(assignments.len(), 2);
    }
}
