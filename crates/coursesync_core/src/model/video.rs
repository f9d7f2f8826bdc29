//! Cached records of lesson videos uploaded through admin tooling.

use serde::{Deserialize, Serialize};

/// One entry of the uploaded-video cache.
///
/// The payload itself is stored separately as a data URI; `video_url` keeps a
/// copy so players can start without a second lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub module_name: String,
    #[serde(default)]
    pub lesson_name: String,
    #[serde(default)]
    pub lesson_id: String,
    #[serde(default)]
    pub is_uploaded_file: bool,
    /// Upload time, epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl VideoRecord {
    /// Uploaded file bound to this exact course/module/lesson triple.
    pub fn is_upload_for(&self, course_name: &str, module_name: &str, lesson_name: &str) -> bool {
        self.is_uploaded_file
            && self.course_name == course_name
            && self.module_name == module_name
            && self.lesson_name == lesson_name
            && self.video_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}
