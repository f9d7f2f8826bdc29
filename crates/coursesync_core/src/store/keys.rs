//! Persisted key names shared with the admin tooling.

pub const COURSES: &str = "cybertech_admin_courses";
pub const TEMPLATES: &str = "cybertech_overview_templates";
pub const ASSIGNMENTS: &str = "cybertech_course_template_assignments";
pub const COURSES_LAST_UPDATE: &str = "cybertech_admin_courses_last_update";
pub const TEMPLATES_LAST_UPDATE: &str = "cybertech_overview_templates_last_update";
pub const LAST_CHECK: &str = "cybertech_template_last_check";
/// Written by admin tooling on any course edit; content is not interpreted.
pub const COURSE_CHANGES: &str = "cybertech_course_changes";
pub const DISABLE_LESSON_INJECTION: &str = "disable_lesson_injection";
pub const USER_VIDEOS: &str = "cybertech_user_videos";
pub const ADMIN_SETTINGS: &str = "cybertech_admin_settings";

const VIDEO_DATA_PREFIX: &str = "video_data_";

/// Key holding the data URI payload of one uploaded video.
pub fn video_data(video_id: &str) -> String {
    format!("{VIDEO_DATA_PREFIX}{video_id}")
}

/// Last-update key that tracks writes to `key`, if any.
pub fn last_update_key_for(key: &str) -> Option<&'static str> {
    match key {
        COURSES | COURSES_LAST_UPDATE | COURSE_CHANGES => Some(COURSES_LAST_UPDATE),
        TEMPLATES | ASSIGNMENTS | TEMPLATES_LAST_UPDATE => Some(TEMPLATES_LAST_UPDATE),
        _ => None,
    }
}
