//! Lesson launch dispatch and uploaded-video registration.
//!
//! # Responsibility
//! - Map a clicked lesson to the player or modal that should open.
//! - Register lessons in the uploaded-video cache.
//!
//! # Invariants
//! - Known reading titles always open their reading modal, whatever the
//!   lesson kind says.
//! - An uploaded video bound to the exact course/module/lesson wins over the
//!   lesson's own data.

use crate::model::course::{Lesson, LessonKind};
use crate::model::video::VideoRecord;
use crate::reconcile::display::{leading_minutes, snake, LessonDisplay};
use crate::store::{KvStore, RecordStore, StoreResult};
use log::{debug, info, warn};

const DEFAULT_VIDEO_MINUTES: u32 = 10;

const READING_MODALS: [(&str, ModalOpener); 4] = [
    ("Common Attack Vectors and Examples", ModalOpener::AttackVectors),
    ("Common Data Breach Scenarios", ModalOpener::DataBreach),
    ("Common Types of Phishing Attacks", ModalOpener::PhishingTypes),
    ("Common Password Myths and Misconceptions", ModalOpener::PasswordMyths),
];

/// Named modal entry points of the player subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalOpener {
    AttackVectors,
    DataBreach,
    PhishingTypes,
    PasswordMyths,
    PasswordExercise,
    DataExercise,
    SocialExercise,
    SpotThePhishExercise,
}

impl ModalOpener {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AttackVectors => "openAttackVectorsModal",
            Self::DataBreach => "openDataBreachModal",
            Self::PhishingTypes => "openPhishingTypesModal",
            Self::PasswordMyths => "openPasswordMythsModal",
            Self::PasswordExercise => "openPasswordExercise",
            Self::DataExercise => "openDataExercise",
            Self::SocialExercise => "openSocialExercise",
            Self::SpotThePhishExercise => "openSpotThePhishExercise",
        }
    }

    /// Interactive exercise of the course shown on the page.
    pub fn exercise_for_course(course_title: &str) -> Self {
        match course_title {
            "Password Security" => Self::PasswordExercise,
            "Data Protection Essentials" => Self::DataExercise,
            "Social Engineering Defense" => Self::SocialExercise,
            _ => Self::SpotThePhishExercise,
        }
    }

    pub fn reading_for_title(title: &str) -> Option<Self> {
        READING_MODALS
            .iter()
            .find(|(known, _)| *known == title.trim())
            .map(|(_, opener)| *opener)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchRequest {
    Video {
        title: String,
        video_id: String,
        duration_minutes: u32,
    },
    Open(ModalOpener),
    /// Expand or collapse the lesson's inline details.
    ToggleDetails,
}

/// Modal and player subsystem of the host page.
pub trait ModalPlayer {
    fn open_video(&mut self, title: &str, video_id: &str, duration_minutes: u32);

    /// Returns false when the host has no such modal.
    fn open_modal(&mut self, opener: ModalOpener) -> bool;

    fn toggle_details(&mut self, lesson_key: &str);
}

/// Decides what clicking `lesson` opens.
pub fn resolve_launch(
    lesson: &LessonDisplay,
    course_title: &str,
    module_title: &str,
    videos: &[VideoRecord],
) -> LaunchRequest {
    if let Some(opener) = ModalOpener::reading_for_title(&lesson.title) {
        return LaunchRequest::Open(opener);
    }

    match lesson.kind {
        LessonKind::Video => {
            let uploaded = videos
                .iter()
                .find(|video| video.is_upload_for(course_title, module_title, &lesson.title));
            match uploaded {
                Some(video) => LaunchRequest::Video {
                    title: video.title.clone(),
                    video_id: video.id.clone(),
                    duration_minutes: video.duration,
                },
                None => LaunchRequest::Video {
                    title: lesson.title.clone(),
                    video_id: format!(
                        "{}_video",
                        lesson
                            .lesson_id
                            .clone()
                            .unwrap_or_else(|| snake(&lesson.title))
                    ),
                    duration_minutes: leading_minutes(&lesson.duration)
                        .filter(|minutes| *minutes > 0)
                        .unwrap_or(DEFAULT_VIDEO_MINUTES),
                },
            }
        }
        LessonKind::Interactive => LaunchRequest::Open(ModalOpener::exercise_for_course(course_title)),
        LessonKind::Document => LaunchRequest::ToggleDetails,
    }
}

/// Executes `request` on `player`. Returns false when the modal is missing.
pub fn dispatch<M: ModalPlayer + ?Sized>(
    request: &LaunchRequest,
    lesson_key: &str,
    player: &mut M,
) -> bool {
    match request {
        LaunchRequest::Video {
            title,
            video_id,
            duration_minutes,
        } => {
            player.open_video(title, video_id, *duration_minutes);
            true
        }
        LaunchRequest::Open(opener) => {
            let opened = player.open_modal(*opener);
            if !opened {
                warn!(
                    "event=lesson_launch module=service status=error lesson={} opener={} error_code=modal_missing",
                    lesson_key,
                    opener.as_str()
                );
            }
            opened
        }
        LaunchRequest::ToggleDetails => {
            player.toggle_details(lesson_key);
            true
        }
    }
}

/// Adds `lesson` to the uploaded-video cache unless it is already there.
///
/// Returns the new record, or `None` when a record with the same lesson name
/// or lesson id exists.
pub fn register_lesson_video<S: KvStore>(
    records: &RecordStore<S>,
    lesson: &Lesson,
    course_title: &str,
    module_title: &str,
    data_uri: &str,
    now_ms: i64,
) -> StoreResult<Option<VideoRecord>> {
    let mut videos = records.user_videos()?;
    let lesson_id = lesson
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_default();

    let exists = videos.iter().any(|video| {
        (!video.lesson_name.is_empty() && video.lesson_name == lesson.title)
            || (!video.lesson_id.is_empty() && video.lesson_id == lesson_id)
    });
    if exists {
        debug!("event=register_video module=service status=skip reason=exists");
        return Ok(None);
    }

    let record = VideoRecord {
        id: format!("{}_video_{}", snake(&lesson.title), now_ms),
        title: lesson.title.clone(),
        duration: lesson
            .duration
            .as_deref()
            .and_then(leading_minutes)
            .unwrap_or(0),
        course_name: course_title.to_string(),
        module_name: module_title.to_string(),
        lesson_name: lesson.title.clone(),
        lesson_id,
        is_uploaded_file: true,
        timestamp: now_ms,
        video_url: Some(data_uri.to_string()),
    };
    videos.push(record.clone());
    records.save_user_videos(&videos)?;
    records.put_video_data(&record.id, data_uri)?;

    info!(
        "event=register_video module=service status=ok video_id={} cached={}",
        record.id,
        videos.len()
    );
    Ok(Some(record))
}
