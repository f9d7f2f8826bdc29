//! Typed access to the persisted records.

use super::{keys, KvStore, StoreResult};
use crate::model::course::Course;
use crate::model::template::{Assignments, Template};
use crate::model::video::VideoRecord;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Record-level view over a raw [`KvStore`].
pub struct RecordStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> RecordStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Raw store access for keys without a typed accessor.
    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn courses(&self) -> StoreResult<Vec<Course>> {
        self.read_json(keys::COURSES)
    }

    pub fn save_courses(&self, courses: &[Course]) -> StoreResult<()> {
        self.write_json(keys::COURSES, courses)
    }

    pub fn templates(&self) -> StoreResult<Vec<Template>> {
        self.read_json(keys::TEMPLATES)
    }

    pub fn save_templates(&self, templates: &[Template]) -> StoreResult<()> {
        self.write_json(keys::TEMPLATES, templates)
    }

    pub fn assignments(&self) -> StoreResult<Assignments> {
        self.read_json(keys::ASSIGNMENTS)
    }

    pub fn save_assignments(&self, assignments: &Assignments) -> StoreResult<()> {
        self.write_json(keys::ASSIGNMENTS, assignments)
    }

    pub fn user_videos(&self) -> StoreResult<Vec<VideoRecord>> {
        self.read_json(keys::USER_VIDEOS)
    }

    pub fn save_user_videos(&self, videos: &[VideoRecord]) -> StoreResult<()> {
        self.write_json(keys::USER_VIDEOS, videos)
    }

    pub fn put_video_data(&self, video_id: &str, data_uri: &str) -> StoreResult<()> {
        self.kv.set(&keys::video_data(video_id), data_uri)
    }

    pub fn video_data(&self, video_id: &str) -> StoreResult<Option<String>> {
        self.kv.get(&keys::video_data(video_id))
    }

    /// Admin settings document; `Value::Null` when absent or malformed.
    pub fn settings_document(&self) -> StoreResult<Value> {
        self.read_json(keys::ADMIN_SETTINGS)
    }

    /// Epoch-millis timestamp stored as a decimal string.
    pub fn last_update(&self, key: &str) -> StoreResult<Option<i64>> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };
        let parsed = raw.trim().parse::<i64>().ok();
        if parsed.is_none() {
            warn!("event=store_read module=store status=skip key={key} reason=non_numeric_timestamp");
        }
        Ok(parsed)
    }

    pub fn set_last_update(&self, key: &str, epoch_ms: i64) -> StoreResult<()> {
        self.kv.set(key, &epoch_ms.to_string())
    }

    /// Newest of the course and template last-update stamps; absent stamps count as 0.
    pub fn latest_update(&self) -> StoreResult<i64> {
        let courses = self.last_update(keys::COURSES_LAST_UPDATE)?.unwrap_or(0);
        let templates = self.last_update(keys::TEMPLATES_LAST_UPDATE)?.unwrap_or(0);
        Ok(courses.max(templates))
    }

    pub fn set_last_checked(&self, epoch_ms: i64) -> StoreResult<()> {
        self.set_last_update(keys::LAST_CHECK, epoch_ms)
    }

    pub fn lesson_injection_disabled(&self) -> StoreResult<bool> {
        Ok(self.kv.get(keys::DISABLE_LESSON_INJECTION)?.as_deref() == Some("true"))
    }

    pub fn set_lesson_injection_disabled(&self, disabled: bool) -> StoreResult<()> {
        self.kv
            .set(keys::DISABLE_LESSON_INJECTION, if disabled { "true" } else { "false" })
    }

    fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> StoreResult<T> {
        let Some(raw) = self.kv.get(key)? else {
            debug!("event=store_read module=store status=ok key={key} present=false");
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    "event=store_read module=store status=error key={} error_code=parse_failure line={} column={}",
                    key,
                    err.line(),
                    err.column()
                );
                Ok(T::default())
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let encoded = serde_json::to_string(value)?;
        self.kv.set(key, &encoded)?;
        debug!(
            "event=store_write module=store status=ok key={} bytes={}",
            key,
            encoded.len()
        );
        Ok(())
    }
}
