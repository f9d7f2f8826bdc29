//! Settings and feature-flag provider consumed by reconciliation.

use crate::model::course::Course;
use crate::store::{KvStore, RecordStore, StoreResult};
use log::warn;
use serde_json::Value;

/// Admin settings capability.
///
/// `is_ready` reports whether the provider has loaded; passes run only once
/// it returns true.
pub trait SettingsProvider {
    fn is_ready(&self) -> bool {
        true
    }

    fn is_feature_enabled(&self, flag: &str) -> bool;

    fn courses(&self) -> StoreResult<Vec<Course>>;

    /// `section.key` from the settings document, else `default`.
    fn setting(&self, section: &str, key: &str, default: Value) -> Value;
}

impl<T: SettingsProvider + ?Sized> SettingsProvider for &T {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn is_feature_enabled(&self, flag: &str) -> bool {
        (**self).is_feature_enabled(flag)
    }

    fn courses(&self) -> StoreResult<Vec<Course>> {
        (**self).courses()
    }

    fn setting(&self, section: &str, key: &str, default: Value) -> Value {
        (**self).setting(section, key, default)
    }
}

/// Provider backed by the persisted admin keys.
///
/// The settings document is shaped `{"features": {..}, "<section>": {..}}`.
/// Flags missing from `features` count as enabled.
pub struct StoreSettings<'a, S: KvStore> {
    records: &'a RecordStore<S>,
}

impl<'a, S: KvStore> StoreSettings<'a, S> {
    pub fn new(records: &'a RecordStore<S>) -> Self {
        Self { records }
    }

    fn document(&self) -> Value {
        match self.records.settings_document() {
            Ok(document) => document,
            Err(err) => {
                warn!("event=settings_read module=sync status=error error={err}");
                Value::Null
            }
        }
    }
}

impl<S: KvStore> SettingsProvider for StoreSettings<'_, S> {
    fn is_feature_enabled(&self, flag: &str) -> bool {
        match self.document().pointer(&format!("/features/{flag}")) {
            Some(Value::Bool(enabled)) => *enabled,
            Some(Value::Null) | None => true,
            Some(other) => {
                warn!(
                    "event=settings_read module=sync status=skip flag={} reason=non_boolean kind={}",
                    flag,
                    value_kind(other)
                );
                true
            }
        }
    }

    fn courses(&self) -> StoreResult<Vec<Course>> {
        self.records.courses()
    }

    fn setting(&self, section: &str, key: &str, default: Value) -> Value {
        self.document()
            .get(section)
            .and_then(|section| section.get(key))
            .filter(|value| !value.is_null())
            .cloned()
            .unwrap_or(default)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{SettingsProvider, StoreSettings};
    use crate::store::{keys, KvStore, MemoryStore, RecordStore};
    use serde_json::json;

    #[test]
    fn reads_flags_and_sections() {
        let records = RecordStore::new(MemoryStore::new());
        records
            .kv()
            .set(
                keys::ADMIN_SETTINGS,
                r#"{"features":{"certificateGeneration":false},"general":{"platformName":"Acme"}}"#,
            )
            .unwrap();
        let settings = StoreSettings::new(&records);

        assert!(!settings.is_feature_enabled("certificateGeneration"));
        assert!(settings.is_feature_enabled("darkMode"));
        assert_eq!(
            settings.setting("general", "platformName", json!("CyberTech")),
            json!("Acme")
        );
        assert_eq!(
            settings.setting("general", "supportEmail", json!("none")),
            json!("none")
        );
    }

    #[test]
    fn missing_document_enables_everything() {
        let records = RecordStore::new(MemoryStore::new());
        let settings = StoreSettings::new(&records);
        assert!(settings.is_feature_enabled("certificateGeneration"));
        assert!(settings.courses().unwrap().is_empty());
    }
}
