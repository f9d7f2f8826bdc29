//! Runtime configuration.
//!
//! Every field has a default, so `{}` is a complete configuration.

use crate::matcher::default_page_keywords;
use crate::store::keys;
use crate::sync::retry::{RetryBound, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_RETRY_ATTEMPTS: u32 = 10;

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
    pub dependency_retry: RetryBound,
    pub data_retry: RetryBound,
    /// Store keys whose mutation events trigger a pass.
    pub watched_keys: Vec<String>,
    /// Page identifier → course-name keyword.
    pub page_keywords: BTreeMap<String, String>,
    pub default_platform_name: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        let retry = RetryPolicy::default();
        Self {
            poll_interval_ms: 5_000,
            dependency_retry: retry.dependency,
            data_retry: retry.data,
            watched_keys: vec![
                keys::TEMPLATES_LAST_UPDATE.to_string(),
                keys::COURSES_LAST_UPDATE.to_string(),
                keys::COURSES.to_string(),
                keys::COURSE_CHANGES.to_string(),
            ],
            page_keywords: default_page_keywords(),
            default_platform_name: "CyberTech".to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        for (name, bound) in [
            ("dependency_retry", self.dependency_retry),
            ("data_retry", self.data_retry),
        ] {
            if bound.max_attempts == 0 || bound.max_attempts > MAX_RETRY_ATTEMPTS {
                return Err(ConfigError::Invalid(format!(
                    "{name}.max_attempts must be within 1..={MAX_RETRY_ATTEMPTS}"
                )));
            }
        }
        if let Some((page, _)) = self
            .page_keywords
            .iter()
            .find(|(page, keyword)| page.trim().is_empty() || keyword.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "page keyword entry `{page}` is empty"
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            dependency: self.dependency_retry,
            data: self.data_retry,
        }
    }

    pub fn watches(&self, key: &str) -> bool {
        self.watched_keys.iter().any(|watched| watched == key)
    }
}
