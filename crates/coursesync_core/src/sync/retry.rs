//! Bounded fixed-delay retry for passes that found nothing yet.

use crate::reconcile::Missing;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attempt limit and delay for one kind of missing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryBound {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl RetryBound {
    pub const fn new(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts,
            delay_ms,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Whether retry number `attempt` (1-based) is still allowed.
    pub fn allows(&self, attempt: u32) -> bool {
        attempt <= self.max_attempts
    }
}

impl Default for RetryBound {
    fn default() -> Self {
        RetryPolicy::default().data
    }
}

/// Which bound applies to a failed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryKind {
    Dependency,
    Data,
}

impl RetryKind {
    pub fn of(missing: &Missing) -> Self {
        match missing {
            Missing::Dependency(_) => Self::Dependency,
            Missing::Data(_) => Self::Data,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dependency => "dependency",
            Self::Data => "data",
        }
    }
}

/// A dependency that has not loaded gets more, quicker attempts than absent data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub dependency: RetryBound,
    pub data: RetryBound,
}

impl RetryPolicy {
    pub fn bound(&self, kind: RetryKind) -> RetryBound {
        match kind {
            RetryKind::Dependency => self.dependency,
            RetryKind::Data => self.data,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            dependency: RetryBound::new(5, 300),
            data: RetryBound::new(3, 500),
        }
    }
}
