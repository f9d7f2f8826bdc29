//! Change notifier: decides when the reconciler runs.
//!
//! # Invariants
//! - A pass runs only when the latest persisted last-update stamp is strictly
//!   newer than the session's last-checked value (none yet counts as older).
//! - Last-checked is advanced before the reconciler runs.
//! - Retries bypass the stamp gate and stop at the bound for their kind.
//! - Unexpected failures are logged and never retried.

use crate::config::SyncConfig;
use crate::reconcile::action::ActionPlan;
use crate::reconcile::{Missing, ReconcileError, ReconcileResult};
use crate::store::{keys, KvStore, RecordStore};
use crate::sync::clock::Clock;
use crate::sync::retry::{RetryKind, RetryPolicy};
use log::{debug, error, info, warn};
use std::time::Duration;
use uuid::Uuid;

/// Why the notifier was asked to look for changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    /// A persisted key changed, in this context or another one.
    StorageEvent { key: String },
    Timer,
    Manual,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::StorageEvent { .. } => "storage_event",
            Self::Timer => "timer",
            Self::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The trigger concerns nothing this notifier watches.
    Ignored,
    /// Nothing changed since the last pass.
    Suppressed,
    Reconciled(ActionPlan),
    /// Call [`ChangeNotifier::retry`] after `after`.
    Retry {
        after: Duration,
        attempt: u32,
        missing: Missing,
    },
    /// Retry bound exhausted; the page stays as it is.
    GaveUp(Missing),
    Failed(String),
}

/// Work the notifier schedules.
pub trait Reconcile {
    fn reconcile(&mut self) -> ReconcileResult<ActionPlan>;
}

impl<F> Reconcile for F
where
    F: FnMut() -> ReconcileResult<ActionPlan>,
{
    fn reconcile(&mut self) -> ReconcileResult<ActionPlan> {
        self()
    }
}

/// Per page-session state.
#[derive(Debug, Clone)]
pub struct SyncContext {
    session_id: Uuid,
    last_checked: Option<i64>,
    pending: Option<RetryKind>,
    dependency_attempts: u32,
    data_attempts: u32,
    dependency_exhausted: bool,
    data_exhausted: bool,
    passes: u64,
}

impl SyncContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            last_checked: None,
            pending: None,
            dependency_attempts: 0,
            data_attempts: 0,
            dependency_exhausted: false,
            data_exhausted: false,
            passes: 0,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn last_checked(&self) -> Option<i64> {
        self.last_checked
    }

    /// Reconciler invocations so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn attempts(&self, kind: RetryKind) -> u32 {
        match kind {
            RetryKind::Dependency => self.dependency_attempts,
            RetryKind::Data => self.data_attempts,
        }
    }

    pub fn is_exhausted(&self, kind: RetryKind) -> bool {
        match kind {
            RetryKind::Dependency => self.dependency_exhausted,
            RetryKind::Data => self.data_exhausted,
        }
    }

    fn attempts_mut(&mut self, kind: RetryKind) -> &mut u32 {
        match kind {
            RetryKind::Dependency => &mut self.dependency_attempts,
            RetryKind::Data => &mut self.data_attempts,
        }
    }

    fn exhaust(&mut self, kind: RetryKind) {
        match kind {
            RetryKind::Dependency => self.dependency_exhausted = true,
            RetryKind::Data => self.data_exhausted = true,
        }
    }

    fn reset_retries(&mut self) {
        self.pending = None;
        self.dependency_attempts = 0;
        self.data_attempts = 0;
        self.dependency_exhausted = false;
        self.data_exhausted = false;
    }
}

impl Default for SyncContext {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ChangeNotifier<'a, S: KvStore, C: Clock> {
    records: &'a RecordStore<S>,
    clock: C,
    watched_keys: Vec<String>,
    retry: RetryPolicy,
    context: SyncContext,
}

impl<'a, S: KvStore, C: Clock> ChangeNotifier<'a, S, C> {
    pub fn new(records: &'a RecordStore<S>, clock: C, config: &SyncConfig) -> Self {
        let context = SyncContext::new();
        info!(
            "event=notifier_start module=sync status=ok session={} watched={}",
            context.session_id,
            config.watched_keys.len()
        );
        Self {
            records,
            clock,
            watched_keys: config.watched_keys.clone(),
            retry: config.retry_policy(),
            context,
        }
    }

    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    /// Runs `reconciler` if `trigger` reveals a change not yet handled.
    pub fn handle<R: Reconcile + ?Sized>(
        &mut self,
        trigger: Trigger,
        reconciler: &mut R,
    ) -> TriggerOutcome {
        if let Trigger::StorageEvent { key } = &trigger {
            if !self.watched_keys.iter().any(|watched| watched == key) {
                return TriggerOutcome::Ignored;
            }
        }

        let latest = match self.records.latest_update() {
            Ok(latest) => latest,
            Err(err) => {
                error!(
                    "event=notifier_check module=sync status=error session={} trigger={} error={}",
                    self.context.session_id,
                    trigger.as_str(),
                    err
                );
                return TriggerOutcome::Failed(err.to_string());
            }
        };
        if self
            .context
            .last_checked
            .is_some_and(|checked| latest <= checked)
        {
            debug!(
                "event=notifier_check module=sync status=skip session={} trigger={} latest={}",
                self.context.session_id,
                trigger.as_str(),
                latest
            );
            return TriggerOutcome::Suppressed;
        }

        let checked = self.clock.now_ms().max(latest);
        self.context.last_checked = Some(checked);
        if let Err(err) = self.records.set_last_checked(checked) {
            warn!(
                "event=notifier_check module=sync status=error session={} error_code=mirror_failed error={}",
                self.context.session_id, err
            );
        }
        self.context.reset_retries();
        info!(
            "event=notifier_check module=sync status=start session={} trigger={} latest={}",
            self.context.session_id,
            trigger.as_str(),
            latest
        );
        self.run(reconciler)
    }

    /// Re-runs a pass that asked for a retry. The stamp gate does not apply.
    pub fn retry<R: Reconcile + ?Sized>(&mut self, reconciler: &mut R) -> TriggerOutcome {
        match self.context.pending {
            None => TriggerOutcome::Ignored,
            Some(_) => self.run(reconciler),
        }
    }

    /// Announces a write this context made to `key`.
    ///
    /// Bumps the matching last-update stamp past last-checked, then handles the
    /// resulting storage event.
    pub fn publish_mutation<R: Reconcile + ?Sized>(
        &mut self,
        key: &str,
        reconciler: &mut R,
    ) -> TriggerOutcome {
        let Some(stamp_key) = keys::last_update_key_for(key) else {
            return self.handle(
                Trigger::StorageEvent {
                    key: key.to_string(),
                },
                reconciler,
            );
        };

        let now = self.clock.now_ms();
        let stamp = self
            .context
            .last_checked
            .map_or(now, |checked| now.max(checked + 1));
        if let Err(err) = self.records.set_last_update(stamp_key, stamp) {
            error!(
                "event=publish_mutation module=sync status=error session={} key={} error={}",
                self.context.session_id, key, err
            );
            return TriggerOutcome::Failed(err.to_string());
        }
        self.handle(
            Trigger::StorageEvent {
                key: stamp_key.to_string(),
            },
            reconciler,
        )
    }

    /// Handles `trigger` and keeps retrying, sleeping in between, until the
    /// outcome is final.
    pub fn run_blocking<R, F>(
        &mut self,
        trigger: Trigger,
        reconciler: &mut R,
        mut sleep: F,
    ) -> TriggerOutcome
    where
        R: Reconcile + ?Sized,
        F: FnMut(Duration),
    {
        let mut outcome = self.handle(trigger, reconciler);
        while let TriggerOutcome::Retry { after, .. } = &outcome {
            sleep(*after);
            outcome = self.retry(reconciler);
        }
        outcome
    }

    fn run<R: Reconcile + ?Sized>(&mut self, reconciler: &mut R) -> TriggerOutcome {
        self.context.passes += 1;
        match reconciler.reconcile() {
            Ok(plan) => {
                self.context.reset_retries();
                debug!(
                    "event=notifier_pass module=sync status=ok session={} pass={} actions={}",
                    self.context.session_id,
                    self.context.passes,
                    plan.len()
                );
                TriggerOutcome::Reconciled(plan)
            }
            Err(ReconcileError::NotFound(missing)) => self.schedule_retry(missing),
            Err(err) => {
                self.context.pending = None;
                error!(
                    "event=notifier_pass module=sync status=error session={} pass={} error={}",
                    self.context.session_id, self.context.passes, err
                );
                TriggerOutcome::Failed(err.to_string())
            }
        }
    }

    fn schedule_retry(&mut self, missing: Missing) -> TriggerOutcome {
        let kind = RetryKind::of(&missing);
        let bound = self.retry.bound(kind);
        if self.context.is_exhausted(kind) {
            self.context.pending = None;
            return TriggerOutcome::GaveUp(missing);
        }

        let attempts = self.context.attempts_mut(kind);
        *attempts += 1;
        let attempt = *attempts;
        if !bound.allows(attempt) {
            self.context.exhaust(kind);
            self.context.pending = None;
            info!(
                "event=notifier_retry module=sync status=skip session={} kind={} attempts={} reason=exhausted",
                self.context.session_id,
                kind.as_str(),
                attempt - 1
            );
            return TriggerOutcome::GaveUp(missing);
        }

        self.context.pending = Some(kind);
        debug!(
            "event=notifier_retry module=sync status=retry session={} kind={} attempt={} missing=\"{}\"",
            self.context.session_id,
            kind.as_str(),
            attempt,
            missing
        );
        TriggerOutcome::Retry {
            after: bound.delay(),
            attempt,
            missing,
        }
    }
}
