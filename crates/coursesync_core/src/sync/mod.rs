//! Deciding when to reconcile.
//!
//! # Responsibility
//! - Gate passes on persisted last-update stamps (`ChangeNotifier`).
//! - Retry passes that found nothing, within fixed bounds.
//! - Provide the settings capability passes read from.
//!
//! # Invariants
//! - All state lives in one `SyncContext` per page session.
//! - Everything runs in one cooperative context; no locking.

pub mod clock;
pub mod notifier;
pub mod retry;
pub mod settings;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::{ChangeNotifier, Reconcile, SyncContext, Trigger, TriggerOutcome};
pub use retry::{RetryBound, RetryKind, RetryPolicy};
pub use settings::{SettingsProvider, StoreSettings};
