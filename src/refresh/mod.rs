//! # Refresh Scheduling
//!
//! Drives when the certificate cache is rebuilt and guarantees that at most
//! one refresh run is ever in flight. See [`scheduler::RefreshScheduler`].

pub mod scheduler;

pub use scheduler::{RefreshHandle, RefreshOutcome, RefreshScheduler, TriggerKind};
