//! Group Policy Desk Core
//!
//! Back-office editing engine for commercial-driver group insurance
//! policies. Every business record lives in a remote store; this crate holds
//! the editing state in between, keeps it consistent, and decides what is
//! sent back.
//!
//! # Architecture
//!
//! - **core**: Money/age text handling and canonical fingerprints
//! - **models**: Domain types (AgeBand, Schedule, DeskEvent)
//! - **schedule**: Boundary reconciler, totals calculator, schedule editor
//! - **endorsement**: Endorsement batch formatting, validation and submit
//! - **cycle**: Server-authoritative installment cycle advancer
//! - **remote**: Store contracts, wire types and the in-memory store
//! - **config**: Desk configuration
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 whole currency units
//! 2. Nothing is persisted except through an explicit save or submit
//! 3. A failed remote operation leaves local state untouched

pub mod config;
pub mod core;
pub mod cycle;
pub mod endorsement;
pub mod error;
pub mod interaction;
pub mod models;
pub mod remote;
pub mod schedule;

// Re-exports for convenience
pub use config::{ConfigError, DeskConfig, DisplayConfig, RemoteConfig};
pub use cycle::{CycleError, CycleIndex, CycleStatus, InstallmentCycleAdvancer, PaymentLabel};
pub use endorsement::{
    EndorsementBatchEditor, EndorsementContext, EndorsementError, EndorsementRow, SubmitOutcome,
};
pub use error::DeskError;
pub use interaction::{AutoConfirm, Confirm, ConfirmPrompt, ScriptedConfirm};
pub use models::{
    band::{AgeBand, RowNum, SCHEDULE_ROWS},
    event::{DeskEvent, EventLog},
    schedule::{InstallmentTenPay, Metering, Monthly, Schedule, ScheduleError, ScheduleVariant},
};
pub use remote::{
    InMemoryPolicyStore, InjectedFailure, PolicyStatistics, RemoteError, StoreOperation,
};
pub use schedule::{AnyScheduleEditor, BoundaryChange, SaveOutcome, ScheduleEditor};
