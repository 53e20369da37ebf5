//! Domain models for the policy desk

pub mod band;
pub mod event;
pub mod schedule;

// Re-exports
pub use band::{AgeBand, RowNum, SCHEDULE_ROWS};
pub use event::{DeskEvent, EventLog};
pub use schedule::{InstallmentTenPay, Metering, Monthly, Schedule, ScheduleError, ScheduleVariant};
