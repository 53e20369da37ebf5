//! Premium schedule editing
//!
//! - **reconciler**: keeps age boundaries contiguous while they are edited
//! - **totals**: derives row totals per metering variant
//! - **editor**: loads, edits and saves one schedule

pub mod editor;
pub mod reconciler;
pub mod totals;

pub use editor::{AnyScheduleEditor, SaveOutcome, ScheduleEditor};
pub use reconciler::{
    apply_end_age, on_end_age_cleared, on_end_age_edited, partition_gaps, BoundaryChange,
    PartitionGap,
};
pub use totals::{compute_total, TEN_PAY_INSTALLMENTS};
