//! Installment cycle tracking
//!
//! Moves an enrolled member between installment indexes 1 to 10. The store
//! recomputes the payment status for every move; this module only asks,
//! confirms and displays.

pub mod advancer;
pub mod status;

pub use advancer::{CycleRequest, CycleResolution, CycleSelection, InstallmentCycleAdvancer};
pub use status::{CycleError, CycleIndex, CycleStatus, PaymentLabel, MAX_CYCLE_INDEX};
