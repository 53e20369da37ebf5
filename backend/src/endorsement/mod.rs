//! Endorsement batch editing
//!
//! Adds up to ten new members to a policy in one atomic submission.
//!
//! # Critical Invariants
//!
//! 1. Only filled rows (non-blank name) are validated and submitted
//! 2. Any validation failure aborts the whole submit before a network call
//! 3. Submission requires confirmation
//! 4. The editor never clears its own rows; the caller closes it on success

pub mod editor;
pub mod format;
pub mod row;
pub mod validation;

pub use editor::{EndorsementBatchEditor, SubmitOutcome};
pub use format::{format_id_number, format_phone, strip_formatting};
pub use row::{EndorsementContext, EndorsementRow, MAX_BATCH_ROWS};
pub use validation::{validate_batch, validate_endorsement_date, EndorsementError};
