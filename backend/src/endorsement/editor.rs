//! Endorsement batch editor
//!
//! Holds ten roster rows for one policy and endorsement date. Id numbers and
//! phones are reformatted on every edit; validation, confirmation and the
//! single atomic submit happen in [`EndorsementBatchEditor::submit`].

use crate::config::{DeskConfig, DisplayConfig};
use crate::endorsement::format::{format_id_number, format_phone};
use crate::endorsement::row::{EndorsementContext, EndorsementRow, MAX_BATCH_ROWS};
use crate::endorsement::validation::{validate_batch, EndorsementError};
use crate::error::DeskError;
use crate::interaction::{Confirm, ConfirmPrompt};
use crate::models::event::{DeskEvent, EventLog};
use crate::remote::endorsement::{
    EndorsementBatchRequest, EndorsementService, EndorsementSubmissionRow,
};
use crate::remote::accept;
use serde::Serialize;
use uuid::Uuid;

/// How a submit attempt ended when nothing went wrong
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The store enrolled every row of the batch
    Submitted { request_id: Uuid, count: usize },

    /// The user declined the confirmation; nothing was sent
    Declined,
}

/// Editor for one endorsement batch
#[derive(Debug, Clone)]
pub struct EndorsementBatchEditor {
    context: EndorsementContext,
    rows: Vec<EndorsementRow>,
    display: DisplayConfig,
    events: EventLog,
}

impl EndorsementBatchEditor {
    /// Open an editor with ten blank rows
    pub fn new(context: EndorsementContext, config: &DeskConfig) -> Self {
        Self {
            context,
            rows: vec![EndorsementRow::default(); MAX_BATCH_ROWS],
            display: config.display.clone(),
            events: EventLog::new(),
        }
    }

    /// Open an editor pre-filled with `rows`, padded with blank rows
    ///
    /// Id numbers and phones are reformatted as if they had been typed.
    pub fn with_rows(
        context: EndorsementContext,
        rows: Vec<EndorsementRow>,
        config: &DeskConfig,
    ) -> Result<Self, EndorsementError> {
        if rows.len() > MAX_BATCH_ROWS {
            return Err(EndorsementError::TooManyRows {
                count: rows.len(),
                max: MAX_BATCH_ROWS,
            });
        }

        let mut editor = Self::new(context, config);
        for (i, row) in rows.into_iter().enumerate() {
            let number = i + 1;
            editor.set_name(number, &row.name)?;
            editor.set_id_number(number, &row.id_number)?;
            editor.set_phone(number, &row.phone)?;
        }
        Ok(editor)
    }

    pub fn context(&self) -> &EndorsementContext {
        &self.context
    }

    pub fn rows(&self) -> &[EndorsementRow] {
        &self.rows
    }

    /// Row `number` (1-based)
    pub fn row(&self, number: usize) -> Result<&EndorsementRow, EndorsementError> {
        number
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .ok_or(EndorsementError::RowOutOfRange(number))
    }

    fn row_mut(&mut self, number: usize) -> Result<&mut EndorsementRow, EndorsementError> {
        number
            .checked_sub(1)
            .and_then(|i| self.rows.get_mut(i))
            .ok_or(EndorsementError::RowOutOfRange(number))
    }

    pub fn set_name(&mut self, number: usize, name: &str) -> Result<(), EndorsementError> {
        self.row_mut(number)?.name = name.to_string();
        Ok(())
    }

    /// Store the id number as typed, reformatted; returns the displayed text
    pub fn set_id_number(&mut self, number: usize, input: &str) -> Result<&str, EndorsementError> {
        let formatted = format_id_number(input, self.display.id_separator);
        let row = self.row_mut(number)?;
        row.id_number = formatted;
        Ok(&row.id_number)
    }

    /// Store the phone as typed, reformatted; returns the displayed text
    pub fn set_phone(&mut self, number: usize, input: &str) -> Result<&str, EndorsementError> {
        let formatted = format_phone(input, self.display.phone_separator);
        let row = self.row_mut(number)?;
        row.phone = formatted;
        Ok(&row.phone)
    }

    pub fn filled_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_filled()).count()
    }

    /// Run every client-side check
    pub fn validate(&self) -> Result<Vec<EndorsementSubmissionRow>, Vec<EndorsementError>> {
        validate_batch(&self.context, &self.rows)
    }

    /// Build the wire request for the current rows
    pub fn build_request(&self) -> Result<EndorsementBatchRequest, Vec<EndorsementError>> {
        let rows = self.validate()?;
        Ok(EndorsementBatchRequest {
            request_id: Uuid::new_v4(),
            rows,
            policy_row_id: self.context.policy_row_id,
            insurer_code: self.context.insurer_code.clone(),
            endorsement_date: self.context.endorsement_date.clone(),
            policy_number: self.context.policy_number.clone(),
            certificate_kind: self.context.certificate_kind.clone(),
            actor_name: self.context.actor_name.clone(),
        })
    }

    /// Validate, confirm and submit the batch
    ///
    /// Validation failures return before the confirmation is shown. The rows
    /// are left as they are whatever the outcome.
    pub fn submit<S: EndorsementService + ?Sized>(
        &mut self,
        service: &mut S,
        confirm: &mut dyn Confirm,
    ) -> Result<SubmitOutcome, DeskError> {
        let policy_number = self.context.policy_number.clone();

        let request = match self.build_request() {
            Ok(request) => request,
            Err(errors) => {
                self.events.log(DeskEvent::EndorsementRejectedLocally {
                    policy_number,
                    errors: errors.iter().map(ToString::to_string).collect(),
                });
                return Err(DeskError::Endorsement(errors));
            }
        };

        let prompt = ConfirmPrompt::SubmitEndorsement {
            policy_number: policy_number.clone(),
            endorsement_date: request.endorsement_date.clone(),
            member_count: request.rows.len(),
        };
        if !confirm.confirm(&prompt) {
            self.events
                .log(DeskEvent::EndorsementDeclined { policy_number });
            return Ok(SubmitOutcome::Declined);
        }

        match service.submit_endorsement_batch(&request).and_then(accept) {
            Ok(response) => {
                // Older stores omit the count
                let count = if response.count == 0 {
                    request.rows.len()
                } else {
                    response.count
                };
                self.events.log(DeskEvent::EndorsementSubmitted {
                    policy_number,
                    request_id: request.request_id,
                    count,
                });
                Ok(SubmitOutcome::Submitted {
                    request_id: request.request_id,
                    count,
                })
            }
            Err(error) => {
                self.events.log(DeskEvent::EndorsementSubmitFailed {
                    policy_number,
                    request_id: request.request_id,
                    reason: error.to_string(),
                });
                Err(error.into())
            }
        }
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::AutoConfirm;
    use crate::remote::memory::{InMemoryPolicyStore, StoreOperation};

    fn context() -> EndorsementContext {
        EndorsementContext {
            policy_row_id: 7,
            insurer_code: "INS01".to_string(),
            policy_number: "2025-S331191".to_string(),
            certificate_kind: "group".to_string(),
            endorsement_date: "2025-03-01".to_string(),
            actor_name: "clerk".to_string(),
        }
    }

    #[test]
    fn test_new_editor_has_ten_blank_rows() {
        let editor = EndorsementBatchEditor::new(context(), &DeskConfig::default());
        assert_eq!(editor.rows().len(), 10);
        assert_eq!(editor.filled_count(), 0);
        assert!(editor.row(0).is_err());
        assert!(editor.row(11).is_err());
    }

    #[test]
    fn test_typing_reformats_fields() {
        let mut editor = EndorsementBatchEditor::new(context(), &DeskConfig::default());
        assert_eq!(editor.set_id_number(1, "1234567").unwrap(), "123456-7");
        assert_eq!(editor.set_phone(1, "0812345678").unwrap(), "081-234-5678");
        assert_eq!(
            editor.set_phone(11, "1"),
            Err(EndorsementError::RowOutOfRange(11))
        );
    }

    #[test]
    fn test_with_rows_rejects_oversized_batch() {
        let rows = vec![EndorsementRow::new("Anan", "", ""); 11];
        let result = EndorsementBatchEditor::with_rows(context(), rows, &DeskConfig::default());
        assert!(matches!(
            result,
            Err(EndorsementError::TooManyRows { count: 11, max: 10 })
        ));
    }

    #[test]
    fn test_declined_submit_sends_nothing() {
        let mut editor = EndorsementBatchEditor::with_rows(
            context(),
            vec![EndorsementRow::new("Anan", "1234567890123", "0812345678")],
            &DeskConfig::default(),
        )
        .unwrap();
        let mut store = InMemoryPolicyStore::new();

        let outcome = editor.submit(&mut store, &mut AutoConfirm(false)).unwrap();

        assert_eq!(outcome, SubmitOutcome::Declined);
        assert_eq!(store.attempts(StoreOperation::SubmitEndorsement), 0);
        assert_eq!(editor.events().events_of_type("EndorsementDeclined").len(), 1);
    }
}
