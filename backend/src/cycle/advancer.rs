//! Installment cycle advancer
//!
//! State machine for one enrolled member:
//!
//! ```text
//!            request()                      resolve(latest, Ok)
//!  Settled ───────────► Awaiting(ticket) ─────────────────────► Settled (adopt)
//!     ▲   declined          │   │  resolve(latest, Err)
//!     └─────────────────────┘   └────────────────────────────► Settled (revert)
//! ```
//!
//! Selections can be issued back-to-back. Each request takes a ticket from a
//! [`RequestSequencer`]; only the response to the latest ticket may change
//! the displayed state, earlier ones are discarded.
//!
//! # Critical Invariants
//!
//! 1. Status is adopted wholesale from the store, never computed here
//! 2. A declined confirmation restores the selection shown before it; a
//!    failed request reverts to the last adopted index
//! 3. A stale response never touches the displayed state

use crate::cycle::status::{CycleIndex, CycleStatus};
use crate::error::DeskError;
use crate::interaction::{Confirm, ConfirmPrompt};
use crate::models::event::{DeskEvent, EventLog};
use crate::remote::cycle::{AdvanceCycleRequest, AdvanceCycleResponse, CycleService};
use crate::remote::sequence::{RequestSequencer, RequestTicket};
use crate::remote::{accept, RemoteError};
use uuid::Uuid;

/// Result of asking to move to a new index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleRequest {
    /// The index is already selected
    Unchanged,

    /// The user declined; selection reverted
    Declined,

    /// Send `request` and pass its response to `resolve` with `ticket`
    Issued {
        ticket: RequestTicket,
        request: AdvanceCycleRequest,
    },
}

/// Result of a response that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleResolution {
    Adopted(CycleStatus),

    /// Superseded by a later request and ignored
    Stale,
}

/// Result of a complete select-confirm-recompute round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleSelection {
    Unchanged,
    Declined,
    Adopted(CycleStatus),
}

#[derive(Debug, Clone)]
pub struct InstallmentCycleAdvancer {
    policy_row_id: i64,
    sequence_position: u32,
    current: CycleStatus,
    selected: CycleIndex,
    /// Ticket of the request awaiting a response
    pending: Option<RequestTicket>,
    sequencer: RequestSequencer,
    events: EventLog,
}

impl InstallmentCycleAdvancer {
    /// Start from the status the store last reported for this member
    pub fn new(policy_row_id: i64, sequence_position: u32, current: CycleStatus) -> Self {
        Self {
            policy_row_id,
            sequence_position,
            selected: current.index(),
            current,
            pending: None,
            sequencer: RequestSequencer::new(),
            events: EventLog::new(),
        }
    }

    pub fn policy_row_id(&self) -> i64 {
        self.policy_row_id
    }

    pub fn sequence_position(&self) -> u32 {
        self.sequence_position
    }

    /// Last status adopted from the store
    pub fn status(&self) -> &CycleStatus {
        &self.current
    }

    /// Index currently shown in the selector (may be awaiting the store)
    pub fn selected(&self) -> CycleIndex {
        self.selected
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Select `new_index`, confirm, and prepare the recompute request
    pub fn request(
        &mut self,
        new_index: u8,
        confirm: &mut dyn Confirm,
    ) -> Result<CycleRequest, DeskError> {
        let to_index = CycleIndex::new(new_index)?;
        if to_index == self.selected {
            return Ok(CycleRequest::Unchanged);
        }

        let from_index = self.current.index();
        let previous = self.selected;
        self.selected = to_index;

        let prompt = ConfirmPrompt::ChangeInstallment {
            policy_row_id: self.policy_row_id,
            from_index: from_index.get(),
            to_index: to_index.get(),
        };
        if !confirm.confirm(&prompt) {
            // an in-flight request keeps its selection
            self.revert_to(previous, "declined");
            return Ok(CycleRequest::Declined);
        }

        let ticket = self.sequencer.issue();
        self.pending = Some(ticket);
        self.events.log(DeskEvent::CycleTransitionRequested {
            policy_row_id: self.policy_row_id,
            ticket: ticket.get(),
            from_index: from_index.get(),
            to_index: to_index.get(),
        });

        Ok(CycleRequest::Issued {
            ticket,
            request: AdvanceCycleRequest {
                request_id: Uuid::new_v4(),
                policy_row_id: self.policy_row_id,
                new_index: to_index.get(),
                sequence_position: self.sequence_position,
            },
        })
    }

    /// Apply the store's answer to the request issued with `ticket`
    ///
    /// A failure reverts the selection and is returned as an error, unless
    /// the ticket is stale, in which case it is ignored like any other
    /// stale response.
    pub fn resolve(
        &mut self,
        ticket: RequestTicket,
        response: Result<AdvanceCycleResponse, RemoteError>,
    ) -> Result<CycleResolution, DeskError> {
        let is_current = self
            .pending
            .is_some_and(|pending| pending == ticket)
            && self.sequencer.is_latest(ticket);
        if !is_current {
            self.events.log(DeskEvent::CycleResponseDiscarded {
                policy_row_id: self.policy_row_id,
                ticket: ticket.get(),
            });
            return Ok(CycleResolution::Stale);
        }
        self.pending = None;

        let adopted = response
            .and_then(accept)
            .map_err(DeskError::from)
            .and_then(|response| CycleStatus::from_response(&response).map_err(DeskError::from));

        match adopted {
            Ok(status) => {
                self.events.log(DeskEvent::CycleTransitionAdopted {
                    policy_row_id: self.policy_row_id,
                    ticket: ticket.get(),
                    index: status.index().get(),
                    label: status.raw_label().to_string(),
                });
                self.selected = status.index();
                self.current = status.clone();
                Ok(CycleResolution::Adopted(status))
            }
            Err(error) => {
                self.revert_to(self.current.index(), &error.to_string());
                Err(error)
            }
        }
    }

    /// Request, send and resolve in one blocking round
    pub fn select<S: CycleService + ?Sized>(
        &mut self,
        new_index: u8,
        confirm: &mut dyn Confirm,
        service: &mut S,
    ) -> Result<CycleSelection, DeskError> {
        match self.request(new_index, confirm)? {
            CycleRequest::Unchanged => Ok(CycleSelection::Unchanged),
            CycleRequest::Declined => Ok(CycleSelection::Declined),
            CycleRequest::Issued { ticket, request } => {
                let response = service.advance_cycle(&request);
                match self.resolve(ticket, response)? {
                    CycleResolution::Adopted(status) => Ok(CycleSelection::Adopted(status)),
                    // the ticket was issued just above and is still the latest
                    CycleResolution::Stale => Ok(CycleSelection::Unchanged),
                }
            }
        }
    }

    fn revert_to(&mut self, index: CycleIndex, reason: &str) {
        self.selected = index;
        self.events.log(DeskEvent::CycleTransitionReverted {
            policy_row_id: self.policy_row_id,
            index: self.selected.get(),
            reason: reason.to_string(),
        });
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }
}
