//! Monotonic request sequencing
//!
//! Every request an editor issues takes a ticket. Only the response to the
//! most recently issued ticket may change displayed state; anything older
//! is stale and discarded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal of an issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues strictly increasing tickets
///
/// # Example
/// ```
/// use group_policy_desk_core::remote::RequestSequencer;
///
/// let mut sequencer = RequestSequencer::new();
/// let first = sequencer.issue();
/// let second = sequencer.issue();
/// assert!(second > first);
/// assert!(!sequencer.is_latest(first));
/// assert!(sequencer.is_latest(second));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    issued: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket
    pub fn issue(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    /// Most recently issued ticket, if any
    pub fn latest(&self) -> Option<RequestTicket> {
        if self.issued == 0 {
            None
        } else {
            Some(RequestTicket(self.issued))
        }
    }

    /// True iff `ticket` is the most recently issued one
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest() == Some(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_sequencer_has_no_latest() {
        let sequencer = RequestSequencer::new();
        assert_eq!(sequencer.latest(), None);
    }

    #[test]
    fn test_tickets_increase() {
        let mut sequencer = RequestSequencer::new();
        let tickets: Vec<_> = (0..5).map(|_| sequencer.issue()).collect();
        assert!(tickets.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(sequencer.latest(), tickets.last().copied());
        assert_eq!(tickets[0].get(), 1);
    }
}
