//! Interactive confirmation
//!
//! Submitting an endorsement batch and changing an installment index both
//! require the user to confirm first. Editors ask through the [`Confirm`]
//! trait so the prompt can be a dialog, a terminal question or a script.

use serde::Serialize;
use std::collections::VecDeque;

/// What the user is being asked to confirm
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "prompt", rename_all = "snake_case")]
pub enum ConfirmPrompt {
    SubmitEndorsement {
        policy_number: String,
        endorsement_date: String,
        member_count: usize,
    },
    ChangeInstallment {
        policy_row_id: i64,
        from_index: u8,
        to_index: u8,
    },
}

/// Source of yes/no answers
pub trait Confirm {
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool;
}

/// Gives the same answer to every prompt
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &ConfirmPrompt) -> bool {
        self.0
    }
}

/// Answers from a prepared queue and records every prompt it was shown
///
/// Once the queue is exhausted every further prompt is declined.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    asked: Vec<ConfirmPrompt>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[ConfirmPrompt] {
        &self.asked
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> bool {
        self.asked.push(prompt.clone());
        self.answers.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> ConfirmPrompt {
        ConfirmPrompt::ChangeInstallment {
            policy_row_id: 1,
            from_index: 1,
            to_index: 2,
        }
    }

    #[test]
    fn test_scripted_answers_then_declines() {
        let mut confirm = ScriptedConfirm::new([true, false]);
        assert!(confirm.confirm(&prompt()));
        assert!(!confirm.confirm(&prompt()));
        assert!(!confirm.confirm(&prompt()));
        assert_eq!(confirm.asked().len(), 3);
    }

    #[test]
    fn test_auto_confirm() {
        assert!(AutoConfirm(true).confirm(&prompt()));
        assert!(!AutoConfirm(false).confirm(&prompt()));
    }
}
