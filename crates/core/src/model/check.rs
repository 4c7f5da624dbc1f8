use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CheckId, DayId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CheckError {
    #[error("knowledge check question cannot be empty")]
    EmptyQuestion,
}

//
// ─── ANSWER STATE ──────────────────────────────────────────────────────────────
//

/// Answer state of a knowledge check.
///
/// One-way for XP purposes: the `Pending -> Answered` transition happens at
/// most once, so the flat XP award can never repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerState {
    Pending,
    Answered,
}

//
// ─── KNOWLEDGE CHECK ───────────────────────────────────────────────────────────
//

/// A self-test question attached to a day.
///
/// Unlike tasks, the answer notes stay editable even after the owning day is
/// finalized; only the XP award is gated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeCheck {
    id: CheckId,
    day_id: DayId,
    question: String,
    answer_notes: String,
    order: u32,
    state: AnswerState,
}

impl KnowledgeCheck {
    /// Creates an unanswered knowledge check.
    ///
    /// # Errors
    ///
    /// Returns `CheckError::EmptyQuestion` if the question is blank.
    pub fn new(
        id: CheckId,
        day_id: DayId,
        question: impl Into<String>,
        order: u32,
    ) -> Result<Self, CheckError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(CheckError::EmptyQuestion);
        }

        Ok(Self {
            id,
            day_id,
            question,
            answer_notes: String::new(),
            order,
            state: AnswerState::Pending,
        })
    }

    /// Rehydrates a knowledge check from persisted storage.
    ///
    /// # Errors
    ///
    /// Same validation as [`KnowledgeCheck::new`].
    pub fn from_persisted(
        id: CheckId,
        day_id: DayId,
        question: impl Into<String>,
        answer_notes: impl Into<String>,
        order: u32,
        is_answered: bool,
    ) -> Result<Self, CheckError> {
        let mut check = Self::new(id, day_id, question, order)?;
        check.answer_notes = answer_notes.into();
        check.state = if is_answered {
            AnswerState::Answered
        } else {
            AnswerState::Pending
        };
        Ok(check)
    }

    #[must_use]
    pub fn id(&self) -> CheckId {
        self.id
    }

    #[must_use]
    pub fn day_id(&self) -> DayId {
        self.day_id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer_notes(&self) -> &str {
        &self.answer_notes
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn state(&self) -> AnswerState {
        self.state
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.state == AnswerState::Answered
    }

    /// Replaces the free-form answer notes. Allowed in any state.
    pub fn set_answer_notes(&mut self, notes: impl Into<String>) {
        self.answer_notes = notes.into();
    }

    /// Records whether the check is answered.
    ///
    /// Returns true only when this call performs the `Pending -> Answered`
    /// transition, which is the sole occasion an XP award may attach to.
    /// Passing `false` never reverts an answered check.
    pub fn record_answer(&mut self, answered: bool) -> bool {
        if answered && self.state == AnswerState::Pending {
            self.state = AnswerState::Answered;
            return true;
        }
        false
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_check() -> KnowledgeCheck {
        KnowledgeCheck::new(CheckId::new(1), DayId::new(1), "Why hashing?", 0).unwrap()
    }

    #[test]
    fn empty_question_is_rejected() {
        let err = KnowledgeCheck::new(CheckId::new(1), DayId::new(1), "", 0).unwrap_err();
        assert_eq!(err, CheckError::EmptyQuestion);
    }

    #[test]
    fn first_answer_reports_the_transition() {
        let mut check = build_check();
        assert!(check.record_answer(true));
        assert!(check.is_answered());
    }

    #[test]
    fn repeat_answers_never_report_a_transition() {
        let mut check = build_check();
        assert!(check.record_answer(true));
        assert!(!check.record_answer(true));
        assert!(!check.record_answer(false));
        assert!(check.is_answered());
        assert!(!check.record_answer(true));
    }

    #[test]
    fn answering_false_while_pending_changes_nothing() {
        let mut check = build_check();
        assert!(!check.record_answer(false));
        assert!(!check.is_answered());
    }

    #[test]
    fn notes_stay_editable_after_answer() {
        let mut check = build_check();
        check.record_answer(true);
        check.set_answer_notes("constant lookups");
        assert_eq!(check.answer_notes(), "constant lookups");
    }
}
