//! Domain-level structures of the quiz.
//!
//! This module groups the answer labels, the static question table and the
//! per-session round state machine.

pub mod label;
pub mod question_bank;
pub mod round;

pub use label::CellLabel;
pub use question_bank::{QuizItem, cycle_from, pick_item, position_of, question_bank};
pub use round::{AnswerOutcome, ChoiceMark, QuizSession, RoundPhase, Scoreboard};
