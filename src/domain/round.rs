//! Per-session round state machine.
//!
//! A round moves `Loading -> Presenting -> Answered` and back to `Loading`
//! when the player advances. Only user actions drive transitions. The
//! session owns its counters; nothing here is shared between sessions.

use rand::Rng;
use std::fmt;

use super::{CellLabel, QuizItem, pick_item};
use crate::core::{QuizError, QuizResult};

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Slide acquisition and filtering in progress; answers are ignored.
    Loading,
    /// Views are shown and every answer control is enabled.
    Presenting,
    /// The answer was scored; only advancing is possible.
    Answered,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundPhase::Loading => write!(f, "loading"),
            RoundPhase::Presenting => write!(f, "presenting"),
            RoundPhase::Answered => write!(f, "answered"),
        }
    }
}

/// Running correct/incorrect counters. Both only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub correct: u32,
    pub incorrect: u32,
}

impl Scoreboard {
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Score line as shown above the slides.
    pub fn summary(&self) -> String {
        format!("Acertos: {}  |  Erros: {}", self.correct, self.incorrect)
    }
}

/// How an answer control is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    /// Clickable.
    Enabled,
    /// Disabled and neutral.
    Locked,
    /// Disabled, highlighted as the right answer.
    Correct,
    /// Disabled, highlighted as the player's wrong pick.
    Wrong,
}

/// Result of scoring one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub chosen: CellLabel,
    pub correct_label: CellLabel,
    pub is_correct: bool,
    /// Result line shown to the player; includes the hint on a miss.
    pub message: String,
}

/// State of one player's quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    phase: RoundPhase,
    current_item: QuizItem,
    chosen_label: Option<CellLabel>,
    score: Scoreboard,
    last_outcome: Option<AnswerOutcome>,
    round: u32,
}

impl QuizSession {
    /// Starts a session whose first round is loading `first_item`.
    pub fn new(first_item: QuizItem) -> Self {
        Self {
            phase: RoundPhase::Loading,
            current_item: first_item,
            chosen_label: None,
            score: Scoreboard::default(),
            last_outcome: None,
            round: 1,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Item of the current round. After [`present`](Self::present) this is
    /// the effective item, which differs from the drawn one when the slide
    /// was replaced.
    pub fn current_item(&self) -> &QuizItem {
        &self.current_item
    }

    pub fn score(&self) -> Scoreboard {
        self.score
    }

    pub fn chosen_label(&self) -> Option<CellLabel> {
        self.chosen_label
    }

    pub fn answered(&self) -> bool {
        self.phase == RoundPhase::Answered
    }

    pub fn last_outcome(&self) -> Option<&AnswerOutcome> {
        self.last_outcome.as_ref()
    }

    /// One-based number of the current round.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn advance_enabled(&self) -> bool {
        self.phase == RoundPhase::Answered
    }

    /// Replaces the item being loaded, e.g. after the drawn item turned out
    /// to be unusable. Only valid while loading.
    pub fn replace_pending(&mut self, item: QuizItem) -> QuizResult<()> {
        if self.phase != RoundPhase::Loading {
            return Err(QuizError::invalid_transition(self.phase, "replace the pending item"));
        }
        self.current_item = item;
        Ok(())
    }

    /// Finishes loading: the views are on screen and `effective_item` is what
    /// the answer is scored against.
    pub fn present(&mut self, effective_item: QuizItem) -> QuizResult<()> {
        if self.phase != RoundPhase::Loading {
            return Err(QuizError::invalid_transition(self.phase, "present"));
        }
        self.current_item = effective_item;
        self.phase = RoundPhase::Presenting;
        Ok(())
    }

    /// Scores `label` against the current item.
    ///
    /// Returns `None`, leaving the counters untouched, unless the round is
    /// presenting; in particular a second answer in the same round is
    /// ignored.
    pub fn submit_answer(&mut self, label: CellLabel) -> Option<AnswerOutcome> {
        if self.phase != RoundPhase::Presenting {
            tracing::debug!(phase = %self.phase, chosen = %label, "answer ignored");
            return None;
        }

        let correct_label = self.current_item.correct_label;
        let is_correct = label == correct_label;
        let message = if is_correct {
            self.score.correct += 1;
            format!("✅ CORRETO! É um {correct_label}.")
        } else {
            self.score.incorrect += 1;
            format!(
                "❌ ERROU... Era um {correct_label}. Dica: {}",
                self.current_item.hint
            )
        };

        tracing::info!(
            round = self.round,
            chosen = %label,
            correct = %correct_label,
            is_correct,
            "answer scored"
        );

        let outcome = AnswerOutcome {
            chosen: label,
            correct_label,
            is_correct,
            message,
        };
        self.chosen_label = Some(label);
        self.phase = RoundPhase::Answered;
        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    /// Draws the next item uniformly from `table` and goes back to loading.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        table: &[QuizItem],
    ) -> QuizResult<&QuizItem> {
        if self.phase != RoundPhase::Answered {
            return Err(QuizError::invalid_transition(self.phase, "advance"));
        }
        let next = pick_item(rng, table)
            .ok_or_else(|| QuizError::invalid_input("question table is empty"))?
            .clone();

        self.current_item = next;
        self.chosen_label = None;
        self.last_outcome = None;
        self.phase = RoundPhase::Loading;
        self.round += 1;
        Ok(&self.current_item)
    }

    /// Render state of every answer control, in layout order.
    pub fn choice_marks(&self) -> [(CellLabel, ChoiceMark); 5] {
        CellLabel::ALL.map(|label| {
            let mark = match self.phase {
                RoundPhase::Loading => ChoiceMark::Locked,
                RoundPhase::Presenting => ChoiceMark::Enabled,
                RoundPhase::Answered if label == self.current_item.correct_label => {
                    ChoiceMark::Correct
                }
                RoundPhase::Answered if Some(label) == self.chosen_label => ChoiceMark::Wrong,
                RoundPhase::Answered => ChoiceMark::Locked,
            };
            (label, mark)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question_bank;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn neutrophil_item() -> QuizItem {
        QuizItem::new("slide.jpg", CellLabel::Neutrophil, "Segmentação nuclear clara.")
    }

    #[test]
    fn test_answers_ignored_while_loading() {
        let mut session = QuizSession::new(neutrophil_item());
        assert_eq!(session.phase(), RoundPhase::Loading);
        assert!(session.submit_answer(CellLabel::Neutrophil).is_none());
        assert_eq!(session.score(), Scoreboard::default());
        assert!(
            session
                .choice_marks()
                .iter()
                .all(|(_, mark)| *mark == ChoiceMark::Locked)
        );
    }

    #[test]
    fn test_correct_answer() {
        let mut session = QuizSession::new(neutrophil_item());
        session.present(neutrophil_item()).unwrap();
        assert!(
            session
                .choice_marks()
                .iter()
                .all(|(_, mark)| *mark == ChoiceMark::Enabled)
        );

        let outcome = session.submit_answer(CellLabel::Neutrophil).unwrap();
        assert!(outcome.is_correct);
        assert_eq!(outcome.message, "✅ CORRETO! É um Neutrófilo.");
        assert_eq!(
            session.score(),
            Scoreboard {
                correct: 1,
                incorrect: 0
            }
        );
        assert_eq!(session.phase(), RoundPhase::Answered);
        assert!(session.advance_enabled());
    }

    #[test]
    fn test_wrong_answer_marks_and_hint() {
        let mut session = QuizSession::new(neutrophil_item());
        session.present(neutrophil_item()).unwrap();

        let outcome = session.submit_answer(CellLabel::Monocyte).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(
            outcome.message,
            "❌ ERROU... Era um Neutrófilo. Dica: Segmentação nuclear clara."
        );
        assert_eq!(session.score().incorrect, 1);

        let marks = session.choice_marks();
        assert_eq!(marks[CellLabel::Neutrophil.index()].1, ChoiceMark::Correct);
        assert_eq!(marks[CellLabel::Monocyte.index()].1, ChoiceMark::Wrong);
        assert_eq!(marks[CellLabel::Basophil.index()].1, ChoiceMark::Locked);
    }

    #[test]
    fn test_second_answer_has_no_effect() {
        let mut session = QuizSession::new(neutrophil_item());
        session.present(neutrophil_item()).unwrap();
        session.submit_answer(CellLabel::Neutrophil).unwrap();
        let before = session.score();

        assert!(session.submit_answer(CellLabel::Lymphocyte).is_none());
        assert!(session.submit_answer(CellLabel::Neutrophil).is_none());
        assert_eq!(session.score(), before);
        assert_eq!(session.chosen_label(), Some(CellLabel::Neutrophil));
    }

    #[test]
    fn test_advance_resets_round_but_keeps_score() {
        let table = question_bank();
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = QuizSession::new(neutrophil_item());
        session.present(neutrophil_item()).unwrap();
        session.submit_answer(CellLabel::Basophil).unwrap();

        let next = session.advance(&mut rng, &table).unwrap().clone();
        assert!(table.contains(&next));
        assert_eq!(session.phase(), RoundPhase::Loading);
        assert_eq!(session.chosen_label(), None);
        assert!(session.last_outcome().is_none());
        assert_eq!(session.round(), 2);
        assert_eq!(
            session.score(),
            Scoreboard {
                correct: 0,
                incorrect: 1
            }
        );
    }

    #[test]
    fn test_out_of_order_transitions_rejected() {
        let table = question_bank();
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = QuizSession::new(neutrophil_item());

        assert!(matches!(
            session.advance(&mut rng, &table),
            Err(QuizError::InvalidTransition {
                phase: RoundPhase::Loading,
                ..
            })
        ));

        session.present(neutrophil_item()).unwrap();
        assert!(session.present(neutrophil_item()).is_err());
        assert!(session.replace_pending(neutrophil_item()).is_err());
        assert!(session.advance(&mut rng, &table).is_err());
    }

    #[test]
    fn test_advance_with_empty_table() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = QuizSession::new(neutrophil_item());
        session.present(neutrophil_item()).unwrap();
        session.submit_answer(CellLabel::Neutrophil).unwrap();
        assert!(matches!(
            session.advance(&mut rng, &[]),
            Err(QuizError::InvalidInput { .. })
        ));
        assert_eq!(session.phase(), RoundPhase::Answered);
    }

    #[test]
    fn test_present_uses_effective_item() {
        let intended = QuizItem::new("slide.jpg", CellLabel::Lymphocyte, "Núcleo redondo.");
        let mut session = QuizSession::new(intended.clone());
        session
            .present(intended.relabeled(CellLabel::Neutrophil))
            .unwrap();

        let outcome = session.submit_answer(CellLabel::Lymphocyte).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.correct_label, CellLabel::Neutrophil);
    }
}
