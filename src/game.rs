//! One quiz session: acquisition, filtering and the round state machine
//! behind a single object.

use rand::Rng;
use tracing::{error, info};

use crate::acquisition::{Acquirer, ImageOrigin, ImageSource};
use crate::core::{ConfigValidator, QuizConfig, QuizError, QuizResult};
use crate::domain::{
    AnswerOutcome, CellLabel, QuizItem, QuizSession, RoundPhase, pick_item, position_of,
};
use crate::processors::{DerivedViews, FilterPipeline};

/// A running quiz over a question table.
///
/// Each round goes `start_round` (acquire and filter, then present),
/// `answer`, `next`. When a round cannot be presented the session stays in
/// loading and `skip` swaps in another item.
pub struct HemoQuiz<S, R> {
    table: Vec<QuizItem>,
    acquirer: Acquirer<S>,
    pipeline: FilterPipeline,
    session: QuizSession,
    rng: R,
    views: Option<DerivedViews>,
    origin: Option<ImageOrigin>,
}

impl<S: ImageSource, R: Rng> HemoQuiz<S, R> {
    /// Creates a session whose first item is drawn from `table`.
    pub fn new(source: S, config: &QuizConfig, table: Vec<QuizItem>, mut rng: R) -> QuizResult<Self> {
        config.validate()?;
        let first = pick_item(&mut rng, &table)
            .ok_or_else(|| QuizError::invalid_input("question table is empty"))?
            .clone();
        let pipeline = FilterPipeline::new(&config.filters)?;

        info!(items = table.len(), first = %first.image_reference, "quiz session created");
        Ok(Self {
            acquirer: Acquirer::new(source, &config.acquisition, config.fallback),
            pipeline,
            session: QuizSession::new(first),
            table,
            rng,
            views: None,
            origin: None,
        })
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn table(&self) -> &[QuizItem] {
        &self.table
    }

    /// Views of the round being presented or answered.
    pub fn views(&self) -> Option<&DerivedViews> {
        self.views.as_ref()
    }

    pub fn origin(&self) -> Option<&ImageOrigin> {
        self.origin.as_ref()
    }

    /// Acquires and filters the pending item, then presents it.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` outside the loading phase, and
    /// `DegenerateInput` when the slide cannot be filtered. In the latter
    /// case the session stays in loading.
    pub fn start_round(&mut self) -> QuizResult<&DerivedViews> {
        if self.session.phase() != RoundPhase::Loading {
            return Err(QuizError::invalid_transition(self.session.phase(), "start a round"));
        }

        let pending = self.session.current_item();
        let acquired = match position_of(&self.table, pending) {
            Some(index) => self.acquirer.acquire_with_retry(&self.table, index)?,
            None => self.acquirer.acquire(pending),
        };

        let views = match self.pipeline.derive_views(&acquired.image) {
            Ok(views) => views,
            Err(e) => {
                error!(
                    round = self.session.round(),
                    reference = %acquired.item.image_reference,
                    error = %e,
                    "slide cannot be filtered"
                );
                return Err(e);
            }
        };

        info!(
            round = self.session.round(),
            reference = %acquired.item.image_reference,
            origin = %acquired.origin,
            "round ready"
        );
        self.session.present(acquired.item)?;
        self.origin = Some(acquired.origin);
        Ok(&*self.views.insert(views))
    }

    /// Scores `label` for the presented round. `None` outside presenting.
    pub fn answer(&mut self, label: CellLabel) -> Option<AnswerOutcome> {
        self.session.submit_answer(label)
    }

    /// Moves to a freshly drawn item after an answered round.
    pub fn next(&mut self) -> QuizResult<&QuizItem> {
        let next = self.session.advance(&mut self.rng, &self.table)?;
        self.views = None;
        self.origin = None;
        Ok(next)
    }

    /// Replaces the pending item with a new draw, for rounds that could not
    /// be presented.
    pub fn skip(&mut self) -> QuizResult<&QuizItem> {
        let replacement = pick_item(&mut self.rng, &self.table)
            .ok_or_else(|| QuizError::invalid_input("question table is empty"))?
            .clone();
        self.session.replace_pending(replacement)?;
        Ok(self.session.current_item())
    }
}
