use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::clock::Clock;
use crate::config::TrainerConfig;
use crate::core::Hand;
use crate::range::{ActionButtons, FOLD, HandMap, RangeSnapshot};
use crate::stats::{ItemOutcome, SessionRecord, SessionRecorder, accuracy};

use super::errors::{Result, TrainingError};
use super::plan::{PlanItem, TrainingPlan, TrainingRange, resolve_ranges};
use super::state::{
    AutoAdvance, Evaluation, Question, TrainingInput, TrainingState, Transition, transition,
};
use super::TrainingDefinition;

/// Where a session went after moving past an evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingProgress {
    Next(Question),
    /// The record has already been handed to the recorder.
    Completed(SessionRecord),
}

/// Runs one training session from a frozen copy of the ranges.
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use range_trainer::clock::ManualClock;
/// use range_trainer::config::TrainerConfig;
/// use range_trainer::range::{Folder, Range, RangeSnapshot};
/// use range_trainer::stats::SessionRecord;
/// use range_trainer::training::{TrainingDefinition, TrainingEngine, TrainingMode, TrainingProgress};
///
/// let snapshot = RangeSnapshot::new(
///     vec![Folder {
///         id: "f".into(),
///         name: "BTN".into(),
///         ranges: vec![Range::new("r".into(), "Open".into())],
///     }],
///     Default::default(),
/// );
/// let definition = TrainingDefinition {
///     id: "t".into(),
///     name: "Rebuild".into(),
///     mode: TrainingMode::BorderRepeat,
///     subtype: None,
///     ranges: vec!["r".into()],
///     created_at: 0,
/// };
///
/// let clock = ManualClock::new(0);
/// let mut engine =
///     TrainingEngine::new(definition, &snapshot, &TrainerConfig::default(), clock.clone()).unwrap();
/// engine.start(&mut StdRng::seed_from_u64(0)).unwrap();
///
/// // The range is empty, so submitting a blank matrix is right.
/// assert!(engine.check_user_matrix().unwrap().correct);
/// clock.advance(5_000);
///
/// let mut records: Vec<SessionRecord> = Vec::new();
/// let TrainingProgress::Completed(record) = engine.advance(&mut records).unwrap() else {
///     panic!("single range session should be done");
/// };
/// assert_eq!(100.0, record.accuracy);
/// assert_eq!(5_000, record.duration);
/// assert_eq!(1, records.len());
/// ```
#[derive(Debug)]
pub struct TrainingEngine<C: Clock> {
    session_id: String,
    definition: TrainingDefinition,
    ranges: Vec<TrainingRange>,
    action_buttons: ActionButtons,
    plan: Option<TrainingPlan>,
    state: TrainingState,
    outcomes: Vec<ItemOutcome>,
    user_matrix: HandMap,
    config: TrainerConfig,
    clock: C,
    started_at: Option<u64>,
    finished_at: Option<u64>,
}

impl<C: Clock> TrainingEngine<C> {
    /// Resolve the definition's ranges against `snapshot`.
    ///
    /// Ranges that no longer exist are skipped; if none are left the session
    /// can't run.
    #[instrument(level = "debug", skip_all, fields(training_id = %definition.id))]
    pub fn new(
        definition: TrainingDefinition,
        snapshot: &RangeSnapshot,
        config: &TrainerConfig,
        clock: C,
    ) -> Result<Self> {
        let ranges = resolve_ranges(snapshot, &definition.ranges);
        if ranges.is_empty() {
            warn!("No ranges left to train on");
            return Err(TrainingError::EmptySession);
        }

        Ok(Self {
            session_id: crate::new_id(),
            definition,
            ranges,
            action_buttons: snapshot.action_buttons().clone(),
            plan: None,
            state: TrainingState::Idle,
            outcomes: Vec::new(),
            user_matrix: HandMap::new(),
            config: config.clone(),
            clock,
            started_at: None,
            finished_at: None,
        })
    }

    /// Generate the questions and show the first one.
    #[instrument(level = "debug", skip_all, fields(session_id = %self.session_id))]
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Question> {
        if !matches!(self.state, TrainingState::Idle) {
            return Err(TrainingError::UnexpectedInput {
                input: "start",
                state: "already started",
            });
        }
        let plan = TrainingPlan::generate(&self.definition, self.ranges.clone(), &self.config, rng);
        let step = transition(&self.state, &plan, &self.session_id, TrainingInput::Start)?;
        self.plan = Some(plan);
        self.started_at = Some(self.clock.now_ms());

        match step {
            Transition::Present(question) => {
                self.state = TrainingState::Presented(question);
                Ok(question)
            }
            _ => Err(TrainingError::EmptySession),
        }
    }

    /// Answer the open classic question with an action id.
    pub fn submit_classic_answer(&mut self, action: &str) -> Result<&Evaluation> {
        self.evaluate(TrainingInput::Answer(action))
    }

    /// Edit the user's matrix while a border-repeat question is open.
    /// `None` and fold clear the hand; any other action must be one of the
    /// buttons the session started with.
    pub fn edit_user_hand(&mut self, hand: Hand, action: Option<&str>) -> Result<()> {
        if self.is_matrix_read_only() {
            return Err(TrainingError::UnexpectedInput {
                input: "edit the matrix",
                state: "the matrix is read-only",
            });
        }
        match action.filter(|a| *a != FOLD) {
            Some(action) => {
                if !self.action_buttons.contains(action) {
                    return Err(TrainingError::ActionNotFound(action.to_string()));
                }
                self.user_matrix.insert(hand, action.to_string());
            }
            None => {
                self.user_matrix.remove(&hand);
            }
        }
        Ok(())
    }

    /// An editing callback over the user's matrix, for a gesture
    /// controller. Refused edits are logged and skipped.
    pub fn user_editor(&mut self) -> impl FnMut(Hand, Option<&str>) + '_ {
        move |hand: Hand, action: Option<&str>| {
            if let Err(error) = self.edit_user_hand(hand, action) {
                warn!(%hand, %error, "Matrix edit refused");
            }
        }
    }

    /// Check a rebuilt matrix against the open border-repeat range.
    pub fn submit_border_repeat_check(&mut self, mapping: &HandMap) -> Result<&Evaluation> {
        self.evaluate(TrainingInput::SubmitMatrix(mapping))
    }

    /// Check the matrix built through [`TrainingEngine::edit_user_hand`].
    pub fn check_user_matrix(&mut self) -> Result<&Evaluation> {
        let mapping = self.user_matrix.clone();
        self.submit_border_repeat_check(&mapping)
    }

    /// Move past an evaluation that doesn't auto-advance.
    pub fn advance<R: SessionRecorder + ?Sized>(
        &mut self,
        recorder: &mut R,
    ) -> Result<TrainingProgress> {
        let step = self.step(TrainingInput::Advance)?;
        match self.apply_progress(step, recorder) {
            Some(progress) => Ok(progress),
            None => Err(TrainingError::NotRunning),
        }
    }

    /// Fire a scheduled automatic advance. Stale tickets do nothing and
    /// return `Ok(None)`.
    pub fn fire_auto_advance<R: SessionRecorder + ?Sized>(
        &mut self,
        ticket: &AutoAdvance,
        recorder: &mut R,
    ) -> Result<Option<TrainingProgress>> {
        let step = self.step(TrainingInput::AutoAdvance(ticket))?;
        if step == Transition::Ignore {
            debug!(question = ticket.question, "Ignoring stale auto-advance");
        }
        Ok(self.apply_progress(step, recorder))
    }

    /// Abandon the session. Nothing is recorded and pending automatic
    /// advances become stale. A completed session keeps its record.
    #[instrument(level = "debug", skip(self), fields(session_id = %self.session_id))]
    pub fn stop(&mut self) {
        if let Ok(Transition::Stop) = self.step(TrainingInput::Stop) {
            self.finished_at.get_or_insert_with(|| self.clock.now_ms());
            self.state = TrainingState::Stopped;
        }
    }

    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    pub fn definition(&self) -> &TrainingDefinition {
        &self.definition
    }

    /// The resolved ranges, in definition order.
    pub fn ranges(&self) -> &[TrainingRange] {
        &self.ranges
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    /// Accuracy over the questions answered so far.
    pub fn accuracy(&self) -> f64 {
        let correct = self.outcomes.iter().filter(|o| o.correct).count();
        accuracy(correct, self.outcomes.len())
    }

    /// Time since the first question; frozen once the session ends.
    pub fn elapsed_ms(&self) -> u64 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let now = self.finished_at.unwrap_or_else(|| self.clock.now_ms());
        now.saturating_sub(started_at)
    }

    /// The open question or the one being evaluated.
    pub fn current_question(&self) -> Option<Question> {
        match &self.state {
            TrainingState::Presented(question) => Some(*question),
            TrainingState::Evaluated(evaluation) => Some(evaluation.question),
            _ => None,
        }
    }

    pub fn current_hand(&self) -> Option<Hand> {
        match self.current_question()?.item {
            PlanItem::Hand(hand) => Some(hand),
            PlanItem::Range(_) => None,
        }
    }

    /// The range the current question is scored against.
    pub fn current_range(&self) -> Option<&TrainingRange> {
        let question = self.current_question()?;
        self.plan.as_ref()?.range_for(question.item)
    }

    pub fn pending_auto_advance(&self) -> Option<&AutoAdvance> {
        match &self.state {
            TrainingState::Evaluated(evaluation) => evaluation.auto_advance.as_ref(),
            _ => None,
        }
    }

    /// The correct mapping, shown after a wrong answer.
    pub fn revealed_mapping(&self) -> Option<&HandMap> {
        match &self.state {
            TrainingState::Evaluated(evaluation) if !evaluation.correct => {
                self.current_range().map(|r| &r.hands)
            }
            _ => None,
        }
    }

    /// The matrix the user is building for a border-repeat question.
    pub fn user_matrix(&self) -> &HandMap {
        &self.user_matrix
    }

    /// The user's matrix only accepts edits while a border-repeat question
    /// is open and unchecked.
    pub fn is_matrix_read_only(&self) -> bool {
        !matches!(
            self.state,
            TrainingState::Presented(Question {
                item: PlanItem::Range(_),
                ..
            })
        )
    }

    /// `(answered, total)` questions.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.plan.as_ref().map(TrainingPlan::len).unwrap_or(0);
        (self.outcomes.len(), total)
    }

    fn step(&self, input: TrainingInput<'_>) -> Result<Transition> {
        match &self.plan {
            Some(plan) => transition(&self.state, plan, &self.session_id, input),
            None if matches!(input, TrainingInput::Stop) => Ok(Transition::Stop),
            None if matches!(input, TrainingInput::AutoAdvance(_)) => Ok(Transition::Ignore),
            None => Err(TrainingError::NotRunning),
        }
    }

    fn evaluate(&mut self, input: TrainingInput<'_>) -> Result<&Evaluation> {
        match self.step(input)? {
            Transition::Evaluate(evaluation, outcome) => {
                debug!(
                    question = evaluation.question.index,
                    correct = evaluation.correct,
                    "Evaluated answer"
                );
                self.outcomes.push(outcome);
                self.state = TrainingState::Evaluated(evaluation);
                match &self.state {
                    TrainingState::Evaluated(evaluation) => Ok(evaluation),
                    _ => Err(TrainingError::NotRunning),
                }
            }
            _ => Err(TrainingError::NotRunning),
        }
    }

    fn apply_progress<R: SessionRecorder + ?Sized>(
        &mut self,
        step: Transition,
        recorder: &mut R,
    ) -> Option<TrainingProgress> {
        match step {
            Transition::Present(question) => {
                self.user_matrix.clear();
                self.state = TrainingState::Presented(question);
                Some(TrainingProgress::Next(question))
            }
            Transition::Finish => {
                let record = self.finish();
                recorder.record(record.clone());
                self.state = TrainingState::Completed(Box::new(record.clone()));
                Some(TrainingProgress::Completed(record))
            }
            _ => None,
        }
    }

    fn finish(&mut self) -> SessionRecord {
        let now = self.clock.now_ms();
        self.finished_at = Some(now);
        let correct_answers = self.outcomes.iter().filter(|o| o.correct).count();
        let record = SessionRecord {
            id: crate::new_id(),
            training_id: self.definition.id.clone(),
            training_name: self.definition.name.clone(),
            mode: self.definition.mode,
            completed_at: now,
            duration: self.elapsed_ms(),
            accuracy: accuracy(correct_answers, self.outcomes.len()),
            total_questions: self.outcomes.len(),
            correct_answers,
            details: self.outcomes.clone(),
        };
        debug!(
            session_id = %self.session_id,
            accuracy = record.accuracy,
            questions = record.total_questions,
            "Session completed"
        );
        record
    }
}
