//! Session states and the transition function between them.
//!
//! ```text
//! Idle -> Presented -> Evaluated -> Presented ... -> Completed
//!                   \-> (any state but Completed) -> Stopped
//! ```
//!
//! [`transition`] is pure. It reads the current state and the plan and says
//! what should happen next; the engine applies the result.
use crate::range::{HandMap, action_for, same_assignments};
use crate::stats::{ItemOutcome, SessionRecord};

use super::errors::{Result, TrainingError};
use super::plan::{PlanItem, TrainingPlan};

/// Label recorded as both actions of a border-repeat outcome.
pub const MATRIX_ANSWER: &str = "matrix";

/// A question on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    /// Position in the plan, from 0.
    pub index: usize,
    pub item: PlanItem,
}

/// Handle for a pending automatic advance.
///
/// The host waits `delay_ms` and hands the ticket back through
/// [`TrainingEngine::fire_auto_advance`](super::TrainingEngine::fire_auto_advance).
/// A ticket only works while the session is still showing the evaluation
/// it was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AutoAdvance {
    pub session_id: String,
    pub question: usize,
    pub delay_ms: u64,
}

/// An answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub question: Question,
    pub correct: bool,
    /// Set after a correct classic answer.
    pub auto_advance: Option<AutoAdvance>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrainingState {
    Idle,
    Presented(Question),
    Evaluated(Evaluation),
    Completed(Box<SessionRecord>),
    Stopped,
}

impl TrainingState {
    fn name(&self) -> &'static str {
        match self {
            TrainingState::Idle => "idle",
            TrainingState::Presented(_) => "a question is open",
            TrainingState::Evaluated(_) => "showing an evaluation",
            TrainingState::Completed(_) => "completed",
            TrainingState::Stopped => "stopped",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self,
            TrainingState::Presented(_) | TrainingState::Evaluated(_)
        )
    }
}

/// Everything the host can feed a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingInput<'a> {
    Start,
    /// A classic answer.
    Answer(&'a str),
    /// A rebuilt matrix for a border-repeat question.
    SubmitMatrix(&'a HandMap),
    Advance,
    AutoAdvance(&'a AutoAdvance),
    Stop,
}

impl TrainingInput<'_> {
    fn name(&self) -> &'static str {
        match self {
            TrainingInput::Start => "start",
            TrainingInput::Answer(_) => "answer",
            TrainingInput::SubmitMatrix(_) => "check a matrix",
            TrainingInput::Advance => "advance",
            TrainingInput::AutoAdvance(_) => "auto-advance",
            TrainingInput::Stop => "stop",
        }
    }
}

/// What the engine should do in response to an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Show this question.
    Present(Question),
    /// Record this outcome and show the evaluation.
    Evaluate(Evaluation, ItemOutcome),
    /// The last question is done; write the record.
    Finish,
    /// Tear down without a record.
    Stop,
    /// Nothing to do, e.g. a stale auto-advance ticket.
    Ignore,
}

/// Compute the next step of a session.
///
/// `session_id` is stamped into auto-advance tickets so a ticket can't be
/// replayed into another session.
pub fn transition(
    state: &TrainingState,
    plan: &TrainingPlan,
    session_id: &str,
    input: TrainingInput<'_>,
) -> Result<Transition> {
    let unexpected = || TrainingError::UnexpectedInput {
        input: input.name(),
        state: state.name(),
    };

    match (state, input) {
        (TrainingState::Stopped | TrainingState::Completed(_), TrainingInput::Stop) => {
            Ok(Transition::Ignore)
        }
        (_, TrainingInput::Stop) => Ok(Transition::Stop),

        (TrainingState::Idle, TrainingInput::Start) => {
            present(plan, 0).ok_or(TrainingError::EmptySession)
        }

        (TrainingState::Presented(question), TrainingInput::Answer(chosen)) => {
            let PlanItem::Hand(hand) = question.item else {
                return Err(unexpected());
            };
            let reference = plan.reference().ok_or(TrainingError::EmptySession)?;
            let correct_action = action_for(&reference.hands, &hand);
            let correct = chosen == correct_action;

            let auto_advance = correct.then(|| AutoAdvance {
                session_id: session_id.to_string(),
                question: question.index,
                delay_ms: plan.auto_advance_delay_ms,
            });
            Ok(Transition::Evaluate(
                Evaluation {
                    question: *question,
                    correct,
                    auto_advance,
                },
                ItemOutcome {
                    hand: hand.to_string(),
                    correct,
                    user_action: Some(chosen.to_string()),
                    correct_action: Some(correct_action.to_string()),
                },
            ))
        }

        (TrainingState::Presented(question), TrainingInput::SubmitMatrix(user)) => {
            let PlanItem::Range(_) = question.item else {
                return Err(unexpected());
            };
            let range = plan
                .range_for(question.item)
                .ok_or(TrainingError::EmptySession)?;
            let correct = same_assignments(user, &range.hands);

            Ok(Transition::Evaluate(
                Evaluation {
                    question: *question,
                    correct,
                    auto_advance: None,
                },
                ItemOutcome {
                    hand: range.name.clone(),
                    correct,
                    user_action: Some(MATRIX_ANSWER.to_string()),
                    correct_action: Some(MATRIX_ANSWER.to_string()),
                },
            ))
        }

        (TrainingState::Evaluated(evaluation), TrainingInput::Advance) => {
            if evaluation.auto_advance.is_some() {
                return Err(TrainingError::AwaitingAutoAdvance);
            }
            Ok(next(plan, evaluation.question.index))
        }

        (TrainingState::Evaluated(evaluation), TrainingInput::AutoAdvance(ticket)) => {
            if evaluation.auto_advance.as_ref() == Some(ticket) {
                Ok(next(plan, evaluation.question.index))
            } else {
                Ok(Transition::Ignore)
            }
        }
        // Tickets outliving their evaluation are dropped quietly.
        (_, TrainingInput::AutoAdvance(_)) => Ok(Transition::Ignore),

        (TrainingState::Evaluated(evaluation), TrainingInput::Answer(_))
        | (TrainingState::Evaluated(evaluation), TrainingInput::SubmitMatrix(_))
            if evaluation.auto_advance.is_some() =>
        {
            Err(TrainingError::AwaitingAutoAdvance)
        }

        (TrainingState::Idle, _)
        | (TrainingState::Completed(_), _)
        | (TrainingState::Stopped, _) => Err(TrainingError::NotRunning),

        _ => Err(unexpected()),
    }
}

fn present(plan: &TrainingPlan, index: usize) -> Option<Transition> {
    plan.items
        .get(index)
        .map(|item| Transition::Present(Question { index, item: *item }))
}

fn next(plan: &TrainingPlan, index: usize) -> Transition {
    present(plan, index + 1).unwrap_or(Transition::Finish)
}
