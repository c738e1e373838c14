use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum TrainingError {
    #[error("None of the training's ranges exist anymore")]
    EmptySession,

    #[error("Training name must not be blank")]
    BlankName,

    #[error("A training needs at least one range")]
    NoRangesSelected,

    #[error("Training not found: {0}")]
    TrainingNotFound(String),

    #[error("Can't {input} while {state}")]
    UnexpectedInput {
        input: &'static str,
        state: &'static str,
    },

    #[error("Action not found: {0}")]
    ActionNotFound(String),

    #[error("Waiting for the automatic advance")]
    AwaitingAutoAdvance,

    #[error("The session is not running")]
    NotRunning,
}

pub type Result<T> = std::result::Result<T, TrainingError>;
