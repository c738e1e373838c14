//! Training definitions and the engine that runs a session.
//!
//! A classic session asks for the action of one hand at a time, scored
//! against the first of the training's ranges. A border-repeat session has
//! the user rebuild every range on a blank matrix. Each completed session
//! produces exactly one [`SessionRecord`](crate::stats::SessionRecord).
mod errors;
pub use self::errors::{Result, TrainingError};

mod definition;
pub use self::definition::{ClassicSubtype, NewTraining, TrainingDefinition, TrainingMode};

mod plan;
pub use self::plan::{
    PlanItem, TrainingPlan, TrainingRange, all_hands, border_check, border_hands, resolve_ranges,
};

mod state;
pub use self::state::{
    AutoAdvance, Evaluation, MATRIX_ANSWER, Question, TrainingInput, TrainingState, Transition,
    transition,
};

mod engine;
pub use self::engine::{TrainingEngine, TrainingProgress};

mod store;
pub use self::store::TrainingStore;
