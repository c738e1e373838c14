//! Session records and the aggregates shown per training.
mod record;
pub use self::record::{
    ItemOutcome, Performance, SessionRecord, accuracy, format_duration, round_percent,
};

mod store;
pub use self::store::{SessionRecorder, StatsStore, TrainingAggregate};
