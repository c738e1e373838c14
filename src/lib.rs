//! Core of a preflop range trainer.
//!
//! A range maps some of the 169 starting-hand categories to actions.
//! Ranges live in folders, are painted onto the hand matrix with drag
//! gestures, and are drilled in training sessions whose results are kept as
//! statistics.
//!
//! - [`core`] has the 13x13 hand matrix and its combination counts.
//! - [`range`] owns folders, ranges and action buttons.
//! - [`gesture`] turns pointer events into hand edits.
//! - [`training`] holds training definitions and runs sessions.
//! - [`stats`] keeps and aggregates session records.
//! - [`storage`] persists the JSON documents behind all of the above.
//! - [`workspace`] builds every store from a [`config::TrainerConfig`].
//!
//! ```
//! use range_trainer::core::Hand;
//! use range_trainer::range::RangeStore;
//! use range_trainer::storage::MemoryStorage;
//!
//! let mut store = RangeStore::load(MemoryStorage::new());
//! let range_id = store.selected_range().to_string();
//! for hand in ["AA", "KK"] {
//!     store
//!         .set_hand_action(&range_id, hand.parse::<Hand>().unwrap(), Some("raise"))
//!         .unwrap();
//! }
//!
//! let summary = store
//!     .find_range(&range_id)
//!     .unwrap()
//!     .summary(store.action_buttons());
//! assert_eq!(12, summary.combinations);
//! assert_eq!(1, summary.percent);
//! ```

/// The hand matrix.
pub mod core;

/// Persistence backends.
pub mod storage;

/// Ranges, folders and action buttons.
pub mod range;

pub mod gesture;

/// Training sessions.
pub mod training;

pub mod stats;

pub mod clock;
pub mod config;
pub mod workspace;

/// A fresh, time-ordered identifier.
pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
