//! Folders of ranges, the action buttons they map hands to, and the store
//! that owns both.
//!
//! A range assigns some of the 169 hands to action ids. Any hand that isn't
//! assigned, or is assigned the reserved [`FOLD`] id, folds. Ids that no
//! longer name a button are kept in the mapping but draw and count as fold.

mod errors;
pub use self::errors::RangeError;

mod action;
pub(crate) use self::action::migrate_action_buttons;
pub use self::action::{
    ActionButton, ActionButtons, CellStyle, FOLD, FOLD_COLOR, PALETTE, SimpleAction,
    WeightedAction,
};

#[allow(clippy::module_inception)]
mod range;
pub use self::range::{
    ActionShare, Folder, HandMap, Range, RangeSummary, action_for, same_assignments,
    without_folds,
};

mod snapshot;
pub use self::snapshot::RangeSnapshot;

mod store;
pub use self::store::{ActionButtonUpdate, NewActionButton, RangeStore};
