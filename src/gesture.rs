//! Drag selection over the hand matrix.
//!
//! A gesture starts on one cell, paints every cell the pointer enters and
//! ends on release or cancellation. The first cell decides what the whole
//! gesture does: pressing a cell that already carries the active action
//! clears cells, anything else assigns the active action.
//!
//! The controller only tracks the gesture. Edits go through the `apply`
//! callback handed to [`GestureController::begin`] and
//! [`GestureController::enter`], for example
//! [`RangeStore::hand_editor`](crate::range::RangeStore::hand_editor).
//!
//! ```
//! use range_trainer::core::Hand;
//! use range_trainer::gesture::GestureController;
//!
//! let mut edits = Vec::new();
//! let mut gesture = GestureController::new();
//! let mut apply = |hand: Hand, action: Option<&str>| {
//!     edits.push((hand.to_string(), action.map(str::to_string)))
//! };
//!
//! gesture.begin("AKs", None, "raise", &mut apply);
//! gesture.enter("AKs", &mut apply);
//! gesture.enter("AQs", &mut apply);
//! gesture.end();
//!
//! assert_eq!(2, edits.len());
//! assert_eq!(("AQs".to_string(), Some("raise".to_string())), edits[1]);
//! ```
use tracing::trace;

use crate::core::Hand;

/// What every cell touched by a gesture gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureMode {
    /// Assign this action id.
    Select(String),
    /// Clear the assignment.
    Deselect,
}

impl GestureMode {
    fn action(&self) -> Option<&str> {
        match self {
            GestureMode::Select(action) => Some(action),
            GestureMode::Deselect => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GestureSession {
    mode: GestureMode,
    last_touched: Option<Hand>,
}

/// Tracks at most one drag gesture at a time.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    read_only: bool,
    session: Option<GestureSession>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller that ignores all input until made writable.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            session: None,
        }
    }

    /// Start a gesture on `target`.
    ///
    /// `current` is what the cell is assigned right now and `active` the
    /// action currently picked by the user. Unknown targets and read-only
    /// controllers are ignored. A gesture already in progress is replaced.
    pub fn begin(
        &mut self,
        target: &str,
        current: Option<&str>,
        active: &str,
        mut apply: impl FnMut(Hand, Option<&str>),
    ) {
        if self.read_only {
            return;
        }
        let Ok(hand) = Hand::from_notation(target) else {
            trace!(label = target, "Ignoring gesture start on unknown target");
            return;
        };

        let mode = if current == Some(active) {
            GestureMode::Deselect
        } else {
            GestureMode::Select(active.to_string())
        };
        trace!(%hand, ?mode, "Gesture started");

        apply(hand, mode.action());
        self.session = Some(GestureSession {
            mode,
            last_touched: Some(hand),
        });
    }

    /// The pointer moved onto `target` while a gesture may be in progress.
    pub fn enter(&mut self, target: &str, mut apply: impl FnMut(Hand, Option<&str>)) {
        if self.read_only {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Ok(hand) = Hand::from_notation(target) else {
            return;
        };
        if session.last_touched == Some(hand) {
            return;
        }

        trace!(%hand, mode = ?session.mode, "Gesture entered cell");
        apply(hand, session.mode.action());
        session.last_touched = Some(hand);
    }

    /// The pointer left the last touched cell without reaching another one.
    /// Coming back to it applies the edit again.
    pub fn leave(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.last_touched = None;
        }
    }

    /// Release or cancellation. Safe to call without a gesture.
    pub fn end(&mut self) {
        if self.session.take().is_some() {
            trace!("Gesture ended");
        }
    }

    /// Switching to read-only also drops any gesture in progress.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        if read_only {
            self.session = None;
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn mode(&self) -> Option<&GestureMode> {
        self.session.as_ref().map(|s| &s.mode)
    }
}
