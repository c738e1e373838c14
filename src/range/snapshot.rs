use std::sync::Arc;

use super::{ActionButtons, Folder, Range};

/// A frozen view of a store's folders and action buttons.
///
/// Cloning is cheap. Later store mutations never show up in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RangeSnapshot {
    folders: Arc<Vec<Folder>>,
    action_buttons: Arc<ActionButtons>,
}

impl RangeSnapshot {
    pub fn new(folders: Vec<Folder>, action_buttons: ActionButtons) -> Self {
        Self {
            folders: Arc::new(folders),
            action_buttons: Arc::new(action_buttons),
        }
    }

    pub(crate) fn from_shared(folders: Arc<Vec<Folder>>, action_buttons: Arc<ActionButtons>) -> Self {
        Self {
            folders,
            action_buttons,
        }
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn action_buttons(&self) -> &ActionButtons {
        &self.action_buttons
    }

    /// Find a range in any folder, along with the folder holding it.
    pub fn find_range(&self, range_id: &str) -> Option<(&Folder, &Range)> {
        self.folders
            .iter()
            .find_map(|f| f.find_range(range_id).map(|r| (f, r)))
    }
}
