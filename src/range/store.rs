use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::core::Hand;
use crate::storage::{Document, Storage, load_document, save_document};

use super::{
    ActionButton, ActionButtons, FOLD, Folder, Range, RangeError, RangeSnapshot, SimpleAction,
    WeightedAction, migrate_action_buttons,
};

const DEFAULT_FOLDER_NAME: &str = "Folder";
const DEFAULT_RANGE_NAME: &str = "Range";
const CLONE_SUFFIX: &str = " +clone";

/// Description of a button to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewActionButton {
    /// A single-colour button. Without a colour the next unused palette
    /// colour is picked.
    Simple { name: String, color: Option<String> },
    Weighted {
        name: String,
        action1_id: String,
        action2_id: String,
        weight: u8,
    },
}

/// One field change on an existing button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionButtonUpdate {
    Name(String),
    /// Simple buttons only.
    Color(String),
    /// Weighted buttons only.
    Weight(u8),
    /// Weighted buttons only.
    Action1(String),
    /// Weighted buttons only.
    Action2(String),
}

fn default_range() -> Range {
    Range::new(crate::new_id(), DEFAULT_RANGE_NAME.to_string())
}

fn default_folder() -> Folder {
    Folder {
        id: crate::new_id(),
        name: DEFAULT_FOLDER_NAME.to_string(),
        ranges: vec![default_range()],
    }
}

/// Owner of all folders, ranges and action buttons.
///
/// The folder list and the button list are each held behind an `Arc` and
/// replaced on write, so [`RangeStore::snapshot`] never observes later
/// edits. Every accepted mutation rewrites the affected document.
#[derive(Debug)]
pub struct RangeStore<S: Storage> {
    storage: S,
    folders: Arc<Vec<Folder>>,
    action_buttons: Arc<ActionButtons>,
    selected_range: String,
    active_action: String,
}

impl<S: Storage> RangeStore<S> {
    /// Load the stored folders and buttons, falling back to defaults for
    /// anything missing or unreadable.
    #[instrument(level = "debug", skip(storage))]
    pub fn load(storage: S) -> Self {
        let mut folders: Vec<Folder> =
            load_document(&storage, Document::Folders).unwrap_or_default();
        if folders.is_empty() {
            folders.push(default_folder());
        }
        for folder in folders.iter_mut().filter(|f| f.ranges.is_empty()) {
            warn!(folder_id = %folder.id, "Folder without ranges, adding a default range");
            folder.ranges.push(default_range());
        }

        let raw: Vec<serde_json::Value> =
            load_document(&storage, Document::ActionButtons).unwrap_or_default();
        let mut buttons = migrate_action_buttons(raw);
        if buttons.is_empty() {
            buttons.push(ActionButton::default_raise());
        }

        // Both lists are non-empty at this point.
        let selected_range = folders[0].ranges[0].id.clone();
        let active_action = buttons[0].id().to_string();

        debug!(
            folders = folders.len(),
            action_buttons = buttons.len(),
            "Loaded range store"
        );

        Self {
            storage,
            folders: Arc::new(folders),
            action_buttons: Arc::new(ActionButtons::new(buttons)),
            selected_range,
            active_action,
        }
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn action_buttons(&self) -> &ActionButtons {
        &self.action_buttons
    }

    pub fn selected_range(&self) -> &str {
        &self.selected_range
    }

    pub fn active_action(&self) -> &str {
        &self.active_action
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn find_folder(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == folder_id)
    }

    pub fn find_range(&self, range_id: &str) -> Option<&Range> {
        self.folders.iter().find_map(|f| f.find_range(range_id))
    }

    /// A frozen copy of the current folders and buttons.
    pub fn snapshot(&self) -> RangeSnapshot {
        RangeSnapshot::from_shared(self.folders.clone(), self.action_buttons.clone())
    }

    /// Add a folder holding one default range. Returns the folder id.
    #[instrument(level = "debug", skip(self))]
    pub fn create_folder(&mut self) -> String {
        let folder = default_folder();
        let id = folder.id.clone();
        Arc::make_mut(&mut self.folders).push(folder);
        self.persist_folders();
        id
    }

    /// Remove a folder and its ranges. Removing the last folder leaves a
    /// fresh default one behind.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_folder(&mut self, folder_id: &str) -> Result<(), RangeError> {
        let idx = self.folder_index(folder_id)?;
        let folders = Arc::make_mut(&mut self.folders);
        folders.remove(idx);
        if folders.is_empty() {
            debug!("Deleted the last folder, recreating a default one");
            folders.push(default_folder());
        }
        self.repair_selection();
        self.persist_folders();
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<(), RangeError> {
        let idx = self.folder_index(folder_id)?;
        Arc::make_mut(&mut self.folders)[idx].name = name.to_string();
        self.persist_folders();
        Ok(())
    }

    /// Append a blank range to a folder. Returns the range id.
    #[instrument(level = "debug", skip(self))]
    pub fn add_range(&mut self, folder_id: &str) -> Result<String, RangeError> {
        let idx = self.folder_index(folder_id)?;
        let range = default_range();
        let id = range.id.clone();
        Arc::make_mut(&mut self.folders)[idx].ranges.push(range);
        self.persist_folders();
        Ok(id)
    }

    /// Append an independent copy of a range to the same folder. Returns the
    /// id of the copy.
    #[instrument(level = "debug", skip(self))]
    pub fn clone_range(&mut self, folder_id: &str, range_id: &str) -> Result<String, RangeError> {
        let idx = self.folder_index(folder_id)?;
        let source = self.folders[idx]
            .find_range(range_id)
            .ok_or_else(|| RangeError::RangeNotFound(range_id.to_string()))?;

        let copy = Range {
            id: crate::new_id(),
            name: format!("{}{}", source.name, CLONE_SUFFIX),
            hands: source.hands.clone(),
        };
        let id = copy.id.clone();
        Arc::make_mut(&mut self.folders)[idx].ranges.push(copy);
        self.persist_folders();
        Ok(id)
    }

    /// Remove a range. A folder's only range can't be removed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_range(&mut self, range_id: &str) -> Result<(), RangeError> {
        let (folder_idx, range_idx) = self.range_index(range_id)?;
        if self.folders[folder_idx].ranges.len() == 1 {
            return Err(RangeError::LastRange);
        }
        Arc::make_mut(&mut self.folders)[folder_idx]
            .ranges
            .remove(range_idx);
        self.repair_selection();
        self.persist_folders();
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn rename_range(&mut self, range_id: &str, name: &str) -> Result<(), RangeError> {
        let (folder_idx, range_idx) = self.range_index(range_id)?;
        Arc::make_mut(&mut self.folders)[folder_idx].ranges[range_idx].name = name.to_string();
        self.persist_folders();
        Ok(())
    }

    /// Assign `action` to one hand of a range. `None` and fold clear it.
    pub fn set_hand_action(
        &mut self,
        range_id: &str,
        hand: Hand,
        action: Option<&str>,
    ) -> Result<(), RangeError> {
        let action = action.filter(|a| *a != FOLD);
        if let Some(action) = action {
            if !self.action_buttons.contains(action) {
                return Err(RangeError::ActionNotFound(action.to_string()));
            }
        }
        let (folder_idx, range_idx) = self.range_index(range_id)?;

        let hands = &mut Arc::make_mut(&mut self.folders)[folder_idx].ranges[range_idx].hands;
        match action {
            Some(action) => hands.insert(hand, action.to_string()),
            None => hands.remove(&hand),
        };
        tracing::trace!(range_id, %hand, ?action, "Set hand action");
        self.persist_folders();
        Ok(())
    }

    /// An editing callback bound to one range, for a gesture controller.
    /// Refused edits are logged and skipped.
    pub fn hand_editor<'a>(
        &'a mut self,
        range_id: &'a str,
    ) -> impl FnMut(Hand, Option<&str>) + 'a {
        move |hand: Hand, action: Option<&str>| {
            if let Err(error) = self.set_hand_action(range_id, hand, action) {
                warn!(range_id, %hand, %error, "Hand edit refused");
            }
        }
    }

    pub fn select_range(&mut self, range_id: &str) -> Result<(), RangeError> {
        self.range_index(range_id)?;
        self.selected_range = range_id.to_string();
        Ok(())
    }

    pub fn set_active_action(&mut self, action_id: &str) -> Result<(), RangeError> {
        if !self.action_buttons.contains(action_id) {
            return Err(RangeError::ActionNotFound(action_id.to_string()));
        }
        self.active_action = action_id.to_string();
        Ok(())
    }

    /// Add a button at the end of the list. Returns the new id.
    #[instrument(level = "debug", skip(self))]
    pub fn create_action_button(&mut self, new: NewActionButton) -> Result<String, RangeError> {
        let button = match new {
            NewActionButton::Simple { name, color } => {
                let name = Self::checked_name(name)?;
                let color = color.unwrap_or_else(|| self.action_buttons.next_color().to_string());
                ActionButton::Simple(SimpleAction {
                    id: crate::new_id(),
                    name,
                    color,
                })
            }
            NewActionButton::Weighted {
                name,
                action1_id,
                action2_id,
                weight,
            } => {
                let name = Self::checked_name(name)?;
                self.action_buttons
                    .validate_weighted(&action1_id, &action2_id, weight)?;
                ActionButton::Weighted(WeightedAction {
                    id: crate::new_id(),
                    name,
                    action1_id,
                    action2_id,
                    weight,
                })
            }
        };

        let id = button.id().to_string();
        self.replace_buttons(|buttons| buttons.push(button));
        Ok(id)
    }

    /// Change one field of a button.
    #[instrument(level = "debug", skip(self))]
    pub fn update_action_button(
        &mut self,
        action_id: &str,
        update: ActionButtonUpdate,
    ) -> Result<(), RangeError> {
        let idx = self
            .action_buttons
            .iter()
            .position(|b| b.id() == action_id)
            .ok_or_else(|| RangeError::ActionNotFound(action_id.to_string()))?;

        let mut button = self.action_buttons.as_slice()[idx].clone();
        match (&mut button, update) {
            (ActionButton::Simple(a), ActionButtonUpdate::Name(name)) => a.name = name,
            (ActionButton::Weighted(w), ActionButtonUpdate::Name(name)) => w.name = name,
            (ActionButton::Simple(a), ActionButtonUpdate::Color(color)) => a.color = color,
            (ActionButton::Weighted(w), ActionButtonUpdate::Weight(weight)) => {
                self.action_buttons
                    .validate_weighted(&w.action1_id, &w.action2_id, weight)?;
                w.weight = weight;
            }
            (ActionButton::Weighted(w), ActionButtonUpdate::Action1(side)) => {
                self.action_buttons
                    .validate_weighted(&side, &w.action2_id, w.weight)?;
                w.action1_id = side;
            }
            (ActionButton::Weighted(w), ActionButtonUpdate::Action2(side)) => {
                self.action_buttons
                    .validate_weighted(&w.action1_id, &side, w.weight)?;
                w.action2_id = side;
            }
            (b, update) => {
                return Err(RangeError::FieldNotApplicable {
                    field: update.field(),
                    kind: b.kind(),
                });
            }
        }

        self.replace_buttons(|buttons| buttons[idx] = button);
        Ok(())
    }

    /// Remove a button. Range entries pointing at it are left alone and
    /// read as fold from then on.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_action_button(&mut self, action_id: &str) -> Result<(), RangeError> {
        let idx = self
            .action_buttons
            .iter()
            .position(|b| b.id() == action_id)
            .ok_or_else(|| RangeError::ActionNotFound(action_id.to_string()))?;
        if self.action_buttons.len() == 1 {
            return Err(RangeError::LastActionButton);
        }

        self.replace_buttons(|buttons| {
            buttons.remove(idx);
        });
        if self.active_action == action_id {
            if let Some(first) = self.action_buttons.first() {
                self.active_action = first.id().to_string();
            }
        }
        Ok(())
    }

    fn checked_name(name: String) -> Result<String, RangeError> {
        if name.trim().is_empty() {
            Err(RangeError::BlankName)
        } else {
            Ok(name)
        }
    }

    fn replace_buttons(&mut self, edit: impl FnOnce(&mut Vec<ActionButton>)) {
        let mut buttons = self.action_buttons.as_ref().clone().into_vec();
        edit(&mut buttons);
        self.action_buttons = Arc::new(ActionButtons::new(buttons));
        save_document(
            &mut self.storage,
            Document::ActionButtons,
            self.action_buttons.as_ref(),
        );
    }

    fn folder_index(&self, folder_id: &str) -> Result<usize, RangeError> {
        self.folders
            .iter()
            .position(|f| f.id == folder_id)
            .ok_or_else(|| RangeError::FolderNotFound(folder_id.to_string()))
    }

    fn range_index(&self, range_id: &str) -> Result<(usize, usize), RangeError> {
        self.folders
            .iter()
            .enumerate()
            .find_map(|(fi, f)| {
                f.ranges
                    .iter()
                    .position(|r| r.id == range_id)
                    .map(|ri| (fi, ri))
            })
            .ok_or_else(|| RangeError::RangeNotFound(range_id.to_string()))
    }

    /// Point the selection at the first range of the first folder if the
    /// selected range is gone.
    fn repair_selection(&mut self) {
        if self.find_range(&self.selected_range).is_some() {
            return;
        }
        if let Some(first) = self.folders.first().and_then(|f| f.ranges.first()) {
            debug!(from = %self.selected_range, to = %first.id, "Selected range removed");
            self.selected_range = first.id.clone();
        }
    }

    fn persist_folders(&mut self) {
        save_document(&mut self.storage, Document::Folders, self.folders.as_ref());
    }
}

impl ActionButtonUpdate {
    fn field(&self) -> &'static str {
        match self {
            ActionButtonUpdate::Name(_) => "name",
            ActionButtonUpdate::Color(_) => "color",
            ActionButtonUpdate::Weight(_) => "weight",
            ActionButtonUpdate::Action1(_) => "action1Id",
            ActionButtonUpdate::Action2(_) => "action2Id",
        }
    }
}
