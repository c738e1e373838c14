use serde::{Deserialize, Serialize};

use super::errors::{Result, TrainingError};

/// The two quiz flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainingMode {
    /// One hand at a time, answered with an action.
    Classic,
    /// Rebuild each range on a blank matrix.
    BorderRepeat,
}

/// Which hands a classic session asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassicSubtype {
    /// Every hand once, shuffled.
    #[default]
    AllHands,
    /// A capped sample of hands close to an action boundary.
    BorderCheck,
}

/// A saved training. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mode: TrainingMode,
    /// Only set for classic trainings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<ClassicSubtype>,
    /// Range ids, in question order for border-repeat.
    pub ranges: Vec<String>,
    /// Epoch milliseconds.
    #[serde(deserialize_with = "crate::storage::deserialize_epoch_ms")]
    pub created_at: u64,
}

impl TrainingDefinition {
    /// The classic subtype, defaulting to all hands when unset.
    pub fn classic_subtype(&self) -> Option<ClassicSubtype> {
        match self.mode {
            TrainingMode::Classic => Some(self.subtype.unwrap_or_default()),
            TrainingMode::BorderRepeat => None,
        }
    }
}

/// What the user filled in to create a training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTraining {
    pub name: String,
    pub mode: TrainingMode,
    pub subtype: Option<ClassicSubtype>,
    pub ranges: Vec<String>,
}

impl NewTraining {
    pub fn classic(name: &str, subtype: ClassicSubtype, ranges: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            mode: TrainingMode::Classic,
            subtype: Some(subtype),
            ranges,
        }
    }

    pub fn border_repeat(name: &str, ranges: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            mode: TrainingMode::BorderRepeat,
            subtype: None,
            ranges,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TrainingError::BlankName);
        }
        if self.ranges.is_empty() {
            return Err(TrainingError::NoRangesSelected);
        }
        Ok(())
    }

    /// Validate and stamp into a definition.
    pub(crate) fn into_definition(self, id: String, created_at: u64) -> Result<TrainingDefinition> {
        self.validate()?;
        let subtype = match self.mode {
            TrainingMode::Classic => Some(self.subtype.unwrap_or_default()),
            TrainingMode::BorderRepeat => None,
        };
        Ok(TrainingDefinition {
            id,
            name: self.name,
            mode: self.mode,
            subtype,
            ranges: self.ranges,
            created_at,
        })
    }
}
