use serde::{Deserialize, Serialize};

use crate::training::TrainingMode;

/// Result of one question.
///
/// For classic sessions `hand` is the hand label and both actions are set.
/// For border-repeat sessions `hand` is the range name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub hand: String,
    pub correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_action: Option<String>,
}

/// One completed training session. Written once and never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub training_id: String,
    pub training_name: String,
    #[serde(rename = "type")]
    pub mode: TrainingMode,
    /// Epoch milliseconds.
    #[serde(deserialize_with = "crate::storage::deserialize_epoch_ms")]
    pub completed_at: u64,
    /// Milliseconds from the first question to completion.
    pub duration: u64,
    /// Percentage rounded to one decimal.
    pub accuracy: f64,
    pub total_questions: usize,
    pub correct_answers: usize,
    #[serde(default)]
    pub details: Vec<ItemOutcome>,
}

impl SessionRecord {
    pub fn performance(&self) -> Performance {
        Performance::from_accuracy(self.accuracy)
    }

    pub fn duration_formatted(&self) -> String {
        format_duration(self.duration)
    }
}

/// Coarse grade of a session's accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Performance {
    NeedsPractice,
    Fair,
    Good,
    Excellent,
}

impl Performance {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 90.0 {
            Performance::Excellent
        } else if accuracy >= 75.0 {
            Performance::Good
        } else if accuracy >= 60.0 {
            Performance::Fair
        } else {
            Performance::NeedsPractice
        }
    }
}

/// Round a percentage to one decimal place.
pub fn round_percent(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `correct / total` as a percentage rounded to one decimal; 0 for no
/// questions.
pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_percent(correct as f64 / total as f64 * 100.0)
    }
}

/// Format milliseconds as `m:ss`.
///
/// ```
/// use range_trainer::stats::format_duration;
///
/// assert_eq!("0:00", format_duration(999));
/// assert_eq!("2:05", format_duration(125_000));
/// assert_eq!("61:01", format_duration(3_661_000));
/// ```
pub fn format_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{minutes}:{seconds:02}")
}
