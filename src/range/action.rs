use serde::{Deserialize, Serialize};

use super::RangeError;

/// Reserved action id. Never stored as a button; unmapped hands resolve to it.
pub const FOLD: &str = "fold";

/// Neutral colour every fold cell is drawn with.
pub const FOLD_COLOR: &str = "#6b7280";

/// Colours handed out to new simple buttons, first unused wins.
pub const PALETTE: [&str; 5] = ["#ef4444", "#3b82f6", "#10b981", "#f59e0b", "#ec4899"];

/// A single-colour action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleAction {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// A probabilistic split between two other actions.
///
/// `weight` percent goes to `action1_id`, the rest to `action2_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedAction {
    pub id: String,
    pub name: String,
    pub action1_id: String,
    pub action2_id: String,
    pub weight: u8,
}

/// A named decision option a hand can be mapped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionButton {
    Simple(SimpleAction),
    Weighted(WeightedAction),
}

impl ActionButton {
    pub fn id(&self) -> &str {
        match self {
            ActionButton::Simple(a) => &a.id,
            ActionButton::Weighted(a) => &a.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ActionButton::Simple(a) => &a.name,
            ActionButton::Weighted(a) => &a.name,
        }
    }

    pub fn is_weighted(&self) -> bool {
        matches!(self, ActionButton::Weighted(_))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            ActionButton::Simple(_) => "simple",
            ActionButton::Weighted(_) => "weighted",
        }
    }

    /// The default button a fresh store starts with.
    pub fn default_raise() -> Self {
        ActionButton::Simple(SimpleAction {
            id: "raise".to_string(),
            name: "Raise".to_string(),
            color: "#8b5cf6".to_string(),
        })
    }
}

/// How a matrix cell should be drawn for a given assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellStyle {
    /// Unassigned, fold, or pointing at an action that no longer exists.
    Fold,
    /// A simple action.
    Solid { color: String },
    /// A weighted action, drawn as two bands.
    Split {
        first_color: String,
        second_color: String,
        /// Share of the cell given to the first colour, 0-100.
        first_weight: u8,
    },
}

/// The ordered list of action buttons of a store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionButtons(Vec<ActionButton>);

impl ActionButtons {
    pub fn new(buttons: Vec<ActionButton>) -> Self {
        Self(buttons)
    }

    pub fn get(&self, id: &str) -> Option<&ActionButton> {
        self.0.iter().find(|b| b.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionButton> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&ActionButton> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[ActionButton] {
        &self.0
    }

    pub(crate) fn into_vec(self) -> Vec<ActionButton> {
        self.0
    }

    /// True if `id` may be one side of a weighted button: fold or an
    /// existing simple button.
    pub fn is_weightable(&self, id: &str) -> bool {
        id == FOLD || matches!(self.get(id), Some(ActionButton::Simple(_)))
    }

    /// Check both sides and the weight of a weighted button.
    pub fn validate_weighted(
        &self,
        action1_id: &str,
        action2_id: &str,
        weight: u8,
    ) -> Result<(), RangeError> {
        if weight > 100 {
            return Err(RangeError::InvalidWeight(weight));
        }
        for side in [action1_id, action2_id] {
            if !self.is_weightable(side) {
                return Err(RangeError::InvalidWeightedReference(side.to_string()));
            }
        }
        Ok(())
    }

    /// Colour a single action id resolves to. Fold and unknown ids get the
    /// neutral colour; weighted ids have no single colour.
    fn side_color(&self, id: &str) -> String {
        match self.get(id) {
            Some(ActionButton::Simple(a)) => a.color.clone(),
            _ => FOLD_COLOR.to_string(),
        }
    }

    /// Resolve the style of a cell assigned to `action`.
    ///
    /// This only reads the buttons; the mapping that produced `action` is
    /// never touched.
    ///
    /// ```
    /// use range_trainer::range::{ActionButton, ActionButtons, CellStyle, WeightedAction};
    ///
    /// let buttons = ActionButtons::new(vec![
    ///     ActionButton::default_raise(),
    ///     ActionButton::Weighted(WeightedAction {
    ///         id: "mix".into(),
    ///         name: "Mix".into(),
    ///         action1_id: "fold".into(),
    ///         action2_id: "raise".into(),
    ///         weight: 50,
    ///     }),
    /// ]);
    /// assert_eq!(
    ///     CellStyle::Split {
    ///         first_color: "#6b7280".into(),
    ///         second_color: "#8b5cf6".into(),
    ///         first_weight: 50,
    ///     },
    ///     buttons.cell_style(Some("mix"))
    /// );
    /// assert_eq!(CellStyle::Fold, buttons.cell_style(None));
    /// ```
    pub fn cell_style(&self, action: Option<&str>) -> CellStyle {
        let Some(action) = action.filter(|a| *a != FOLD) else {
            return CellStyle::Fold;
        };
        match self.get(action) {
            Some(ActionButton::Simple(a)) => CellStyle::Solid {
                color: a.color.clone(),
            },
            Some(ActionButton::Weighted(w)) => CellStyle::Split {
                first_color: self.side_color(&w.action1_id),
                second_color: self.side_color(&w.action2_id),
                first_weight: w.weight.min(100),
            },
            None => CellStyle::Fold,
        }
    }

    /// A palette colour no simple button uses yet.
    pub fn next_color(&self) -> &'static str {
        PALETTE
            .iter()
            .copied()
            .find(|c| {
                !self
                    .iter()
                    .any(|b| matches!(b, ActionButton::Simple(s) if s.color == *c))
            })
            .unwrap_or(FOLD_COLOR)
    }
}

/// Upgrade raw button entries written before buttons carried a `type` tag.
///
/// Entries without a tag become simple buttons. Entries that still don't
/// decode are dropped with a warning.
pub(crate) fn migrate_action_buttons(raw: Vec<serde_json::Value>) -> Vec<ActionButton> {
    raw.into_iter()
        .filter_map(|mut entry| {
            if let Some(obj) = entry.as_object_mut() {
                obj.entry("type")
                    .or_insert_with(|| serde_json::Value::String("simple".to_string()));
            }
            match serde_json::from_value::<ActionButton>(entry) {
                Ok(button) => Some(button),
                Err(error) => {
                    tracing::warn!(%error, "Dropping undecodable action button");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(id: &str, color: &str) -> ActionButton {
        ActionButton::Simple(SimpleAction {
            id: id.to_string(),
            name: id.to_uppercase(),
            color: color.to_string(),
        })
    }

    fn weighted(id: &str, a1: &str, a2: &str, weight: u8) -> ActionButton {
        ActionButton::Weighted(WeightedAction {
            id: id.to_string(),
            name: id.to_string(),
            action1_id: a1.to_string(),
            action2_id: a2.to_string(),
            weight,
        })
    }

    #[test]
    fn test_serde_tagged_shapes() {
        let json = serde_json::to_value(simple("raise", "#fff")).unwrap();
        assert_eq!("simple", json["type"]);
        assert_eq!("#fff", json["color"]);

        let json = serde_json::to_value(weighted("mix", "fold", "raise", 30)).unwrap();
        assert_eq!("weighted", json["type"]);
        assert_eq!("fold", json["action1Id"]);
        assert_eq!("raise", json["action2Id"]);
        assert_eq!(30, json["weight"]);
    }

    #[test_log::test]
    fn test_migrate_untagged_buttons() {
        let raw: Vec<serde_json::Value> = serde_json::from_str(
            r##"[
                {"id": "raise", "name": "Raise", "color": "#8b5cf6"},
                {"type": "weighted", "id": "mix", "name": "Mix", "action1Id": "fold", "action2Id": "raise", "weight": 50},
                {"type": "simple", "id": "call", "name": "Call", "color": "#10b981"},
                {"id": "broken"}
            ]"##,
        )
        .unwrap();

        let buttons = migrate_action_buttons(raw);
        assert_eq!(3, buttons.len());
        assert_eq!(simple("raise", "#8b5cf6").id(), buttons[0].id());
        assert!(!buttons[0].is_weighted());
        assert!(buttons[1].is_weighted());
        assert_eq!("call", buttons[2].id());
    }

    #[test]
    fn test_weighted_validation() {
        let buttons = ActionButtons::new(vec![
            simple("raise", "#8b5cf6"),
            weighted("mix", "fold", "raise", 50),
        ]);

        assert!(buttons.validate_weighted("fold", "raise", 50).is_ok());
        assert_eq!(
            Err(RangeError::InvalidWeightedReference("mix".to_string())),
            buttons.validate_weighted("mix", "raise", 50)
        );
        assert_eq!(
            Err(RangeError::InvalidWeightedReference("gone".to_string())),
            buttons.validate_weighted("raise", "gone", 50)
        );
        assert_eq!(
            Err(RangeError::InvalidWeight(101)),
            buttons.validate_weighted("fold", "raise", 101)
        );
    }

    #[test]
    fn test_cell_style() {
        let buttons = ActionButtons::new(vec![
            simple("raise", "#8b5cf6"),
            simple("call", "#10b981"),
            weighted("mix", "call", "raise", 25),
        ]);

        assert_eq!(CellStyle::Fold, buttons.cell_style(Some(FOLD)));
        assert_eq!(CellStyle::Fold, buttons.cell_style(Some("stale")));
        assert_eq!(
            CellStyle::Solid {
                color: "#10b981".to_string()
            },
            buttons.cell_style(Some("call"))
        );
        assert_eq!(
            CellStyle::Split {
                first_color: "#10b981".to_string(),
                second_color: "#8b5cf6".to_string(),
                first_weight: 25,
            },
            buttons.cell_style(Some("mix"))
        );
    }

    #[test]
    fn test_weighted_with_stale_side_uses_neutral_color() {
        let buttons = ActionButtons::new(vec![weighted("mix", "deleted", "fold", 70)]);
        assert_eq!(
            CellStyle::Split {
                first_color: FOLD_COLOR.to_string(),
                second_color: FOLD_COLOR.to_string(),
                first_weight: 70,
            },
            buttons.cell_style(Some("mix"))
        );
    }

    #[test]
    fn test_next_color() {
        let mut list = vec![simple("a", PALETTE[0])];
        assert_eq!(PALETTE[1], ActionButtons::new(list.clone()).next_color());

        for (i, color) in PALETTE.iter().enumerate().skip(1) {
            list.push(simple(&format!("b{i}"), color));
        }
        assert_eq!(FOLD_COLOR, ActionButtons::new(list).next_color());
    }
}
