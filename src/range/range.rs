use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{HAND_COUNT, Hand, TOTAL_COMBINATIONS};

use super::{ActionButtons, FOLD};

/// Assignment of hands to action ids. Hands that are absent fold.
pub type HandMap = BTreeMap<Hand, String>;

/// Look up the action a hand resolves to, fold when unmapped.
pub fn action_for<'a>(hands: &'a HandMap, hand: &Hand) -> &'a str {
    hands.get(hand).map(String::as_str).unwrap_or(FOLD)
}

/// Drop explicit fold entries, leaving only the hands that act.
pub fn without_folds(hands: &HandMap) -> HandMap {
    hands
        .iter()
        .filter(|(_, action)| action.as_str() != FOLD)
        .map(|(hand, action)| (*hand, action.clone()))
        .collect()
}

/// Two mappings agree when every hand resolves to the same action on both
/// sides, with fold and absence treated alike.
pub fn same_assignments(a: &HandMap, b: &HandMap) -> bool {
    without_folds(a) == without_folds(b)
}

/// A named hand-to-action mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hands: HandMap,
}

impl Range {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            hands: HandMap::new(),
        }
    }

    pub fn action_for(&self, hand: &Hand) -> &str {
        action_for(&self.hands, hand)
    }

    /// Count what the range selects given the current buttons.
    ///
    /// Only hands assigned to an existing button count as selected; fold and
    /// stale ids don't.
    pub fn summary(&self, buttons: &ActionButtons) -> RangeSummary {
        let mut per_action: Vec<ActionShare> = buttons
            .iter()
            .map(|b| ActionShare {
                action_id: b.id().to_string(),
                name: b.name().to_string(),
                hands: 0,
                hand_percent: 0,
                combinations: 0,
            })
            .collect();

        for (hand, action) in &self.hands {
            if let Some(share) = per_action.iter_mut().find(|s| s.action_id == *action) {
                share.hands += 1;
                share.combinations += hand.combinations();
            }
        }

        for share in per_action.iter_mut() {
            share.hand_percent = percent(share.hands as u32, HAND_COUNT as u32);
        }

        let selected_hands = per_action.iter().map(|s| s.hands).sum();
        let combinations = per_action.iter().map(|s| s.combinations).sum();
        per_action.retain(|s| s.hands > 0);

        RangeSummary {
            selected_hands,
            combinations,
            percent: percent(combinations, TOTAL_COMBINATIONS),
            hand_percent: percent(selected_hands as u32, HAND_COUNT as u32),
            per_action,
        }
    }
}

fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}

/// Per-action slice of a [`RangeSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionShare {
    pub action_id: String,
    pub name: String,
    /// Number of hand categories mapped to this action.
    pub hands: usize,
    /// `hands` as a rounded percentage of the 169 categories.
    pub hand_percent: u32,
    pub combinations: u32,
}

/// What a range selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSummary {
    pub selected_hands: usize,
    /// Selected two-card combinations out of 1326.
    pub combinations: u32,
    /// `combinations` as a rounded percentage of 1326.
    pub percent: u32,
    /// `selected_hands` as a rounded percentage of 169.
    pub hand_percent: u32,
    /// Non-empty actions, in button order.
    pub per_action: Vec<ActionShare>,
}

/// A named, ordered group of ranges. Never empty inside a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ranges: Vec<Range>,
}

impl Folder {
    pub fn find_range(&self, range_id: &str) -> Option<&Range> {
        self.ranges.iter().find(|r| r.id == range_id)
    }

    pub fn contains_range(&self, range_id: &str) -> bool {
        self.find_range(range_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{ActionButton, SimpleAction, WeightedAction};

    fn hand(s: &str) -> Hand {
        Hand::from_notation(s).unwrap()
    }

    fn raise_only() -> ActionButtons {
        ActionButtons::new(vec![ActionButton::default_raise()])
    }

    #[test]
    fn test_percentage_of_two_pairs() {
        let mut range = Range::new("r".to_string(), "Range".to_string());
        range.hands.insert(hand("AA"), "raise".to_string());
        range.hands.insert(hand("KK"), "raise".to_string());

        let summary = range.summary(&raise_only());
        assert_eq!(12, summary.combinations);
        assert_eq!(1, summary.percent);
        assert_eq!(2, summary.selected_hands);
        assert_eq!(1, summary.hand_percent);
        assert_eq!(1, summary.per_action.len());
        assert_eq!(2, summary.per_action[0].hands);
    }

    #[test]
    fn test_summary_ignores_fold_and_stale() {
        let mut range = Range::new("r".to_string(), "Range".to_string());
        range.hands.insert(hand("AKs"), "raise".to_string());
        range.hands.insert(hand("AKo"), FOLD.to_string());
        range.hands.insert(hand("72o"), "deleted".to_string());

        let summary = range.summary(&raise_only());
        assert_eq!(4, summary.combinations);
        assert_eq!(1, summary.selected_hands);
        assert_eq!(0, summary.percent);
    }

    #[test]
    fn test_summary_per_action_in_button_order() {
        let buttons = ActionButtons::new(vec![
            ActionButton::default_raise(),
            ActionButton::Simple(SimpleAction {
                id: "call".to_string(),
                name: "Call".to_string(),
                color: "#10b981".to_string(),
            }),
            ActionButton::Weighted(WeightedAction {
                id: "mix".to_string(),
                name: "Mix".to_string(),
                action1_id: "call".to_string(),
                action2_id: "raise".to_string(),
                weight: 50,
            }),
        ]);
        let mut range = Range::new("r".to_string(), "Range".to_string());
        for h in ["AA", "KK", "QQ"] {
            range.hands.insert(hand(h), "call".to_string());
        }
        range.hands.insert(hand("AKo"), "mix".to_string());

        let summary = range.summary(&buttons);
        let ids: Vec<&str> = summary
            .per_action
            .iter()
            .map(|s| s.action_id.as_str())
            .collect();
        assert_eq!(vec!["call", "mix"], ids);
        assert_eq!(18, summary.per_action[0].combinations);
        assert_eq!(2, summary.per_action[0].hand_percent);
        assert_eq!(30, summary.combinations);
        assert_eq!(2, summary.percent);
    }

    #[test]
    fn test_serde_range_roundtrip() {
        let mut range = Range::new("1".to_string(), "Open".to_string());
        range.hands.insert(hand("AA"), "raise".to_string());
        range.hands.insert(hand("T9s"), "call".to_string());
        range.hands.insert(hand("A5o"), "raise".to_string());

        let json = serde_json::to_string(&range).unwrap();
        let parsed: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(range.hands, parsed.hands);
        assert_eq!(range, parsed);
    }

    #[test]
    fn test_range_reads_plain_object() {
        let parsed: Range =
            serde_json::from_str(r#"{"id":"1","name":"Range","hands":{"AKs":"raise","22":"call"}}"#)
                .unwrap();
        assert_eq!("raise", parsed.action_for(&hand("AKs")));
        assert_eq!("call", parsed.action_for(&hand("22")));
        assert_eq!(FOLD, parsed.action_for(&hand("AKo")));
    }

    #[test]
    fn test_same_assignments() {
        let mut reference = HandMap::new();
        reference.insert(hand("AA"), "raise".to_string());

        let mut user = HandMap::new();
        user.insert(hand("AA"), "raise".to_string());
        assert!(same_assignments(&user, &reference));

        user.insert(hand("KK"), FOLD.to_string());
        assert!(same_assignments(&user, &reference));

        user.insert(hand("KK"), "raise".to_string());
        assert!(!same_assignments(&user, &reference));

        assert!(!same_assignments(&HandMap::new(), &reference));
    }
}
