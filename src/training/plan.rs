use rand::{Rng, seq::SliceRandom};
use tracing::{debug, warn};

use crate::core::{Hand, chebyshev_distance};
use crate::range::{HandMap, RangeSnapshot, action_for};

use super::{ClassicSubtype, TrainingDefinition, TrainingMode};

/// A range copied out of a snapshot for the length of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingRange {
    pub id: String,
    pub name: String,
    pub folder_name: String,
    pub hands: HandMap,
}

/// Look the given ids up across all folders, in the given order.
///
/// Ids that no longer exist are skipped.
pub fn resolve_ranges(snapshot: &RangeSnapshot, range_ids: &[String]) -> Vec<TrainingRange> {
    range_ids
        .iter()
        .filter_map(|id| match snapshot.find_range(id) {
            Some((folder, range)) => Some(TrainingRange {
                id: range.id.clone(),
                name: range.name.clone(),
                folder_name: folder.name.clone(),
                hands: range.hands.clone(),
            }),
            None => {
                warn!(range_id = %id, "Training references a missing range, skipping");
                None
            }
        })
        .collect()
}

/// Every hand once, in random order.
pub fn all_hands<R: Rng + ?Sized>(rng: &mut R) -> Vec<Hand> {
    let mut hands = Hand::all();
    hands.shuffle(rng);
    hands
}

/// Hands within `distance` cells of a cell that resolves to a different
/// action, in grid order.
pub fn border_hands(hands: &HandMap, distance: usize) -> Vec<Hand> {
    let all = Hand::all();
    all.iter()
        .filter(|hand| {
            let action = action_for(hands, hand);
            all.iter().any(|other| {
                chebyshev_distance(hand, other) <= distance && action_for(hands, other) != action
            })
        })
        .copied()
        .collect()
}

/// A shuffled sample of at most `limit` border hands. A range with no
/// boundary at all yields a random sample of all hands instead.
pub fn border_check<R: Rng + ?Sized>(
    hands: &HandMap,
    distance: usize,
    limit: usize,
    rng: &mut R,
) -> Vec<Hand> {
    let mut candidates = border_hands(hands, distance);
    if candidates.is_empty() {
        debug!("Range has no action boundary, sampling from all hands");
        candidates = Hand::all();
    }
    candidates.shuffle(rng);
    candidates.truncate(limit);
    candidates
}

/// One question of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanItem {
    /// Classic: name the action for this hand.
    Hand(Hand),
    /// Border-repeat: rebuild the range at this index of the plan's ranges.
    Range(usize),
}

/// The fixed list of questions of one session along with the ranges they
/// are scored against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPlan {
    pub ranges: Vec<TrainingRange>,
    pub items: Vec<PlanItem>,
    /// Delay attached to the automatic advance after a correct classic
    /// answer.
    pub auto_advance_delay_ms: u64,
}

impl TrainingPlan {
    /// Build the question list for a definition.
    pub fn generate<R: Rng + ?Sized>(
        definition: &TrainingDefinition,
        ranges: Vec<TrainingRange>,
        config: &crate::config::TrainerConfig,
        rng: &mut R,
    ) -> Self {
        let items = match (definition.mode, ranges.first()) {
            (_, None) => vec![],
            (TrainingMode::BorderRepeat, Some(_)) => (0..ranges.len()).map(PlanItem::Range).collect(),
            (TrainingMode::Classic, Some(reference)) => {
                let hands = match definition.classic_subtype().unwrap_or_default() {
                    ClassicSubtype::AllHands => all_hands(rng),
                    ClassicSubtype::BorderCheck => border_check(
                        &reference.hands,
                        config.border_check_distance,
                        config.border_check_questions,
                        rng,
                    ),
                };
                hands.into_iter().map(PlanItem::Hand).collect()
            }
        };
        debug!(
            training_id = %definition.id,
            questions = items.len(),
            "Generated training plan"
        );

        Self {
            ranges,
            items,
            auto_advance_delay_ms: config.auto_advance_delay_ms,
        }
    }

    /// Range a classic session is scored against.
    pub fn reference(&self) -> Option<&TrainingRange> {
        self.ranges.first()
    }

    /// Range a question is scored against.
    pub fn range_for(&self, item: PlanItem) -> Option<&TrainingRange> {
        match item {
            PlanItem::Hand(_) => self.reference(),
            PlanItem::Range(idx) => self.ranges.get(idx),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainerConfig;
    use crate::core::HAND_COUNT;
    use crate::range::{Folder, Range};
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    fn hand(s: &str) -> Hand {
        Hand::from_notation(s).unwrap()
    }

    fn snapshot() -> RangeSnapshot {
        let mut open = Range::new("open".to_string(), "Open".to_string());
        open.hands.insert(hand("AA"), "raise".to_string());
        RangeSnapshot::new(
            vec![
                Folder {
                    id: "f1".to_string(),
                    name: "BTN".to_string(),
                    ranges: vec![open],
                },
                Folder {
                    id: "f2".to_string(),
                    name: "CO".to_string(),
                    ranges: vec![Range::new("empty".to_string(), "Empty".to_string())],
                },
            ],
            Default::default(),
        )
    }

    fn definition(mode: TrainingMode, subtype: Option<ClassicSubtype>) -> TrainingDefinition {
        TrainingDefinition {
            id: "t".to_string(),
            name: "T".to_string(),
            mode,
            subtype,
            ranges: vec!["empty".to_string(), "open".to_string()],
            created_at: 0,
        }
    }

    #[test_log::test]
    fn test_resolve_skips_missing() {
        let ids = vec!["gone".to_string(), "open".to_string(), "empty".to_string()];
        let ranges = resolve_ranges(&snapshot(), &ids);
        assert_eq!(2, ranges.len());
        assert_eq!("open", ranges[0].id);
        assert_eq!("BTN", ranges[0].folder_name);
        assert_eq!("CO", ranges[1].folder_name);
    }

    #[test]
    fn test_all_hands_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let hands = all_hands(&mut rng);
        assert_eq!(HAND_COUNT, hands.len());
        let unique: HashSet<Hand> = hands.into_iter().collect();
        assert_eq!(HAND_COUNT, unique.len());
    }

    #[test]
    fn test_border_hands_around_single_cell() {
        let mut hands = HandMap::new();
        hands.insert(hand("AA"), "raise".to_string());

        let border = border_hands(&hands, 2);
        // AA sits in the corner, so the 3x3 block at distance 2 is the border.
        assert_eq!(9, border.len());
        assert!(border.contains(&hand("AA")));
        assert!(border.contains(&hand("AQs")));
        assert!(border.contains(&hand("QQ")));
        assert!(!border.contains(&hand("AJs")));

        assert_eq!(4, border_hands(&hands, 1).len());
    }

    #[test]
    fn test_border_hands_treat_explicit_fold_as_unmapped() {
        let mut hands = HandMap::new();
        hands.insert(hand("AA"), crate::range::FOLD.to_string());
        assert!(border_hands(&hands, 2).is_empty());
    }

    #[test]
    fn test_border_check_caps_and_falls_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hands = HandMap::new();
        hands.insert(hand("AA"), "raise".to_string());

        let sample = border_check(&hands, 2, 20, &mut rng);
        assert_eq!(9, sample.len());

        let sample = border_check(&hands, 2, 5, &mut rng);
        assert_eq!(5, sample.len());

        let sample = border_check(&HandMap::new(), 2, 20, &mut rng);
        assert_eq!(20, sample.len());
    }

    #[test]
    fn test_generate_plans() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = TrainerConfig::default();
        let snapshot = snapshot();

        let def = definition(TrainingMode::BorderRepeat, None);
        let plan = TrainingPlan::generate(&def, resolve_ranges(&snapshot, &def.ranges), &config, &mut rng);
        assert_eq!(vec![PlanItem::Range(0), PlanItem::Range(1)], plan.items);
        assert_eq!("Empty", plan.range_for(PlanItem::Range(0)).unwrap().name);

        let def = definition(TrainingMode::Classic, Some(ClassicSubtype::AllHands));
        let plan = TrainingPlan::generate(&def, resolve_ranges(&snapshot, &def.ranges), &config, &mut rng);
        assert_eq!(HAND_COUNT, plan.len());
        assert_eq!("empty", plan.reference().unwrap().id);
        assert_eq!(3000, plan.auto_advance_delay_ms);

        // The reference is the first resolved range, which is empty here.
        let def = definition(TrainingMode::Classic, Some(ClassicSubtype::BorderCheck));
        let plan = TrainingPlan::generate(&def, resolve_ranges(&snapshot, &def.ranges), &config, &mut rng);
        assert_eq!(config.border_check_questions, plan.len());

        let plan = TrainingPlan::generate(&def, vec![], &config, &mut rng);
        assert!(plan.is_empty());
    }
}
