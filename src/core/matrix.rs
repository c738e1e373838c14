use super::{Hand, Value};

/// Rows and columns in the hand matrix.
pub const GRID_SIZE: usize = 13;

/// Number of distinct hand categories.
pub const HAND_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Number of distinct two-card deals from a 52 card deck (52 choose 2).
pub const TOTAL_COMBINATIONS: u32 = 1326;

/// One row of the matrix.
pub type GridRow = [Hand; GRID_SIZE];

fn row(idx: usize) -> GridRow {
    let mut values = Value::values();
    values.reverse();
    std::array::from_fn(|col| Hand::new(values[idx], values[col], idx < col))
}

/// The 13x13 arrangement of hands, one row at a time.
///
/// The iterator is lazy and finite; clone it to restart.
///
/// ```
/// use range_trainer::core::grid;
///
/// let rows = grid();
/// let first: Vec<String> = rows.clone().next().unwrap().iter().map(|h| h.to_string()).collect();
/// assert_eq!(first[0], "AA");
/// assert_eq!(first[12], "A2s");
/// assert_eq!(rows.count(), 13);
/// ```
pub fn grid() -> impl Iterator<Item = GridRow> + Clone {
    (0..GRID_SIZE).map(row)
}

/// Combination weight of a hand: 6 for pairs, 4 for suited, 12 for offsuit.
pub fn combinations(hand: &Hand) -> u32 {
    hand.combinations()
}

/// Always [`TOTAL_COMBINATIONS`].
pub fn total_combinations() -> u32 {
    TOTAL_COMBINATIONS
}

/// Distance between two cells counting diagonal steps as one.
pub fn chebyshev_distance(a: &Hand, b: &Hand) -> usize {
    let (ar, ac) = a.position();
    let (br, bc) = b.position();
    ar.abs_diff(br).max(ac.abs_diff(bc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinations_sum() {
        let mut total = 0;
        for hand in Hand::all() {
            let c = combinations(&hand);
            assert!([6, 4, 12].contains(&c), "{} has {} combos", hand, c);
            total += c;
        }
        assert_eq!(total_combinations(), total);
    }

    #[test]
    fn test_grid_shape() {
        for (i, row) in grid().enumerate() {
            for (j, hand) in row.iter().enumerate() {
                match i.cmp(&j) {
                    std::cmp::Ordering::Equal => assert!(hand.is_pair()),
                    std::cmp::Ordering::Less => {
                        assert!(hand.suited());
                        assert!(hand.to_notation().ends_with('s'));
                    }
                    std::cmp::Ordering::Greater => {
                        assert!(hand.is_offsuit());
                        assert!(hand.to_notation().ends_with('o'));
                    }
                }
            }
        }
    }

    #[test]
    fn test_offsuit_names_mirror_suited() {
        // The transposed cell holds the same two values, suited vs offsuit,
        // and both are written higher value first.
        let rows: Vec<GridRow> = grid().collect();
        for i in 0..GRID_SIZE {
            for j in 0..i {
                let off = rows[i][j].to_notation();
                let suited = rows[j][i].to_notation();
                assert_eq!(&off[..2], &suited[..2]);
                assert!(off.ends_with('o'));
                assert!(suited.ends_with('s'));
            }
        }
        assert_eq!("AKo", rows[1][0].to_notation());
        assert_eq!("32o", rows[12][11].to_notation());
    }

    #[test]
    fn test_grid_restartable() {
        let g = grid();
        let first: Vec<GridRow> = g.clone().collect();
        let second: Vec<GridRow> = g.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_chebyshev_distance() {
        let aa = Hand::from_notation("AA").unwrap();
        let kk = Hand::from_notation("KK").unwrap();
        let aqs = Hand::from_notation("AQs").unwrap();
        let deuces = Hand::from_notation("22").unwrap();
        assert_eq!(0, chebyshev_distance(&aa, &aa));
        assert_eq!(1, chebyshev_distance(&aa, &kk));
        assert_eq!(2, chebyshev_distance(&aa, &aqs));
        assert_eq!(12, chebyshev_distance(&aa, &deuces));
    }
}
