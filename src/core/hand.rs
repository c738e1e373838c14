use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{MatrixError, Value};

/// One of the 169 canonical two-card starting hand categories.
///
/// - 13 pocket pairs (e.g., AA, KK, 22)
/// - 78 suited hands (e.g., AKs, T9s)
/// - 78 offsuit hands (e.g., AKo, 72o)
///
/// Hands order by their position in the matrix (row-major), so ordered
/// collections of hands iterate the way the grid reads.
///
/// # Examples
///
/// ```
/// use range_trainer::core::{Hand, Value};
///
/// let aks = Hand::new(Value::Ace, Value::King, true);
/// assert_eq!(aks.to_notation(), "AKs");
///
/// let ako = Hand::from_notation("AKo").unwrap();
/// assert!(!ako.suited());
/// assert_eq!(ako.position(), (1, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hand {
    /// Higher or equal value card
    high: Value,
    /// Lower or equal value card
    low: Value,
    /// true = suited, false = offsuit (pairs always false)
    suited: bool,
}

impl Hand {
    /// Create a hand from two values and suitedness.
    ///
    /// Values are automatically ordered so that `high >= low`.
    /// Pairs always have `suited = false` regardless of the input.
    ///
    /// ```
    /// use range_trainer::core::{Hand, Value};
    ///
    /// let hand1 = Hand::new(Value::King, Value::Ace, true);
    /// let hand2 = Hand::new(Value::Ace, Value::King, true);
    /// assert_eq!(hand1, hand2);
    ///
    /// let pair = Hand::new(Value::Ace, Value::Ace, true);
    /// assert!(!pair.suited());
    /// ```
    pub fn new(v1: Value, v2: Value, suited: bool) -> Self {
        let (high, low) = if v1 >= v2 { (v1, v2) } else { (v2, v1) };
        // Pairs can't be suited
        let suited = if high == low { false } else { suited };
        Self { high, low, suited }
    }

    /// The hand shown at `(row, col)` of the matrix.
    ///
    /// Row and column both index values by strength (0 = Ace). The diagonal
    /// holds pairs, cells above it suited hands and cells below it offsuit
    /// hands, always named higher value first.
    ///
    /// ```
    /// use range_trainer::core::Hand;
    ///
    /// assert_eq!(Hand::at(0, 0).unwrap().to_notation(), "AA");
    /// assert_eq!(Hand::at(0, 1).unwrap().to_notation(), "AKs");
    /// assert_eq!(Hand::at(1, 0).unwrap().to_notation(), "AKo");
    /// assert!(Hand::at(13, 0).is_err());
    /// ```
    pub fn at(row: usize, col: usize) -> Result<Self, MatrixError> {
        let (Some(r), Some(c)) = (Value::from_matrix_index(row), Value::from_matrix_index(col))
        else {
            return Err(MatrixError::InvalidGridPosition { row, col });
        };
        Ok(Self::new(r, c, row < col))
    }

    /// Grid coordinates `(row, col)` of this hand.
    pub fn position(&self) -> (usize, usize) {
        let hi = self.high.matrix_index();
        let lo = self.low.matrix_index();
        if self.suited {
            (hi, lo)
        } else {
            // Pairs land on the diagonal, offsuit below it.
            (lo, hi)
        }
    }

    /// Returns true if this is a pocket pair.
    pub fn is_pair(&self) -> bool {
        self.high == self.low
    }

    /// Returns true if this hand is suited. Pairs always return false.
    pub fn suited(&self) -> bool {
        self.suited
    }

    /// Returns true for non-pair hands that are not suited.
    pub fn is_offsuit(&self) -> bool {
        !self.is_pair() && !self.suited
    }

    pub fn high(&self) -> Value {
        self.high
    }

    pub fn low(&self) -> Value {
        self.low
    }

    /// Number of concrete two-card deals this category represents.
    ///
    /// ```
    /// use range_trainer::core::Hand;
    ///
    /// assert_eq!(Hand::from_notation("QQ").unwrap().combinations(), 6);
    /// assert_eq!(Hand::from_notation("QJs").unwrap().combinations(), 4);
    /// assert_eq!(Hand::from_notation("QJo").unwrap().combinations(), 12);
    /// ```
    pub fn combinations(&self) -> u32 {
        if self.is_pair() {
            6
        } else if self.suited {
            4
        } else {
            12
        }
    }

    /// Convert to standard notation string: "AA", "AKs", "AKo".
    pub fn to_notation(&self) -> String {
        let high_char = self.high.to_char();
        let low_char = self.low.to_char();

        if self.is_pair() {
            format!("{}{}", high_char, low_char)
        } else if self.suited {
            format!("{}{}s", high_char, low_char)
        } else {
            format!("{}{}o", high_char, low_char)
        }
    }

    /// Parse from notation string.
    ///
    /// Accepts "AA", "AKs", "AKo" in any letter case and in either value
    /// order ("KAo" is "AKo").
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::InvalidHandNotation` if the notation is invalid.
    pub fn from_notation(s: &str) -> Result<Self, MatrixError> {
        let invalid = || MatrixError::InvalidHandNotation(s.to_string());
        let chars: Vec<char> = s.chars().collect();

        if chars.len() < 2 || chars.len() > 3 {
            return Err(invalid());
        }

        let v1 = Value::from_char(chars[0]).ok_or_else(invalid)?;
        let v2 = Value::from_char(chars[1]).ok_or_else(invalid)?;

        let suited = if chars.len() == 2 {
            // Must be a pair for 2-char notation
            if v1 != v2 {
                return Err(invalid());
            }
            false
        } else {
            match chars[2].to_ascii_lowercase() {
                's' if v1 != v2 => true,
                'o' if v1 != v2 => false,
                _ => return Err(invalid()),
            }
        };

        Ok(Self::new(v1, v2, suited))
    }

    /// All 169 hands in matrix order (row by row).
    ///
    /// ```
    /// use range_trainer::core::Hand;
    ///
    /// let all = Hand::all();
    /// assert_eq!(all.len(), 169);
    /// assert_eq!(all[0].to_notation(), "AA");
    /// assert_eq!(all[168].to_notation(), "22");
    /// ```
    pub fn all() -> Vec<Self> {
        super::grid().flatten().collect()
    }
}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position().cmp(&other.position())
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}

impl FromStr for Hand {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}

impl TryFrom<String> for Hand {
    type Error = MatrixError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_notation(&value)
    }
}

impl From<Hand> for String {
    fn from(hand: Hand) -> Self {
        hand.to_notation()
    }
}
