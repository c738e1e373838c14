use std::fmt;

/// Card value, ordered from lowest (`Two`) to highest (`Ace`).
///
/// Suits never matter for a preflop matrix, so this is the only card
/// primitive the crate needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

const VALUES: [Value; 13] = [
    Value::Two,
    Value::Three,
    Value::Four,
    Value::Five,
    Value::Six,
    Value::Seven,
    Value::Eight,
    Value::Nine,
    Value::Ten,
    Value::Jack,
    Value::Queen,
    Value::King,
    Value::Ace,
];

impl Value {
    /// All values in ascending order.
    ///
    /// ```
    /// use range_trainer::core::Value;
    ///
    /// assert_eq!(Value::values()[0], Value::Two);
    /// assert_eq!(Value::values()[12], Value::Ace);
    /// ```
    pub const fn values() -> [Value; 13] {
        VALUES
    }

    /// Values ordered by strength, strongest first. This is the order of the
    /// rows and columns of the hand matrix.
    pub fn by_strength() -> impl Iterator<Item = Value> + Clone {
        VALUES.into_iter().rev()
    }

    /// Index into the hand matrix (0 = Ace, 12 = Two).
    pub fn matrix_index(self) -> usize {
        12 - self as usize
    }

    /// Inverse of [`Value::matrix_index`].
    pub fn from_matrix_index(idx: usize) -> Option<Value> {
        if idx < 13 {
            Some(VALUES[12 - idx])
        } else {
            None
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Value::Two => '2',
            Value::Three => '3',
            Value::Four => '4',
            Value::Five => '5',
            Value::Six => '6',
            Value::Seven => '7',
            Value::Eight => '8',
            Value::Nine => '9',
            Value::Ten => 'T',
            Value::Jack => 'J',
            Value::Queen => 'Q',
            Value::King => 'K',
            Value::Ace => 'A',
        }
    }

    /// Parse a value character. Case-insensitive.
    pub fn from_char(c: char) -> Option<Value> {
        match c.to_ascii_uppercase() {
            '2' => Some(Value::Two),
            '3' => Some(Value::Three),
            '4' => Some(Value::Four),
            '5' => Some(Value::Five),
            '6' => Some(Value::Six),
            '7' => Some(Value::Seven),
            '8' => Some(Value::Eight),
            '9' => Some(Value::Nine),
            'T' => Some(Value::Ten),
            'J' => Some(Value::Jack),
            'Q' => Some(Value::Queen),
            'K' => Some(Value::King),
            'A' => Some(Value::Ace),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
