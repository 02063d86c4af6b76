use crate::cards::Card;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum HandCategory {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandCategory {
    pub const ALL: [HandCategory; 10] = [
        HandCategory::HighCard,
        HandCategory::Pair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
        HandCategory::RoyalFlush,
    ];

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            HandCategory::HighCard => "high card",
            HandCategory::Pair => "pair",
            HandCategory::TwoPair => "two pair",
            HandCategory::ThreeOfAKind => "three of a kind",
            HandCategory::Straight => "straight",
            HandCategory::Flush => "flush",
            HandCategory::FullHouse => "full house",
            HandCategory::FourOfAKind => "four of a kind",
            HandCategory::StraightFlush => "straight flush",
            HandCategory::RoyalFlush => "royal flush",
        }
    }

    /// Fixed score per category; strictly increasing with the ordinal.
    pub const fn score(self) -> f64 {
        match self {
            HandCategory::HighCard => 0.0,
            HandCategory::Pair => 0.45,
            HandCategory::TwoPair => 0.6,
            HandCategory::ThreeOfAKind => 0.7,
            HandCategory::Straight => 0.8,
            HandCategory::Flush => 0.85,
            HandCategory::FullHouse => 0.9,
            HandCategory::FourOfAKind => 0.95,
            HandCategory::StraightFlush => 0.98,
            HandCategory::RoyalFlush => 1.0,
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryParseError {
    #[error("unknown hand category: '{0}'")]
    Unknown(String),
}

impl FromStr for HandCategory {
    type Err = CategoryParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        HandCategory::ALL
            .into_iter()
            .find(|c| c.label() == wanted)
            .ok_or_else(|| CategoryParseError::Unknown(s.to_string()))
    }
}

/// Category plus its fixed score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: HandCategory,
    pub score: f64,
}

impl HandStrength {
    pub const fn of(category: HandCategory) -> Self {
        Self { category, score: category.score() }
    }

    pub const fn label(&self) -> &'static str {
        self.category.label()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StrengthError {
    #[error("expected 5 to 7 cards, got {0}")]
    CardCount(usize),
    #[error("duplicate card: {0}")]
    DuplicateCard(Card),
}

/// Classify 5–7 cards as one evaluation unit.
///
/// Flush and straight are judged over every card provided, so a 7-card
/// input is not searched for its best 5-card subset. A straight is any set
/// of distinct ranks forming one consecutive run, however many there are,
/// so `As Ad Kc Qh Jd` is a straight. Aces only play high.
///
/// ```
/// use poker_hud::cards::parse_cards;
/// use poker_hud::strength::{classify, HandCategory};
///
/// let cards = parse_cards("As Ac Ad 7d 7s").unwrap();
/// let s = classify(&cards).unwrap();
/// assert_eq!(s.category, HandCategory::FullHouse);
/// assert!(s.score >= 0.9);
/// ```
pub fn classify(cards: &[Card]) -> Result<HandStrength, StrengthError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(StrengthError::CardCount(cards.len()));
    }
    let mut seen = HashSet::with_capacity(cards.len());
    if let Some(dup) = cards.iter().find(|c| !seen.insert(**c)) {
        return Err(StrengthError::DuplicateCard(*dup));
    }
    Ok(HandStrength::of(categorize(cards)))
}

fn categorize(cards: &[Card]) -> HandCategory {
    let mut counts = [0u8; 15]; // 2..14 used
    for c in cards {
        counts[c.rank().value() as usize] += 1;
    }
    let mut groups: Vec<u8> = counts.iter().copied().filter(|&n| n > 0).collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());

    // distinct ranks ascending, from the count table
    let distinct: Vec<u8> = (2u8..=14).filter(|&v| counts[v as usize] > 0).collect();
    let is_straight = distinct.windows(2).all(|w| w[1] == w[0] + 1);
    let top = distinct.last().copied().unwrap_or(0);

    let first = groups.first().copied().unwrap_or(0);
    let second = groups.get(1).copied().unwrap_or(0);

    if is_straight && is_flush && top == 14 {
        HandCategory::RoyalFlush
    } else if is_straight && is_flush {
        HandCategory::StraightFlush
    } else if first == 4 {
        HandCategory::FourOfAKind
    } else if first == 3 && second == 2 {
        HandCategory::FullHouse
    } else if is_flush {
        HandCategory::Flush
    } else if is_straight {
        HandCategory::Straight
    } else if first == 3 {
        HandCategory::ThreeOfAKind
    } else if first == 2 && second == 2 {
        HandCategory::TwoPair
    } else if first == 2 {
        HandCategory::Pair
    } else {
        HandCategory::HighCard
    }
}

/// Share of the final pot a call has to win to break even:
/// `to_call / (pot + to_call)`.
///
/// ```
/// use poker_hud::strength::pot_odds;
///
/// assert_eq!(pot_odds(50.0, 150.0), Some(0.25));
/// assert_eq!(pot_odds(0.0, 150.0), None);
/// ```
pub fn pot_odds(to_call: f64, pot: f64) -> Option<f64> {
    if to_call.is_nan() || pot.is_nan() || to_call <= 0.0 || pot < 0.0 {
        return None;
    }
    Some(to_call / (pot + to_call))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn category(s: &str) -> HandCategory {
        classify(&parse_cards(s).expect("valid cards")).expect("classifiable").category
    }

    #[test]
    fn rejects_wrong_card_counts() {
        let four = parse_cards("As Kd 7c 2h").unwrap();
        assert_eq!(classify(&four), Err(StrengthError::CardCount(4)));
        let eight = parse_cards("As Kd 7c 2h 3h 4h 5h 6h").unwrap();
        assert_eq!(classify(&eight), Err(StrengthError::CardCount(8)));
        assert_eq!(classify(&[]), Err(StrengthError::CardCount(0)));
    }

    #[test]
    fn rejects_duplicates() {
        let cards = parse_cards("As As 7c 2h 3h").unwrap();
        assert!(matches!(classify(&cards), Err(StrengthError::DuplicateCard(_))));
    }

    #[test]
    fn wheel_is_not_a_straight() {
        assert_eq!(category("Ac 2d 3h 4s 5c"), HandCategory::HighCard);
    }

    #[test]
    fn consecutive_distinct_ranks_are_a_straight() {
        // A K Q J run with a paired ace
        assert_eq!(category("As Ad Kc Qh Jd"), HandCategory::Straight);
        assert_eq!(category("As Ad Kc Kh Qd"), HandCategory::Straight);
    }

    #[test]
    fn full_house_needs_a_second_group_of_exactly_two() {
        assert_eq!(category("Kc Kd Kh 7s 7c 7d 2h"), HandCategory::ThreeOfAKind);
        assert_eq!(category("Kc Kd Kh 7s 7c 2d 3h"), HandCategory::FullHouse);
    }

    #[test]
    fn seven_cards_are_one_unit() {
        // five spades among seven cards is not a flush for this classifier
        assert_eq!(category("As Ks Qs Js 9s 2d 3c"), HandCategory::HighCard);
        assert_eq!(category("Ac Ad Ah 7d 7s 2c 3h"), HandCategory::FullHouse);
        assert_eq!(category("4s 5d 6h 7c 8s 9d Th"), HandCategory::Straight);
    }

    #[test]
    fn category_labels_parse_back() {
        for c in HandCategory::ALL {
            assert_eq!(c.label().parse::<HandCategory>().unwrap(), c);
        }
        assert!("five aces".parse::<HandCategory>().is_err());
    }

    #[test]
    fn pot_odds_rejects_bad_amounts() {
        assert_eq!(pot_odds(-1.0, 10.0), None);
        assert_eq!(pot_odds(10.0, -1.0), None);
        assert_eq!(pot_odds(f64::NAN, 10.0), None);
        assert_eq!(pot_odds(10.0, 0.0), Some(1.0));
    }
}
