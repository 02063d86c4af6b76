use crate::cards::{parse_cards, Card};
use crate::strength::pot_odds;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// The hero's two private hole cards.
///
/// ```
/// use poker_hud::hand::HoleCards;
///
/// let hole: HoleCards = "Ah Kd".parse().unwrap();
/// assert_eq!(hole.to_string(), "Ah Kd");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        match slice {
            [a, b] => Self::try_new(*a, *b),
            _ => Err(HandError::HoleCount(slice.len())),
        }
    }

    pub fn first(&self) -> Card {
        self.0
    }

    pub fn second(&self) -> Card {
        self.1
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }

    pub fn is_pocket_pair(&self) -> bool {
        self.0.rank() == self.1.rank()
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}

/// Action verbs tracked per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionVerb {
    Bet,
    Raise,
    Call,
    Check,
    Fold,
    Show,
}

impl ActionVerb {
    /// Map the third-person form used in hand histories (`raises`).
    pub fn from_history(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "bets" => Some(ActionVerb::Bet),
            "raises" => Some(ActionVerb::Raise),
            "calls" => Some(ActionVerb::Call),
            "checks" => Some(ActionVerb::Check),
            "folds" => Some(ActionVerb::Fold),
            "shows" => Some(ActionVerb::Show),
            _ => None,
        }
    }

    /// Money put in voluntarily.
    pub const fn is_voluntary(self) -> bool {
        matches!(self, ActionVerb::Bet | ActionVerb::Raise | ActionVerb::Call)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLine {
    pub player: String,
    pub verb: ActionVerb,
}

/// Structured fields pulled out of one hand. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedHand {
    pub hand_id: Option<String>,
    pub table: Option<String>,
    /// Seat order first, then names seen only in action lines. Unique.
    pub players: Vec<String>,
    pub pot: Option<f64>,
    pub to_call: Option<f64>,
    pub hero_cards: Option<HoleCards>,
    pub board: Vec<Card>,
    pub actions: Vec<ActionLine>,
    /// Amounts won per player, in encounter order.
    pub payouts: Vec<(String, f64)>,
    pub winner_line: Option<String>,
}

impl ParsedHand {
    /// Add `name` unless already present.
    pub fn add_player(&mut self, name: &str) {
        if !name.is_empty() && !self.has_player(name) {
            self.players.push(name.to_string());
        }
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    pub fn actions_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = ActionVerb> + 'a {
        self.actions.iter().filter(move |a| a.player == name).map(|a| a.verb)
    }

    pub fn voluntarily_played(&self, name: &str) -> bool {
        self.actions_of(name).any(ActionVerb::is_voluntary)
    }

    pub fn raised(&self, name: &str) -> bool {
        self.actions_of(name).any(|v| v == ActionVerb::Raise)
    }

    pub fn winnings_of(&self, name: &str) -> f64 {
        self.payouts.iter().filter(|(p, _)| p == name).map(|(_, amount)| amount).sum()
    }

    /// Hero hole cards followed by the board.
    pub fn hero_and_board(&self) -> Vec<Card> {
        let mut cards: Vec<Card> =
            self.hero_cards.map(|h| h.as_array().to_vec()).unwrap_or_default();
        cards.extend(self.board.iter().copied());
        cards
    }

    /// Required equity to call, from the pot and call amounts.
    pub fn pot_odds(&self) -> Option<f64> {
        pot_odds(self.to_call?, self.pot?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn hole_cards_must_be_distinct() {
        let a = Card::new(Rank::Ace, Suit::Spades);
        assert!(matches!(HoleCards::try_new(a, a), Err(HandError::DuplicateHoleCards)));
        assert!(matches!("As".parse::<HoleCards>(), Err(HandError::HoleCount(1))));
        assert!(matches!("As Zz".parse::<HoleCards>(), Err(HandError::CardParse(_))));
    }

    #[test]
    fn pocket_pair() {
        let h: HoleCards = "7s 7d".parse().unwrap();
        assert!(h.is_pocket_pair());
    }

    #[test]
    fn per_player_queries() {
        let mut hand = ParsedHand::default();
        hand.add_player("Alice");
        hand.add_player("Bob");
        hand.add_player("Alice");
        assert_eq!(hand.players, ["Alice", "Bob"]);

        hand.actions.push(ActionLine { player: "Alice".into(), verb: ActionVerb::Raise });
        hand.actions.push(ActionLine { player: "Bob".into(), verb: ActionVerb::Check });
        hand.payouts.push(("Alice".into(), 12.5));
        hand.payouts.push(("Alice".into(), 7.5));

        assert!(hand.voluntarily_played("Alice"));
        assert!(hand.raised("Alice"));
        assert!(!hand.voluntarily_played("Bob"));
        assert_eq!(hand.winnings_of("Alice"), 20.0);
        assert_eq!(hand.winnings_of("Bob"), 0.0);
    }

    #[test]
    fn pot_odds_needs_both_amounts() {
        let mut hand = ParsedHand { pot: Some(150.0), ..Default::default() };
        assert_eq!(hand.pot_odds(), None);
        hand.to_call = Some(50.0);
        assert_eq!(hand.pot_odds(), Some(0.25));
    }
}
