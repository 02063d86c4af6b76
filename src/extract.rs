//! Field extraction from one hand block.
//!
//! Extraction is total: a marker that is missing or does not parse leaves the
//! matching field unset. For single-valued fields the first match wins.

use crate::cards::{parse_cards, Card};
use crate::hand::{ActionLine, ActionVerb, HoleCards, ParsedHand};
use crate::split::HandBlock;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).expect(stringify!($name)));
    };
}

pattern!(HAND_ID, r"(?i)\bhand(?:\s*id:?)?\s*#(?P<id>[\w-]+)");
pattern!(TABLE, r"(?i)\btable:?\s*'(?P<name>[^'\n]+)'");
pattern!(SEAT, r"(?im)^seat\s+\d+:\s*(?P<name>[^(\n]+?)\s*\(\s*[$€£]?\d");
pattern!(POT, r"(?i)\bpot\b[ \t]*:?[ \t]*[$€£]?(?P<amount>\d[\d.,]*)");
pattern!(CALL, r"(?i)\bcalls?\b[ \t]*:?[ \t]*[$€£]?(?P<amount>\d[\d.,]*)");
pattern!(
    DEALT,
    concat!(
        r"(?im)^dealt\s+to\s+(?P<name>.+?)\s+\[\s*",
        r"(?P<c1>(?:10|[2-9TJQKA])[hdcs])[\s,]+(?P<c2>(?:10|[2-9TJQKA])[hdcs])\s*\]"
    )
);
pattern!(BOARD_LINE, r"(?im)^(?:\*\*\*\s*(?:flop|turn|river)\s*\*\*\*|board:?)(?P<rest>.*)$");
pattern!(BRACKETS, r"\[(?P<cards>[^\]]*)\]");
pattern!(
    ACTION,
    r"(?im)^(?P<name>[^:\n]+?):?\s+(?P<verb>bets|raises|calls|checks|folds|shows)\b"
);
pattern!(
    PAYOUT,
    concat!(
        r"(?im)^(?P<name>[^:\n]+?):?\s+(?:won|wins|collected|remporte)\s+",
        r"\(?[$€£]?(?P<amount>\d[\d.,]*)"
    )
);
pattern!(WIN_VERB, r"(?i)\b(?:won|wins|collected|remporte)\b");

/// Pulls [`ParsedHand`] fields out of raw hand text.
///
/// ```
/// use poker_hud::extract::Extractor;
///
/// let ex = Extractor::new(Some("Hero"));
/// let hand = ex.extract_str(
///     "Table: 'Aalen 03' 6-max\nSeat 1: Hero (1000)\nDealt to Hero [Ah Kd]\nHero raises 20 to 40",
/// );
/// assert_eq!(hand.table.as_deref(), Some("Aalen 03"));
/// assert_eq!(hand.hero_cards.unwrap().to_string(), "Ah Kd");
/// assert!(hand.raised("Hero"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    hero: Option<String>,
    /// The hero's name as a whole word, case-insensitive.
    hero_word: Option<Regex>,
}

impl Extractor {
    /// `hero` selects whose hole cards and win line are kept; `None` takes the
    /// first dealt line and keeps no win line.
    pub fn new(hero: Option<&str>) -> Self {
        let hero = hero.map(str::trim).filter(|h| !h.is_empty()).map(str::to_string);
        let hero_word = hero
            .as_deref()
            .and_then(|h| Regex::new(&format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(h))).ok());
        Self { hero, hero_word }
    }

    pub fn hero(&self) -> Option<&str> {
        self.hero.as_deref()
    }

    pub fn extract(&self, block: &HandBlock) -> ParsedHand {
        self.extract_str(block.as_str())
    }

    pub fn extract_str(&self, text: &str) -> ParsedHand {
        let mut hand = ParsedHand {
            hand_id: capture(&HAND_ID, text, "id"),
            table: capture(&TABLE, text, "name").map(|t| t.trim().to_string()),
            pot: capture(&POT, text, "amount").and_then(|a| parse_amount(&a)),
            to_call: capture(&CALL, text, "amount").and_then(|a| parse_amount(&a)),
            hero_cards: self.hero_cards(text),
            board: board(text),
            ..ParsedHand::default()
        };

        for caps in SEAT.captures_iter(text) {
            hand.add_player(caps["name"].trim());
        }

        for caps in ACTION.captures_iter(text) {
            let name = caps["name"].trim();
            let Some(verb) = ActionVerb::from_history(&caps["verb"]) else { continue };
            if name.is_empty() {
                continue;
            }
            hand.add_player(name);
            hand.actions.push(ActionLine { player: name.to_string(), verb });
        }

        for caps in PAYOUT.captures_iter(text) {
            if let Some(amount) = parse_amount(&caps["amount"]) {
                hand.payouts.push((caps["name"].trim().to_string(), amount));
            }
        }

        hand.winner_line = self.winner_line(text);
        hand
    }

    fn hero_cards(&self, text: &str) -> Option<HoleCards> {
        DEALT
            .captures_iter(text)
            .filter(|caps| match &self.hero {
                Some(hero) => caps["name"].trim().eq_ignore_ascii_case(hero),
                None => true,
            })
            .find_map(|caps| {
                let cards = parse_cards(&format!("{} {}", &caps["c1"], &caps["c2"])).ok()?;
                HoleCards::from_slice(&cards).ok()
            })
    }

    fn winner_line(&self, text: &str) -> Option<String> {
        let hero = self.hero_word.as_ref()?;
        text.lines()
            .find(|line| hero.is_match(line) && WIN_VERB.is_match(line))
            .map(|line| line.trim().to_string())
    }
}

fn capture(re: &Regex, text: &str, group: &str) -> Option<String> {
    re.captures(text).and_then(|c| c.name(group)).map(|m| m.as_str().to_string())
}

/// Longest valid set of bracketed cards on a street or `Board:` line.
fn board(text: &str) -> Vec<Card> {
    let mut best: Vec<Card> = Vec::new();
    for line in BOARD_LINE.captures_iter(text) {
        let mut cards = Vec::new();
        for group in BRACKETS.captures_iter(&line["rest"]) {
            match parse_cards(&group["cards"]) {
                Ok(cs) => cards.extend(cs),
                Err(_) => {
                    cards.clear();
                    break;
                }
            }
        }
        let unique: HashSet<Card> = cards.iter().copied().collect();
        if cards.len() <= 5 && unique.len() == cards.len() && cards.len() > best.len() {
            best = cards;
        }
    }
    best
}

/// Normalize thousands and decimal separators and parse.
///
/// With both `,` and `.` present the last one is the decimal point. A
/// separator that repeats is a thousands separator, as is a lone `,`
/// followed by exactly three digits.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let is_sep = |c: char| c == '.' || c == ',';
    let token: String = raw.chars().filter(|c| c.is_ascii_digit() || is_sep(*c)).collect();
    let token = token.trim_end_matches(is_sep);
    let Some(idx) = token.rfind(is_sep) else {
        return token.parse().ok();
    };
    let sep = if token[idx..].starts_with('.') { '.' } else { ',' };
    let other = if sep == '.' { ',' } else { '.' };
    let int: String = token[..idx].chars().filter(char::is_ascii_digit).collect();
    let frac = &token[idx + 1..];
    let is_decimal = if token.contains(other) {
        true
    } else if token.matches(sep).count() > 1 {
        false
    } else {
        !(sep == ',' && frac.len() == 3)
    };
    let normalized = if is_decimal { format!("{int}.{frac}") } else { format!("{int}{frac}") };
    normalized.parse().ok()
}
