//! Hand boundary detection.
//!
//! Hand histories separate hands with at least one blank line. A line holding
//! only spaces or tabs counts as blank.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("boundary pattern"));

/// Trimmed raw text of exactly one hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HandBlock(String);

impl HandBlock {
    /// Trim and wrap `text`; `None` when nothing but whitespace remains.
    pub fn new(text: &str) -> Option<Self> {
        let t = text.trim();
        if t.is_empty() {
            None
        } else {
            Some(Self(t.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HandBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HandBlock {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split `text` into hands, treating the end of input as a boundary.
///
/// ```
/// use poker_hud::split::split_hands;
///
/// let hands = split_hands("Hand #1\nSeat 1: A (10)\n\n\nHand #2\n");
/// assert_eq!(hands.len(), 2);
/// assert_eq!(hands[1].as_str(), "Hand #2");
/// ```
pub fn split_hands(text: &str) -> Vec<HandBlock> {
    BOUNDARY.split(text).filter_map(HandBlock::new).collect()
}

/// Split off the hands that are followed by a boundary.
///
/// Returns those blocks plus the unterminated remainder, which may be a hand
/// still being written.
pub fn split_complete(text: &str) -> (Vec<HandBlock>, &str) {
    match BOUNDARY.find_iter(text).last() {
        Some(last) => (split_hands(&text[..last.start()]), &text[last.end()..]),
        None => (Vec::new(), text),
    }
}

/// Streaming splitter that holds back the last hand until a boundary follows.
#[derive(Debug, Default, Clone)]
pub struct HandSplitter {
    carry: String,
}

impl HandSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `delta` and return every hand completed by it.
    pub fn push(&mut self, delta: &str) -> Vec<HandBlock> {
        self.carry.push_str(delta);
        let (blocks, rest) = split_complete(&self.carry);
        let consumed = self.carry.len() - rest.len();
        self.carry.drain(..consumed);
        blocks
    }

    /// Text held back so far, untrimmed.
    pub fn pending(&self) -> &str {
        &self.carry
    }

    pub fn has_pending(&self) -> bool {
        !self.carry.trim().is_empty()
    }

    /// Release the held-back text as a final hand.
    pub fn finish(&mut self) -> Option<HandBlock> {
        let carry = std::mem::take(&mut self.carry);
        HandBlock::new(&carry)
    }

    pub fn clear(&mut self) {
        self.carry.clear();
    }
}
