//! poker-hud: hand-history ingestion and scoring
//!
//! Goals:
//! - Follow append-only hand-history files without re-reading or losing bytes
//! - Total extraction: malformed text leaves fields unset, never fails
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: score a hand
//! ```
//! use poker_hud::extract::Extractor;
//! use poker_hud::split::split_hands;
//! use poker_hud::stats::Aggregator;
//! use poker_hud::strength::{classify, HandCategory};
//!
//! let log = "Table: 'Aalen'\nSeat 1: Alice (1000)\nSeat 2: Bob (1000)\n\
//!            Dealt to Alice [As Ac]\nAlice raises 20\nBob calls 20\n\
//!            *** FLOP *** [Ad 7d 7s]\nAlice won 40\n\n";
//! let ex = Extractor::new(Some("Alice"));
//! let mut stats = Aggregator::default();
//! for block in split_hands(log) {
//!     let hand = ex.extract(&block);
//!     stats.update(&hand);
//!     let s = classify(&hand.hero_and_board()).unwrap();
//!     assert_eq!(s.category, HandCategory::FullHouse);
//! }
//! assert_eq!(stats.player("Alice").unwrap().winnings(), 40.0);
//! ```
//!
//! ## Watch a directory
//! ```sh
//! cargo run --bin poker-hud -- --dir ~/winamax/history --hero NonoBasket
//! ```

pub mod cards;
pub mod config;
pub mod extract;
pub mod hand;
pub mod profile;
pub mod session;
pub mod split;
pub mod stats;
pub mod strength;
pub mod tail;
pub mod watch;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
