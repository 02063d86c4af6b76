//! Tail, split, extract, score and count: one pass per file per poll.

use crate::config::Config;
use crate::extract::Extractor;
use crate::hand::ParsedHand;
use crate::profile::TableProfile;
use crate::split::HandBlock;
use crate::stats::{Aggregator, ArchiveReport, PlayerSummary, StoreError};
use crate::strength::{classify, HandStrength};
use crate::tail::{TailError, Tailer};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// What one completed hand produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandReport {
    pub hand: ParsedHand,
    /// Hero cards plus board, when that makes five to seven cards.
    pub strength: Option<HandStrength>,
    pub pot_odds: Option<f64>,
    /// Known players of this hand, from the statistics after counting it.
    pub table: Option<TableProfile>,
}

impl HandReport {
    pub fn new(hand: ParsedHand) -> Self {
        let cards = hand.hero_and_board();
        let strength = if (5..=7).contains(&cards.len()) { classify(&cards).ok() } else { None };
        let pot_odds = hand.pot_odds();
        Self { hand, strength, pot_odds, table: None }
    }
}

impl fmt::Display for HandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hand {}", self.hand.hand_id.as_deref().unwrap_or("?"))?;
        if let Some(table) = &self.hand.table {
            write!(f, " @ {table}")?;
        }
        write!(f, " | {} players", self.hand.players.len())?;
        if let Some(cards) = &self.hand.hero_cards {
            write!(f, " | hero {cards}")?;
        }
        if !self.hand.board.is_empty() {
            let board: Vec<String> = self.hand.board.iter().map(ToString::to_string).collect();
            write!(f, " | board {}", board.join(" "))?;
        }
        if let Some(s) = &self.strength {
            write!(f, " | {} ({:.2})", s.label(), s.score)?;
        }
        if let Some(pot) = self.hand.pot {
            write!(f, " | pot {pot:.2}")?;
        }
        if let Some(odds) = self.pot_odds {
            write!(f, " | pot odds {:.1}%", odds * 100.0)?;
        }
        if let Some(line) = &self.hand.winner_line {
            write!(f, " | {line}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SessionPaths {
    pub stats: PathBuf,
    pub archive: PathBuf,
}

/// Owns the tailer and the aggregator for one watch run.
#[derive(Debug)]
pub struct Session {
    tailer: Tailer,
    extractor: Extractor,
    aggregator: Aggregator,
    threshold: Duration,
    paths: Option<SessionPaths>,
    hands_seen: u64,
}

impl Session {
    /// In-memory session; nothing is persisted.
    pub fn new(extractor: Extractor, aggregator: Aggregator, threshold: Duration) -> Self {
        Self { tailer: Tailer::new(), extractor, aggregator, threshold, paths: None, hands_seen: 0 }
    }

    /// Load both stores named by `cfg`; they are written back by
    /// [`Session::archive`] and [`Session::shutdown`].
    pub fn from_config(cfg: &Config) -> Result<Self, StoreError> {
        let aggregator = Aggregator::load(&cfg.stats_path, &cfg.archive_path, cfg.archive_cap)?;
        let mut session =
            Self::new(Extractor::new(cfg.hero.as_deref()), aggregator, cfg.inactivity_threshold());
        session.paths = Some(SessionPaths {
            stats: cfg.stats_path.clone(),
            archive: cfg.archive_path.clone(),
        });
        Ok(session)
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn tailer(&self) -> &Tailer {
        &self.tailer
    }

    pub fn hands_seen(&self) -> u64 {
        self.hands_seen
    }

    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.tailer.track(path);
    }

    /// Process every hand completed in `path` since the last poll.
    pub fn poll_file(&mut self, path: &Path) -> Result<Vec<HandReport>, TailError> {
        self.poll_file_at(path, Utc::now())
    }

    pub fn poll_file_at(
        &mut self,
        path: &Path,
        now: DateTime<Utc>,
    ) -> Result<Vec<HandReport>, TailError> {
        let blocks = self.tailer.poll(path)?;
        Ok(blocks.iter().map(|b| self.process(b, now)).collect())
    }

    /// Run one already split hand through extraction, scoring and counting.
    pub fn process(&mut self, block: &HandBlock, now: DateTime<Utc>) -> HandReport {
        let hand = self.extractor.extract(block);
        self.aggregator.update_at(&hand, now);
        self.hands_seen += 1;
        debug!("hand {:?}: {} players", hand.hand_id, hand.players.len());
        let table = TableProfile::build(&self.aggregator, &hand);
        HandReport { table, ..HandReport::new(hand) }
    }

    /// Archive idle players, then persist when backed by files.
    pub fn archive(&mut self, now: DateTime<Utc>) -> Result<ArchiveReport, StoreError> {
        let report = self.aggregator.archive(self.threshold, now);
        if report.moved > 0 {
            self.save()?;
        }
        Ok(report)
    }

    pub fn summarize(&self) -> Vec<PlayerSummary> {
        self.aggregator.summarize()
    }

    pub fn save(&self) -> Result<(), StoreError> {
        match &self.paths {
            Some(p) => self.aggregator.save(&p.stats, &p.archive),
            None => Ok(()),
        }
    }

    /// Release every held-back hand, count it, then persist.
    pub fn shutdown(&mut self) -> Result<Vec<HandReport>, StoreError> {
        let now = Utc::now();
        let watched: Vec<PathBuf> = self.tailer.watched().map(Path::to_path_buf).collect();
        let mut reports = Vec::new();
        for path in watched {
            if let Some(block) = self.tailer.flush(&path) {
                reports.push(self.process(&block, now));
            }
        }
        self.save()?;
        info!(
            "session closed: {} hands, {} active players, {} archived",
            self.hands_seen,
            self.aggregator.len(),
            self.aggregator.archive_store().len()
        );
        Ok(reports)
    }
}
