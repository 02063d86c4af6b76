//! Per-player counters, their archive, and the flat JSON stores behind them.
//!
//! Rates (VPIP%, PFR%) are derived on read from counts, so merging two
//! records by summing counts yields the hands-weighted average of their rates.

use crate::hand::ParsedHand;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_ARCHIVE_CAP: usize = 1000;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: malformed store: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Running counters for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    name: String,
    hands_played: u64,
    vpip: u64,
    pfr: u64,
    winnings: f64,
    last_seen: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_table: Option<String>,
}

impl PlayerStat {
    fn new(name: &str, now: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            hands_played: 0,
            vpip: 0,
            pfr: 0,
            winnings: 0.0,
            last_seen: now,
            last_table: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    /// Hands with a voluntary bet, raise or call.
    pub fn vpip(&self) -> u64 {
        self.vpip
    }

    /// Hands with a raise.
    pub fn pfr(&self) -> u64 {
        self.pfr
    }

    pub fn winnings(&self) -> f64 {
        self.winnings
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    pub fn last_table(&self) -> Option<&str> {
        self.last_table.as_deref()
    }

    pub fn vpip_pct(&self) -> f64 {
        percent(self.vpip, self.hands_played)
    }

    pub fn pfr_pct(&self) -> f64 {
        percent(self.pfr, self.hands_played)
    }

    fn record(&mut self, hand: &ParsedHand, now: DateTime<Utc>) {
        self.hands_played += 1;
        self.last_seen = now;
        if let Some(table) = &hand.table {
            self.last_table = Some(table.clone());
        }
        if hand.voluntarily_played(&self.name) {
            self.vpip += 1;
        }
        if hand.raised(&self.name) {
            self.pfr += 1;
        }
        self.winnings += hand.winnings_of(&self.name);
    }

    /// Combine two records of the same player.
    ///
    /// Counts and winnings add up, `last_seen` is the later of the two and
    /// `last_table` comes from the more recent side. Commutative and
    /// associative.
    pub fn merge(&self, other: &PlayerStat) -> PlayerStat {
        let recent = match self.last_seen.cmp(&other.last_seen) {
            Ordering::Greater => self,
            Ordering::Less => other,
            Ordering::Equal if self.last_table >= other.last_table => self,
            Ordering::Equal => other,
        };
        let older = if std::ptr::eq(recent, self) { other } else { self };
        PlayerStat {
            name: self.name.clone(),
            hands_played: self.hands_played + other.hands_played,
            vpip: self.vpip + other.vpip,
            pfr: self.pfr + other.pfr,
            winnings: self.winnings + other.winnings,
            last_seen: recent.last_seen,
            last_table: recent.last_table.clone().or_else(|| older.last_table.clone()),
        }
    }
}

fn percent(count: u64, hands: u64) -> f64 {
    if hands == 0 {
        0.0
    } else {
        count as f64 / hands as f64 * 100.0
    }
}

/// One row of [`Aggregator::summarize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub name: String,
    pub hands_played: u64,
    pub vpip_pct: f64,
    pub pfr_pct: f64,
    pub winnings: f64,
}

impl From<&PlayerStat> for PlayerSummary {
    fn from(p: &PlayerStat) -> Self {
        Self {
            name: p.name.clone(),
            hands_played: p.hands_played,
            vpip_pct: p.vpip_pct(),
            pfr_pct: p.pfr_pct(),
            winnings: p.winnings,
        }
    }
}

impl fmt::Display for PlayerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<15} | hands: {:>4} | VPIP: {:>5.1}% | PFR: {:>5.1}% | winnings: {:.2}",
            self.name, self.hands_played, self.vpip_pct, self.pfr_pct, self.winnings
        )
    }
}

/// Flat keyed record store, persisted as one JSON object keyed by name.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerStore {
    players: BTreeMap<String, PlayerStat>,
}

impl PlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerStat> {
        self.players.get(name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerStat> {
        self.players.values()
    }

    /// Insert `stat`, merging with an existing record of the same name.
    /// Returns whether a merge happened.
    fn absorb(&mut self, stat: PlayerStat) -> bool {
        match self.players.get_mut(&stat.name) {
            Some(existing) => {
                *existing = existing.merge(&stat);
                true
            }
            None => {
                self.players.insert(stat.name.clone(), stat);
                false
            }
        }
    }

    /// Keep the `cap` most recently seen records; returns how many were dropped.
    fn truncate_oldest(&mut self, cap: usize) -> usize {
        if self.players.len() <= cap {
            return 0;
        }
        let mut by_age: Vec<(DateTime<Utc>, String)> =
            self.players.values().map(|p| (p.last_seen, p.name.clone())).collect();
        by_age.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let dropped = by_age.split_off(cap);
        for (_, name) in &dropped {
            self.players.remove(name);
        }
        dropped.len()
    }

    /// Load from `path`; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
        };
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(&raw)
            .map_err(|source| StoreError::Parse { path: path.to_path_buf(), source })
    }

    /// Write to a sibling temp file, then rename over `path`.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| StoreError::Parse { path: path.to_path_buf(), source })?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;
        debug!("saved {} players to {}", self.len(), path.display());
        Ok(())
    }
}

/// Outcome of one [`Aggregator::archive`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    /// Players moved out of the active store.
    pub moved: usize,
    /// Of those, how many were merged into an existing archive record.
    pub merged: usize,
    /// Archive records dropped to respect the cap.
    pub dropped: usize,
    pub active: usize,
    pub archived: usize,
}

impl fmt::Display for ArchiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} archived ({} merged, {} dropped); {} active, {} in archive",
            self.moved, self.merged, self.dropped, self.active, self.archived
        )
    }
}

/// Active and archived player stores. The only writer of [`PlayerStat`].
#[derive(Debug, Clone)]
pub struct Aggregator {
    active: PlayerStore,
    archived: PlayerStore,
    archive_cap: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE_CAP)
    }
}

impl Aggregator {
    pub fn new(archive_cap: usize) -> Self {
        Self::with_stores(PlayerStore::new(), PlayerStore::new(), archive_cap)
    }

    pub fn with_stores(active: PlayerStore, archived: PlayerStore, archive_cap: usize) -> Self {
        Self { active, archived, archive_cap }
    }

    pub fn load(active: &Path, archived: &Path, archive_cap: usize) -> Result<Self, StoreError> {
        let (active, archived) = (PlayerStore::load(active)?, PlayerStore::load(archived)?);
        let agg = Self::with_stores(active, archived, archive_cap);
        info!("loaded {} active and {} archived players", agg.active.len(), agg.archived.len());
        Ok(agg)
    }

    pub fn save(&self, active: &Path, archived: &Path) -> Result<(), StoreError> {
        self.active.save(active)?;
        self.archived.save(archived)
    }

    pub fn active(&self) -> &PlayerStore {
        &self.active
    }

    pub fn archive_store(&self) -> &PlayerStore {
        &self.archived
    }

    /// Number of active players.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn player(&self, name: &str) -> Option<&PlayerStat> {
        self.active.get(name)
    }

    pub fn archived(&self, name: &str) -> Option<&PlayerStat> {
        self.archived.get(name)
    }

    pub fn update(&mut self, hand: &ParsedHand) {
        self.update_at(hand, Utc::now());
    }

    /// Count `hand` for every player in it, stamped with `now`.
    ///
    /// No deduplication: the same hand delivered twice is counted twice.
    pub fn update_at(&mut self, hand: &ParsedHand, now: DateTime<Utc>) {
        for name in &hand.players {
            self.active
                .players
                .entry(name.clone())
                .or_insert_with(|| PlayerStat::new(name, now))
                .record(hand, now);
        }
    }

    /// Active players ordered by name.
    pub fn summarize(&self) -> Vec<PlayerSummary> {
        self.active.iter().map(PlayerSummary::from).collect()
    }

    /// Move players idle for at least `threshold` into the archive.
    pub fn archive(&mut self, threshold: Duration, now: DateTime<Utc>) -> ArchiveReport {
        let idle: Vec<String> = self
            .active
            .iter()
            .filter(|p| now.signed_duration_since(p.last_seen) >= threshold)
            .map(|p| p.name.clone())
            .collect();

        let mut report = ArchiveReport { moved: idle.len(), ..ArchiveReport::default() };
        for name in idle {
            if let Some(stat) = self.active.players.remove(&name) {
                if self.archived.absorb(stat) {
                    report.merged += 1;
                }
            }
        }
        report.dropped = self.archived.truncate_oldest(self.archive_cap);
        report.active = self.active.len();
        report.archived = self.archived.len();
        if report.moved > 0 {
            info!("{report}");
        }
        report
    }
}
