//! Runtime configuration: defaults, then an optional TOML file named by
//! `POKER_HUD_CONFIG`, then `POKER_HUD_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "POKER_HUD_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Whose hole cards and win lines are reported.
    pub hero: Option<String>,
    pub history_dir: PathBuf,
    pub stats_path: PathBuf,
    pub archive_path: PathBuf,
    /// Only files ending with this are watched.
    pub file_suffix: String,
    /// Files whose name contains this are skipped.
    pub exclude_pattern: String,
    pub poll_ms: u64,
    pub inactivity_minutes: u64,
    pub archive_cap: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hero: None,
            history_dir: PathBuf::from("history"),
            stats_path: PathBuf::from("data/playerStats.json"),
            archive_path: PathBuf::from("data/archivedPlayers.json"),
            file_suffix: ".txt".into(),
            exclude_pattern: "_summary".into(),
            poll_ms: 1000,
            inactivity_minutes: 45,
            archive_cap: crate::stats::DEFAULT_ARCHIVE_CAP,
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_ms)
    }

    pub fn inactivity_threshold(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.inactivity_minutes as i64)
    }
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Resolve from the process environment.
pub fn load() -> Result<Config, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Resolve with `lookup` standing in for the environment.
pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut cfg = Config::default();

    if let Some(path) = var(CONFIG_ENV) {
        apply_file(&mut cfg, Path::new(&path))?;
    }

    if let Some(hero) = var("POKER_HUD_HERO") {
        cfg.hero = Some(hero);
    }
    if let Some(dir) = var("POKER_HUD_HISTORY_DIR") {
        cfg.history_dir = PathBuf::from(dir);
    }
    if let Some(ms) = var("POKER_HUD_POLL_MS") {
        cfg.poll_ms = parse_num(&ms, "POKER_HUD_POLL_MS")?;
    }
    if let Some(min) = var("POKER_HUD_INACTIVITY_MINUTES") {
        cfg.inactivity_minutes = parse_num(&min, "POKER_HUD_INACTIVITY_MINUTES")?;
    }
    if let Some(cap) = var("POKER_HUD_ARCHIVE_CAP") {
        cfg.archive_cap = parse_num(&cap, "POKER_HUD_ARCHIVE_CAP")?;
    }

    validate(&cfg)?;
    Ok(cfg)
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    hero: Option<String>,
    #[serde(default)]
    history_dir: Option<PathBuf>,
    #[serde(default)]
    stats_path: Option<PathBuf>,
    #[serde(default)]
    archive_path: Option<PathBuf>,
    #[serde(default)]
    file_suffix: Option<String>,
    #[serde(default)]
    exclude_pattern: Option<String>,
    #[serde(default)]
    poll_ms: Option<u64>,
    #[serde(default)]
    inactivity_minutes: Option<u64>,
    #[serde(default)]
    archive_cap: Option<usize>,
}

fn apply_file(cfg: &mut Config, path: &Path) -> Result<(), ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let f: FileConfig = toml::from_str(&raw)?;
    if f.hero.is_some() {
        cfg.hero = f.hero;
    }
    if let Some(v) = f.history_dir {
        cfg.history_dir = v;
    }
    if let Some(v) = f.stats_path {
        cfg.stats_path = v;
    }
    if let Some(v) = f.archive_path {
        cfg.archive_path = v;
    }
    if let Some(v) = f.file_suffix {
        cfg.file_suffix = v;
    }
    if let Some(v) = f.exclude_pattern {
        cfg.exclude_pattern = v;
    }
    if let Some(v) = f.poll_ms {
        cfg.poll_ms = v;
    }
    if let Some(v) = f.inactivity_minutes {
        cfg.inactivity_minutes = v;
    }
    if let Some(v) = f.archive_cap {
        cfg.archive_cap = v;
    }
    Ok(())
}

fn parse_num<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid(format!("{key}: not a number: {raw:?}")))
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.poll_ms == 0 {
        return Err(ConfigError::Invalid("poll_ms must be >0".into()));
    }
    if cfg.inactivity_minutes == 0 {
        return Err(ConfigError::Invalid("inactivity_minutes must be >0".into()));
    }
    if cfg.archive_cap == 0 {
        return Err(ConfigError::Invalid("archive_cap must be >0".into()));
    }
    if cfg.file_suffix.is_empty() {
        return Err(ConfigError::Invalid("file_suffix must not be empty".into()));
    }
    if cfg.stats_path == cfg.archive_path {
        return Err(ConfigError::Invalid("stats_path and archive_path must differ".into()));
    }
    Ok(())
}
