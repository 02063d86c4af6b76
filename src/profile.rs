//! Opponent styles from VPIP/PFR and the texture of a table.

use crate::hand::ParsedHand;
use crate::stats::{Aggregator, PlayerStat};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStyle {
    /// Loose passive.
    Fish,
    /// Loose aggressive.
    Lag,
    /// Very tight.
    Nit,
    Reg,
}

impl PlayerStyle {
    /// First matching rule wins: Fish, then Lag, then Nit.
    pub fn classify(vpip_pct: f64, pfr_pct: f64) -> Self {
        if vpip_pct >= 50.0 && pfr_pct <= 15.0 {
            PlayerStyle::Fish
        } else if vpip_pct >= 40.0 && pfr_pct >= 25.0 {
            PlayerStyle::Lag
        } else if vpip_pct <= 20.0 && pfr_pct <= 10.0 {
            PlayerStyle::Nit
        } else {
            PlayerStyle::Reg
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PlayerStyle::Fish => "FISH",
            PlayerStyle::Lag => "LAG",
            PlayerStyle::Nit => "NIT",
            PlayerStyle::Reg => "REG",
        }
    }
}

impl fmt::Display for PlayerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentProfile {
    pub name: String,
    pub vpip_pct: f64,
    pub pfr_pct: f64,
    pub winnings: f64,
    pub style: PlayerStyle,
}

impl From<&PlayerStat> for OpponentProfile {
    fn from(p: &PlayerStat) -> Self {
        Self {
            name: p.name().to_string(),
            vpip_pct: p.vpip_pct(),
            pfr_pct: p.pfr_pct(),
            winnings: p.winnings(),
            style: PlayerStyle::classify(p.vpip_pct(), p.pfr_pct()),
        }
    }
}

impl fmt::Display for OpponentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<15} | VPIP: {:>5.1} | PFR: {:>5.1} | {:<4} | {:.2}",
            self.name, self.vpip_pct, self.pfr_pct, self.style, self.winnings
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableTexture {
    Loose,
    Tight,
    Aggressive,
    Balanced,
}

impl TableTexture {
    pub fn from_averages(avg_vpip: f64, avg_pfr: f64) -> Self {
        if avg_vpip > 45.0 {
            TableTexture::Loose
        } else if avg_vpip < 20.0 {
            TableTexture::Tight
        } else if avg_pfr > 25.0 {
            TableTexture::Aggressive
        } else {
            TableTexture::Balanced
        }
    }
}

impl fmt::Display for TableTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableTexture::Loose => "loose",
            TableTexture::Tight => "tight",
            TableTexture::Aggressive => "aggressive",
            TableTexture::Balanced => "balanced",
        })
    }
}

/// Known players of one hand and their averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProfile {
    pub table: Option<String>,
    pub players: Vec<OpponentProfile>,
    pub avg_vpip: f64,
    pub avg_pfr: f64,
    pub texture: TableTexture,
}

impl TableProfile {
    /// `None` when no player of `hand` has active statistics yet.
    pub fn build(stats: &Aggregator, hand: &ParsedHand) -> Option<Self> {
        let players: Vec<OpponentProfile> = hand
            .players
            .iter()
            .filter_map(|name| stats.player(name))
            .filter(|p| p.hands_played() > 0)
            .map(OpponentProfile::from)
            .collect();
        if players.is_empty() {
            return None;
        }
        let n = players.len() as f64;
        let avg_vpip = players.iter().map(|p| p.vpip_pct).sum::<f64>() / n;
        let avg_pfr = players.iter().map(|p| p.pfr_pct).sum::<f64>() / n;
        Some(Self {
            table: hand.table.clone(),
            players,
            avg_vpip,
            avg_pfr,
            texture: TableTexture::from_averages(avg_vpip, avg_pfr),
        })
    }
}

impl fmt::Display for TableProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.players {
            writeln!(f, "{p}")?;
        }
        write!(
            f,
            "table {}: VPIP {:.1} / PFR {:.1} ({})",
            self.table.as_deref().unwrap_or("?"),
            self.avg_vpip,
            self.avg_pfr,
            self.texture
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extractor;

    #[test]
    fn style_rules_in_order() {
        assert_eq!(PlayerStyle::classify(60.0, 10.0), PlayerStyle::Fish);
        assert_eq!(PlayerStyle::classify(50.0, 15.0), PlayerStyle::Fish);
        assert_eq!(PlayerStyle::classify(55.0, 30.0), PlayerStyle::Lag);
        assert_eq!(PlayerStyle::classify(15.0, 5.0), PlayerStyle::Nit);
        assert_eq!(PlayerStyle::classify(25.0, 18.0), PlayerStyle::Reg);
        assert_eq!(PlayerStyle::classify(0.0, 0.0), PlayerStyle::Nit);
    }

    #[test]
    fn texture_thresholds() {
        assert_eq!(TableTexture::from_averages(46.0, 0.0), TableTexture::Loose);
        assert_eq!(TableTexture::from_averages(19.0, 40.0), TableTexture::Tight);
        assert_eq!(TableTexture::from_averages(30.0, 26.0), TableTexture::Aggressive);
        assert_eq!(TableTexture::from_averages(45.0, 25.0), TableTexture::Balanced);
    }

    #[test]
    fn profile_covers_known_players_only() {
        let ex = Extractor::default();
        let mut agg = Aggregator::default();
        agg.update(&ex.extract_str("Table: 'T'\nSeat 1: Loose (10)\nLoose calls 2"));
        agg.update(&ex.extract_str("Table: 'T'\nSeat 1: Loose (10)\nLoose raises 4"));

        let hand = ex.extract_str("Table: 'T'\nSeat 1: Loose (10)\nSeat 2: Stranger (10)");
        let profile = TableProfile::build(&agg, &hand).unwrap();
        assert_eq!(profile.players.len(), 1);
        assert_eq!(profile.avg_vpip, 100.0);
        assert_eq!(profile.avg_pfr, 50.0);
        assert_eq!(profile.players[0].style, PlayerStyle::Lag);
        assert_eq!(profile.texture, TableTexture::Loose);

        let empty = ex.extract_str("Seat 1: Stranger (10)");
        assert!(TableProfile::build(&agg, &empty).is_none());
    }
}
