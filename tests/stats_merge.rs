use chrono::{DateTime, Duration, TimeZone, Utc};
use poker_hud::extract::Extractor;
use poker_hud::hand::ParsedHand;
use poker_hud::stats::{Aggregator, PlayerStat};
use proptest::prelude::*;

const NAMES: [&str; 3] = ["Alice", "Bob", "Carol"];

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 20, 0, 0).unwrap()
}

#[derive(Debug, Clone)]
struct Played {
    who: usize,
    verb: &'static str,
    won: u32,
}

fn played() -> impl Strategy<Value = Played> {
    let verb = prop_oneof![Just("folds"), Just("calls 2"), Just("raises 4"), Just("checks")];
    (0..NAMES.len(), verb, 0u32..50).prop_map(|(who, verb, won)| Played { who, verb, won })
}

fn hand(p: &Played) -> ParsedHand {
    let name = NAMES[p.who];
    let text = format!(
        "Table: 'T{}'\nSeat 1: {name} (100)\n{name} {}\n{name} won {}",
        p.won, p.verb, p.won
    );
    Extractor::default().extract_str(&text)
}

/// Archive after every batch; each batch is played at its own hour.
fn archive_in_batches(batches: &[Vec<Played>]) -> Aggregator {
    let mut agg = Aggregator::new(usize::MAX);
    for (i, batch) in batches.iter().enumerate() {
        let t = start() + Duration::hours(i as i64);
        for p in batch {
            agg.update_at(&hand(p), t);
        }
        agg.archive(Duration::minutes(45), t + Duration::hours(1));
    }
    agg
}

fn close(a: &PlayerStat, b: &PlayerStat) -> bool {
    a.hands_played() == b.hands_played()
        && a.vpip() == b.vpip()
        && a.pfr() == b.pfr()
        && (a.winnings() - b.winnings()).abs() < 1e-9
        && a.last_seen() == b.last_seen()
        && a.last_table() == b.last_table()
}

proptest! {
    #[test]
    fn batching_does_not_change_the_archive(
        hands in prop::collection::vec(played(), 1..30),
        cut in 0usize..30,
    ) {
        let cut = cut.min(hands.len());
        let split = archive_in_batches(&[hands[..cut].to_vec(), hands[cut..].to_vec()]);

        // everything merged by hand in one pass
        let mut once = Aggregator::new(usize::MAX);
        for p in &hands[..cut] {
            once.update_at(&hand(p), start());
        }
        for p in &hands[cut..] {
            once.update_at(&hand(p), start() + Duration::hours(1));
        }
        once.archive(Duration::minutes(45), start() + Duration::hours(2));

        for name in NAMES {
            match (split.archived(name), once.archived(name)) {
                (Some(a), Some(b)) => prop_assert!(close(a, b), "{a:?} vs {b:?}"),
                (None, None) => {}
                (a, b) => prop_assert!(false, "{name}: {a:?} vs {b:?}"),
            }
        }
    }

    #[test]
    fn merge_is_commutative_and_associative(
        a in prop::collection::vec(played(), 1..8),
        b in prop::collection::vec(played(), 1..8),
        c in prop::collection::vec(played(), 1..8),
    ) {
        let stat = |hands: &[Played], hour: i64| {
            let mut agg = Aggregator::new(usize::MAX);
            for p in hands {
                let mut p = p.clone();
                p.who = 0;
                agg.update_at(&hand(&p), start() + Duration::hours(hour));
            }
            agg.player("Alice").cloned().unwrap()
        };
        let (x, y, z) = (stat(&a, 0), stat(&b, 2), stat(&c, 1));
        prop_assert!(close(&x.merge(&y), &y.merge(&x)));
        prop_assert!(close(&x.merge(&y).merge(&z), &x.merge(&y.merge(&z))));
        let merged = x.merge(&y);
        let weighted = (x.vpip_pct() * x.hands_played() as f64
            + y.vpip_pct() * y.hands_played() as f64)
            / merged.hands_played() as f64;
        prop_assert!((merged.vpip_pct() - weighted).abs() < 1e-9);
    }
}
