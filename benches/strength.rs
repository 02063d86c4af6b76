use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use poker_hud::cards::parse_cards;
use poker_hud::extract::Extractor;
use poker_hud::split::split_hands;
use poker_hud::strength::classify;

const HAND: &str = "\
Winamax Poker - HandId: #1234-56-789 - Holdem no limit (10/20)
Table: 'Expresso(123)#0' 3-max (real money) Seat #1 is the button
Seat 1: NonoBasket (500)
Seat 2: big fish (480)
Seat 3: Rock_99 (520)
Dealt to NonoBasket [Ah Kh]
NonoBasket raises 20 to 40
big fish calls 30
Rock_99 folds
*** FLOP *** [Qh Jh 2c]
NonoBasket bets 60
big fish folds
NonoBasket collected 140 from pot
Total pot 140 | No rake
";

fn bench_classify(c: &mut Criterion) {
    let mut g = c.benchmark_group("classify");
    let hands = [
        ("high_card", "Ah Kd 7s 5c 2d"),
        ("royal", "As Ks Qs Js Ts"),
        ("seven", "As Ah Ks Qs Js Ts 9s"),
    ];
    for (name, cards) in hands {
        let cards = parse_cards(cards).unwrap();
        g.bench_with_input(BenchmarkId::new("cards", name), &cards, |b, input| {
            b.iter(|| classify(black_box(input)))
        });
    }
    g.finish();
}

fn bench_extract(c: &mut Criterion) {
    let ex = Extractor::new(Some("NonoBasket"));
    c.bench_function("extract_winamax", |b| b.iter(|| ex.extract_str(black_box(HAND))));

    let log = [HAND; 50].join("\n");
    c.bench_function("split_50_hands", |b| b.iter(|| split_hands(black_box(&log))));
}

criterion_group!(benches, bench_classify, bench_extract);
criterion_main!(benches);
