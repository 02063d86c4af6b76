use poker_hud::split::{split_hands, HandBlock, HandSplitter};
use proptest::prelude::*;

fn hand_line() -> impl Strategy<Value = String> {
    "[A-Za-z0-9#:()' ]{1,20}"
        .prop_map(|s| s.trim().to_string())
        .prop_filter("non-blank", |s| !s.is_empty())
}

fn hand_text() -> impl Strategy<Value = Vec<String>> {
    let hand = prop::collection::vec(hand_line(), 1..5).prop_map(|ls| ls.join("\n"));
    prop::collection::vec(hand, 0..6)
}

fn separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("\n\n"), Just("\n \n"), Just("\r\n\r\n"), Just("\n\n\n"), Just("\n\t\n")]
}

proptest! {
    #[test]
    fn splitting_is_idempotent(hands in hand_text(), sep in separator()) {
        let text = hands.join(sep);
        let once = split_hands(&text);
        let again: Vec<HandBlock> = once.iter().flat_map(|b| split_hands(b.as_str())).collect();
        prop_assert_eq!(&once, &again);
        let texts: Vec<&str> = once.iter().map(HandBlock::as_str).collect();
        prop_assert_eq!(texts, hands.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn streaming_matches_batch(hands in hand_text(), cut in 0usize..200) {
        let text = format!("{}\n\n", hands.join("\n\n"));
        let cut = (0..=cut.min(text.len())).rev().find(|&i| text.is_char_boundary(i)).unwrap_or(0);
        let mut s = HandSplitter::new();
        let mut out = s.push(&text[..cut]);
        out.extend(s.push(&text[cut..]));
        prop_assert!(!s.has_pending());
        prop_assert_eq!(out, split_hands(&text));
    }

    #[test]
    fn unterminated_tail_is_held_back(hands in hand_text(), last in hand_line()) {
        let text = if hands.is_empty() {
            last.clone()
        } else {
            format!("{}\n\n{}", hands.join("\n\n"), last)
        };
        let mut s = HandSplitter::new();
        let out = s.push(&text);
        prop_assert_eq!(out.len(), hands.len());
        prop_assert_eq!(s.finish().map(HandBlock::into_string), Some(last));
    }
}
