use poker_hud::tail::Tailer;
use proptest::prelude::*;
use std::io::Write;
use std::path::Path;

fn append(path: &Path, bytes: &[u8]) {
    let mut f = std::fs::OpenOptions::new().create(true).append(true).open(path).unwrap();
    f.write_all(bytes).unwrap();
}

#[test]
fn new_file_is_read_from_the_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h.txt");
    append(&path, b"Hand #1\n\n");
    let mut t = Tailer::new();
    t.track(&path);
    assert_eq!(t.offset(&path), Some(0));
    let blocks = t.poll(&path).unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(t.offset(&path), Some(9));
    assert!(t.poll(&path).unwrap().is_empty());
}

#[test]
fn truncation_resets_and_rereads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h.txt");
    append(&path, b"Hand #1\nSeat 1: Alice (1000)\n\n");
    let mut t = Tailer::new();
    assert_eq!(t.poll(&path).unwrap().len(), 1);

    std::fs::write(&path, b"Hand #9\n\n").unwrap();
    let blocks = t.poll(&path).unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].as_str(), "Hand #9");
    assert_eq!(t.offset(&path), Some(9));
}

#[test]
fn io_error_leaves_offset_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h.txt");
    append(&path, b"abc");
    let mut t = Tailer::new();
    t.read_delta(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(t.poll(&path).is_err());
    assert_eq!(t.offset(&path), Some(3));
}

#[test]
fn forget_restarts_from_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h.txt");
    append(&path, b"abc");
    let mut t = Tailer::new();
    t.read_delta(&path).unwrap();
    assert!(t.forget(&path).is_some());
    assert_eq!(t.read_delta(&path).unwrap().as_deref(), Some("abc"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn deltas_concatenate_to_file_content(
        chunks in prop::collection::vec("[a-z \n€é]{0,12}", 1..10),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.txt");
        append(&path, b"");
        let mut t = Tailer::new();
        let mut seen = String::new();
        let mut last_offset = 0;
        for chunk in &chunks {
            // split each chunk at a byte, possibly inside a multi-byte char
            let bytes = chunk.as_bytes();
            let mid = bytes.len() / 2;
            for part in [&bytes[..mid], &bytes[mid..]] {
                append(&path, part);
                if let Some(delta) = t.read_delta(&path).unwrap() {
                    seen.push_str(&delta);
                }
                let offset = t.offset(&path).unwrap();
                prop_assert!(offset >= last_offset);
                last_offset = offset;
            }
        }
        prop_assert_eq!(seen, chunks.concat());
        prop_assert_eq!(last_offset, std::fs::metadata(&path).unwrap().len());
    }
}
