use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Duration;

use transbench_core::{mask_line, restore_line, BenchError, CorpusFile, FileDigest, MaskingSession};

fn target_with(content: &str) -> (tempfile::TempDir, PathBuf, CorpusFile) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mya-x.txt");
    fs::write(&path, content).unwrap();
    let file = CorpusFile::open(&path).unwrap();
    (dir, path, file)
}

const MIXED: &str = "ကျမ်းစာ အခန်း\n\nliteral \\n escape\r\nplain line\nlast without newline";

// ── mask / restore ──────────────────────────────────────────────────────

#[test]
fn mask_then_restore_is_byte_identical_for_every_line() {
    let (_dir, path, mut file) = target_with(MIXED);
    let before = fs::read(&path).unwrap();
    let lines = file.line_count().unwrap();
    assert_eq!(lines, 5);

    for index in 0..lines {
        let original = mask_line(&mut file, index).unwrap();
        assert_eq!(file.line_count().unwrap(), lines, "line count changed masking {index}");
        assert_eq!(file.read_line(index).unwrap(), "");
        restore_line(&mut file, index, &original).unwrap();
        assert_eq!(fs::read(&path).unwrap(), before, "restore of line {index}");
    }
}

#[test]
fn mask_leaves_other_lines_untouched() {
    let (_dir, _path, mut file) = target_with(MIXED);
    let before = file.read_lines().unwrap();
    mask_line(&mut file, 2).unwrap();
    let after = file.read_lines().unwrap();
    for (i, (a, b)) in before.iter().zip(&after).enumerate() {
        if i != 2 {
            assert_eq!(a, b, "line {i}");
        }
    }
}

#[test]
fn mask_out_of_range_changes_nothing() {
    let (_dir, path, mut file) = target_with("one\ntwo\n");
    assert!(mask_line(&mut file, 2).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
}

// ── MaskingSession ──────────────────────────────────────────────────────

#[test]
fn session_end_restores_and_verifies() {
    let (_dir, path, mut file) = target_with(MIXED);
    let digest = FileDigest::compute(&fs::read(&path).unwrap());

    let session = MaskingSession::begin(&mut file, 0).unwrap();
    assert_eq!(session.original_content(), "ကျမ်းစာ အခန်း\n");
    assert_eq!(fs::read_to_string(&path).unwrap().lines().next(), Some(""));
    session.end().unwrap();

    assert_eq!(FileDigest::compute(&fs::read(&path).unwrap()), digest);
}

fn fails_while_masked(file: &mut CorpusFile) -> Result<(), BenchError> {
    let _session = MaskingSession::begin(file, 3)?;
    Err(BenchError::Config("agent blew up".to_string()))
}

#[test]
fn session_restores_on_early_return() {
    let (_dir, path, mut file) = target_with(MIXED);
    let before = fs::read(&path).unwrap();
    assert!(fails_while_masked(&mut file).is_err());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn session_restores_on_panic() {
    let (_dir, path, mut file) = target_with(MIXED);
    let before = fs::read(&path).unwrap();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _session = MaskingSession::begin(&mut file, 4).unwrap();
        panic!("agent crashed");
    }));

    assert!(outcome.is_err());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn session_restores_when_future_is_cancelled() {
    let (_dir, path, mut file) = target_with(MIXED);
    let before = fs::read(&path).unwrap();

    let masked = async {
        let _session = MaskingSession::begin(&mut file, 1).unwrap();
        std::future::pending::<()>().await;
    };
    let timed_out = tokio::time::timeout(Duration::from_millis(20), masked).await;

    assert!(timed_out.is_err());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn session_rewrites_snapshot_when_other_lines_were_edited() {
    let (_dir, path, mut file) = target_with("alpha line\nbeta line\ngamma line\n");
    let before = fs::read(&path).unwrap();

    let session = MaskingSession::begin(&mut file, 1).unwrap();
    // Something else scribbles over the file while the mask is open.
    fs::write(&path, "tampered\n\nwith\nextra lines\n").unwrap();
    session.end().unwrap();

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn session_recreates_file_deleted_while_masked() {
    let (_dir, path, mut file) = target_with(MIXED);
    let before = fs::read(&path).unwrap();

    let session = MaskingSession::begin(&mut file, 0).unwrap();
    fs::remove_file(&path).unwrap();
    session.end().unwrap();

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn dropped_session_recreates_deleted_file() {
    let (_dir, path, mut file) = target_with(MIXED);
    let before = fs::read(&path).unwrap();
    {
        let _session = MaskingSession::begin(&mut file, 2).unwrap();
        fs::remove_file(&path).unwrap();
    }
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn sequential_sessions_on_same_file() {
    let (_dir, path, mut file) = target_with(MIXED);
    let before = fs::read(&path).unwrap();
    for index in [4, 0, 2] {
        let session = MaskingSession::begin(&mut file, index).unwrap();
        assert_eq!(session.index(), index);
        session.end().unwrap();
    }
    assert_eq!(fs::read(&path).unwrap(), before);
}
