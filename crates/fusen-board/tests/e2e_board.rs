//! End-to-end board tests.
//!
//! These drive the public [`Board`] API against real backends: a JSON file on
//! disk for persistence round-trips, and the in-memory backend's reference
//! latency profile for sync timing. Scheduler internals get their coverage in
//! the crate's unit tests; here the question is whether an editing session
//! survives the full trip out and back.

use std::sync::Arc;
use std::time::Duration;

use fusen_board::{
    Board, BoardConfig, JsonFileBackend, MemoryBackend, NoteColor, NotePatch, Vec2,
};

/// Opt-in log output: run with `RUST_LOG=fusen_board=debug`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn open(path: &std::path::Path) -> Board {
    init_tracing();
    Board::load(Arc::new(JsonFileBackend::new(path)), BoardConfig::default())
        .await
        .unwrap()
}

fn memory_board(config: BoardConfig) -> (Arc<MemoryBackend>, Board) {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    let board = Board::new(backend.clone(), config);
    (backend, board)
}

// ============================================================================
// File persistence
// ============================================================================

#[tokio::test]
async fn test_editing_session_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    let board = open(&path).await;
    assert_eq!(board.note_count(), 0);

    let first = board.add_note().await.unwrap();
    let second = board.add_note().await.unwrap();
    board.mutate_note(first.id, NotePatch::content("groceries"));
    board.mutate_note(first.id, NotePatch::position(Vec2::new(120.0, 80.0)));
    board.mutate_note(second.id, NotePatch::content("call dentist"));
    board.focus_note(first.id);
    board.close().await;

    let reopened = open(&path).await;
    assert_eq!(reopened.note_count(), 2);

    let a = reopened.note(first.id).unwrap();
    assert_eq!(a.content, "groceries");
    assert_eq!(a.position, Vec2::new(120.0, 80.0));
    assert_eq!(a.z_index, 3);

    let b = reopened.note(second.id).unwrap();
    assert_eq!(b.content, "call dentist");
    assert_eq!(b.color, NoteColor::Amber);
    assert_eq!(b.z_index, 2);
}

#[tokio::test]
async fn test_deletion_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    let board = open(&path).await;
    let keep = board.add_note().await.unwrap();
    let doomed = board.add_note().await.unwrap();
    board.mutate_note(keep.id, NotePatch::content("kept"));
    board.remove_note(doomed.id).await.unwrap();
    board.close().await;

    let reopened = open(&path).await;
    assert_eq!(reopened.note_count(), 1);
    assert!(reopened.note(doomed.id).is_none());
    assert_eq!(reopened.note(keep.id).unwrap().content, "kept");
}

#[tokio::test]
async fn test_stored_file_uses_web_wire_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");

    // A board written by the web front end this engine is storage-compatible
    // with: camelCase keys, palette hex colors.
    std::fs::write(
        &path,
        r##"[
          {
            "id": "0192c7a4-5b7e-7000-8000-0123456789ab",
            "position": { "x": 62.5, "y": 91.0 },
            "size": { "x": 220.0, "y": 180.0 },
            "content": "from the web app",
            "color": "#e1f5fe",
            "zIndex": 2
          }
        ]"##,
    )
    .unwrap();

    let board = open(&path).await;
    let notes = board.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "from the web app");
    assert_eq!(notes[0].color, NoteColor::Sky);
    assert_eq!(notes[0].size, Vec2::new(220.0, 180.0));
    assert_eq!(notes[0].z_index, 2);

    board.mutate_note(notes[0].id, NotePatch::content("edited natively"));
    board.close().await;

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"zIndex\": 2"));
    assert!(raw.contains("\"#e1f5fe\""));
    assert!(raw.contains("edited natively"));
    assert!(!raw.contains("z_index"));
}

// ============================================================================
// Reference latency profile
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_typing_burst_reaches_storage_as_one_write() {
    let (backend, board) = memory_board(BoardConfig::default());
    let id = board.add_note().await.unwrap().id;

    for text in ["h", "he", "hel"] {
        board.mutate_note(id, NotePatch::content(text));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    tokio::time::sleep(Duration::from_secs(2)).await;

    let stored = backend.snapshot();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].content, "hel");
    assert_eq!(board.pending_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_edits_survive_drain_cancellation() {
    // Debounce shorter than the backend's 300ms latency, so the second
    // burst's drain starts while the first is still in flight and cancels
    // it. The first burst's edit must still reach storage eventually.
    let (backend, board) = memory_board(BoardConfig::with_debounce(Duration::from_millis(200)));
    let a = board.add_note().await.unwrap().id;
    let b = board.add_note().await.unwrap().id;

    board.mutate_note(a, NotePatch::content("first burst"));
    tokio::time::sleep(Duration::from_millis(250)).await;
    // a's drain is mid-latency here; this schedules the drain that cancels
    // it at 450ms, before a's write would have landed at 500ms.
    board.mutate_note(b, NotePatch::content("second burst"));
    tokio::time::sleep(Duration::from_secs(3)).await;

    let stored = backend.snapshot();
    assert_eq!(stored.iter().find(|n| n.id == a).unwrap().content, "first burst");
    assert_eq!(stored.iter().find(|n| n.id == b).unwrap().content, "second burst");
    assert_eq!(board.pending_len(), 0);
}
