//! Board handle: the public surface of the engine.
//!
//! A [`Board`] owns the note store, the pending-update buffer, and the sync
//! scheduler's bookkeeping, all behind one mutex. Edits apply to local state
//! immediately and return without touching the backend; persistence happens
//! later, in debounced drains driven by the scheduler in [`crate::sync`].
//! Creates and deletes are the exception: they go straight to the backend,
//! since they change which notes exist rather than what a note says.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use fusen_types::{Note, NoteColor, NoteId, NotePatch, Vec2};

use crate::backend::NoteBackend;
use crate::constants::{DEFAULT_DEBOUNCE, DEFAULT_NOTE_SIZE, SPAWN_ORIGIN, SPAWN_SPREAD};
use crate::error::Result;
use crate::pending::PendingUpdates;
use crate::store::BoardState;
use crate::sync;

/// Tuning for a board's sync behavior.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Quiet period after the last edit before buffered changes drain.
    pub debounce: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl BoardConfig {
    pub fn with_debounce(debounce: Duration) -> Self {
        Self { debounce }
    }
}

/// State shared between the board handle and the scheduler's tasks.
///
/// Everything lives under one lock, and the lock is never held across an
/// await, so edits and drain settlements interleave but never overlap.
pub(crate) struct Shared {
    pub(crate) store: BoardState,
    pub(crate) pending: PendingUpdates,
    /// Bumped on every edit that buffers a change. A sleeping debounce task
    /// remembers the value it was armed with and goes silent if it wakes to
    /// find a newer one, which is what restarts the quiet period.
    pub(crate) timer_gen: u64,
    /// Bumped when a drain starts. A settling drain compares its own number
    /// to decide whether it is still the latest or has been superseded.
    pub(crate) drain_gen: u64,
    /// Cancellation token of the drain currently in flight, if any.
    pub(crate) inflight: Option<CancellationToken>,
}

pub(crate) struct Inner {
    pub(crate) backend: Arc<dyn NoteBackend>,
    pub(crate) debounce: Duration,
    /// Fired when the board is dropped. Silences sleeping debounce tasks and
    /// keeps a settling drain from arming new ones.
    pub(crate) lifecycle: CancellationToken,
    pub(crate) shared: Mutex<Shared>,
}

/// A sticky-note board backed by a [`NoteBackend`].
///
/// The board is the single owner of its state: notes are read through it,
/// edited through it, and synced by it. Dropping the board cancels any
/// sleeping debounce timer and any in-flight drain; call [`Board::close`]
/// first to push buffered edits out.
///
/// Methods that buffer edits ([`mutate_note`](Board::mutate_note),
/// [`focus_note`](Board::focus_note)) spawn the debounce timer onto the
/// ambient tokio runtime, so the board must live inside one.
pub struct Board {
    inner: Arc<Inner>,
}

impl Board {
    /// Empty board over a backend.
    pub fn new(backend: Arc<dyn NoteBackend>, config: BoardConfig) -> Board {
        Self::with_state(backend, config, BoardState::new())
    }

    /// Board seeded from whatever the backend has stored.
    pub async fn load(backend: Arc<dyn NoteBackend>, config: BoardConfig) -> Result<Board> {
        let notes = backend.list().await?;
        info!(notes = notes.len(), "board loaded");
        Ok(Self::with_state(
            backend,
            config,
            BoardState::from_notes(notes),
        ))
    }

    fn with_state(backend: Arc<dyn NoteBackend>, config: BoardConfig, store: BoardState) -> Board {
        Board {
            inner: Arc::new(Inner {
                backend,
                debounce: config.debounce,
                lifecycle: CancellationToken::new(),
                shared: Mutex::new(Shared {
                    store,
                    pending: PendingUpdates::new(),
                    timer_gen: 0,
                    drain_gen: 0,
                    inflight: None,
                }),
            }),
        }
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Snapshot of every note, in creation order.
    pub fn notes(&self) -> Vec<Note> {
        self.inner.shared.lock().store.notes().to_vec()
    }

    /// Snapshot of one note.
    pub fn note(&self, id: NoteId) -> Option<Note> {
        self.inner.shared.lock().store.get(id).cloned()
    }

    pub fn note_count(&self) -> usize {
        self.inner.shared.lock().store.len()
    }

    /// Number of notes with buffered, not-yet-synced edits.
    pub fn pending_len(&self) -> usize {
        self.inner.shared.lock().pending.len()
    }

    // ── Edits ───────────────────────────────────────────────────────────

    /// Create a note with spawn defaults and persist it.
    ///
    /// New notes get a jittered position near the board origin, the default
    /// size, the next palette color in creation order, and a stacking index
    /// above every existing note. The note is on the board before the
    /// backend call starts; a create error leaves it in place, unsynced.
    pub async fn add_note(&self) -> Result<Note> {
        let note = {
            let mut shared = self.inner.shared.lock();
            let count = shared.store.len();
            let note = Note {
                id: NoteId::new(),
                position: spawn_position(),
                size: DEFAULT_NOTE_SIZE,
                content: String::new(),
                color: NoteColor::for_index(count),
                z_index: count as u32 + 1,
            };
            shared.store.insert(note.clone());
            note
        };
        info!(id = %note.id.short(), color = %note.color, "note created");
        self.inner.backend.create(&note).await?;
        Ok(note)
    }

    /// Apply a partial edit to a note and buffer it for sync.
    ///
    /// The change lands in local state immediately; the backend sees it once
    /// the debounce window closes. Editing a note that does not exist, or
    /// passing an empty patch, does nothing at all, not even a buffer entry.
    pub fn mutate_note(&self, id: NoteId, patch: NotePatch) {
        let timer_gen = {
            let mut shared = self.inner.shared.lock();
            let Some(applied) = shared.store.mutate(id, patch) else {
                return;
            };
            shared.pending.record(id, applied);
            shared.timer_gen += 1;
            shared.timer_gen
        };
        sync::arm_debounce(&self.inner, timer_gen);
    }

    /// Bring a note to the top of the stack.
    ///
    /// No-op when the note is already topmost, so clicking the same note
    /// repeatedly produces zero sync traffic.
    pub fn focus_note(&self, id: NoteId) {
        let timer_gen = {
            let mut shared = self.inner.shared.lock();
            let Some(z_index) = shared.store.focus(id) else {
                return;
            };
            debug!(id = %id.short(), z_index, "note focused");
            shared.pending.record(id, NotePatch::z_index(z_index));
            shared.timer_gen += 1;
            shared.timer_gen
        };
        sync::arm_debounce(&self.inner, timer_gen);
    }

    /// Remove a note locally, discard its buffered edits, and delete it from
    /// the backend.
    ///
    /// The purge guarantees no later drain can resurrect the note. The
    /// backend delete always runs, even for ids the board no longer has, so
    /// a note that only exists in storage still gets cleaned up.
    pub async fn remove_note(&self, id: NoteId) -> Result<()> {
        {
            let mut shared = self.inner.shared.lock();
            let removed = shared.store.remove(id);
            let purged = shared.pending.purge(id);
            if removed.is_some() || purged.is_some() {
                info!(id = %id.short(), "note removed");
            }
        }
        self.inner.backend.delete(id).await
    }

    // ── Sync control ────────────────────────────────────────────────────

    /// Drain buffered edits now instead of waiting for the debounce window,
    /// and wait for the drain to settle. No-op when nothing is buffered.
    pub async fn flush(&self) {
        sync::flush_now(&self.inner).await;
    }

    /// Flush once, then drop the board.
    ///
    /// Best effort: edits whose flush fails or that were still in a
    /// superseded drain when the flush ran are not retried.
    pub async fn close(self) {
        self.flush().await;
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        self.inner.lifecycle.cancel();
        if let Some(inflight) = self.inner.shared.lock().inflight.take() {
            inflight.cancel();
        }
    }
}

/// Jittered spawn position, so consecutively created notes fan out instead of
/// stacking exactly.
fn spawn_position() -> Vec2 {
    let mut rng = rand::thread_rng();
    Vec2::new(
        SPAWN_ORIGIN + rng.gen_range(0.0..SPAWN_SPREAD),
        SPAWN_ORIGIN + rng.gen_range(0.0..SPAWN_SPREAD),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::error::GatewayError;
    use crate::memory_backend::MemoryBackend;

    use super::*;

    fn memory_board() -> (Arc<MemoryBackend>, Board) {
        let backend = Arc::new(MemoryBackend::with_latency(Duration::ZERO));
        let board = Board::new(backend.clone(), BoardConfig::default());
        (backend, board)
    }

    // ── Creation defaults ───────────────────────────────────────────────

    #[tokio::test]
    async fn test_add_note_defaults() {
        let (backend, board) = memory_board();

        let mut notes = Vec::new();
        for _ in 0..6 {
            notes.push(board.add_note().await.unwrap());
        }

        for (i, note) in notes.iter().enumerate() {
            assert_eq!(note.size, DEFAULT_NOTE_SIZE);
            assert_eq!(note.color, NoteColor::for_index(i));
            assert_eq!(note.z_index, i as u32 + 1);
            assert!(note.content.is_empty());
            for axis in [note.position.x, note.position.y] {
                assert!((SPAWN_ORIGIN..SPAWN_ORIGIN + SPAWN_SPREAD).contains(&axis));
            }
        }
        // Sixth note wraps back to the first palette color.
        assert_eq!(notes[5].color, notes[0].color);

        assert_eq!(backend.snapshot().len(), 6);
        assert_eq!(board.pending_len(), 0);
    }

    #[tokio::test]
    async fn test_add_note_create_failure_keeps_local_note() {
        struct FailingCreate;

        #[async_trait]
        impl NoteBackend for FailingCreate {
            async fn list(&self) -> Result<Vec<Note>> {
                Ok(Vec::new())
            }
            async fn create(&self, _note: &Note) -> Result<()> {
                Err(GatewayError::Transport("disk full".into()))
            }
            async fn update(
                &self,
                _id: NoteId,
                _patch: &NotePatch,
                _cancel: CancellationToken,
            ) -> Result<()> {
                Ok(())
            }
            async fn delete(&self, _id: NoteId) -> Result<()> {
                Ok(())
            }
        }

        let board = Board::new(Arc::new(FailingCreate), BoardConfig::default());
        let err = board.add_note().await.unwrap_err();

        assert!(matches!(err, GatewayError::Transport(_)));
        assert_eq!(board.note_count(), 1);
    }

    // ── Edit plumbing ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_mutate_unknown_note_buffers_nothing() {
        let (_, board) = memory_board();
        board.mutate_note(NoteId::new(), NotePatch::content("ghost"));

        assert_eq!(board.note_count(), 0);
        assert_eq!(board.pending_len(), 0);
    }

    #[tokio::test]
    async fn test_mutate_empty_patch_buffers_nothing() {
        let (_, board) = memory_board();
        let id = board.add_note().await.unwrap().id;

        board.mutate_note(id, NotePatch::default());
        assert_eq!(board.pending_len(), 0);
    }

    #[tokio::test]
    async fn test_resize_clamps_to_minimum() {
        let (_, board) = memory_board();
        let id = board.add_note().await.unwrap().id;

        board.mutate_note(id, NotePatch::size(Vec2::new(50.0, 50.0)));
        assert_eq!(board.note(id).unwrap().size, Vec2::new(150.0, 150.0));
    }

    #[tokio::test]
    async fn test_focus_topmost_buffers_nothing() {
        let (_, board) = memory_board();
        let a = board.add_note().await.unwrap().id;
        let b = board.add_note().await.unwrap().id;

        board.focus_note(b);
        assert_eq!(board.pending_len(), 0);

        board.focus_note(a);
        assert_eq!(board.pending_len(), 1);
        assert_eq!(board.note(a).unwrap().z_index, 3);
    }

    #[tokio::test]
    async fn test_remove_unknown_note_is_clean() {
        let (backend, board) = memory_board();
        let ghost = NoteId::new();

        board.remove_note(ghost).await.unwrap();
        assert!(backend.snapshot().is_empty());
    }

    // ── Loading ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_load_seeds_store_from_backend() {
        let seeded = vec![
            Note {
                id: NoteId::new(),
                position: Vec2::new(10.0, 10.0),
                size: Vec2::new(200.0, 200.0),
                content: "one".to_string(),
                color: NoteColor::Lemon,
                z_index: 1,
            },
            Note {
                id: NoteId::new(),
                position: Vec2::new(20.0, 20.0),
                size: Vec2::new(200.0, 200.0),
                content: "two".to_string(),
                color: NoteColor::Amber,
                z_index: 2,
            },
        ];
        let backend = Arc::new(MemoryBackend::with_notes(seeded.clone(), Duration::ZERO));

        let board = Board::load(backend, BoardConfig::default()).await.unwrap();
        assert_eq!(board.notes(), seeded);
    }
}
