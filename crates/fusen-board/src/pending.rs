//! Pending-update buffer.
//!
//! Local edits do not hit the backend one by one. They land here first, keyed
//! by note id, and coalesce field-wise: three content keystrokes on one note
//! collapse into a single entry carrying the final text, a move and a resize
//! of the same note share one entry with both fields set. The sync scheduler
//! drains the whole buffer at once when the debounce window closes.
//!
//! The buffer also absorbs failure: entries from a drain that was cancelled or
//! hit a transport error are merged back in, under anything the user typed in
//! the meantime, so no edit is lost and newer local state always wins.

use indexmap::IndexMap;

use fusen_types::{NoteId, NotePatch};

/// Coalescing buffer of not-yet-synced note edits.
///
/// Insertion order is preserved across re-records of the same note, so a
/// drain replays notes in the order they were first touched.
#[derive(Debug, Default)]
pub struct PendingUpdates {
    entries: IndexMap<NoteId, NotePatch>,
}

impl PendingUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit, merging into any entry already buffered for the note.
    ///
    /// Fields set in `patch` overwrite the buffered values; fields it does not
    /// carry keep theirs. A note's entry stays at its original position in
    /// the buffer.
    pub fn record(&mut self, id: NoteId, patch: NotePatch) {
        match self.entries.get_mut(&id) {
            Some(existing) => existing.merge(patch),
            None => {
                self.entries.insert(id, patch);
            }
        }
    }

    /// Take every buffered entry, leaving the buffer empty.
    pub fn drain_all(&mut self) -> IndexMap<NoteId, NotePatch> {
        std::mem::take(&mut self.entries)
    }

    /// Put a drained entry back after its sync failed or was cancelled.
    ///
    /// Edits recorded after the drain win: the restored entry is the drained
    /// fields with any newer buffered fields layered on top.
    pub fn restore(&mut self, id: NoteId, drained: NotePatch) {
        match self.entries.get_mut(&id) {
            Some(current) => {
                let mut merged = drained;
                merged.merge(current.clone());
                *current = merged;
            }
            None => {
                self.entries.insert(id, drained);
            }
        }
    }

    /// Discard any buffered entry for a note. Used on delete, so a removed
    /// note can never be synced afterwards.
    pub fn purge(&mut self, id: NoteId) -> Option<NotePatch> {
        self.entries.shift_remove(&id)
    }

    pub fn get(&self, id: NoteId) -> Option<&NotePatch> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
