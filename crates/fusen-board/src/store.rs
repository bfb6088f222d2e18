//! In-memory board state.
//!
//! [`BoardState`] owns the authoritative copy of every note. All reads and
//! edits go through it; the backend only ever sees changes after they have
//! been applied here. Notes keep creation order, which is also the render
//! order a front end would use before sorting by stacking index.

use fusen_types::{Note, NoteId, NotePatch};

use crate::constants::MIN_NOTE_AXIS;

/// Owned collection of the board's notes.
#[derive(Debug, Default)]
pub struct BoardState {
    notes: Vec<Note>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-loaded notes, keeping their order.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.get(id).is_some()
    }

    /// Append a new note.
    pub fn insert(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Apply a patch to a note and return the patch as actually applied.
    ///
    /// Returns `None`, changing nothing, when the note does not exist or the
    /// patch carries no fields. Sizes are clamped to the per-axis minimum
    /// before applying, so the returned patch reflects what the note now
    /// holds rather than what the caller asked for.
    pub fn mutate(&mut self, id: NoteId, mut patch: NotePatch) -> Option<NotePatch> {
        if patch.is_empty() {
            return None;
        }
        let note = self.notes.iter_mut().find(|n| n.id == id)?;
        if let Some(size) = &mut patch.size {
            size.x = size.x.max(MIN_NOTE_AXIS);
            size.y = size.y.max(MIN_NOTE_AXIS);
        }
        patch.apply_to(note);
        Some(patch)
    }

    /// Remove a note, returning it if it existed.
    pub fn remove(&mut self, id: NoteId) -> Option<Note> {
        let idx = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(idx))
    }

    /// Highest stacking index on the board, 0 when empty.
    pub fn max_z(&self) -> u32 {
        self.notes.iter().map(|n| n.z_index).max().unwrap_or(0)
    }

    /// Raise a note above everything else, returning its new stacking index.
    ///
    /// Returns `None`, changing nothing, when the note does not exist or is
    /// already the topmost. Focusing the topmost note over and over must not
    /// inflate its index or produce sync traffic.
    pub fn focus(&mut self, id: NoteId) -> Option<u32> {
        let max_z = self.max_z();
        let note = self.notes.iter_mut().find(|n| n.id == id)?;
        if note.z_index == max_z {
            return None;
        }
        note.z_index = max_z + 1;
        Some(note.z_index)
    }
}

// ============================================================================
// Tests
// ============================================================================
