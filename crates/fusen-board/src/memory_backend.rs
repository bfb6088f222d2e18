//! In-memory backend with simulated latency.
//!
//! Stands in for a real persistence service during tests and demos. Every
//! call sleeps for a configurable latency before touching the store, so the
//! window where a drain is in flight while new edits arrive actually exists,
//! the way it would against a network API.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use fusen_types::{Note, NoteId, NotePatch};

use crate::backend::NoteBackend;
use crate::constants::DEFAULT_MEMORY_LATENCY;
use crate::error::{GatewayError, Result};

/// Note store held in a `Vec` behind a mutex.
///
/// `update` races its simulated latency against the cancellation token and
/// returns [`GatewayError::Cancelled`] if the token wins, leaving the stored
/// note untouched.
pub struct MemoryBackend {
    notes: Mutex<Vec<Note>>,
    latency: Duration,
}

impl MemoryBackend {
    /// Empty store with the reference latency profile.
    pub fn new() -> Self {
        Self::with_latency(DEFAULT_MEMORY_LATENCY)
    }

    /// Empty store with a custom per-call latency.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            notes: Mutex::new(Vec::new()),
            latency,
        }
    }

    /// Pre-seeded store, for exercising load paths.
    pub fn with_notes(notes: Vec<Note>, latency: Duration) -> Self {
        Self {
            notes: Mutex::new(notes),
            latency,
        }
    }

    /// Copy of the stored notes, for assertions.
    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.lock().clone()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteBackend for MemoryBackend {
    async fn list(&self) -> Result<Vec<Note>> {
        tokio::time::sleep(self.latency).await;
        Ok(self.notes.lock().clone())
    }

    async fn create(&self, note: &Note) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        self.notes.lock().push(note.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: NoteId,
        patch: &NotePatch,
        cancel: CancellationToken,
    ) -> Result<()> {
        // Biased so a token that fired before the call is observed even at
        // zero latency.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            _ = tokio::time::sleep(self.latency) => {}
        }
        let mut notes = self.notes.lock();
        if let Some(note) = notes.iter_mut().find(|n| n.id == id) {
            patch.apply_to(note);
        }
        Ok(())
    }

    async fn delete(&self, id: NoteId) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        self.notes.lock().retain(|n| n.id != id);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
