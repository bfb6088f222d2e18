//! JSON file backend.
//!
//! Persists the whole board as one JSON array of notes. Each write rewrites
//! the file; boards are small enough that diffing is not worth the
//! complexity. A missing file reads as an empty board, so first launch needs
//! no setup step.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use fusen_types::{Note, NoteId, NotePatch};

use crate::backend::NoteBackend;
use crate::error::{GatewayError, Result};

/// Backend storing notes in a single JSON file.
///
/// The file holds a pretty-printed array of notes in the board's wire format
/// (camelCase keys, palette hex colors), so it can be inspected and edited by
/// hand or served directly to a web front end.
///
/// Every call is a read-modify-write of the whole file, and a drain sends its
/// updates concurrently, so calls queue on an internal lock. Without it, two
/// updates in one drain would read the same snapshot and the slower write
/// would erase the faster one.
///
/// The cancellation token is only checked before the file is touched
/// (including while queued): a local file write is quick and not worth
/// aborting midway.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    slot: Mutex<()>,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, err: impl std::fmt::Display) -> GatewayError {
        GatewayError::Transport(format!("read {}: {err}", self.path.display()))
    }

    fn write_error(&self, err: impl std::fmt::Display) -> GatewayError {
        GatewayError::Transport(format!("write {}: {err}", self.path.display()))
    }

    // Callers hold `slot` across the read and the matching write.
    async fn read_board(&self) -> Result<Vec<Note>> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| self.read_error(e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(self.read_error(e)),
        }
    }

    async fn write_board(&self, notes: &[Note]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(notes).map_err(|e| self.write_error(e))?;
        fs::write(&self.path, bytes)
            .await
            .map_err(|e| self.write_error(e))
    }
}

#[async_trait]
impl NoteBackend for JsonFileBackend {
    async fn list(&self) -> Result<Vec<Note>> {
        let _slot = self.slot.lock().await;
        self.read_board().await
    }

    async fn create(&self, note: &Note) -> Result<()> {
        let _slot = self.slot.lock().await;
        let mut notes = self.read_board().await?;
        notes.push(note.clone());
        self.write_board(&notes).await
    }

    async fn update(
        &self,
        id: NoteId,
        patch: &NotePatch,
        cancel: CancellationToken,
    ) -> Result<()> {
        let _slot = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            slot = self.slot.lock() => slot,
        };
        let mut notes = self.read_board().await?;
        let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
            // Deleted while the update was buffered. Nothing to do.
            return Ok(());
        };
        patch.apply_to(note);
        debug!(id = %id.short(), path = %self.path.display(), "note updated");
        self.write_board(&notes).await
    }

    async fn delete(&self, id: NoteId) -> Result<()> {
        let _slot = self.slot.lock().await;
        let mut notes = self.read_board().await?;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Ok(());
        }
        debug!(id = %id.short(), path = %self.path.display(), "note deleted");
        self.write_board(&notes).await
    }
}

// ============================================================================
// Tests
// ============================================================================
