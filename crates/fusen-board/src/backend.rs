//! Backend gateway trait.
//!
//! This trait is the board's only view of persistence. Anything that can
//! list, create, update, and delete notes can sit behind it: a JSON file, an
//! HTTP API, an in-memory fake for tests.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use fusen_types::{Note, NoteId, NotePatch};

use crate::error::Result;

/// Storage operations for a note board.
///
/// `update` takes a [`CancellationToken`]: the sync scheduler revokes an
/// in-flight drain when a newer one supersedes it, and a cooperative backend
/// bails out with [`GatewayError::Cancelled`](crate::GatewayError::Cancelled)
/// instead of finishing a write whose data is already stale. Backends that
/// cannot abort mid-call may ignore the token; correctness does not depend on
/// it, only wasted work does.
///
/// `update` and `delete` against an id the store no longer has are silent
/// successes. The board may race a delete against a buffered edit, and the
/// edit losing that race is the desired outcome, not an error.
#[async_trait]
pub trait NoteBackend: Send + Sync {
    /// Load every stored note.
    async fn list(&self) -> Result<Vec<Note>>;

    /// Persist a freshly created note.
    async fn create(&self, note: &Note) -> Result<()>;

    /// Apply a partial update to a stored note.
    async fn update(&self, id: NoteId, patch: &NotePatch, cancel: CancellationToken)
        -> Result<()>;

    /// Remove a stored note.
    async fn delete(&self, id: NoteId) -> Result<()>;
}
