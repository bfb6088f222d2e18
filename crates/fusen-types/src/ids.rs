//! Typed note identifier.
//!
//! `NoteId` wraps UUIDv7 (time-ordered, globally unique). It is opaque on the
//! wire (a plain UUID string in JSON) and displays as standard UUID text for
//! logging. The `short()` form is for human-facing output, never a lookup key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A note identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(uuid::Uuid);

impl NoteId {
    /// Create a new time-ordered ID (UUIDv7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// First 8 hex characters, for human display only.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }

    /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<uuid::Uuid> for NoteId {
    fn from(u: uuid::Uuid) -> Self {
        Self(u)
    }
}

impl From<NoteId> for uuid::Uuid {
    fn from(id: NoteId) -> uuid::Uuid {
        id.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full UUID with hyphens for log readability
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId({})", self.short())
    }
}

// ============================================================================
// Tests
// ============================================================================
