//! Board engine constants.
//!
//! Centralizes hardcoded values for easier configuration and documentation.

use std::time::Duration;

use fusen_types::Vec2;

/// Quiet period after the last buffered edit before a drain starts. Each new
/// edit restarts the countdown, so one burst of typing produces one write.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Smallest width or height a note can be resized to.
pub const MIN_NOTE_AXIS: f64 = 150.0;

/// Size of a freshly created note.
pub const DEFAULT_NOTE_SIZE: Vec2 = Vec2::new(200.0, 200.0);

/// Top-left corner of the spawn region for new notes.
pub const SPAWN_ORIGIN: f64 = 50.0;

/// Extent of the random jitter applied to each spawn axis, so stacked
/// creations do not land exactly on top of each other.
pub const SPAWN_SPREAD: f64 = 50.0;

/// Simulated round-trip latency of [`MemoryBackend`](crate::MemoryBackend).
/// Long enough that a drain can still be in flight when the next edit lands,
/// which is the window cancellation exists for.
pub const DEFAULT_MEMORY_LATENCY: Duration = Duration::from_millis(300);
