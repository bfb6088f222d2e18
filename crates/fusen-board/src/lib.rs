//! Sticky-note board engine with debounced, cancellable backend sync.
//!
//! Edits apply to local state instantly and sync lazily: they coalesce in a
//! per-note buffer, drain to the backend after a 500ms quiet period, and are
//! restored into the buffer when a drain fails or is cancelled by a newer
//! one. A burst of typing becomes a single write carrying the final text.
//!
//! ```text
//!  Board::mutate_note ──▶ BoardState (instant, local)
//!                    └──▶ PendingUpdates ──debounce──▶ NoteBackend::update
//!                              ▲                            │
//!                              └──── restore on failure ────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use fusen_board::{Board, BoardConfig, JsonFileBackend, NotePatch};
//!
//! # async fn demo() -> Result<(), fusen_board::GatewayError> {
//! let backend = Arc::new(JsonFileBackend::new("board.json"));
//! let board = Board::load(backend, BoardConfig::default()).await?;
//!
//! let note = board.add_note().await?;
//! board.mutate_note(note.id, NotePatch::content("buy milk"));
//! board.focus_note(note.id);
//!
//! // Buffered edits drain on their own after the quiet period; close
//! // pushes anything still buffered before dropping the board.
//! board.close().await;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod board;
pub mod constants;
pub mod error;
pub mod json_backend;
pub mod memory_backend;
pub mod pending;
pub mod store;
mod sync;

pub use backend::NoteBackend;
pub use board::{Board, BoardConfig};
pub use error::{GatewayError, Result};
pub use json_backend::JsonFileBackend;
pub use memory_backend::MemoryBackend;
pub use pending::PendingUpdates;
pub use store::BoardState;

// Domain types, re-exported so callers rarely need fusen-types directly.
pub use fusen_types::{Note, NoteColor, NoteId, NotePatch, UnknownColor, Vec2};
