//! Shared note types for Fusen.
//!
//! This crate is the data foundation: the note record, its typed identifier,
//! the color palette, and the partial-update type the sync engine coalesces.
//! It has **no internal fusen dependencies**, a pure leaf crate that the
//! engine builds on.
//!
//! # Key Types
//!
//! |---------------|-----------------------------------------------|
//! | Type          | Purpose                                       |
//! |---------------|-----------------------------------------------|
//! | [`Note`]      | One sticky note (position, size, text, color) |
//! | [`NoteId`]    | Which note (UUIDv7)                           |
//! | [`NotePatch`] | Any subset of a note's mutable fields         |
//! | [`NoteColor`] | The fixed five-color palette                  |
//! | [`Vec2`]      | 2D position or extent                         |
//! |---------------|-----------------------------------------------|

pub mod ids;
pub mod note;

// Re-export primary types at crate root for convenience.
pub use ids::NoteId;
pub use note::{Note, NoteColor, NotePatch, UnknownColor, Vec2};
