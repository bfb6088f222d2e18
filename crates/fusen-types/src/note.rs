//! Note records and partial updates.
//!
//! [`Note`] is the unit of board state. [`NotePatch`] is the unit of change:
//! any subset of a note's mutable fields, merged field-wise with
//! last-write-wins semantics, both into notes and into other patches. The
//! serialized forms use camelCase keys and literal palette hex strings, so a
//! stored board is directly usable by a web front end.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::NoteId;

// ── Geometry ────────────────────────────────────────────────────────────────

/// A 2D point or extent, in board units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ── Palette ─────────────────────────────────────────────────────────────────

/// The fixed five-color note palette.
///
/// Serializes as the hex string of each tint, so stored boards carry CSS-ready
/// color values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteColor {
    #[serde(rename = "#fff9c4")]
    Lemon,
    #[serde(rename = "#ffecb3")]
    Amber,
    #[serde(rename = "#e1f5fe")]
    Sky,
    #[serde(rename = "#f3e5f5")]
    Lilac,
    #[serde(rename = "#e8f5e9")]
    Mint,
}

/// Error for a hex string outside the palette.
#[derive(Debug, thiserror::Error)]
#[error("unknown note color '{0}'")]
pub struct UnknownColor(pub String);

impl NoteColor {
    /// The palette in rotation order.
    pub const PALETTE: [NoteColor; 5] = [
        NoteColor::Lemon,
        NoteColor::Amber,
        NoteColor::Sky,
        NoteColor::Lilac,
        NoteColor::Mint,
    ];

    /// Round-robin palette color for the `n`th created note.
    pub fn for_index(n: usize) -> NoteColor {
        Self::PALETTE[n % Self::PALETTE.len()]
    }

    /// CSS hex string for this tint.
    pub fn as_hex(&self) -> &'static str {
        match self {
            NoteColor::Lemon => "#fff9c4",
            NoteColor::Amber => "#ffecb3",
            NoteColor::Sky => "#e1f5fe",
            NoteColor::Lilac => "#f3e5f5",
            NoteColor::Mint => "#e8f5e9",
        }
    }

    /// Parse a palette hex string.
    pub fn from_hex(s: &str) -> Result<NoteColor, UnknownColor> {
        Self::PALETTE
            .iter()
            .copied()
            .find(|c| c.as_hex() == s)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_hex())
    }
}

// ── Notes ───────────────────────────────────────────────────────────────────

/// A sticky note.
///
/// `z_index` is the stacking order: strictly increasing as notes are focused,
/// with exactly one note holding the maximum at rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub position: Vec2,
    pub size: Vec2,
    pub content: String,
    pub color: NoteColor,
    pub z_index: u32,
}

/// A partial note: any subset of the mutable fields.
///
/// Patches coalesce field-wise with last-write-wins: merging a newer patch
/// overwrites exactly the fields the newer patch carries and leaves the rest
/// alone, so unrelated mutations to the same note survive side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<NoteColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<u32>,
}

impl NotePatch {
    /// Patch carrying only a position.
    pub fn position(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Patch carrying only a size.
    pub fn size(size: Vec2) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Patch carrying only text content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Patch carrying only a stacking order.
    pub fn z_index(z_index: u32) -> Self {
        Self {
            z_index: Some(z_index),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.size.is_none()
            && self.content.is_none()
            && self.color.is_none()
            && self.z_index.is_none()
    }

    /// Merge `newer` into `self`: fields set in `newer` win, the rest keep
    /// their current value.
    pub fn merge(&mut self, newer: NotePatch) {
        let NotePatch {
            position,
            size,
            content,
            color,
            z_index,
        } = newer;
        if position.is_some() {
            self.position = position;
        }
        if size.is_some() {
            self.size = size;
        }
        if content.is_some() {
            self.content = content;
        }
        if color.is_some() {
            self.color = color;
        }
        if z_index.is_some() {
            self.z_index = z_index;
        }
    }

    /// Apply every set field to `note`.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(position) = self.position {
            note.position = position;
        }
        if let Some(size) = self.size {
            note.size = size;
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(color) = self.color {
            note.color = color;
        }
        if let Some(z_index) = self.z_index {
            note.z_index = z_index;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
