//! Sticky notes, both standalone and attached to jars.

use serde::{Deserialize, Serialize};

/// Short free-form note rendered on a coloured card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: u64,
    pub text: String,
    pub color: NoteColor,
}

/// Fixed palette the UI offers for notes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    Yellow,
    Pink,
    Blue,
    Green,
    Purple,
}
