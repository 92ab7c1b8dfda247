//! Error types for ingestion, editing and saving
//!
//! Every error leaves the list it was raised against untouched; callers
//! render the `Display` text straight to the user.

use thiserror::Error;

use crate::{classify::ItemKind, item::ItemField};

/// Error raised by bulk ingestion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// More lines were pasted than a list may hold
    #[error("Maximum {max} items allowed. You have {found} URLs.")]
    TooManyItems { max: usize, found: usize },
}

/// Error raised by a structural or field edit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The referenced position does not exist in the list
    #[error("Position {position} is out of range (1..={len})")]
    PositionOutOfRange { position: u32, len: usize },

    /// The edited field does not exist on this kind of item
    #[error("{field} cannot be set on a {kind} item")]
    FieldNotApplicable { field: ItemField, kind: ItemKind },

    /// The list already holds its maximum number of entries
    #[error("Maximum {max} {noun} allowed")]
    LimitReached { max: usize, noun: &'static str },

    /// The last remaining entry cannot be removed
    #[error("At least one {noun} must remain")]
    LastEntry { noun: &'static str },
}

/// Error raised when preparing a document for persistence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("Title is required")]
    TitleRequired,

    #[error("At least one {0} with content is required")]
    NoValidContent(&'static str),

    /// More entries than a document may hold
    #[error("Maximum {max} {noun} allowed. You have {found}.")]
    TooManyEntries {
        max: usize,
        found: usize,
        noun: &'static str,
    },
}
