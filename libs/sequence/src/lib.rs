//! Media sequence engine for Recursive Creator
//!
//! This crate turns freeform pasted text into ordered lists of image and
//! video items, normalizes YouTube and Google Drive links, repairs legacy
//! proxy-wrapped image URLs, and keeps item positions dense while the list
//! is edited. It performs no I/O; the API service wires it to storage and
//! to the external Drive and YouTube collaborators.

pub mod classify;
pub mod document;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod item;
pub mod order;
pub mod playlist;
pub mod render;
pub mod repair;
pub mod sequence;
pub mod session;
pub mod story;

pub use classify::{Classified, ItemKind, classify_line};
pub use document::{
    PlaylistDocument, PublishStatus, SequenceDocument, StoryDocument, ToolKind, slugify,
};
pub use error::{EditError, IngestError, SaveError};
pub use ingest::{Ingested, LineWarning, MAX_ITEMS, WarningReason, ingest};
pub use item::{ImageItem, ItemField, MediaContent, MediaItem, Provider, VideoItem};
pub use order::{Direction, Positioned};
pub use playlist::{Playlist, PlaylistVideo};
pub use sequence::Sequence;
pub use session::{Applied, EditSession, RequestTicket};
pub use story::{Page, Story};
