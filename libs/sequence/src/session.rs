//! Editing session for one sequence
//!
//! The session owns the editable state. Results of network-bound work are
//! applied only when they carry the latest `RequestTicket`; anything older
//! is dropped without touching state.

use uuid::Uuid;

use crate::{
    document::SequenceDocument,
    error::{EditError, IngestError, SaveError},
    ingest::{LineWarning, MAX_ITEMS},
    item::{ItemField, MediaItem},
    order::Direction,
    sequence::Sequence,
};

/// Monotonic tag handed out when a network-bound operation starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

/// Outcome of delivering an asynchronous result to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// A newer request was issued; the result was discarded
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    pub title: String,
    pub description: String,
    bulk_text: String,
    sequence: Sequence,
    warnings: Vec<LineWarning>,
    issued: u64,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn bulk_text(&self) -> &str {
        &self.bulk_text
    }

    pub fn warnings(&self) -> &[LineWarning] {
        &self.warnings
    }

    pub fn set_bulk_text(&mut self, text: impl Into<String>) {
        self.bulk_text = text.into();
    }

    /// Start a network-bound operation
    pub fn begin_request(&mut self) -> RequestTicket {
        self.issued += 1;
        RequestTicket(self.issued)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Replace the sequence with the parse of the current bulk text.
    /// On error nothing changes.
    pub fn parse_bulk(&mut self) -> Result<&[LineWarning], IngestError> {
        let (sequence, ingested) = Sequence::parse(&self.bulk_text, MAX_ITEMS)?;
        self.sequence = sequence;
        self.warnings = ingested.warnings;
        Ok(&self.warnings)
    }

    /// Feed the URL list returned by a folder import into the bulk text and
    /// parse it, as though it had been pasted.
    pub fn apply_folder_import(
        &mut self,
        ticket: RequestTicket,
        urls: &[String],
    ) -> Result<Applied, IngestError> {
        if !self.is_current(ticket) {
            return Ok(Applied::Stale);
        }

        let text = urls.join("\n");
        let (sequence, ingested) = Sequence::parse(&text, MAX_ITEMS)?;
        self.bulk_text = text;
        self.sequence = sequence;
        self.warnings = ingested.warnings;
        Ok(Applied::Current)
    }

    /// Replace the session with a stored document
    pub fn apply_loaded(&mut self, ticket: RequestTicket, document: SequenceDocument) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Stale;
        }

        *self = Self {
            issued: self.issued,
            ..Self::restore(document.title, document.description, document.items)
        };
        Applied::Current
    }

    /// Rebuild a session from stored or client-held items. Items are
    /// repaired and tagged, and the bulk text is regenerated from them.
    pub fn restore(title: String, description: String, items: Vec<MediaItem>) -> Self {
        let sequence = Sequence::from_stored(items);
        Self {
            title,
            description,
            bulk_text: sequence.to_bulk_text(),
            sequence,
            ..Self::default()
        }
    }

    pub fn move_item(&mut self, from: u32, to: u32) -> Result<(), EditError> {
        self.sequence = self.sequence.move_to(from, to)?;
        Ok(())
    }

    pub fn move_item_adjacent(&mut self, position: u32, direction: Direction) -> Result<(), EditError> {
        self.sequence = self.sequence.move_adjacent(position, direction)?;
        Ok(())
    }

    pub fn remove_item(&mut self, position: u32) -> Result<(), EditError> {
        self.sequence = self.sequence.remove(position)?;
        Ok(())
    }

    pub fn edit_item(
        &mut self,
        position: u32,
        field: ItemField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        self.sequence = self.sequence.edit(position, field, value)?;
        Ok(())
    }

    /// Validate and build the document to persist. Every save resets the
    /// publish flags so the sequence goes back through review.
    pub fn prepare_save(&self, creator_id: Uuid) -> Result<SequenceDocument, SaveError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(SaveError::TitleRequired);
        }

        if self.sequence.len() > MAX_ITEMS {
            return Err(SaveError::TooManyEntries {
                max: MAX_ITEMS,
                found: self.sequence.len(),
                noun: "items",
            });
        }

        let items = self.sequence.valid_items();
        if items.is_empty() {
            return Err(SaveError::NoValidContent("item"));
        }

        Ok(SequenceDocument {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            is_active: false,
            reviewed: false,
            creator_id,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_leaves_session_untouched() {
        let mut session = EditSession::new();
        session.set_bulk_text("https://example.com/a.png\nhttps://example.com/b.png");
        session.parse_bulk().unwrap();
        let before = session.sequence().clone();

        session.set_bulk_text(vec!["https://example.com/x.png"; 51].join("\n"));
        assert!(session.parse_bulk().is_err());
        assert_eq!(session.sequence(), &before);
    }

    #[test]
    fn test_stale_import_is_discarded() {
        let mut session = EditSession::new();
        let first = session.begin_request();
        let second = session.begin_request();

        let urls = vec!["https://example.com/old.png".to_string()];
        assert_eq!(session.apply_folder_import(first, &urls), Ok(Applied::Stale));
        assert!(session.sequence().is_empty());
        assert_eq!(session.bulk_text(), "");

        let urls = vec![
            "https://drive.google.com/uc?export=view&id=IMG1".to_string(),
            "video: https://drive.google.com/file/d/VID1/view".to_string(),
        ];
        assert_eq!(session.apply_folder_import(second, &urls), Ok(Applied::Current));
        assert_eq!(session.sequence().len(), 2);
        assert_eq!(session.bulk_text(), urls.join("\n"));
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut session = EditSession::new();
        let stale = session.begin_request();
        session.begin_request();

        let document = SequenceDocument {
            title: "Loaded".to_string(),
            description: String::new(),
            is_active: true,
            reviewed: true,
            creator_id: Uuid::nil(),
            items: vec![MediaItem::image(1, "https://example.com/a.png")],
        };
        assert_eq!(session.apply_loaded(stale, document), Applied::Stale);
        assert_eq!(session.title, "");
    }

    #[test]
    fn test_prepare_save() {
        let mut session = EditSession::new();
        session.set_bulk_text("https://example.com/a.png");
        session.parse_bulk().unwrap();
        assert_eq!(session.prepare_save(Uuid::nil()), Err(SaveError::TitleRequired));

        session.title = "  Trip  ".to_string();
        let document = session.prepare_save(Uuid::nil()).unwrap();
        assert_eq!(document.title, "Trip");
        assert!(!document.is_active);
        assert!(!document.reviewed);

        session.set_bulk_text("");
        session.parse_bulk().unwrap();
        assert_eq!(
            session.prepare_save(Uuid::nil()).unwrap_err().to_string(),
            "At least one item with content is required"
        );
    }

    #[test]
    fn test_prepare_save_enforces_ceiling() {
        let items = (0..120)
            .map(|n| MediaItem::image(0, format!("https://example.com/{n}.png")))
            .collect();
        let session = EditSession::restore("Too long".to_string(), String::new(), items);

        assert_eq!(
            session.prepare_save(Uuid::nil()),
            Err(SaveError::TooManyEntries {
                max: MAX_ITEMS,
                found: 120,
                noun: "items",
            })
        );

        let items = (0..MAX_ITEMS)
            .map(|n| MediaItem::image(0, format!("https://example.com/{n}.png")))
            .collect();
        let session = EditSession::restore("Full".to_string(), String::new(), items);
        assert_eq!(session.prepare_save(Uuid::nil()).unwrap().items.len(), MAX_ITEMS);
    }
}
