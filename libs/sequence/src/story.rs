//! Paginated image stories

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    document::{DEFAULT_AUTHOR, StoryDocument},
    error::{EditError, SaveError},
    extract::drive_image_url,
    ingest::MAX_ITEMS,
    order::{self, Direction, Positioned},
    repair::unwrap_proxy_url,
};

/// One page of a story
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page_number: u32,
    #[serde(default)]
    pub image_url: String,
}

impl Positioned for Page {
    fn position(&self) -> u32 {
        self.page_number
    }

    fn set_position(&mut self, position: u32) {
        self.page_number = position;
    }
}

/// Story being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pages: Vec<Page>,
}

impl Default for Story {
    fn default() -> Self {
        Self::new()
    }
}

impl Story {
    /// A new story with a single empty page
    pub fn new() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            author: String::new(),
            pages: vec![Page {
                page_number: 1,
                image_url: String::new(),
            }],
        }
    }

    /// Rebuild a story from stored data, unwrapping proxied page URLs
    pub fn from_stored(document: StoryDocument) -> Self {
        let mut pages = document.pages;
        pages.sort_by_key(|page| page.page_number);
        let pages: Vec<Page> = pages
            .into_iter()
            .map(|mut page| {
                page.image_url = unwrap_proxy_url(&page.image_url);
                page
            })
            .collect();

        Self {
            title: document.title,
            subtitle: document.subtitle,
            author: document.author,
            pages: if pages.is_empty() {
                Self::new().pages
            } else {
                order::renumber(pages)
            },
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn add_page(&self) -> Result<Self, EditError> {
        if self.pages.len() >= MAX_ITEMS {
            return Err(EditError::LimitReached {
                max: MAX_ITEMS,
                noun: "pages",
            });
        }

        let mut pages = self.pages.clone();
        pages.push(Page::default());
        Ok(self.with_pages(order::renumber(pages)))
    }

    pub fn remove_page(&self, page_number: u32) -> Result<Self, EditError> {
        if self.pages.len() <= 1 {
            return Err(EditError::LastEntry { noun: "page" });
        }
        Ok(self.with_pages(order::remove(&self.pages, page_number)?))
    }

    pub fn move_page(&self, page_number: u32, direction: Direction) -> Result<Self, EditError> {
        Ok(self.with_pages(order::move_adjacent(&self.pages, page_number, direction)?))
    }

    /// Set a page's image; Drive file links become direct-view links
    pub fn set_page_url(&self, page_number: u32, url: &str) -> Result<Self, EditError> {
        let image_url = drive_image_url(url.trim());
        let pages = order::update(&self.pages, page_number, |page| {
            Ok(Page { image_url, ..page })
        })?;
        Ok(self.with_pages(pages))
    }

    /// Validate and produce the stored shape; pages without an image are dropped
    pub fn prepare(&self, creator_id: Option<Uuid>) -> Result<StoryDocument, SaveError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(SaveError::TitleRequired);
        }
        if self.pages.len() > MAX_ITEMS {
            return Err(SaveError::TooManyEntries {
                max: MAX_ITEMS,
                found: self.pages.len(),
                noun: "pages",
            });
        }

        let pages: Vec<Page> = self
            .pages
            .iter()
            .filter(|page| !page.image_url.trim().is_empty())
            .cloned()
            .collect();
        if pages.is_empty() {
            return Err(SaveError::NoValidContent("page"));
        }

        let author = self.author.trim();
        Ok(StoryDocument {
            title: title.to_string(),
            subtitle: self.subtitle.trim().to_string(),
            author: if author.is_empty() {
                DEFAULT_AUTHOR.to_string()
            } else {
                author.to_string()
            },
            is_active: false,
            reviewed: false,
            creator_id,
            pages: order::renumber(pages),
        })
    }

    fn with_pages(&self, pages: Vec<Page>) -> Self {
        Self {
            pages,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{order::is_contiguous, render::proxy_image_url};

    #[test]
    fn test_new_story_has_one_empty_page() {
        let story = Story::new();
        assert_eq!(story.pages().len(), 1);
        assert_eq!(story.pages()[0].page_number, 1);
    }

    #[test]
    fn test_last_page_cannot_be_removed() {
        assert_eq!(
            Story::new().remove_page(1),
            Err(EditError::LastEntry { noun: "page" })
        );
    }

    #[test]
    fn test_page_ceiling() {
        let mut story = Story::new();
        for _ in 1..MAX_ITEMS {
            story = story.add_page().unwrap();
        }
        assert_eq!(story.pages().len(), MAX_ITEMS);
        assert_eq!(
            story.add_page().unwrap_err().to_string(),
            "Maximum 50 pages allowed"
        );
    }

    #[test]
    fn test_set_page_url_converts_drive_links() {
        let story = Story::new()
            .set_page_url(1, " https://drive.google.com/file/d/PAGE1/view ")
            .unwrap();
        assert_eq!(
            story.pages()[0].image_url,
            "https://drive.google.com/uc?export=view&id=PAGE1"
        );
    }

    #[test]
    fn test_move_and_remove_keep_numbering() {
        let story = Story::new()
            .add_page()
            .unwrap()
            .add_page()
            .unwrap()
            .set_page_url(3, "https://example.com/3.png")
            .unwrap()
            .move_page(3, Direction::Up)
            .unwrap()
            .remove_page(1)
            .unwrap();

        assert_eq!(story.pages().len(), 2);
        assert!(is_contiguous(story.pages()));
        assert_eq!(story.pages()[0].image_url, "https://example.com/3.png");
    }

    #[test]
    fn test_stored_pages_are_unwrapped() {
        let stored = StoryDocument {
            title: "Old story".to_string(),
            subtitle: String::new(),
            author: "Ana".to_string(),
            is_active: false,
            reviewed: false,
            creator_id: None,
            pages: vec![
                Page {
                    page_number: 2,
                    image_url: "https://example.com/2.png".to_string(),
                },
                Page {
                    page_number: 1,
                    image_url: proxy_image_url("https://example.com/1.png"),
                },
            ],
        };

        let story = Story::from_stored(stored);
        assert_eq!(story.pages()[0].image_url, "https://example.com/1.png");
        assert_eq!(story.pages()[1].image_url, "https://example.com/2.png");
    }

    #[test]
    fn test_prepare() {
        let mut story = Story::new().add_page().unwrap();
        assert_eq!(story.prepare(None), Err(SaveError::TitleRequired));

        story.title = "Tale".to_string();
        assert_eq!(story.prepare(None), Err(SaveError::NoValidContent("page")));

        let story = story.set_page_url(2, "https://example.com/b.png").unwrap();
        let document = story.prepare(None).unwrap();
        assert_eq!(document.author, "Anonymous");
        assert_eq!(document.pages.len(), 1);
        assert_eq!(document.pages[0].page_number, 1);
    }

    #[test]
    fn test_prepare_rejects_oversized_stored_story() {
        let stored = StoryDocument {
            title: "Epic".to_string(),
            subtitle: String::new(),
            author: String::new(),
            is_active: false,
            reviewed: false,
            creator_id: None,
            pages: (1..=60)
                .map(|n| Page {
                    page_number: n,
                    image_url: format!("https://example.com/{n}.png"),
                })
                .collect(),
        };

        assert_eq!(
            Story::from_stored(stored).prepare(None).unwrap_err().to_string(),
            "Maximum 50 pages allowed. You have 60."
        );
    }
}
