// src/post.rs
//! The unit of work: one Notion row on its way to becoming a Ghost post.

use crate::constants::{SLUG_FALLBACK, SLUG_MAX_LENGTH};
use crate::types::PageId;
use std::fmt;

/// Ghost post status. Drafts are never made public by this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublicationState {
    #[default]
    Draft,
    Published,
}

impl PublicationState {
    /// Maps a status label onto Ghost's accepted values; anything unrecognized is a draft.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("published") {
            Self::Published
        } else {
            Self::Draft
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for PublicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL slug of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug(String);

impl Slug {
    /// Derives a slug from a title: transliterated to ASCII, lowercased,
    /// non-alphanumeric runs collapsed to `-`, at most 80 characters.
    ///
    /// Never empty; falls back to `post`. Deriving from an already derived
    /// slug returns it unchanged.
    pub fn derive(title: &str) -> Self {
        let slug = slug::slugify(title);
        let truncated = match slug.char_indices().nth(SLUG_MAX_LENGTH) {
            Some((cut, _)) => &slug[..cut],
            None => slug.as_str(),
        };
        let trimmed = truncated.trim_matches('-');

        if trimmed.is_empty() {
            Self(SLUG_FALLBACK.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Normalizes an author-provided slug the same way as [`Slug::derive`],
    /// so a well-formed slug passes through unchanged.
    ///
    /// Returns `None` for blank input so callers can fall back to the title.
    pub fn explicit(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::derive(trimmed))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Notion row converted and ready to send to Ghost.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub page_id: PageId,
    pub title: String,
    pub slug: Slug,
    pub markdown: String,
    pub status: PublicationState,
}
