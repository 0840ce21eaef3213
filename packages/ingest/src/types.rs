//! Core data types: the law document and its content items.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::slug::slugify;

/// Classification of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A single provision (paragraph, article, annex entry).
    Article,

    /// A structural heading (book, part, chapter, section).
    Heading,

    /// A structural heading that carries its own body text and has descendants.
    HeadingArticle,
}

impl ItemType {
    /// Get the string value used in stored output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Heading => "heading",
            Self::HeadingArticle => "heading_article",
        }
    }

    /// Whether items of this type open a new section in the hierarchy.
    #[must_use]
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::Heading | Self::HeadingArticle)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural position of a heading (`gliederungseinheit`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionInfo {
    /// Section code: fixed-width segments, one per nesting level.
    pub code: String,

    /// Display name (e.g., "Abschnitt 1").
    pub name: String,

    /// Title, may contain markup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Where a law was published (`fundstelle`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationInfo {
    /// Periodical (e.g., "BGBl I").
    pub periodical: String,

    /// Citation within the periodical (e.g., "2005, 114").
    pub reference: String,
}

/// Consolidation status of a law (`standangabe`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    /// Status category (e.g., "Stand", "Neuf", "Hinweis").
    pub category: String,

    /// Free-text comment, may contain markup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One heading or article of a law.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Document identifier, unique across the corpus.
    pub doknr: String,

    /// Classification after the corrective pass.
    pub item_type: ItemType,

    /// Display name (e.g., "§ 1", "Abschnitt 2").
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnotes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentary_footnotes: Option<String>,

    /// Present only for headings and heading-articles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_info: Option<SectionInfo>,

    /// Index of the parent item within [`LawDocument::contents`].
    pub parent: Option<usize>,

    /// Zero-based position in the source document.
    pub order: usize,
}

/// A parsed law: header attributes plus the ordered content items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawDocument {
    /// Document identifier, unique across the corpus.
    pub doknr: String,

    /// Build timestamp of the source file (`builddate`).
    pub source_timestamp: String,

    /// Date of the original enactment (`ausfertigung-datum`).
    pub first_published: String,

    pub title_long: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_short: Option<String>,

    /// Primary abbreviation.
    pub abbreviation: String,

    /// All other distinct abbreviations in first-seen order.
    pub extra_abbreviations: Vec<String>,

    pub publication_info: Vec<PublicationInfo>,

    pub status_info: Vec<StatusInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnotes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentary_footnotes: Option<String>,

    /// Attachment file name mapped to its inline representation (a data URI).
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub attachments: BTreeMap<String, String>,

    /// Content items in document order.
    pub contents: Vec<ContentItem>,
}

impl LawDocument {
    /// Human-readable key derived from the abbreviation.
    ///
    /// Several laws may share a slug, see [`crate::slug::find_slug_collisions`].
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.abbreviation)
    }

    /// Merge attachments into the document without validation.
    #[must_use]
    pub fn with_attachments(mut self, attachments: BTreeMap<String, String>) -> Self {
        self.attachments.extend(attachments);
        self
    }

    /// Names of all attachments, sorted.
    #[must_use]
    pub fn attachment_names(&self) -> Vec<&str> {
        self.attachments.keys().map(String::as_str).collect()
    }

    /// Items whose parent is `parent`, in document order.
    ///
    /// `None` yields the top-level items.
    pub fn children_of(
        &self,
        parent: Option<usize>,
    ) -> impl Iterator<Item = (usize, &ContentItem)> + '_ {
        self.contents
            .iter()
            .enumerate()
            .filter(move |(_, item)| item.parent == parent)
    }

    /// The parent of the item at `index`.
    #[must_use]
    pub fn parent_of(&self, index: usize) -> Option<&ContentItem> {
        self.contents
            .get(index)
            .and_then(|item| item.parent)
            .and_then(|parent| self.contents.get(parent))
    }

    /// Nesting depth of the item at `index`; top-level items are at level 0.
    #[must_use]
    pub fn level_of(&self, index: usize) -> usize {
        let mut level = 0;
        let mut current = self.contents.get(index).and_then(|item| item.parent);
        while let Some(parent) = current {
            level += 1;
            current = self.contents.get(parent).and_then(|item| item.parent);
        }
        level
    }

    /// Look up a content item by its document identifier.
    #[must_use]
    pub fn find_item(&self, doknr: &str) -> Option<&ContentItem> {
        self.contents.iter().find(|item| item.doknr == doknr)
    }
}
