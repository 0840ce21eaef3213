//! Hierarchy reconstruction from section codes.
//!
//! Body norms arrive as a flat sequence. Their nesting is encoded only in
//! the section code of each heading: fixed-width segments, one per level
//! (`"010"` contains `"010020"` contains `"010020010"`). Articles either carry
//! the code of the section they belong to or no code at all.
//!
//! The builder makes a single forward pass carrying a [`ParserState`] and
//! then runs a corrective pass demoting heading-articles that ended up
//! without children.

use std::collections::{HashMap, HashSet};

use crate::config::SECTION_CODE_SEGMENT_WIDTH;
use crate::transform::PendingItem;
use crate::types::{ContentItem, ItemType};

/// State carried through one document's hierarchy build.
#[derive(Debug, Default)]
pub struct ParserState {
    /// Index of the most recent heading or heading-article.
    pub current_parent: Option<usize>,

    /// Section code mapped to the index of the heading that introduced it.
    pub sections_by_code: HashMap<String, usize>,

    /// Document identifiers of items with at least one child.
    pub items_with_children: HashSet<String>,
}

impl ParserState {
    /// Find the nearest registered ancestor section for a code.
    ///
    /// Strips one trailing segment at a time, from the full code down to the
    /// empty prefix, and returns the first registered match. Source data
    /// skipping intermediate levels still resolves to the closest ancestor.
    #[must_use]
    pub fn find_parent(&self, code: &str) -> Option<usize> {
        segment_prefixes(code)
            .rev()
            .find_map(|prefix| self.sections_by_code.get(prefix).copied())
    }
}

/// Every segment-aligned prefix of a code, shortest (empty) first.
fn segment_prefixes<'a>(code: &'a str) -> impl DoubleEndedIterator<Item = &'a str> + 'a {
    let mut ends: Vec<usize> = code
        .char_indices()
        .step_by(SECTION_CODE_SEGMENT_WIDTH)
        .map(|(offset, _)| offset)
        .collect();
    ends.push(code.len());

    ends.into_iter().map(move |end| &code[..end])
}

/// Builds the parent links of a document's content items.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    state: ParserState,
    items: Vec<ContentItem>,
}

impl HierarchyBuilder {
    /// Create a builder with fresh state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the next item in the hierarchy and return its index.
    pub fn push(&mut self, pending: PendingItem) -> usize {
        let PendingItem {
            mut item,
            section_code,
        } = pending;
        let index = self.items.len();
        let state = &mut self.state;

        let parent = if item.item_type.is_heading() {
            let code = section_code.unwrap_or_default();
            let parent = state.find_parent(&code);
            state.sections_by_code.insert(code, index);
            state.current_parent = Some(index);
            parent
        } else {
            match section_code.as_deref().filter(|code| !code.is_empty()) {
                Some(code) => state.find_parent(code),
                None => state.current_parent,
            }
        };

        if let Some(parent) = parent {
            if let Some(parent_item) = self.items.get(parent) {
                state.items_with_children.insert(parent_item.doknr.clone());
            }
        }

        item.parent = parent;
        item.order = index;
        self.items.push(item);
        index
    }

    /// Read-only view of the state, for inspection.
    #[must_use]
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Run the corrective pass and return the finished items.
    ///
    /// Heading-articles that never received a child become plain articles.
    #[must_use]
    pub fn finish(self) -> Vec<ContentItem> {
        let Self { state, mut items } = self;

        for item in &mut items {
            if item.item_type == ItemType::HeadingArticle
                && !state.items_with_children.contains(&item.doknr)
            {
                tracing::debug!(doknr = %item.doknr, "Demoting childless heading article");
                item.item_type = ItemType::Article;
                item.section_info = None;
            }
        }

        items
    }
}

/// Build the hierarchy for a sequence of pending items in document order.
pub fn build_hierarchy(items: impl IntoIterator<Item = PendingItem>) -> Vec<ContentItem> {
    items
        .into_iter()
        .fold(HierarchyBuilder::new(), |mut builder, item| {
            builder.push(item);
            builder
        })
        .finish()
}
