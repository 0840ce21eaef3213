//! Field transformers applied to decoded norms.
//!
//! Each transformer is a pure function over decoded fields. Together they
//! turn a [`HeaderNorm`] into the law attributes and a [`BodyNorm`] into a
//! content item that still awaits its place in the hierarchy.

use crate::config::{ARTICLE_MARKER, HEADING_MARKER};
use crate::error::{IngestError, Result};
use crate::norm::{BodyNorm, HeaderNorm, TextBlock};
use crate::types::{ContentItem, ItemType, LawDocument, SectionInfo};

/// Body text and footnotes chosen from a text block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedText {
    pub body: Option<String>,
    pub footnotes: Option<String>,
}

/// Choose the body text: main content, else the table of contents.
///
/// Empty strings count as absent. Footnotes pass through unchanged.
#[must_use]
pub fn select_text(text: Option<TextBlock>) -> SelectedText {
    let Some(text) = text else {
        return SelectedText::default();
    };

    let non_empty = |value: Option<String>| value.filter(|s| !s.is_empty());
    SelectedText {
        body: non_empty(text.content).or_else(|| non_empty(text.toc)),
        footnotes: text.footnotes,
    }
}

/// Primary abbreviation and the remaining distinct ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbreviations {
    pub primary: String,
    pub extras: Vec<String>,
}

/// Merge official and legal abbreviations.
///
/// The official list comes first. Duplicates and blank entries are
/// dropped, keeping first-seen order; the first survivor is the primary.
///
/// # Examples
/// ```
/// use gii_ingest::transform::consolidate_abbreviations;
///
/// let amtabk = vec!["BGB".to_string()];
/// let jurabk = vec!["BGB".to_string(), "BürgGB".to_string()];
/// let abbreviations = consolidate_abbreviations("BJNR001950896", amtabk, jurabk).unwrap();
/// assert_eq!(abbreviations.primary, "BGB");
/// assert_eq!(abbreviations.extras, vec!["BürgGB"]);
/// ```
pub fn consolidate_abbreviations(
    doknr: &str,
    amtabk: Vec<String>,
    jurabk: Vec<String>,
) -> Result<Abbreviations> {
    let mut distinct: Vec<String> = Vec::with_capacity(amtabk.len() + jurabk.len());
    for abbreviation in amtabk.into_iter().chain(jurabk) {
        if !abbreviation.is_empty() && !distinct.contains(&abbreviation) {
            distinct.push(abbreviation);
        }
    }

    let mut entries = distinct.into_iter();
    let primary = entries.next().ok_or_else(|| IngestError::NoAbbreviation {
        doknr: doknr.to_string(),
    })?;

    Ok(Abbreviations {
        primary,
        extras: entries.collect(),
    })
}

/// Classify a body norm by its document identifier.
///
/// The article marker is checked first. Identifiers carrying both markers
/// are classified as articles and logged, since the precedence is inferred
/// from observed data rather than documented by the publisher.
pub fn classify_item(doknr: &str, has_body: bool, context: &str) -> Result<ItemType> {
    let is_article = doknr.contains(ARTICLE_MARKER);
    let is_heading = doknr.contains(HEADING_MARKER);

    if is_article {
        if is_heading {
            tracing::warn!(
                doknr = %doknr,
                "Document identifier carries both article and heading markers, classified as article"
            );
        }
        Ok(ItemType::Article)
    } else if is_heading {
        if has_body {
            Ok(ItemType::HeadingArticle)
        } else {
            Ok(ItemType::Heading)
        }
    } else {
        Err(IngestError::UnknownNormStructure {
            doknr: doknr.to_string(),
            context: context.to_string(),
        })
    }
}

/// Choose the authoritative name and title for an item.
///
/// Articles use their own fields; headings use their section-info block.
pub fn select_name_and_title(
    item_type: ItemType,
    name: Option<String>,
    title: Option<String>,
    section_info: Option<&SectionInfo>,
    context: &str,
) -> Result<(String, Option<String>)> {
    match item_type {
        ItemType::Article => {
            let name = name.ok_or_else(|| IngestError::MissingElement {
                element: "metadaten/enbez".to_string(),
                context: context.to_string(),
            })?;
            Ok((name, title))
        }
        ItemType::Heading | ItemType::HeadingArticle => {
            let section = section_info.ok_or_else(|| IngestError::MissingElement {
                element: "metadaten/gliederungseinheit".to_string(),
                context: context.to_string(),
            })?;
            Ok((section.name.clone(), section.title.clone()))
        }
    }
}

/// Law attributes from the header norm, with no content items yet.
pub fn law_attributes(header: HeaderNorm) -> Result<LawDocument> {
    let abbreviations = consolidate_abbreviations(&header.doknr, header.amtabk, header.jurabk)?;
    let text = select_text(header.text);

    Ok(LawDocument {
        doknr: header.doknr,
        source_timestamp: header.source_timestamp,
        first_published: header.first_published,
        title_long: header.title_long,
        title_short: header.title_short,
        abbreviation: abbreviations.primary,
        extra_abbreviations: abbreviations.extras,
        publication_info: header.publication_info,
        status_info: header.status_info,
        body_text: text.body,
        footnotes: text.footnotes,
        documentary_footnotes: header.documentary_footnotes,
        attachments: Default::default(),
        contents: Vec::new(),
    })
}

/// A content item awaiting its parent link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingItem {
    /// The item; `parent` and `order` are set by the hierarchy builder.
    pub item: ContentItem,

    /// Section code used to locate the item in the hierarchy.
    pub section_code: Option<String>,
}

/// Run the body transformers over one decoded norm.
pub fn content_item(norm: BodyNorm) -> Result<PendingItem> {
    let text = select_text(norm.text);
    let item_type = classify_item(&norm.doknr, text.body.is_some(), &norm.context)?;
    let (name, title) = select_name_and_title(
        item_type,
        norm.name,
        norm.title,
        norm.section_info.as_ref(),
        &norm.context,
    )?;

    let section_code = norm.section_info.as_ref().map(|info| info.code.clone());
    let section_info = if item_type.is_heading() {
        norm.section_info
    } else {
        None
    };

    Ok(PendingItem {
        item: ContentItem {
            doknr: norm.doknr,
            item_type,
            name,
            title,
            body_text: text.body,
            footnotes: text.footnotes,
            documentary_footnotes: norm.documentary_footnotes,
            section_info,
            parent: None,
            order: 0,
        },
        section_code,
    })
}
