//! Decoders for the two norm shapes of a published law file.
//!
//! The first `norm` of a file is the header describing the law as a whole;
//! every following `norm` is one heading or article of its body. Both
//! shapes are read with the same [`FieldReader`] combinator.

mod body;
mod fields;
mod header;

pub use body::{decode_body_norm, BodyNorm};
pub use fields::FieldReader;
pub use header::{decode_header_norm, HeaderNorm};

use roxmltree::Node;

use crate::error::{IngestError, Result};
use crate::xml::MixedContent;

/// The three-part text block of a norm (`textdaten/text`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    /// Main content, effectively-empty forms normalized to `None`.
    pub content: Option<String>,

    /// Table of contents, used when there is no main content.
    pub toc: Option<String>,

    pub footnotes: Option<String>,
}

/// Path of the text block relative to a norm.
const TEXT_BLOCK_PATH: &str = "textdaten/text";

/// Path of the documentary footnotes relative to a norm.
const DOCUMENTARY_FOOTNOTES_PATH: &str = "textdaten/fussnoten/Content";

fn decode_text_block(reader: &FieldReader<'_, '_>) -> Result<Option<TextBlock>> {
    reader.record(TEXT_BLOCK_PATH, |text| {
        Ok(TextBlock {
            content: text.optional_mixed("Content", MixedContent::CONTENT),
            toc: text.optional_mixed("TOC", MixedContent::VERBATIM),
            footnotes: text.optional_mixed("Footnotes", MixedContent::VERBATIM),
        })
    })
}

fn decode_documentary_footnotes(reader: &FieldReader<'_, '_>) -> Option<String> {
    reader.optional_mixed(DOCUMENTARY_FOOTNOTES_PATH, MixedContent::CONTENT)
}

/// One decoded norm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Norm {
    Header(HeaderNorm),
    Body(BodyNorm),
}

impl Norm {
    #[must_use]
    pub fn doknr(&self) -> &str {
        match self {
            Self::Header(header) => &header.doknr,
            Self::Body(body) => &body.doknr,
        }
    }
}

/// Decode the norm at `position` within its document.
///
/// Position 0 is the header; every later norm is a body norm.
pub fn decode_norm(node: Node<'_, '_>, position: usize) -> Result<Norm> {
    let norm = if position == 0 {
        Norm::Header(decode_header_norm(node)?)
    } else {
        Norm::Body(decode_body_norm(node)?)
    };

    tracing::debug!(doknr = %norm.doknr(), position, "Decoded norm");
    Ok(norm)
}

/// Decoded norms of one document: the header and the body norms in order.
#[derive(Debug, Clone)]
pub struct NormSet {
    pub header: HeaderNorm,
    pub body: Vec<BodyNorm>,
}

/// Decode all norms of a document, header first.
pub fn decode_norms<'a, 'input: 'a>(
    nodes: impl IntoIterator<Item = Node<'a, 'input>>,
) -> Result<NormSet> {
    let mut header = None;
    let mut body = Vec::new();

    for (position, node) in nodes.into_iter().enumerate() {
        match decode_norm(node, position)? {
            Norm::Header(norm) => header = Some(norm),
            Norm::Body(norm) => body.push(norm),
        }
    }

    let header = header.ok_or(IngestError::NoHeaderNorm)?;
    tracing::debug!(
        doknr = %header.doknr,
        body_norms = body.len(),
        "Decoded norms"
    );

    Ok(NormSet { header, body })
}
