//! Body norm decoding.

use roxmltree::Node;

use super::fields::FieldReader;
use super::{decode_documentary_footnotes, decode_text_block, TextBlock};
use crate::error::Result;
use crate::types::SectionInfo;
use crate::xml::MixedContent;

/// Raw fields of one body norm, before transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyNorm {
    pub doknr: String,

    pub text: Option<TextBlock>,

    pub documentary_footnotes: Option<String>,

    /// Display name (`enbez`); authoritative for articles only.
    pub name: Option<String>,

    /// Title (`titel`); authoritative for articles only.
    pub title: Option<String>,

    /// Structural position (`gliederungseinheit`).
    pub section_info: Option<SectionInfo>,

    /// Source description for error messages.
    pub context: String,
}

impl BodyNorm {
    /// The section code, if the norm carries a section-info block.
    #[must_use]
    pub fn section_code(&self) -> Option<&str> {
        self.section_info.as_ref().map(|info| info.code.as_str())
    }
}

/// Decode one body norm.
pub fn decode_body_norm(node: Node<'_, '_>) -> Result<BodyNorm> {
    let reader = FieldReader::new(node);

    Ok(BodyNorm {
        doknr: reader.attribute("doknr")?,
        text: decode_text_block(&reader)?,
        documentary_footnotes: decode_documentary_footnotes(&reader),
        name: reader.optional_string("metadaten/enbez"),
        title: reader.optional_mixed("metadaten/titel", MixedContent::CONTENT),
        section_info: reader.record("metadaten/gliederungseinheit", |section| {
            Ok(SectionInfo {
                code: section.string("gliederungskennzahl")?,
                name: section.string("gliederungsbez")?,
                title: section.optional_mixed("gliederungstitel", MixedContent::CONTENT),
            })
        })?,
        context: reader.context().to_string(),
    })
}
