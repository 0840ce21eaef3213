//! Header norm decoding.

use roxmltree::Node;

use super::fields::FieldReader;
use super::{decode_documentary_footnotes, decode_text_block, TextBlock};
use crate::error::Result;
use crate::types::{PublicationInfo, StatusInfo};
use crate::xml::MixedContent;

/// Raw fields of the header norm, before transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderNorm {
    pub doknr: String,

    /// `builddate` attribute.
    pub source_timestamp: String,

    /// `ausfertigung-datum`.
    pub first_published: String,

    /// Legal abbreviations (`jurabk`), at least one.
    pub jurabk: Vec<String>,

    /// Official abbreviations (`amtabk`), possibly none.
    pub amtabk: Vec<String>,

    pub title_long: String,

    pub title_short: Option<String>,

    pub text: Option<TextBlock>,

    pub publication_info: Vec<PublicationInfo>,

    pub status_info: Vec<StatusInfo>,

    pub documentary_footnotes: Option<String>,

    /// Source description for error messages.
    pub context: String,
}

/// Decode the header norm of a law.
pub fn decode_header_norm(node: Node<'_, '_>) -> Result<HeaderNorm> {
    let reader = FieldReader::new(node);

    Ok(HeaderNorm {
        doknr: reader.attribute("doknr")?,
        source_timestamp: reader.attribute("builddate")?,
        first_published: reader.string("metadaten/ausfertigung-datum")?,
        jurabk: reader.required_strings("metadaten/jurabk")?,
        amtabk: reader.strings("metadaten/amtabk"),
        title_long: reader
            .mixed("metadaten/langue", MixedContent::VERBATIM)?
            .unwrap_or_default(),
        title_short: reader.optional_mixed("metadaten/kurzue", MixedContent::VERBATIM),
        text: decode_text_block(&reader)?,
        publication_info: reader.records("metadaten/fundstelle", |fundstelle| {
            Ok(PublicationInfo {
                periodical: fundstelle.string("periodikum")?,
                reference: fundstelle.string("zitstelle")?,
            })
        })?,
        status_info: reader.records("metadaten/standangabe", |standangabe| {
            Ok(StatusInfo {
                category: standangabe.string("standtyp")?,
                comment: standangabe.optional_mixed("standkommentar", MixedContent::VERBATIM),
            })
        })?,
        documentary_footnotes: decode_documentary_footnotes(&reader),
        context: reader.context().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use pretty_assertions::assert_eq;
    use roxmltree::Document;

    const HEADER: &str = r#"<norm builddate="20200506212523" doknr="BJNR000010950">
<metadaten>
<jurabk>AbwAG</jurabk>
<amtabk>AbwAG</amtabk>
<ausfertigung-datum manuell="ja">1976-09-13</ausfertigung-datum>
<fundstelle typ="amtlich"><periodikum>BGBl I</periodikum><zitstelle>2005, 114</zitstelle></fundstelle>
<kurzue>Abwasserabgabengesetz</kurzue>
<langue>Gesetz über Abgaben für das Einleiten von Abwasser in Gewässer</langue>
<standangabe checked="ja"><standtyp>Neuf</standtyp><standkommentar>Neugefasst durch Bek. v. 18.1.2005 I 114</standkommentar></standangabe>
<standangabe checked="ja"><standtyp>Hinweis</standtyp></standangabe>
</metadaten>
<textdaten><fussnoten><Content><P>(+++ Textnachweis ab: 1.1.1981 +++)</P></Content></fussnoten></textdaten>
</norm>"#;

    #[test]
    fn test_decode_header_norm() {
        let doc = Document::parse(HEADER).unwrap();
        let header = decode_header_norm(doc.root_element()).unwrap();

        assert_eq!(header.doknr, "BJNR000010950");
        assert_eq!(header.source_timestamp, "20200506212523");
        assert_eq!(header.first_published, "1976-09-13");
        assert_eq!(header.jurabk, vec!["AbwAG"]);
        assert_eq!(header.amtabk, vec!["AbwAG"]);
        assert_eq!(
            header.title_long,
            "Gesetz über Abgaben für das Einleiten von Abwasser in Gewässer"
        );
        assert_eq!(header.title_short.as_deref(), Some("Abwasserabgabengesetz"));
        assert_eq!(header.text, None);
        assert_eq!(
            header.publication_info,
            vec![PublicationInfo {
                periodical: "BGBl I".to_string(),
                reference: "2005, 114".to_string(),
            }]
        );
        assert_eq!(
            header.status_info,
            vec![
                StatusInfo {
                    category: "Neuf".to_string(),
                    comment: Some("Neugefasst durch Bek. v. 18.1.2005 I 114".to_string()),
                },
                StatusInfo {
                    category: "Hinweis".to_string(),
                    comment: None,
                },
            ]
        );
        assert_eq!(
            header.documentary_footnotes.as_deref(),
            Some("<P>(+++ Textnachweis ab: 1.1.1981 +++)</P>")
        );
    }

    #[test]
    fn test_decode_header_norm_missing_builddate() {
        let xml = HEADER.replace(r#"builddate="20200506212523" "#, "");
        let doc = Document::parse(&xml).unwrap();

        let err = decode_header_norm(doc.root_element()).unwrap_err();
        assert!(matches!(err, IngestError::MissingAttribute { ref attribute, .. } if attribute == "builddate"));
    }

    #[test]
    fn test_decode_header_norm_missing_long_title() {
        let xml = HEADER.replace(
            "<langue>Gesetz über Abgaben für das Einleiten von Abwasser in Gewässer</langue>",
            "",
        );
        let doc = Document::parse(&xml).unwrap();

        let err = decode_header_norm(doc.root_element()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required XML element: metadaten/langue in norm BJNR000010950 at 1:1"
        );
    }

    #[test]
    fn test_decode_header_norm_requires_jurabk() {
        let xml = HEADER.replace("<jurabk>AbwAG</jurabk>", "");
        let doc = Document::parse(&xml).unwrap();

        let err = decode_header_norm(doc.root_element()).unwrap_err();
        assert!(matches!(err, IngestError::MissingElement { ref element, .. } if element == "metadaten/jurabk"));
    }

    #[test]
    fn test_decode_header_norm_long_title_keeps_markup() {
        let xml = HEADER.replace(
            "<langue>Gesetz über Abgaben für das Einleiten von Abwasser in Gewässer</langue>",
            "<langue>Gesetz über <SUP>Abgaben</SUP></langue>",
        );
        let doc = Document::parse(&xml).unwrap();

        let header = decode_header_norm(doc.root_element()).unwrap();
        assert_eq!(header.title_long, "Gesetz über <SUP>Abgaben</SUP>");
    }
}
