//! Document assembly: from a parsed XML tree to a [`LawDocument`].

use roxmltree::{Document, Node};

use crate::config::{xml_parsing_options, NORM_TAG, ROOT_TAG};
use crate::error::Result;
use crate::hierarchy::HierarchyBuilder;
use crate::norm::{decode_norms, NormSet};
use crate::transform::{content_item, law_attributes};
use crate::types::LawDocument;
use crate::xml::{find_children, get_tag_name};

/// Parse a law from its XML source text.
///
/// # Examples
/// ```
/// use gii_ingest::parse_law_str;
///
/// let xml = r#"<dokumente>
///   <norm builddate="20200506212523" doknr="BJNR000010950">
///     <metadaten>
///       <jurabk>AbwAG</jurabk>
///       <ausfertigung-datum>1976-09-13</ausfertigung-datum>
///       <langue>Abwasserabgabengesetz</langue>
///     </metadaten>
///   </norm>
///   <norm doknr="BJNE000200000">
///     <metadaten><enbez>§ 1</enbez></metadaten>
///   </norm>
/// </dokumente>"#;
///
/// let law = parse_law_str(xml).unwrap();
/// assert_eq!(law.abbreviation, "AbwAG");
/// assert_eq!(law.contents.len(), 1);
/// ```
pub fn parse_law_str(xml: &str) -> Result<LawDocument> {
    let doc = Document::parse_with_options(xml, xml_parsing_options())?;
    parse_law_document(&doc)
}

/// Parse a law from an already parsed XML document.
///
/// The norms are the `norm` children of the root element: the header
/// first, then the body norms in document order. Other children are
/// ignored.
pub fn parse_law_document(doc: &Document<'_>) -> Result<LawDocument> {
    let root = doc.root_element();
    if get_tag_name(root) != ROOT_TAG {
        tracing::warn!(root = get_tag_name(root), "Unexpected root element");
    }

    parse_norms(find_children(root, NORM_TAG))
}

/// Parse a law from its norm elements, header first.
pub fn parse_norms<'a, 'input: 'a>(
    norms: impl IntoIterator<Item = Node<'a, 'input>>,
) -> Result<LawDocument> {
    assemble(decode_norms(norms)?)
}

/// Transform decoded norms, build the hierarchy and join the result.
pub fn assemble(norms: NormSet) -> Result<LawDocument> {
    let NormSet { header, body } = norms;
    let mut law = law_attributes(header)?;

    let mut builder = HierarchyBuilder::new();
    for norm in body {
        builder.push(content_item(norm)?);
    }
    law.contents = builder.finish();

    tracing::debug!(
        doknr = %law.doknr,
        abbreviation = %law.abbreviation,
        contents = law.contents.len(),
        "Parsed law"
    );

    Ok(law)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::types::ItemType;
    use pretty_assertions::assert_eq;

    const HEADER: &str = r#"<norm builddate="20200506212523" doknr="BJNR000010950">
<metadaten><jurabk>AbwAG</jurabk><ausfertigung-datum>1976-09-13</ausfertigung-datum><langue>Abwasserabgabengesetz</langue></metadaten>
</norm>"#;

    fn heading(doknr: &str, code: &str, body: Option<&str>) -> String {
        let content = body.map_or_else(|| "<P/>".to_string(), |b| format!("<P>{b}</P>"));
        format!(
            r#"<norm doknr="{doknr}"><metadaten><gliederungseinheit><gliederungskennzahl>{code}</gliederungskennzahl><gliederungsbez>Abschnitt {code}</gliederungsbez></gliederungseinheit></metadaten><textdaten><text><Content>{content}</Content></text></textdaten></norm>"#
        )
    }

    fn article(doknr: &str, name: &str, code: Option<&str>) -> String {
        let section = code.map_or_else(String::new, |code| {
            format!("<gliederungseinheit><gliederungskennzahl>{code}</gliederungskennzahl><gliederungsbez>ignored</gliederungsbez></gliederungseinheit>")
        });
        format!(
            r#"<norm doknr="{doknr}"><metadaten><enbez>{name}</enbez>{section}</metadaten><textdaten><text><Content><P>Text {name}</P></Content></text></textdaten></norm>"#
        )
    }

    fn document(body: &[String]) -> String {
        format!("<dokumente>{HEADER}{}</dokumente>", body.concat())
    }

    #[test]
    fn test_parse_law_header_only() {
        let law = parse_law_str(&document(&[])).unwrap();

        assert_eq!(law.doknr, "BJNR000010950");
        assert_eq!(law.abbreviation, "AbwAG");
        assert!(law.extra_abbreviations.is_empty());
        assert!(law.contents.is_empty());
    }

    #[test]
    fn test_parse_law_no_norms() {
        let err = parse_law_str("<dokumente/>").unwrap_err();
        assert!(matches!(err, IngestError::NoHeaderNorm));
    }

    #[test]
    fn test_parse_law_invalid_xml() {
        let err = parse_law_str("<dokumente><norm></dokumente>").unwrap_err();
        assert!(matches!(err, IngestError::XmlParse(_)));
    }

    #[test]
    fn test_parse_law_scenario_with_child() {
        let xml = document(&[
            article("BJNE000100000", "Eingangsformel", None),
            heading("BJNG000200000", "001", None),
            heading("BJNG000300000", "001002", Some("Vorbemerkung")),
            article("BJNE000400000", "§ 1", Some("001002001")),
            heading("BJNG000500000", "002", None),
        ]);

        let law = parse_law_str(&xml).unwrap();
        let summary: Vec<_> = law
            .contents
            .iter()
            .map(|item| (item.doknr.as_str(), item.item_type, item.parent, item.order))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("BJNE000100000", ItemType::Article, None, 0),
                ("BJNG000200000", ItemType::Heading, None, 1),
                ("BJNG000300000", ItemType::HeadingArticle, Some(1), 2),
                ("BJNE000400000", ItemType::Article, Some(2), 3),
                ("BJNG000500000", ItemType::Heading, None, 4),
            ]
        );
        assert_eq!(law.contents[2].name, "Abschnitt 001002");
        assert_eq!(law.contents[3].name, "§ 1");
    }

    #[test]
    fn test_parse_law_scenario_without_child() {
        let xml = document(&[
            article("BJNE000100000", "Eingangsformel", None),
            heading("BJNG000200000", "001", None),
            heading("BJNG000300000", "001002", Some("Vorbemerkung")),
            heading("BJNG000500000", "002", None),
        ]);

        let law = parse_law_str(&xml).unwrap();
        assert_eq!(law.contents[2].item_type, ItemType::Article);
        assert_eq!(law.contents[2].body_text.as_deref(), Some("<P>Vorbemerkung</P>"));
    }

    #[test]
    fn test_parse_law_unknown_structure_aborts() {
        let xml = document(&[
            article("BJNE000100000", "§ 1", None),
            article("BJNX000200000", "§ 2", None),
        ]);

        let err = parse_law_str(&xml).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnknownNormStructure { ref doknr, .. } if doknr == "BJNX000200000"
        ));
    }

    #[test]
    fn test_parse_law_is_deterministic() {
        let xml = document(&[
            heading("BJNG000100000", "010", None),
            article("BJNE000200000", "§ 1", None),
            heading("BJNG000300000", "010010", Some("Text")),
            article("BJNE000400000", "§ 2", None),
        ]);

        assert_eq!(parse_law_str(&xml).unwrap(), parse_law_str(&xml).unwrap());
    }

    #[test]
    fn test_parse_law_ignores_non_norm_children() {
        let xml = format!(
            "<dokumente><!-- built --><meta/>{HEADER}<extra/>{}</dokumente>",
            article("BJNE000100000", "§ 1", None)
        );

        let law = parse_law_str(&xml).unwrap();
        assert_eq!(law.contents.len(), 1);
    }

    #[test]
    fn test_parse_in_parallel_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LawDocument>();

        let xml = document(&[
            heading("BJNG000100000", "001", None),
            article("BJNE000200000", "§ 1", None),
        ]);
        let expected = parse_law_str(&xml).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| parse_law_str(&xml).unwrap())).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
