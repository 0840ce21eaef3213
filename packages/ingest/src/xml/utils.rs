//! XML utility functions for navigating and extracting data from DOM trees.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gii_ingest::xml::get_tag_name;
///
/// let xml = r#"<norm><metadaten/></norm>"#;
/// let doc = Document::parse(xml).unwrap();
/// let metadaten = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(metadaten), "metadaten");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find a descendant element matching a path of tag names.
///
/// The path `"."` refers to the node itself.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gii_ingest::xml::find_by_path;
///
/// let xml = r#"<norm><metadaten><enbez>§ 1</enbez></metadaten></norm>"#;
/// let doc = Document::parse(xml).unwrap();
/// let norm = doc.root_element();
///
/// let enbez = find_by_path(norm, "metadaten/enbez");
/// assert_eq!(enbez.unwrap().text(), Some("§ 1"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    if path == "." {
        return Some(node);
    }

    let mut current = node;
    for part in path.split('/') {
        current = find_child(current, part)?;
    }

    Some(current)
}

/// Find every element matching a path whose last segment may repeat.
///
/// All segments but the last are resolved like [`find_by_path`]; the last one
/// collects every matching child in document order.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gii_ingest::xml::find_all_by_path;
///
/// let xml = r#"<norm><metadaten><jurabk>A</jurabk><jurabk>B</jurabk></metadaten></norm>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let found = find_all_by_path(doc.root_element(), "metadaten/jurabk");
/// assert_eq!(found.len(), 2);
/// ```
pub fn find_all_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let (parent_path, last) = match path.rsplit_once('/') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, path),
    };

    let parent = match parent_path {
        Some(parent_path) => find_by_path(node, parent_path),
        None => Some(node),
    };

    parent
        .map(|parent| {
            parent
                .children()
                .filter(|child| child.is_element() && get_tag_name(*child) == last)
                .collect()
        })
        .unwrap_or_default()
}

/// Get the text content of a node, trimmed.
///
/// Only the leading text node counts; child markup is ignored. Use
/// [`crate::xml::MixedContent`] for fields that embed formatting.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Get an attribute value from a node.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Human-readable `line:column` position of a node in its source document.
pub fn source_position(node: Node<'_, '_>) -> String {
    let pos = node.document().text_pos_at(node.range().start);
    format!("{}:{}", pos.row, pos.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name() {
        let xml = r#"<norm><metadaten/></norm>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "norm");
    }

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:norm xmlns:ns="http://example.com"><ns:metadaten/></ns:norm>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "norm");
    }

    #[test]
    fn test_find_child() {
        let xml = r#"<norm><metadaten/><textdaten/></norm>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert!(find_child(root, "metadaten").is_some());
        assert!(find_child(root, "textdaten").is_some());
        assert!(find_child(root, "fussnoten").is_none());
    }

    #[test]
    fn test_find_children() {
        let xml = r#"<metadaten><jurabk>A</jurabk><enbez/><jurabk>B</jurabk></metadaten>"#;
        let doc = Document::parse(xml).unwrap();

        let items: Vec<_> = find_children(doc.root_element(), "jurabk").collect();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_find_by_path() {
        let xml = r#"<norm><textdaten><text><Content>found</Content></text></textdaten></norm>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        let target = find_by_path(root, "textdaten/text/Content");
        assert_eq!(get_text(target.unwrap()), "found");

        assert!(find_by_path(root, "textdaten/fussnoten").is_none());
    }

    #[test]
    fn test_find_by_path_self() {
        let xml = r#"<norm doknr="BJNR000010950"/>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(find_by_path(root, "."), Some(root));
    }

    #[test]
    fn test_find_all_by_path_missing_parent() {
        let xml = r#"<norm/>"#;
        let doc = Document::parse(xml).unwrap();

        assert!(find_all_by_path(doc.root_element(), "metadaten/amtabk").is_empty());
    }

    #[test]
    fn test_find_all_by_path_single_segment() {
        let xml = r#"<dokumente><norm/><norm/><other/></dokumente>"#;
        let doc = Document::parse(xml).unwrap();

        assert_eq!(find_all_by_path(doc.root_element(), "norm").len(), 2);
    }

    #[test]
    fn test_get_text() {
        let xml = r#"<jurabk>  AbwAG  </jurabk>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_text(doc.root_element()), "AbwAG");
    }

    #[test]
    fn test_get_attribute() {
        let xml = r#"<norm doknr="BJNR000010950"/>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();

        assert_eq!(get_attribute(root, "doknr"), Some("BJNR000010950"));
        assert_eq!(get_attribute(root, "builddate"), None);
    }

    #[test]
    fn test_element_children() {
        let xml = r#"<norm>text<metadaten/>more<textdaten/></norm>"#;
        let doc = Document::parse(xml).unwrap();

        let children: Vec<_> = element_children(doc.root_element()).collect();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_source_position() {
        let xml = "<dokumente>\n  <norm/>\n</dokumente>";
        let doc = Document::parse(xml).unwrap();
        let norm = find_child(doc.root_element(), "norm").unwrap();

        assert_eq!(source_position(norm), "2:3");
    }
}
