//! Field reading combinator shared by the header and body decoders.

use roxmltree::Node;

use crate::error::{IngestError, Result};
use crate::xml::{find_all_by_path, find_by_path, get_tag_name, get_text, source_position, MixedContent};

/// Reads typed fields relative to one element.
///
/// Every error carries the reader's context: the element's tag, its
/// `doknr` when known and its source position.
#[derive(Debug, Clone)]
pub struct FieldReader<'a, 'input> {
    node: Node<'a, 'input>,
    context: String,
}

impl<'a, 'input> FieldReader<'a, 'input> {
    /// Create a reader for an element.
    #[must_use]
    pub fn new(node: Node<'a, 'input>) -> Self {
        let tag = get_tag_name(node);
        let position = source_position(node);
        let context = match node.attribute("doknr") {
            Some(doknr) => format!("{tag} {doknr} at {position}"),
            None => format!("{tag} at {position}"),
        };
        Self { node, context }
    }

    /// Create a reader for a nested element, keeping the outer context.
    fn nested(&self, node: Node<'a, 'input>, path: &str) -> Self {
        Self {
            node,
            context: format!("{path} at {} in {}", source_position(node), self.context),
        }
    }

    /// The element being read.
    #[must_use]
    pub fn node(&self) -> Node<'a, 'input> {
        self.node
    }

    /// Description of the element for error messages.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    fn missing_element(&self, path: &str) -> IngestError {
        IngestError::MissingElement {
            element: path.to_string(),
            context: self.context.clone(),
        }
    }

    fn require(&self, path: &str) -> Result<Node<'a, 'input>> {
        find_by_path(self.node, path).ok_or_else(|| self.missing_element(path))
    }

    /// Required attribute of the element itself.
    pub fn attribute(&self, name: &str) -> Result<String> {
        self.node
            .attribute(name)
            .map(str::to_string)
            .ok_or_else(|| IngestError::MissingAttribute {
                attribute: name.to_string(),
                context: self.context.clone(),
            })
    }

    /// Required plain-text field.
    pub fn string(&self, path: &str) -> Result<String> {
        self.require(path).map(get_text)
    }

    /// Optional plain-text field.
    #[must_use]
    pub fn optional_string(&self, path: &str) -> Option<String> {
        find_by_path(self.node, path).map(get_text)
    }

    /// Repeated plain-text field; absent elements yield an empty list.
    #[must_use]
    pub fn strings(&self, path: &str) -> Vec<String> {
        find_all_by_path(self.node, path)
            .into_iter()
            .map(get_text)
            .collect()
    }

    /// Repeated plain-text field that must occur at least once.
    pub fn required_strings(&self, path: &str) -> Result<Vec<String>> {
        let values = self.strings(path);
        if values.is_empty() {
            return Err(self.missing_element(path));
        }
        Ok(values)
    }

    /// Required mixed-content field.
    ///
    /// The element must exist; its value may still be absent when the
    /// field's hook normalizes it away.
    pub fn mixed(&self, path: &str, options: MixedContent) -> Result<Option<String>> {
        self.require(path).map(|node| options.extract(node))
    }

    /// Optional mixed-content field.
    #[must_use]
    pub fn optional_mixed(&self, path: &str, options: MixedContent) -> Option<String> {
        find_by_path(self.node, path).and_then(|node| options.extract(node))
    }

    /// Optional nested record.
    pub fn record<T>(
        &self,
        path: &str,
        decode: impl FnOnce(&FieldReader<'a, 'input>) -> Result<T>,
    ) -> Result<Option<T>> {
        find_by_path(self.node, path)
            .map(|node| decode(&self.nested(node, path)))
            .transpose()
    }

    /// Repeated nested record; absent elements yield an empty list.
    pub fn records<T>(
        &self,
        path: &str,
        decode: impl Fn(&FieldReader<'a, 'input>) -> Result<T>,
    ) -> Result<Vec<T>> {
        find_all_by_path(self.node, path)
            .into_iter()
            .map(|node| decode(&self.nested(node, path)))
            .collect()
    }
}
