//! Mixed-content extraction.
//!
//! Text fields of a norm may embed formatting markup (`<P>`, `<B>`,
//! `<FnR>`, tables, ...) that must survive into stored output. Instead of
//! collecting visible text, these fields are read as the element's inner
//! serialized content: the leading text followed by every child node as it
//! appears in the source.

use std::borrow::Cow;

use roxmltree::Node;

use crate::config::EMPTY_CONTENT_PATTERNS;

/// Post-parse hook applied to an extracted value.
pub type ContentHook = fn(String) -> Option<String>;

/// Extraction options for one mixed-content field.
#[derive(Debug, Clone, Copy)]
pub struct MixedContent {
    /// Strip leading and trailing whitespace.
    pub strip_whitespace: bool,

    /// Normalization applied after extraction; `None` keeps the value as is.
    pub hook: Option<ContentHook>,
}

impl MixedContent {
    /// Trimmed inner content, empty strings kept.
    pub const VERBATIM: Self = Self {
        strip_whitespace: true,
        hook: None,
    };

    /// Trimmed inner content with effectively-empty values mapped to absence.
    pub const CONTENT: Self = Self {
        strip_whitespace: true,
        hook: Some(normalize_empty_content),
    };

    /// Set whether whitespace is stripped.
    #[must_use]
    pub const fn with_strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }

    /// Set the post-parse hook.
    #[must_use]
    pub const fn with_hook(mut self, hook: ContentHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Extract the field value from an element.
    #[must_use]
    pub fn extract(&self, node: Node<'_, '_>) -> Option<String> {
        let inner = inner_xml(node);
        let value = if self.strip_whitespace {
            inner.trim().to_string()
        } else {
            inner.to_string()
        };

        match self.hook {
            Some(hook) => hook(value),
            None => Some(value),
        }
    }
}

impl Default for MixedContent {
    fn default() -> Self {
        Self::VERBATIM
    }
}

/// Inner serialized content of an element, taken verbatim from the source.
///
/// Comments and processing instructions are left out at any depth.
/// Entity and character references stay as written.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use gii_ingest::xml::inner_xml;
///
/// let xml = r#"<titel>Lead <B>bold</B><!-- x --> tail</titel>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(inner_xml(doc.root_element()), "Lead <B>bold</B> tail");
/// ```
pub fn inner_xml<'input>(node: Node<'_, 'input>) -> Cow<'input, str> {
    let (Some(first), Some(last)) = (node.first_child(), node.last_child()) else {
        return Cow::Borrowed("");
    };

    let input = node.document().input_text();
    let range = first.range().start..last.range().end;

    let mut skipped = node
        .descendants()
        .filter(|n| n.is_comment() || n.is_pi())
        .map(|n| n.range())
        .peekable();
    if skipped.peek().is_none() {
        return Cow::Borrowed(input.get(range).unwrap_or_default());
    }

    let mut content = String::with_capacity(range.len());
    let mut start = range.start;
    for gap in skipped {
        content.push_str(input.get(start..gap.start).unwrap_or_default());
        start = gap.end;
    }
    content.push_str(input.get(start..range.end).unwrap_or_default());
    Cow::Owned(content)
}

/// Map the empty string and the canonical "no content" forms to `None`.
///
/// # Examples
/// ```
/// use gii_ingest::xml::normalize_empty_content;
///
/// assert_eq!(normalize_empty_content("<P/>".to_string()), None);
/// assert_eq!(normalize_empty_content("<P>Text</P>".to_string()).as_deref(), Some("<P>Text</P>"));
/// ```
#[must_use]
pub fn normalize_empty_content(text: String) -> Option<String> {
    if text.is_empty() || EMPTY_CONTENT_PATTERNS.contains(&text.as_str()) {
        None
    } else {
        Some(text)
    }
}
