//! XML utilities: tree navigation and mixed-content extraction.

mod mixed;
mod utils;

pub use mixed::{inner_xml, normalize_empty_content, ContentHook, MixedContent};
pub use utils::{
    element_children, find_all_by_path, find_by_path, find_child, find_children, get_attribute,
    get_tag_name, get_text, source_position,
};
