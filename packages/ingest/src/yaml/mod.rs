//! YAML export of parsed laws.

mod writer;

pub use writer::{generate_yaml, save_yaml, save_yaml_as};
