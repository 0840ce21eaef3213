//! Error types for law ingestion.
//!
//! Every variant except `Io` and `YamlSerialization` describes malformed or
//! unanticipated source data. None of them is retried: the caller decides
//! whether to skip, quarantine or halt.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the ingest library.
#[derive(Debug, Error)]
pub enum IngestError {
    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Missing required XML element.
    #[error("Missing required XML element: {element} in {context}")]
    MissingElement { element: String, context: String },

    /// Missing required XML attribute.
    #[error("Missing required XML attribute: {attribute} in {context}")]
    MissingAttribute { attribute: String, context: String },

    /// Document identifier carries neither the article nor the heading marker.
    #[error("Unknown norm structure encountered: {doknr} in {context}")]
    UnknownNormStructure { doknr: String, context: String },

    /// Neither abbreviation list yielded a usable entry.
    #[error("No abbreviation found for law {doknr}")]
    NoAbbreviation { doknr: String },

    /// The document contains no norm elements at all.
    #[error("Document contains no <norm> elements")]
    NoHeaderNorm,

    /// A law directory must hold exactly one XML file.
    #[error("Expected 1 XML file in {}, got {found}", .dir.display())]
    XmlFileCount { dir: PathBuf, found: usize },

    /// Malformed `.timestamp` marker.
    #[error("Invalid timestamp: '{0}'. Expected YYYYMMDD (e.g., 20200506)")]
    InvalidTimestamp(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),
}

impl IngestError {
    /// Whether the error stems from the document content rather than the environment.
    #[must_use]
    pub fn is_malformed_source(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::YamlSerialization(_))
    }
}

/// Result type alias for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
