//! GII Ingest - Parse German federal law XML into structured documents.
//!
//! Laws published on gesetze-im-internet.de come as one XML file per law:
//! a header norm describing the law, followed by a flat sequence of body
//! norms (headings and articles). This crate decodes both norm shapes,
//! keeps embedded markup verbatim, classifies each body norm and rebuilds
//! the heading tree from the section codes.
//!
//! # Example
//!
//! ```
//! use gii_ingest::{parse_law_str, ItemType};
//!
//! let xml = r#"<dokumente>
//!   <norm builddate="20200506212523" doknr="BJNR000010950">
//!     <metadaten>
//!       <jurabk>AbwAG</jurabk>
//!       <ausfertigung-datum>1976-09-13</ausfertigung-datum>
//!       <langue>Abwasserabgabengesetz</langue>
//!     </metadaten>
//!   </norm>
//!   <norm doknr="BJNG000100000">
//!     <metadaten>
//!       <gliederungseinheit>
//!         <gliederungskennzahl>010</gliederungskennzahl>
//!         <gliederungsbez>Abschnitt 1</gliederungsbez>
//!       </gliederungseinheit>
//!     </metadaten>
//!   </norm>
//!   <norm doknr="BJNE000200000">
//!     <metadaten><enbez>§ 1</enbez></metadaten>
//!   </norm>
//! </dokumente>"#;
//!
//! let law = parse_law_str(xml).unwrap();
//! assert_eq!(law.slug(), "abwag");
//! assert_eq!(law.contents[0].item_type, ItemType::Heading);
//! assert_eq!(law.contents[1].parent, Some(0));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants and parsing options
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Tree navigation and mixed-content extraction
//! - [`norm`]: Decoders for header and body norms
//! - [`transform`]: Field transformers from decoded norms to output records
//! - [`hierarchy`]: Parent resolution from section codes
//! - [`types`]: The law document and its content items
//! - [`parser`]: Document assembly
//! - [`source`]: Local law directories with attachments
//! - [`slug`]: Slugs and slug collisions
//! - [`batch`]: Parallel ingestion of many laws
//! - [`yaml`]: YAML export
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod norm;
pub mod parser;
pub mod slug;
pub mod source;
pub mod transform;
pub mod types;
pub mod xml;
pub mod yaml;

// Re-export main functions
pub use parser::{parse_law_document, parse_law_str};
pub use source::{list_laws, LawDirectory};

// Re-export commonly used items
pub use error::{IngestError, Result};
pub use types::{ContentItem, ItemType, LawDocument, PublicationInfo, SectionInfo, StatusInfo};
