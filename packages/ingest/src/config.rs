//! Configuration constants and validation functions for ingestion.

use chrono::NaiveDate;
use roxmltree::ParsingOptions;

use crate::error::{IngestError, Result};

/// Root element of a published law file.
pub const ROOT_TAG: &str = "dokumente";

/// Element holding one norm (the header or a body unit).
pub const NORM_TAG: &str = "norm";

/// Document identifier substring marking an article ("Norm Einzelvorschrift").
pub const ARTICLE_MARKER: &str = "NE";

/// Document identifier substring marking a structural heading ("Norm Gliederung").
pub const HEADING_MARKER: &str = "NG";

/// Width of one segment of a section code (`gliederungskennzahl`).
pub const SECTION_CODE_SEGMENT_WIDTH: usize = 3;

/// Canonical forms of a mixed-content value that carries no content.
pub const EMPTY_CONTENT_PATTERNS: [&str; 3] = ["<P/>", "<P />", "<P>-</P>"];

/// Name of the marker file recording when a law directory was last fetched.
pub const TIMESTAMP_FILE: &str = ".timestamp";

/// Format of the `.timestamp` marker.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d";

/// Timestamp assumed for law directories without a marker.
pub const MISSING_TIMESTAMP: &str = "00000000";

/// Parsing options for published law files.
///
/// Every file starts with `<!DOCTYPE dokumente SYSTEM "...gii-norm.dtd">`,
/// which roxmltree rejects unless DTDs are allowed.
#[must_use]
pub fn xml_parsing_options<'input>() -> ParsingOptions<'input> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    options
}

/// Validate a `.timestamp` marker value.
///
/// # Examples
/// ```
/// use gii_ingest::config::validate_timestamp;
///
/// assert!(validate_timestamp("20200506").is_ok());
/// assert!(validate_timestamp("2020-05-06").is_err());
/// ```
pub fn validate_timestamp(timestamp: &str) -> Result<NaiveDate> {
    if timestamp.len() != 8 || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IngestError::InvalidTimestamp(timestamp.to_string()));
    }

    NaiveDate::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .map_err(|_| IngestError::InvalidTimestamp(timestamp.to_string()))
}
