//! Local law directories.
//!
//! A data directory holds one subdirectory per law, named after the law's
//! slug on the publisher's site. Each law directory contains exactly one
//! XML file, any number of attachments (images, PDFs) referenced from the
//! XML, and a `.timestamp` marker recording when it was fetched.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::{validate_timestamp, MISSING_TIMESTAMP, TIMESTAMP_FILE};
use crate::error::{IngestError, Result};
use crate::parser::parse_law_str;
use crate::types::LawDocument;

/// Extension of the law file within a law directory.
const XML_EXTENSION: &str = "xml";

/// Mime type for attachments with an unknown extension.
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Guess the mime type of an attachment.
///
/// The file extension decides; files without a known extension are
/// sniffed from their leading bytes.
#[must_use]
pub fn mime_type_for(path: &Path, data: &[u8]) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .or_else(|| infer::get(data).map(|kind| kind.mime_type()))
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// Encode raw bytes as a `data:` URI.
#[must_use]
pub fn data_uri(mime_type: &str, data: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(data))
}

/// Whether a file name is hidden (starts with a dot).
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Regular, non-hidden files of a directory, sorted by path.
fn visible_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && !is_hidden(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(XML_EXTENSION))
}

/// One law directory on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LawDirectory {
    path: PathBuf,
}

impl LawDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name, which is the law's slug on the publisher's site.
    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The single XML file of the directory.
    pub fn xml_file(&self) -> Result<PathBuf> {
        let mut xml_files: Vec<_> = visible_files(&self.path)?
            .into_iter()
            .filter(|path| has_xml_extension(path))
            .collect();

        if xml_files.len() != 1 {
            return Err(IngestError::XmlFileCount {
                dir: self.path.clone(),
                found: xml_files.len(),
            });
        }
        Ok(xml_files.remove(0))
    }

    /// Every non-XML file of the directory as a data URI, keyed by file name.
    pub fn attachments(&self) -> Result<BTreeMap<String, String>> {
        let mut attachments = BTreeMap::new();

        for path in visible_files(&self.path)? {
            if has_xml_extension(&path) {
                continue;
            }
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };

            let data = fs::read(&path)?;
            attachments.insert(name, data_uri(mime_type_for(&path, &data), &data));
        }

        Ok(attachments)
    }

    /// The fetch timestamp (`YYYYMMDD`) from the `.timestamp` marker.
    ///
    /// A missing or malformed marker yields [`MISSING_TIMESTAMP`] and a
    /// warning, so one bad directory never hides the others from a listing.
    pub fn timestamp(&self) -> Result<String> {
        let marker = self.path.join(TIMESTAMP_FILE);
        if !marker.is_file() {
            tracing::warn!(dir = %self.path.display(), "No {TIMESTAMP_FILE} in law directory");
            return Ok(MISSING_TIMESTAMP.to_string());
        }

        let timestamp = fs::read_to_string(&marker)?.trim().to_string();
        if let Err(e) = validate_timestamp(&timestamp) {
            tracing::warn!(dir = %self.path.display(), error = %e, "Ignoring {TIMESTAMP_FILE}");
            return Ok(MISSING_TIMESTAMP.to_string());
        }
        Ok(timestamp)
    }

    /// Parse the law file and merge the attachments into the result.
    pub fn parse(&self) -> Result<LawDocument> {
        let xml_file = self.xml_file()?;
        tracing::debug!(file = %xml_file.display(), "Parsing law file");

        let xml = fs::read_to_string(&xml_file)?;
        let law = parse_law_str(&xml)?;
        Ok(law.with_attachments(self.attachments()?))
    }
}

/// Law directories of a data directory, sorted by name.
pub fn law_directories(data_dir: &Path) -> Result<Vec<LawDirectory>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() && !is_hidden(&path) {
            dirs.push(LawDirectory::new(path));
        }
    }
    dirs.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(dirs)
}

/// Names of the law directories of a data directory with their timestamps.
pub fn list_laws(data_dir: &Path) -> Result<BTreeMap<String, String>> {
    law_directories(data_dir)?
        .into_iter()
        .map(|dir| Ok((dir.name(), dir.timestamp()?)))
        .collect()
}
