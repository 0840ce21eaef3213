//! YAML writer for parsed laws.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::types::{ContentItem, ItemType, LawDocument, PublicationInfo, StatusInfo};

/// Content item representation for YAML serialization, nested by parent.
#[derive(Debug, Serialize)]
struct YamlItem<'a> {
    doknr: &'a str,
    #[serde(rename = "type")]
    item_type: ItemType,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footnotes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    documentary_footnotes: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<YamlItem<'a>>,
}

fn is_empty_slice<T>(items: &&[T]) -> bool {
    items.is_empty()
}

/// Full law representation for YAML serialization.
#[derive(Debug, Serialize)]
struct YamlLaw<'a> {
    #[serde(rename = "$id")]
    id: String,
    doknr: &'a str,
    abbreviation: &'a str,
    #[serde(skip_serializing_if = "is_empty_slice")]
    extra_abbreviations: &'a [String],
    title_long: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title_short: Option<&'a str>,
    first_published: &'a str,
    source_timestamp: &'a str,
    #[serde(skip_serializing_if = "is_empty_slice")]
    publication_info: &'a [PublicationInfo],
    #[serde(skip_serializing_if = "is_empty_slice")]
    status_info: &'a [StatusInfo],
    #[serde(skip_serializing_if = "Option::is_none")]
    body_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footnotes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    documentary_footnotes: Option<&'a str>,
    /// Attachment names only; the data URIs stay out of the export.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<&'a str>,
    contents: Vec<YamlItem<'a>>,
}

fn yaml_items(law: &LawDocument, parent: Option<usize>) -> Vec<YamlItem<'_>> {
    law.children_of(parent)
        .map(|(index, item)| yaml_item(law, index, item))
        .collect()
}

fn yaml_item<'a>(law: &'a LawDocument, index: usize, item: &'a ContentItem) -> YamlItem<'a> {
    YamlItem {
        doknr: &item.doknr,
        item_type: item.item_type,
        name: &item.name,
        title: item.title.as_deref(),
        section: item.section_info.as_ref().map(|info| info.code.as_str()),
        body_text: item.body_text.as_deref(),
        footnotes: item.footnotes.as_deref(),
        documentary_footnotes: item.documentary_footnotes.as_deref(),
        children: yaml_items(law, Some(index)),
    }
}

fn generate_yaml_struct(law: &LawDocument) -> YamlLaw<'_> {
    YamlLaw {
        id: law.slug(),
        doknr: &law.doknr,
        abbreviation: &law.abbreviation,
        extra_abbreviations: &law.extra_abbreviations,
        title_long: &law.title_long,
        title_short: law.title_short.as_deref(),
        first_published: &law.first_published,
        source_timestamp: &law.source_timestamp,
        publication_info: &law.publication_info,
        status_info: &law.status_info,
        body_text: law.body_text.as_deref(),
        footnotes: law.footnotes.as_deref(),
        documentary_footnotes: law.documentary_footnotes.as_deref(),
        attachments: law.attachment_names(),
        contents: yaml_items(law, None),
    }
}

/// Whether a line opens a block scalar (`key: |-`, `- >`, ...).
fn opens_block_scalar(trimmed: &str) -> bool {
    let value = trimmed.rsplit_once(": ").map_or(trimmed, |(_, value)| value);
    let value = value.strip_prefix("- ").unwrap_or(value);
    matches!(value, "|" | "|-" | "|+" | ">" | ">-" | ">+")
        || (value.len() > 1
            && (value.starts_with('|') || value.starts_with('>'))
            && value[1..].bytes().all(|b| b.is_ascii_digit() || b == b'-' || b == b'+'))
}

/// Indent YAML sequences to comply with `indent-sequences: true`.
///
/// serde_yaml_ng places sequence items (`- `) at the same indent as their
/// parent key. This adds 2 spaces per open sequence so items sit under
/// their key:
///
/// ```yaml
/// # Before:          # After:
/// contents:          contents:
/// - doknr: X           - doknr: X
///   name: § 1            name: § 1
/// ```
///
/// Block scalar content is shifted along with its key but never inspected.
fn indent_yaml_sequences(yaml: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    // Stack of indent levels where sequences start
    let mut seq_indents: Vec<usize> = Vec::new();
    // Key column of the line that opened the current block scalar, with its shift
    let mut block: Option<(usize, usize)> = None;

    for line in yaml.lines() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some((block_indent, extra)) = block {
            if trimmed.is_empty() || indent > block_indent {
                result.push(format!("{}{line}", " ".repeat(extra)));
                continue;
            }
            block = None;
        }

        if trimmed.is_empty() {
            result.push(line.to_string());
            continue;
        }

        // Pop sequences we've exited: either moved to a shallower indent,
        // or returned to the same indent but not as a sequence continuation.
        while let Some(&seq_indent) = seq_indents.last() {
            if indent < seq_indent || (indent == seq_indent && !trimmed.starts_with("- ")) {
                seq_indents.pop();
            } else {
                break;
            }
        }

        if trimmed.starts_with("- ") {
            let is_continuation = seq_indents.last().is_some_and(|&si| si == indent);
            if !is_continuation {
                seq_indents.push(indent);
            }
        }

        let extra = seq_indents.len() * 2;
        if opens_block_scalar(trimmed) {
            let key_indent = if trimmed.starts_with("- ") { indent + 2 } else { indent };
            block = Some((key_indent, extra));
        }
        result.push(format!("{}{line}", " ".repeat(extra)));
    }

    result.join("\n")
}

/// Render a parsed law as YAML.
pub fn generate_yaml(law: &LawDocument) -> Result<String> {
    let yaml_string = serde_yaml_ng::to_string(&generate_yaml_struct(law))?;
    let yaml_string = indent_yaml_sequences(&yaml_string);

    // Add document start marker and clean up trailing whitespace
    let lines: Vec<&str> = yaml_string.lines().map(str::trim_end).collect();
    Ok(format!("---\n{}\n", lines.join("\n")))
}

/// Save a parsed law as `<slug>.yaml` in `output_dir`.
///
/// Writes to a temp file, syncs it and renames it into place, so an
/// interrupted run never leaves a partial file behind.
pub fn save_yaml(law: &LawDocument, output_dir: &Path) -> Result<PathBuf> {
    save_yaml_as(law, output_dir, &law.slug())
}

/// Save a parsed law as `<file_stem>.yaml` in `output_dir`.
pub fn save_yaml_as(law: &LawDocument, output_dir: &Path, file_stem: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let output_file = output_dir.join(format!("{file_stem}.yaml"));
    let temp_file = output_dir.join(format!(".{file_stem}.yaml.tmp"));

    let content = generate_yaml(law)?;

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;

    Ok(output_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_law_str;
    use tempfile::tempdir;

    const LAW: &str = r#"<dokumente>
<norm builddate="20200506212523" doknr="BJNR000010950"><metadaten><jurabk>AbwAG</jurabk><ausfertigung-datum>1976-09-13</ausfertigung-datum><fundstelle><periodikum>BGBl I</periodikum><zitstelle>2005, 114</zitstelle></fundstelle><langue>Gesetz über Abgaben für das Einleiten von Abwasser in Gewässer</langue></metadaten></norm>
<norm doknr="BJNG000100000"><metadaten><gliederungseinheit><gliederungskennzahl>010</gliederungskennzahl><gliederungsbez>Abschnitt 1</gliederungsbez><gliederungstitel>Allgemeines</gliederungstitel></gliederungseinheit></metadaten></norm>
<norm doknr="BJNE000200000"><metadaten><enbez>§ 1</enbez><titel>Grundsatz</titel></metadaten><textdaten><text><Content><P>Für das Einleiten von Abwasser ist eine Abgabe zu entrichten.</P></Content></text></textdaten></norm>
<norm doknr="BJNE000300000"><metadaten><enbez>§ 2</enbez></metadaten><textdaten><text><Content><P>(1) Erster Absatz.</P>
<P>- zweiter Absatz: mit Doppelpunkt</P></Content></text></textdaten></norm>
</dokumente>"#;

    fn law() -> LawDocument {
        parse_law_str(LAW).unwrap()
    }

    #[test]
    fn test_generate_yaml() {
        let yaml = generate_yaml(&law()).unwrap();

        assert!(yaml.starts_with("---\n"));
        assert!(yaml.ends_with('\n'));
        assert!(yaml.contains("$id: abwag"));
        assert!(yaml.contains("doknr: BJNR000010950"));
        assert!(yaml.contains("abbreviation: AbwAG"));
        assert!(!yaml.contains("extra_abbreviations"));
    }

    #[test]
    fn test_generate_yaml_nests_children() {
        let yaml = generate_yaml(&law()).unwrap();

        assert!(
            yaml.contains("contents:\n  - doknr: BJNG000100000"),
            "Top-level items should be indented under contents, got:\n{yaml}"
        );
        assert!(
            yaml.contains("    children:\n      - doknr: BJNE000200000"),
            "Articles should be nested under their heading, got:\n{yaml}"
        );
    }

    #[test]
    fn test_generate_yaml_round_trips_through_parser() {
        let yaml = generate_yaml(&law()).unwrap();
        let value: serde_yaml_ng::Value = serde_yaml_ng::from_str(&yaml).unwrap();

        let contents = value["contents"].as_sequence().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["section"].as_str(), Some("010"));
        let children = contents[0]["children"].as_sequence().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0]["name"].as_str(), Some("§ 1"));
        assert_eq!(
            children[1]["body_text"].as_str(),
            Some("<P>(1) Erster Absatz.</P>\n<P>- zweiter Absatz: mit Doppelpunkt</P>")
        );
        assert_eq!(value["publication_info"][0]["periodical"].as_str(), Some("BGBl I"));
    }

    #[test]
    fn test_generate_yaml_lists_attachment_names_only() {
        let mut attachments = std::collections::BTreeMap::new();
        attachments.insert(
            "anlage.pdf".to_string(),
            "data:application/pdf;base64,JVBERg==".to_string(),
        );
        let yaml = generate_yaml(&law().with_attachments(attachments)).unwrap();

        assert!(yaml.contains("attachments:\n  - anlage.pdf"));
        assert!(!yaml.contains("base64"));
    }

    #[test]
    fn test_save_yaml() {
        let temp_dir = tempdir().unwrap();
        let output_path = save_yaml(&law(), temp_dir.path()).unwrap();

        assert_eq!(output_path, temp_dir.path().join("abwag.yaml"));
        assert!(!temp_dir.path().join(".abwag.yaml.tmp").exists());

        let content = fs::read_to_string(output_path).unwrap();
        assert!(content.starts_with("---\n"));
    }

    #[test]
    fn test_save_yaml_as() {
        let temp_dir = tempdir().unwrap();
        let output_path = save_yaml_as(&law(), temp_dir.path(), "abwag_bjnr000010950").unwrap();

        assert_eq!(output_path, temp_dir.path().join("abwag_bjnr000010950.yaml"));
        assert!(!temp_dir.path().join("abwag.yaml").exists());
        assert_eq!(
            fs::read_to_string(output_path).unwrap(),
            generate_yaml(&law()).unwrap()
        );
    }

    #[test]
    fn test_indent_yaml_sequences() {
        let input =
            "top: val\nitems:\n- name: a\n  val: 1\n- name: b\n  nested:\n  - id: x\n    v: 1";
        let result = indent_yaml_sequences(input);
        assert_eq!(
            result,
            "top: val\nitems:\n  - name: a\n    val: 1\n  - name: b\n    nested:\n      - id: x\n        v: 1"
        );
    }

    #[test]
    fn test_indent_yaml_sequences_leaves_block_scalars_alone() {
        let input = "items:\n- text: |-\n    - not a sequence\n    second\n  next: 1\nend: x";
        let result = indent_yaml_sequences(input);
        assert_eq!(
            result,
            "items:\n  - text: |-\n      - not a sequence\n      second\n    next: 1\nend: x"
        );
    }

    #[test]
    fn test_opens_block_scalar() {
        assert!(opens_block_scalar("body_text: |-"));
        assert!(opens_block_scalar("- |"));
        assert!(opens_block_scalar("text: >2-"));
        assert!(!opens_block_scalar("name: § 1"));
        assert!(!opens_block_scalar("title: a | b"));
    }
}
