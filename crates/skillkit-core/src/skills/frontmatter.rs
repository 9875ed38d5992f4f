//! Frontmatter parsing for `SKILL.md` manifests.
//!
//! The header is a `---` delimited block of `key: value` lines. A bare
//! `metadata:` line opens a nested block whose indented lines are collected
//! into an open string map until the next unindented line.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::skills::model::SkillMetadata;

const DELIMITER: &str = "---";
const METADATA_MARKER: &str = "metadata:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    TopLevel,
    InMetadataBlock,
}

#[derive(Debug, Default)]
struct RawFields {
    name: Option<String>,
    description: Option<String>,
    license: Option<String>,
    compatibility: Option<String>,
    allowed_tools: Option<String>,
    metadata: BTreeMap<String, String>,
}

impl RawFields {
    fn set_top_level(&mut self, key: &str, value: String) {
        match key {
            "name" => self.name = Some(value),
            "description" => self.description = Some(value),
            "license" => self.license = Some(value),
            "compatibility" => self.compatibility = Some(value),
            "allowed-tools" => self.allowed_tools = Some(value),
            _ => {}
        }
    }

    fn finish(self) -> Option<SkillMetadata> {
        let name = self.name.filter(|value| !value.is_empty())?;
        let description = self.description.filter(|value| !value.is_empty())?;
        Some(SkillMetadata {
            name,
            description,
            license: self.license.filter(|value| !value.is_empty()),
            compatibility: self.compatibility.filter(|value| !value.is_empty()),
            allowed_tools: self.allowed_tools.filter(|value| !value.is_empty()),
            metadata: self.metadata,
        })
    }
}

/// Parse manifest text. Returns `None` unless the header is well formed and
/// carries non-empty `name` and `description` values.
pub fn parse_frontmatter(content: &str) -> Option<SkillMetadata> {
    let mut lines = content.lines().map(|line| line.trim_end_matches('\r'));
    if lines.next()?.trim_end() != DELIMITER {
        return None;
    }

    let mut fields = RawFields::default();
    let mut state = ParseState::TopLevel;

    for line in lines {
        if line.trim_end() == DELIMITER {
            return fields.finish();
        }
        if line.trim().is_empty() {
            continue;
        }

        if state == ParseState::InMetadataBlock {
            if is_indented(line) {
                if let Some((key, value)) = split_key_value(line) {
                    fields.metadata.insert(key.to_string(), value);
                }
                continue;
            }
            state = ParseState::TopLevel;
        }

        if line.trim_end() == METADATA_MARKER {
            state = ParseState::InMetadataBlock;
            continue;
        }

        if let Some((key, value)) = split_key_value(line) {
            fields.set_top_level(key, value);
        }
    }

    // Unterminated header.
    None
}

/// Read and parse a manifest file; unreadable files yield `None`.
pub fn parse_skill_file(path: &Path) -> Option<SkillMetadata> {
    match fs::read_to_string(path) {
        Ok(content) => parse_frontmatter(&content),
        Err(error) => {
            tracing::debug!(path = %path.display(), %error, "unable to read skill manifest");
            None
        }
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

fn split_key_value(line: &str) -> Option<(&str, String)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, unquote(value.trim()).to_string()))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_required_and_optional_fields() {
        let content = "---\nname: pdf-tools\ndescription: Work with PDF files\nlicense: MIT\ncompatibility: claude>=1\nallowed-tools: Read Bash\n---\n# Body\n";
        let parsed = parse_frontmatter(content).expect("manifest should parse");

        assert_eq!(
            parsed,
            SkillMetadata {
                name: "pdf-tools".to_string(),
                description: "Work with PDF files".to_string(),
                license: Some("MIT".to_string()),
                compatibility: Some("claude>=1".to_string()),
                allowed_tools: Some("Read Bash".to_string()),
                metadata: BTreeMap::new(),
            }
        );
    }

    #[test]
    fn collects_indented_metadata_block_then_resumes_top_level() {
        let content = "---\nname: widget\nmetadata:\n  author: acme\n  version: \"1.2\"\ndescription: Builds widgets\n---\n";
        let parsed = parse_frontmatter(content).expect("manifest should parse");

        assert_eq!(parsed.description, "Builds widgets");
        assert_eq!(parsed.metadata.get("author").map(String::as_str), Some("acme"));
        assert_eq!(parsed.metadata.get("version").map(String::as_str), Some("1.2"));
        assert!(!parsed.metadata.contains_key("description"));
    }

    #[test]
    fn strips_single_and_double_quotes() {
        let content = "---\nname: 'quoted'\ndescription: \"Has: a colon\"\n---\n";
        let parsed = parse_frontmatter(content).expect("manifest should parse");
        assert_eq!(parsed.name, "quoted");
        assert_eq!(parsed.description, "Has: a colon");
    }

    #[test]
    fn missing_description_yields_none() {
        assert!(parse_frontmatter("---\nname: lonely\n---\n").is_none());
    }

    #[test]
    fn empty_name_yields_none() {
        assert!(parse_frontmatter("---\nname:\ndescription: nameless\n---\n").is_none());
        assert!(parse_frontmatter("---\nname: ''\ndescription: nameless\n---\n").is_none());
    }

    #[test]
    fn missing_opening_delimiter_yields_none() {
        assert!(parse_frontmatter("name: x\ndescription: y\n---\n").is_none());
        assert!(parse_frontmatter("").is_none());
    }

    #[test]
    fn unterminated_header_yields_none() {
        assert!(parse_frontmatter("---\nname: x\ndescription: y\n").is_none());
    }

    #[test]
    fn unknown_top_level_keys_are_ignored() {
        let content = "---\nname: x\nversion: 3\ndescription: y\n---\n";
        let parsed = parse_frontmatter(content).expect("manifest should parse");
        assert_eq!(parsed.name, "x");
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        let content = "---\r\nname: win\r\ndescription: crlf file\r\n---\r\n";
        let parsed = parse_frontmatter(content).expect("manifest should parse");
        assert_eq!(parsed.name, "win");
        assert_eq!(parsed.description, "crlf file");
    }

    #[test]
    fn metadata_block_closed_by_delimiter() {
        let content = "---\nname: x\ndescription: y\nmetadata:\n  team: core\n---\n";
        let parsed = parse_frontmatter(content).expect("manifest should parse");
        assert_eq!(parsed.metadata.get("team").map(String::as_str), Some("core"));
    }
}
