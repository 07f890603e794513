//! YAML frontmatter metadata for skill documents.
//!
//! A document without a header, or with a header that is not valid YAML,
//! simply has no metadata.

use serde::Deserialize;

/// Metadata declared in a skill document header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillMetadata {
    /// Declared skill name.
    pub name: Option<String>,
    /// Declared skill description.
    pub description: Option<String>,
    /// Author from the nested `metadata:` block.
    pub author: Option<String>,
    /// Version from the nested `metadata:` block.
    pub version: Option<String>,
}

/// Raw header fields; unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawFrontmatter {
    /// The declared skill name.
    name: Option<String>,
    /// The declared skill description.
    description: Option<String>,
    /// Nested metadata block.
    metadata: Option<RawMetadata>,
}

/// Raw nested `metadata:` block.
#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    /// Skill author.
    author: Option<String>,
    /// Skill version, kept as written.
    version: Option<String>,
}

/// Parse the header of a skill document into metadata.
pub fn parse_metadata(contents: &str) -> SkillMetadata {
    let Some(bounds) = frontmatter_bounds(contents) else {
        return SkillMetadata::default();
    };
    let frontmatter = &contents[bounds.start..bounds.end];
    if frontmatter.trim().is_empty() {
        return SkillMetadata::default();
    }
    let Ok(raw) = serde_yaml::from_str::<RawFrontmatter>(frontmatter) else {
        return SkillMetadata::default();
    };

    let metadata = raw.metadata.unwrap_or_default();
    SkillMetadata {
        name: non_empty(raw.name),
        description: non_empty(raw.description),
        author: non_empty(metadata.author),
        version: non_empty(metadata.version),
    }
}

/// Trim a value, treating blank values as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Byte range bounds for frontmatter in a document.
#[derive(Debug, Clone, Copy)]
struct FrontmatterBounds {
    /// Start byte index of the YAML payload.
    start: usize,
    /// End byte index of the YAML payload.
    end: usize,
}

/// Locate the byte range containing frontmatter in a document.
fn frontmatter_bounds(contents: &str) -> Option<FrontmatterBounds> {
    let mut offset = 0;
    let mut lines = contents.split_inclusive('\n');
    let first = lines.next()?;
    if trim_line_endings(first) != "---" {
        return None;
    }
    offset += first.len();
    let start = offset;

    for line in lines {
        if trim_line_endings(line) == "---" {
            return Some(FrontmatterBounds { start, end: offset });
        }
        offset += line.len();
    }

    None
}

/// Trim CRLF and LF suffixes from a line fragment.
fn trim_line_endings(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
