//! Skill directory loading.

use std::{fs, path::Path};

use crate::{
    catalog::dir_name,
    frontmatter::{SkillMetadata, parse_metadata},
};

/// The expected skill file name within a skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// A skill directory discovered in the store.
#[derive(Debug, Clone)]
pub struct Skill {
    /// Directory base name, which is also the name used in targets.
    pub(crate) name: String,
    /// Metadata parsed from the skill file, empty when unavailable.
    pub(crate) metadata: SkillMetadata,
}

/// Load a skill directory, reading metadata from its skill file when present.
pub fn load_skill(dir: &Path) -> Skill {
    let name = dir_name(dir);
    let metadata = fs::read_to_string(dir.join(SKILL_FILE_NAME))
        .map(|contents| parse_metadata(&contents))
        .unwrap_or_default();

    Skill {
        name,
        metadata,
    }
}
