//! RON data loader
//!
//! Loads skill definitions from an external RON file, with fallback to
//! the hardcoded defaults. Parse failures only cost the override;
//! validation failures when building the registry are fatal.

use std::fs;
use std::path::Path;

use crate::progression::{SkillDef, SkillRegistry};

use super::skills::default_skill_defs;

/// Manages external game content.
#[derive(Debug, Clone)]
pub struct DataManager {
    /// Skill definitions, from `assets/data/skills.ron` or defaults.
    pub skills: Vec<SkillDef>,
}

impl Default for DataManager {
    fn default() -> Self {
        Self { skills: default_skill_defs() }
    }
}

impl DataManager {
    /// Create a new DataManager, loading from files or using defaults.
    pub fn new() -> Self {
        Self { skills: load_skill_defs(Path::new("assets/data")) }
    }

    /// Build the validated skill registry. Configuration errors are
    /// fatal here: the game must not start on bad skill definitions.
    pub fn build_registry(&self) -> anyhow::Result<SkillRegistry> {
        Ok(SkillRegistry::from_defs(self.skills.iter().cloned())?)
    }
}

/// Load skill definitions from skills.ron, or fall back to defaults.
fn load_skill_defs(base_path: &Path) -> Vec<SkillDef> {
    let path = base_path.join("skills.ron");
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(content) => match ron::from_str::<Vec<SkillDef>>(&content) {
                Ok(defs) => {
                    log::info!("Loaded {} skill definitions from {}", defs.len(), path.display());
                    return defs;
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}. Using default skills.", path.display(), e)
                }
            },
            Err(e) => log::warn!("Failed to read {}: {}. Using default skills.", path.display(), e),
        }
    }
    default_skill_defs()
}
