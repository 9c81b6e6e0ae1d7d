//! Skill registry and cross-skill bookkeeping
//!
//! Owns every skill of a game session, validates content at load time,
//! resolves parent/child references and keeps the reverse index of
//! which skills influence which xp rates. Constructed once and passed
//! to whatever needs skill lookups; there is no ambient global state.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use super::coefficient::ScalingCurve;
use super::milestone::{Milestone, MultiplierTarget, RESERVED_TARGET_IDS};
use super::round2;
use super::skill::{DepositOutcome, LevelUpReport, Skill, SkillDef};

/// Catch-up xp bonus per level a child skill lags behind its parent.
const CATCH_UP_FACTOR: f64 = 1.1;

/// Configuration and caller-contract errors.
///
/// Configuration variants are fatal at load time: the game must not
/// start on bad skill definitions. `UnknownSkill` is a caller contract
/// violation at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("id {0:?} is reserved for wildcard multiplier targets and not allowed for skills")]
    ReservedId(String),
    #[error("skill {0:?} is already registered")]
    DuplicateId(String),
    #[error("skill {parent:?} doesn't exist, so it can't be the parent of {skill:?}")]
    MissingParent { skill: String, parent: String },
    #[error("unknown skill {0:?}")]
    UnknownSkill(String),
}

/// All skill entities of a session, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: HashMap<String, Skill>,
    /// Registration order, for stable iteration and display.
    order: Vec<String>,
    /// Reverse index: multiplier target -> skills whose milestones
    /// registered a multiplier on it. Append-only, deduplicated.
    influences: HashMap<MultiplierTarget, Vec<String>>,
    /// Category label -> member skill ids, for display grouping.
    categories: BTreeMap<String, Vec<String>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from definitions, in order. Any validation
    /// failure is fatal.
    pub fn from_defs(defs: impl IntoIterator<Item = SkillDef>) -> Result<Self, SkillError> {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def)?;
        }
        Ok(registry)
    }

    /// Register one skill. Parents must already be registered, ids
    /// must be unique and must not collide with the wildcard targets.
    pub fn register(&mut self, def: SkillDef) -> Result<(), SkillError> {
        if RESERVED_TARGET_IDS.contains(&def.id.as_str()) {
            return Err(SkillError::ReservedId(def.id));
        }
        if self.skills.contains_key(&def.id) {
            return Err(SkillError::DuplicateId(def.id));
        }
        if let Some(parent) = &def.parent_skill {
            match self.skills.get_mut(parent) {
                Some(parent_skill) => parent_skill.mark_as_parent(),
                None => {
                    return Err(SkillError::MissingParent {
                        skill: def.id.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let skill = Skill::new(def);
        let id = skill.id().to_string();
        self.categories
            .entry(skill.category().to_string())
            .or_default()
            .push(id.clone());
        self.order.push(id.clone());
        self.skills.insert(id, skill);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.skills.get(id)
    }

    /// Skill ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn skill(&self, id: &str) -> Result<&Skill, SkillError> {
        self.skills.get(id).ok_or_else(|| SkillError::UnknownSkill(id.to_string()))
    }

    /// Deposit xp into a skill on behalf of the combat/activity
    /// systems.
    ///
    /// Unknown ids fail loudly; depositing to a locked skill is a
    /// defined silent no-op. On a level-up this records every xp
    /// multiplier source in the reverse index, applies milestone skill
    /// unlocks, and fills in the narration with resolved display names.
    pub fn deposit_xp(&mut self, id: &str, amount: f64) -> Result<DepositOutcome, SkillError> {
        let mut outcome = {
            let skill = self
                .skills
                .get_mut(id)
                .ok_or_else(|| SkillError::UnknownSkill(id.to_string()))?;
            skill.add_xp(amount)
        };

        if let DepositOutcome::LeveledUp(report) = &mut outcome {
            for target in report.gains.xp_multipliers.keys() {
                let sources = self.influences.entry(target.clone()).or_default();
                if !sources.iter().any(|source| source == id) {
                    sources.push(id.to_string());
                }
            }
            for unlocked in &report.unlocked_skills {
                match self.skills.get_mut(unlocked) {
                    Some(skill) => {
                        if skill.unlock() {
                            log::debug!("Skill {:?} unlocked by a milestone of {:?}", unlocked, id);
                        }
                    }
                    None => log::warn!(
                        "Skill {:?} tried to unlock {:?}, which doesn't exist. \
                         It could be a misspelled skill id",
                        id,
                        unlocked
                    ),
                }
            }
            let message = self.narrate_level_up(report);
            report.message = message;
        }
        Ok(outcome)
    }

    /// Explicit unlock from the dialogue/unlock collaborator.
    /// Idempotent; returns true when the skill was newly unlocked.
    pub fn unlock(&mut self, id: &str) -> Result<bool, SkillError> {
        let skill = self
            .skills
            .get_mut(id)
            .ok_or_else(|| SkillError::UnknownSkill(id.to_string()))?;
        Ok(skill.unlock())
    }

    /// Display name of a skill, honoring its visibility threshold.
    pub fn display_name(&self, id: &str) -> Result<&str, SkillError> {
        Ok(self.skill(id)?.display_name())
    }

    /// Level-derived coefficient of a skill under the given curve.
    pub fn coefficient(&self, id: &str, curve: ScalingCurve) -> Result<f64, SkillError> {
        Ok(self.skill(id)?.coefficient(curve))
    }

    /// Additive level bonus of a skill.
    pub fn level_bonus(&self, id: &str) -> Result<f64, SkillError> {
        Ok(self.skill(id)?.level_bonus())
    }

    /// Bonus xp multiplier for a child skill lagging behind its
    /// parent: 1.1 per level of difference, never below 1. Parentless
    /// skills always get exactly 1.
    pub fn catch_up_multiplier(&self, id: &str) -> Result<f64, SkillError> {
        let skill = self.skill(id)?;
        let Some(parent_id) = skill.parent_skill() else {
            return Ok(1.0);
        };
        let parent = self.skill(parent_id)?;
        let lag = parent.current_level().saturating_sub(skill.current_level());
        Ok(CATCH_UP_FACTOR.powi(lag as i32))
    }

    /// Next level at which a skill still has a milestone, if any.
    pub fn next_milestone_level(&self, id: &str) -> Result<Option<u32>, SkillError> {
        let skill = self.skill(id)?;
        Ok(skill.rewards().next_milestone_after(skill.current_level()))
    }

    /// Which skills have registered an xp multiplier on `target` so
    /// far during this session.
    pub fn which_skills_affect(&self, target: &MultiplierTarget) -> &[String] {
        self.influences.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Member skill ids of a display category.
    pub fn category_members(&self, category: &str) -> &[String] {
        self.categories.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every milestone a skill has already crossed, formatted for its
    /// detail panel. Empty when nothing is crossed yet.
    pub fn unlocked_milestone_text(&self, id: &str) -> Result<String, SkillError> {
        let skill = self.skill(id)?;
        let lines: Vec<String> = skill
            .rewards()
            .milestones
            .range(..=skill.current_level())
            .map(|(level, milestone)| format!("lvl {}: {}", level, self.format_milestone(milestone)))
            .collect();
        Ok(lines.join("\n"))
    }

    /// Full narration for a level-up: the level line, then every
    /// aggregated gain with display names resolved through the
    /// registry.
    fn narrate_level_up(&self, report: &LevelUpReport) -> String {
        let name = self
            .skills
            .get(&report.skill_id)
            .map(|skill| skill.display_name().to_string())
            .unwrap_or_else(|| report.skill_id.clone());
        let mut message = format!("{} has reached level {}", name, report.new_level);
        if report.gains.is_empty() {
            return message;
        }

        message.push_str(&format!(
            "\nThanks to {} reaching a new milestone, the hero gained:",
            name
        ));
        for (stat, bonus) in &report.gains.stats {
            let stat = stat.replace('_', " ");
            if let Some(flat) = bonus.flat {
                message.push_str(&format!("\n +{} {}", flat, stat));
            }
            if let Some(multiplier) = bonus.multiplier {
                message.push_str(&format!("\n x{} {}", round2(multiplier), stat));
            }
        }
        for (target, multiplier) in &report.gains.xp_multipliers {
            message.push_str(&format!(
                "\n x{} {} xp gain",
                round2(*multiplier),
                self.target_label(target)
            ));
        }
        message
    }

    /// Display label for a multiplier target; wildcards keep their
    /// wire name with underscores spaced out.
    fn target_label(&self, target: &MultiplierTarget) -> String {
        match target {
            MultiplierTarget::Skill(id) => match self.skills.get(id) {
                Some(skill) => skill.display_name().to_string(),
                None => {
                    log::warn!(
                        "An xp multiplier names {:?}, which doesn't exist. \
                         It could be a misspelled skill id",
                        id
                    );
                    id.clone()
                }
            },
            wildcard => wildcard.wildcard_label().unwrap_or_default().to_string(),
        }
    }

    /// One milestone bundle formatted to a single line: flat bonuses,
    /// then stat multipliers, then xp multipliers, then unlocks.
    fn format_milestone(&self, milestone: &Milestone) -> String {
        let mut parts = Vec::new();
        let mut multiplier_parts = Vec::new();
        for (stat, bonus) in &milestone.stats {
            let stat = stat.replace('_', " ");
            if let Some(flat) = bonus.flat {
                parts.push(format!("+{} {}", flat, stat));
            }
            if let Some(multiplier) = bonus.multiplier {
                multiplier_parts.push(format!("x{} {}", multiplier, stat));
            }
        }
        parts.extend(multiplier_parts);
        for (target, multiplier) in &milestone.xp_multipliers {
            parts.push(format!("x{} {} xp gain", multiplier, self.target_label(target)));
        }
        for unlocked in &milestone.unlocks.skills {
            parts.push(format!("unlocked skill \"{}\"", unlocked));
        }
        parts.join(", ")
    }
}
