//! Wrenfall - skill progression engine for an idle RPG
//!
//! Converts accumulated experience into levels (resolving multi-level
//! jumps in a single deposit), aggregates per-milestone rewards, and
//! propagates catch-up bonuses between related skills.
//!
//! Combat resolution, the dialogue/unlock graph, the character sheet
//! and all rendering are collaborators: they feed xp in through
//! [`SkillRegistry::deposit_xp`] and read state back out through the
//! registry's accessors.
//!
//! [`SkillRegistry::deposit_xp`]: progression::SkillRegistry::deposit_xp

pub mod data;
pub mod progression;

// Re-export commonly used types
pub use progression::{
    DepositOutcome, LevelUpReport, MultiplierTarget, ScalingCurve, Skill, SkillDef, SkillError,
    SkillRegistry,
};
