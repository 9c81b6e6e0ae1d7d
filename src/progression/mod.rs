//! Progression systems

pub mod coefficient;
pub mod milestone;
pub mod registry;
pub mod skill;

pub use coefficient::ScalingCurve;
pub use milestone::{
    LevelingGains, Milestone, MilestoneUnlocks, MultiplierTarget, RewardTable, StatBonus,
};
pub use registry::{SkillError, SkillRegistry};
pub use skill::{DepositOutcome, LevelProgress, LevelUpReport, Skill, SkillDef};

/// Round to 2 decimal places, the fixed-point precision of all xp
/// accounting.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 3 decimal places, used for coefficients so dependent UI
/// strings stay stable.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
