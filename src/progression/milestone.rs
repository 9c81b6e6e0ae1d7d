//! Milestone reward tables
//!
//! Sparse per-skill mapping from level to a one-time reward bundle:
//! flat/multiplicative stat deltas, cross-skill xp multipliers and
//! skill unlocks. Bundles crossed by a single deposit are aggregated
//! into one [`LevelingGains`] before being reported.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::round2;

/// Ids reserved for wildcard multiplier targets, forbidden as skill ids.
pub const RESERVED_TARGET_IDS: [&str; 3] = ["all", "hero", "all_skill"];

/// Target of a milestone xp multiplier.
///
/// Authored as a plain string (a skill id or one of the reserved
/// wildcards) and resolved once at load time, so the aggregation path
/// never branches on raw strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MultiplierTarget {
    /// A single named skill.
    Skill(String),
    /// Every skill, authored as `"all_skill"`.
    AllSkills,
    /// Hero xp only, authored as `"hero"`.
    HeroOnly,
    /// Hero and skill xp alike, authored as `"all"`.
    Everything,
}

impl From<String> for MultiplierTarget {
    fn from(id: String) -> Self {
        match id.as_str() {
            "all" => MultiplierTarget::Everything,
            "hero" => MultiplierTarget::HeroOnly,
            "all_skill" => MultiplierTarget::AllSkills,
            _ => MultiplierTarget::Skill(id),
        }
    }
}

impl From<&str> for MultiplierTarget {
    fn from(id: &str) -> Self {
        MultiplierTarget::from(id.to_string())
    }
}

impl From<MultiplierTarget> for String {
    fn from(target: MultiplierTarget) -> Self {
        match target {
            MultiplierTarget::Skill(id) => id,
            MultiplierTarget::AllSkills => "all_skill".to_string(),
            MultiplierTarget::HeroOnly => "hero".to_string(),
            MultiplierTarget::Everything => "all".to_string(),
        }
    }
}

impl MultiplierTarget {
    /// Display label for wildcard targets; specific skills resolve
    /// their display name through the registry instead.
    pub fn wildcard_label(&self) -> Option<&'static str> {
        match self {
            MultiplierTarget::Skill(_) => None,
            MultiplierTarget::AllSkills => Some("all skill"),
            MultiplierTarget::HeroOnly => Some("hero"),
            MultiplierTarget::Everything => Some("all"),
        }
    }
}

/// Flat and/or multiplicative delta to one character-sheet stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBonus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
}

/// Content unlocked by reaching a milestone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MilestoneUnlocks {
    /// Skill ids to unlock (set to unlocked, not granted levels).
    #[serde(default)]
    pub skills: Vec<String>,
}

/// One-time rewards granted the first time a level is reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Stat name -> bonus applied to the character sheet.
    #[serde(default)]
    pub stats: BTreeMap<String, StatBonus>,
    /// Multipliers applied to the targets' future xp gains.
    #[serde(default)]
    pub xp_multipliers: BTreeMap<MultiplierTarget, f64>,
    #[serde(default)]
    pub unlocks: MilestoneUnlocks,
}

/// Rewards aggregated across every milestone crossed by one deposit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelingGains {
    pub stats: BTreeMap<String, StatBonus>,
    pub xp_multipliers: BTreeMap<MultiplierTarget, f64>,
}

impl LevelingGains {
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty() && self.xp_multipliers.is_empty()
    }
}

/// Sparse level -> milestone table for a single skill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    #[serde(default)]
    pub milestones: BTreeMap<u32, Milestone>,
}

impl RewardTable {
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// First level above `level` that still holds a milestone.
    pub fn next_milestone_after(&self, level: u32) -> Option<u32> {
        self.milestones.range(level + 1..).next().map(|(lvl, _)| *lvl)
    }

    /// Aggregates every milestone in `(from_exclusive, to_inclusive]`
    /// into a single gain set: flat deltas sum, stat multipliers
    /// compound and are rounded to 2 decimals at the end, xp
    /// multipliers compound per target at raw precision (they are only
    /// rounded when formatted for display).
    pub fn bonuses_for_levels(&self, from_exclusive: u32, to_inclusive: u32) -> LevelingGains {
        let mut gains = LevelingGains::default();
        if to_inclusive <= from_exclusive {
            return gains;
        }
        for milestone in self
            .milestones
            .range(from_exclusive + 1..=to_inclusive)
            .map(|(_, milestone)| milestone)
        {
            for (stat, bonus) in &milestone.stats {
                let entry = gains.stats.entry(stat.clone()).or_default();
                if let Some(flat) = bonus.flat {
                    entry.flat = Some(entry.flat.unwrap_or(0.0) + flat);
                }
                if let Some(multiplier) = bonus.multiplier {
                    entry.multiplier = Some(entry.multiplier.unwrap_or(1.0) * multiplier);
                }
            }
            for (target, multiplier) in &milestone.xp_multipliers {
                *gains.xp_multipliers.entry(target.clone()).or_insert(1.0) *= multiplier;
            }
        }
        for bonus in gains.stats.values_mut() {
            if let Some(multiplier) = bonus.multiplier {
                bonus.multiplier = Some(round2(multiplier));
            }
        }
        gains
    }

    /// Skill unlocks granted by milestones in
    /// `(from_exclusive, to_inclusive]`, concatenated in level order.
    pub fn unlocks_for_levels(&self, from_exclusive: u32, to_inclusive: u32) -> Vec<String> {
        if to_inclusive <= from_exclusive {
            return Vec::new();
        }
        self.milestones
            .range(from_exclusive + 1..=to_inclusive)
            .flat_map(|(_, milestone)| milestone.unlocks.skills.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: Vec<(u32, Milestone)>) -> RewardTable {
        RewardTable {
            milestones: entries.into_iter().collect(),
        }
    }

    fn stat_milestone(stat: &str, bonus: StatBonus) -> Milestone {
        Milestone {
            stats: [(stat.to_string(), bonus)].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_target_resolution() {
        assert_eq!(MultiplierTarget::from("all"), MultiplierTarget::Everything);
        assert_eq!(MultiplierTarget::from("hero"), MultiplierTarget::HeroOnly);
        assert_eq!(MultiplierTarget::from("all_skill"), MultiplierTarget::AllSkills);
        assert_eq!(
            MultiplierTarget::from("Evasion"),
            MultiplierTarget::Skill("Evasion".to_string())
        );
        assert_eq!(String::from(MultiplierTarget::AllSkills), "all_skill");
    }

    #[test]
    fn test_flat_bonuses_sum() {
        let table = table(vec![
            (1, stat_milestone("strength", StatBonus { flat: Some(1.0), multiplier: None })),
            (3, stat_milestone("strength", StatBonus { flat: Some(2.0), multiplier: None })),
        ]);
        let gains = table.bonuses_for_levels(0, 3);
        assert_eq!(gains.stats["strength"].flat, Some(3.0));
        assert_eq!(gains.stats["strength"].multiplier, None);
    }

    #[test]
    fn test_multipliers_compound_and_round() {
        let table = table(vec![
            (1, stat_milestone("agility", StatBonus { flat: None, multiplier: Some(1.05) })),
            (2, stat_milestone("agility", StatBonus { flat: None, multiplier: Some(1.05) })),
        ]);
        let gains = table.bonuses_for_levels(0, 2);
        // 1.05 * 1.05 = 1.1025, displayed as 1.1
        assert_eq!(gains.stats["agility"].multiplier, Some(1.1));
    }

    #[test]
    fn test_range_is_exclusive_below_inclusive_above() {
        let table = table(vec![
            (2, stat_milestone("strength", StatBonus { flat: Some(1.0), multiplier: None })),
            (5, stat_milestone("strength", StatBonus { flat: Some(10.0), multiplier: None })),
        ]);
        // level 2 already crossed, level 5 is the new level
        let gains = table.bonuses_for_levels(2, 5);
        assert_eq!(gains.stats["strength"].flat, Some(10.0));
        assert!(table.bonuses_for_levels(5, 5).is_empty());
        assert!(table.bonuses_for_levels(5, 3).is_empty());
    }

    #[test]
    fn test_xp_multipliers_compound_per_target() {
        let milestone = |factor: f64| Milestone {
            xp_multipliers: [(MultiplierTarget::from("Combat"), factor)].into_iter().collect(),
            ..Default::default()
        };
        let table = table(vec![(1, milestone(1.05)), (3, milestone(1.1))]);
        let gains = table.bonuses_for_levels(0, 3);
        let combined = gains.xp_multipliers[&MultiplierTarget::from("Combat")];
        assert!((combined - 1.155).abs() < 1e-9);
    }

    #[test]
    fn test_unlock_lists_concatenate() {
        let unlock = |skills: &[&str]| Milestone {
            unlocks: MilestoneUnlocks {
                skills: skills.iter().map(|s| s.to_string()).collect(),
            },
            ..Default::default()
        };
        let table = table(vec![(2, unlock(&["Meditation"])), (4, unlock(&["Mana expansion"]))]);
        assert_eq!(table.unlocks_for_levels(0, 4), vec!["Meditation", "Mana expansion"]);
        assert!(table.unlocks_for_levels(2, 3).is_empty());
    }

    #[test]
    fn test_next_milestone_after() {
        let table = table(vec![(3, Milestone::default()), (7, Milestone::default())]);
        assert_eq!(table.next_milestone_after(0), Some(3));
        assert_eq!(table.next_milestone_after(3), Some(7));
        assert_eq!(table.next_milestone_after(7), None);
    }
}
