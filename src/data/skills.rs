//! Default skill roster
//!
//! Pure configuration: the skill definitions shipped with the game,
//! used whenever no external data file overrides them. Grouped the way
//! the skill panel groups them; parents are declared before children.

use std::collections::BTreeMap;

use crate::progression::{
    Milestone, MilestoneUnlocks, MultiplierTarget, RewardTable, SkillDef, StatBonus,
};

fn names<const N: usize>(entries: [(u32, &str); N]) -> BTreeMap<u32, String> {
    entries.into_iter().map(|(level, name)| (level, name.to_string())).collect()
}

fn flat(amount: f64) -> StatBonus {
    StatBonus { flat: Some(amount), multiplier: None }
}

fn multiplier(factor: f64) -> StatBonus {
    StatBonus { flat: None, multiplier: Some(factor) }
}

fn both(amount: f64, factor: f64) -> StatBonus {
    StatBonus { flat: Some(amount), multiplier: Some(factor) }
}

fn stats<const N: usize>(entries: [(&str, StatBonus); N]) -> BTreeMap<String, StatBonus> {
    entries.into_iter().map(|(stat, bonus)| (stat.to_string(), bonus)).collect()
}

fn xp_multipliers<const N: usize>(entries: [(&str, f64); N]) -> BTreeMap<MultiplierTarget, f64> {
    entries
        .into_iter()
        .map(|(target, factor)| (MultiplierTarget::from(target), factor))
        .collect()
}

fn unlocks<const N: usize>(skills: [&str; N]) -> MilestoneUnlocks {
    MilestoneUnlocks { skills: skills.into_iter().map(str::to_string).collect() }
}

fn milestones<const N: usize>(entries: [(u32, Milestone); N]) -> RewardTable {
    RewardTable { milestones: entries.into_iter().collect() }
}

// =============================================================================
// Combat
// =============================================================================

fn combat_skills() -> Vec<SkillDef> {
    vec![
        SkillDef {
            id: "Combat".to_string(),
            names: names([(0, "Combat")]),
            description: "Overall combat ability".to_string(),
            category: "Combat".to_string(),
            base_xp_cost: 60.0,
            max_level_coefficient: 2.0,
            ..Default::default()
        },
        SkillDef {
            id: "Battling".to_string(),
            names: names([(0, "Battling"), (15, "Battle master")]),
            description: "Your proficiency for fighting even opponents.".to_string(),
            category: "Combat".to_string(),
            base_xp_cost: 100.0,
            max_level_coefficient: 1.4,
            ..Default::default()
        },
        SkillDef {
            id: "Pest killer".to_string(),
            names: names([(0, "Pest killer"), (15, "Pest slayer")]),
            description: "Small enemies might not seem very dangerous, but it's not that easy to hit them!"
                .to_string(),
            category: "Combat".to_string(),
            base_xp_cost: 100.0,
            max_level_coefficient: 2.0,
            rewards: milestones([
                (
                    1,
                    Milestone {
                        xp_multipliers: xp_multipliers([("Combat", 1.05)]),
                        ..Default::default()
                    },
                ),
                (
                    3,
                    Milestone {
                        stats: stats([("dexterity", flat(1.0))]),
                        xp_multipliers: xp_multipliers([("Combat", 1.1)]),
                        ..Default::default()
                    },
                ),
                (
                    5,
                    Milestone {
                        stats: stats([("dexterity", multiplier(1.05))]),
                        xp_multipliers: xp_multipliers([("Evasion", 1.1)]),
                        ..Default::default()
                    },
                ),
            ]),
            ..Default::default()
        },
        SkillDef {
            id: "Giant slayer".to_string(),
            names: names([(0, "Giant killer"), (15, "Giant slayer")]),
            description: "Large opponents might seem scary, but just don't get hit and you should be fine!"
                .to_string(),
            category: "Combat".to_string(),
            base_xp_cost: 100.0,
            max_level_coefficient: 2.0,
            ..Default::default()
        },
        SkillDef {
            id: "Evasion".to_string(),
            names: names([(0, "Evasion")]),
            description: "Ability to evade attacks".to_string(),
            category: "Combat".to_string(),
            base_xp_cost: 30.0,
            max_level_coefficient: 2.0,
            rewards: milestones([
                (1, Milestone { stats: stats([("agility", flat(1.0))]), ..Default::default() }),
                (3, Milestone { stats: stats([("agility", flat(1.0))]), ..Default::default() }),
                (5, Milestone { stats: stats([("agility", both(1.0, 1.05))]), ..Default::default() }),
                (7, Milestone { stats: stats([("agility", flat(2.0))]), ..Default::default() }),
                (
                    10,
                    Milestone {
                        stats: stats([("agility", multiplier(1.05))]),
                        xp_multipliers: xp_multipliers([("all_skill", 1.05)]),
                        ..Default::default()
                    },
                ),
            ]),
            ..Default::default()
        },
    ]
}

// =============================================================================
// Combat stances
// =============================================================================

fn stance_skills() -> Vec<SkillDef> {
    let stance = |id: &str, name: &str, description: &str| SkillDef {
        id: id.to_string(),
        names: names([(0, name)]),
        description: description.to_string(),
        category: "Stance".to_string(),
        base_xp_cost: 60.0,
        max_level: 30,
        max_level_coefficient: 2.0,
        parent_skill: Some("Stance mastery".to_string()),
        ..Default::default()
    };

    vec![
        SkillDef {
            id: "Stance mastery".to_string(),
            names: names([(0, "Stance proficiency"), (10, "Stance mastery")]),
            description: "Knowledge on how to apply different stances in combat".to_string(),
            category: "Stance".to_string(),
            base_xp_cost: 60.0,
            max_level: 30,
            ..Default::default()
        },
        stance(
            "Quick steps",
            "Quick steps",
            "A swift and precise technique that abandons strength in favor of greater speed",
        ),
        stance(
            "Heavy strike",
            "Crushing force",
            "A powerful and dangerous technique that abandons speed in favor of overwhelmingly strong attacks",
        ),
        stance(
            "Defensive measures",
            "Defensive measures",
            "A careful technique focused much more on defense and counterattacking, instead of direct attacking",
        ),
    ]
}

// =============================================================================
// Activities
// =============================================================================

fn activity_skills() -> Vec<SkillDef> {
    vec![
        SkillDef {
            id: "Sleeping".to_string(),
            names: names([(0, "Recovery")]),
            description: "Good, regular sleep is the basis of getting stronger and helps your body heal."
                .to_string(),
            category: "Activity".to_string(),
            base_xp_cost: 1000.0,
            visibility_threshold: 300.0,
            xp_scaling: 2.0,
            max_level: 20,
            max_level_coefficient: 2.5,
            rewards: milestones([
                (
                    2,
                    Milestone {
                        stats: stats([("max_health", both(10.0, 1.05))]),
                        xp_multipliers: xp_multipliers([("all", 1.05)]),
                        ..Default::default()
                    },
                ),
                (
                    4,
                    Milestone {
                        stats: stats([("max_health", both(20.0, 1.05))]),
                        xp_multipliers: xp_multipliers([("all", 1.05)]),
                        ..Default::default()
                    },
                ),
                (5, Milestone { unlocks: unlocks(["Meditation"]), ..Default::default() }),
                (
                    6,
                    Milestone {
                        stats: stats([("max_health", both(30.0, 1.05))]),
                        xp_multipliers: xp_multipliers([("all", 1.05), ("Meditation", 1.1)]),
                        ..Default::default()
                    },
                ),
                (
                    10,
                    Milestone {
                        stats: stats([("max_health", both(50.0, 1.1))]),
                        xp_multipliers: xp_multipliers([("all", 1.1), ("Meditation", 1.1)]),
                        ..Default::default()
                    },
                ),
            ]),
            ..Default::default()
        },
        SkillDef {
            id: "Meditation".to_string(),
            names: names([(0, "Meditation")]),
            description: "Focus your mind".to_string(),
            category: "Activity".to_string(),
            base_xp_cost: 200.0,
            max_level: 30,
            max_level_coefficient: 2.0,
            is_unlocked: false,
            visibility_threshold: 0.0,
            rewards: milestones([
                (
                    2,
                    Milestone {
                        stats: stats([("intuition", flat(1.0))]),
                        xp_multipliers: xp_multipliers([("all", 1.05)]),
                        ..Default::default()
                    },
                ),
                (
                    5,
                    Milestone {
                        xp_multipliers: xp_multipliers([("Sleeping", 1.1)]),
                        ..Default::default()
                    },
                ),
                (
                    8,
                    Milestone {
                        stats: stats([("intuition", multiplier(1.05))]),
                        xp_multipliers: xp_multipliers([("hero", 1.05)]),
                        ..Default::default()
                    },
                ),
                (
                    10,
                    Milestone {
                        stats: stats([("intuition", both(2.0, 1.05))]),
                        xp_multipliers: xp_multipliers([("all", 1.1), ("Sleeping", 1.1)]),
                        unlocks: unlocks(["Mana expansion"]),
                    },
                ),
            ]),
            ..Default::default()
        },
        SkillDef {
            id: "Running".to_string(),
            names: names([(0, "Running")]),
            description: "Great way to improve the efficiency of your legs.".to_string(),
            category: "Activity".to_string(),
            base_xp_cost: 50.0,
            max_level: 50,
            max_level_bonus: 5.0,
            rewards: milestones([(
                5,
                Milestone { stats: stats([("agility", flat(1.0))]), ..Default::default() },
            )]),
            ..Default::default()
        },
    ]
}

// =============================================================================
// Magic
// =============================================================================

fn magic_skills() -> Vec<SkillDef> {
    vec![
        SkillDef {
            id: "Magic".to_string(),
            names: names([(0, "Magic")]),
            description: "Control of your inner magic".to_string(),
            category: "Magic".to_string(),
            base_xp_cost: 100.0,
            max_level_coefficient: 2.0,
            ..Default::default()
        },
        SkillDef {
            id: "Mana expansion".to_string(),
            names: names([(0, "Mana expansion")]),
            description: "Practice on stretching your mana reserves beyond their natural size."
                .to_string(),
            category: "Magic".to_string(),
            base_xp_cost: 4000.0,
            max_level: 30,
            max_level_coefficient: 2.0,
            is_unlocked: false,
            is_hidden: true,
            visibility_threshold: 0.0,
            parent_skill: Some("Magic".to_string()),
            ..Default::default()
        },
    ]
}

/// The full default roster, in registration order (parents first).
pub fn default_skill_defs() -> Vec<SkillDef> {
    let mut defs = combat_skills();
    defs.extend(stance_skills());
    defs.extend(activity_skills());
    defs.extend(magic_skills());
    defs
}
