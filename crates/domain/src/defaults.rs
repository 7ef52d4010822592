//! The default sheet every new character starts from.

use crate::entities::{Skill, Statistic};
use crate::error::DomainError;
use crate::ids::UserId;
use crate::value_objects::{Description, ShortName, SkillName, StatisticName};

struct DefaultStatistic {
    name: &'static str,
    short_name: &'static str,
    description: &'static str,
    /// (skill name, cost per level)
    skills: &'static [(&'static str, u32)],
}

const DEFAULT_STATISTICS: &[DefaultStatistic] = &[
    DefaultStatistic {
        name: "Intelligence",
        short_name: "INT",
        description: "For solving puzzles, performing science, deduction, and the like.",
        skills: &[
            ("Awareness", 1),
            ("Business", 1),
            ("Deduction", 1),
            ("Education", 1),
            ("Language", 2),
            ("Monster Lore", 2),
            ("Social Etiquette", 1),
            ("Streetwise", 1),
            ("Tactics", 2),
            ("Teaching", 1),
            ("Wilderness Survival", 1),
        ],
    },
    DefaultStatistic {
        name: "Reflexes",
        short_name: "REF",
        description: "For fighting, dodging, and tasks that require fast reactions and accurate movements.",
        skills: &[
            ("Brawling", 1),
            ("Dodge/Escape", 1),
            ("Melee", 1),
            ("Riding", 1),
            ("Sailing", 1),
            ("Small Blades", 1),
            ("Staff/Spear", 1),
            ("Swordsmanship", 1),
        ],
    },
    DefaultStatistic {
        name: "Dexterity",
        short_name: "DEX",
        description: "For ranged attacks and anything that requires hand-eye coordination or balance.",
        skills: &[
            ("Archery", 1),
            ("Athletics", 1),
            ("Crossbow", 1),
            ("Sleight of Hand", 1),
            ("Stealth", 1),
        ],
    },
    DefaultStatistic {
        name: "Body",
        short_name: "BODY",
        description: "For things that require great strength, like wrestling and strength feats, or physical endurance, such as resisting disease or fatigue.",
        skills: &[("Physique", 1), ("Endurance", 1)],
    },
    DefaultStatistic {
        name: "Empathy",
        short_name: "EMP",
        description: "For affairs of the heart and emotions. Seducing and persuading come under this category.",
        skills: &[
            ("Charisma", 1),
            ("Deceit", 1),
            ("Fine Arts", 1),
            ("Gambling", 1),
            ("Grooming and Style", 1),
            ("Human Perception", 1),
            ("Leadership", 1),
            ("Persuasion", 1),
            ("Performance", 1),
            ("Seduction", 1),
        ],
    },
    DefaultStatistic {
        name: "Craft",
        short_name: "CRA",
        description: "For using machinery and creating things with precision. Also for using artillery and setting traps.",
        skills: &[
            ("Alchemy", 2),
            ("Crafting", 2),
            ("Disguise", 1),
            ("First Aid", 1),
            ("Forgery", 1),
            ("Pick Lock", 1),
            ("Trap Crafting", 2),
        ],
    },
    DefaultStatistic {
        name: "Will",
        short_name: "WILL",
        description: "For intimidation, magical checks, and mental endurance checks. Shows your sheer power to keep moving forward and your ability to control magic.",
        skills: &[
            ("Courage", 1),
            ("Hex Weaving", 2),
            ("Intimidation", 1),
            ("Spell Casting", 2),
            ("Resist Magic", 2),
            ("Resist Coercion", 1),
            ("Ritual Crafting", 2),
        ],
    },
    DefaultStatistic {
        name: "Speed",
        short_name: "SPD",
        description: "This represents how fast your character moves. You can use this Stat when trying to outrun other people or determining how far you can move in a given time.",
        skills: &[],
    },
    DefaultStatistic {
        name: "Luck",
        short_name: "LUCK",
        description: "Luck is a pool of points used to change things in your favor. Before you make any skill roll, on your turn or in defense against someone else, you can add Luck. For every point you use you gain +1, but you must choose how many points you use before you roll. Your Luck pool refills at the beginning of each session.",
        skills: &[],
    },
];

/// Build the default statistics and skills for `user_id`, all at level 0.
pub fn default_sheet(user_id: UserId) -> Result<Vec<(Statistic, Vec<Skill>)>, DomainError> {
    DEFAULT_STATISTICS
        .iter()
        .map(|def| {
            let statistic = Statistic::new(
                user_id,
                StatisticName::new(def.name)?,
                ShortName::new(def.short_name)?,
                Description::new(def.description)?,
            );
            let skills = def
                .skills
                .iter()
                .map(|(name, cost_per_level)| {
                    Skill::new(statistic.id(), SkillName::new(*name)?, *cost_per_level)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((statistic, skills))
        })
        .collect()
}
