use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityScoreSet;

const DEFAULT_SCORE: i32 = 10;
const PASSIVE_BASE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    /// Sheet order; rolled scores are assigned in this order.
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    pub fn abbrev(self) -> &'static str {
        match self {
            Ability::Str => "STR",
            Ability::Dex => "DEX",
            Ability::Con => "CON",
            Ability::Int => "INT",
            Ability::Wis => "WIS",
            Ability::Cha => "CHA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    pub const ALL: [Skill; 18] = [
        Skill::Acrobatics,
        Skill::AnimalHandling,
        Skill::Arcana,
        Skill::Athletics,
        Skill::Deception,
        Skill::History,
        Skill::Insight,
        Skill::Intimidation,
        Skill::Investigation,
        Skill::Medicine,
        Skill::Nature,
        Skill::Perception,
        Skill::Performance,
        Skill::Persuasion,
        Skill::Religion,
        Skill::SleightOfHand,
        Skill::Stealth,
        Skill::Survival,
    ];

    /// Governing ability.
    pub fn ability(self) -> Ability {
        use Skill::*;
        match self {
            Athletics => Ability::Str,
            Acrobatics | SleightOfHand | Stealth => Ability::Dex,
            Arcana | History | Investigation | Nature | Religion => Ability::Int,
            AnimalHandling | Insight | Medicine | Perception | Survival => Ability::Wis,
            Deception | Intimidation | Performance | Persuasion => Ability::Cha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "str", default = "default_score")]
    pub str_: i32,
    #[serde(default = "default_score")]
    pub dex: i32,
    #[serde(default = "default_score")]
    pub con: i32,
    #[serde(rename = "int", default = "default_score")]
    pub int_: i32,
    #[serde(default = "default_score")]
    pub wis: i32,
    #[serde(default = "default_score")]
    pub cha: i32,
}

fn default_score() -> i32 {
    DEFAULT_SCORE
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            str_: DEFAULT_SCORE,
            dex: DEFAULT_SCORE,
            con: DEFAULT_SCORE,
            int_: DEFAULT_SCORE,
            wis: DEFAULT_SCORE,
            cha: DEFAULT_SCORE,
        }
    }
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str_,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int_,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    pub fn set(&mut self, ability: Ability, score: i32) {
        let slot = match ability {
            Ability::Str => &mut self.str_,
            Ability::Dex => &mut self.dex,
            Ability::Con => &mut self.con,
            Ability::Int => &mut self.int_,
            Ability::Wis => &mut self.wis,
            Ability::Cha => &mut self.cha,
        };
        *slot = score;
    }

    pub fn mod_of(&self, ability: Ability) -> i32 {
        ability_mod(self.get(ability))
    }
}

/// D&D ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division.
    (score - 10).div_euclid(2)
}

/// +2 at levels 1-4, +3 at 5-8, up to +6 at 17-20. Levels below 1 count as 1.
pub fn proficiency_bonus(level: u32) -> i32 {
    2 + ((level.max(1) - 1) / 4) as i32
}

pub fn format_modifier(modifier: i32) -> String {
    if modifier >= 0 {
        format!("+{}", modifier)
    } else {
        format!("-{}", modifier.abs())
    }
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub abilities: AbilityScores,
    #[serde(default)]
    pub save_proficiencies: BTreeSet<Ability>,
    #[serde(default)]
    pub skill_proficiencies: BTreeSet<Skill>,
    /// Class hit die size (e.g. 10 for a fighter), if a class is chosen.
    #[serde(default)]
    pub hit_die: Option<u32>,
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: default_level(),
            abilities: AbilityScores::default(),
            save_proficiencies: BTreeSet::new(),
            skill_proficiencies: BTreeSet::new(),
            hit_die: None,
        }
    }
}

impl CharacterSheet {
    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }

    pub fn ability_mod(&self, ability: Ability) -> i32 {
        self.abilities.mod_of(ability)
    }

    pub fn save_mod(&self, ability: Ability) -> i32 {
        let prof = if self.save_proficiencies.contains(&ability) {
            self.proficiency_bonus()
        } else {
            0
        };
        self.ability_mod(ability) + prof
    }

    pub fn skill_mod(&self, skill: Skill) -> i32 {
        let prof = if self.skill_proficiencies.contains(&skill) {
            self.proficiency_bonus()
        } else {
            0
        };
        self.ability_mod(skill.ability()) + prof
    }

    pub fn initiative(&self) -> i32 {
        self.ability_mod(Ability::Dex)
    }

    pub fn passive_perception(&self) -> i32 {
        PASSIVE_BASE + self.skill_mod(Skill::Perception)
    }

    /// Hit dice pool as notation, e.g. `3d10`; `None` until a class sets the die.
    pub fn hit_dice(&self) -> Option<String> {
        self.hit_die
            .map(|hd| format!("{}d{}", self.level.max(1), hd))
    }

    pub fn apply_rolled_scores(&mut self, scores: AbilityScoreSet) {
        self.abilities = scores.into_scores();
    }
}
