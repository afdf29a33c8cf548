use std::collections::VecDeque;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub mod abilities;
pub mod api;
pub mod expr;
pub mod sheet;

pub use abilities::{AbilityScoreSet, CandidateRoll, StatRoll, roll_ability_scores, roll_stat_block};
pub use expr::{DiceTerm, Expression, ParseError, RollResult, evaluate, parse};
pub use sheet::{Ability, AbilityScores, CharacterSheet, Skill, ability_mod, proficiency_bonus};

/// Seed used once a scripted sequence has been used up.
const SCRIPT_FALLBACK_SEED: u64 = 0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl FromStr for AdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "" => Ok(AdMode::Normal),
            "advantage" | "adv" => Ok(AdMode::Advantage),
            "disadvantage" | "dis" => Ok(AdMode::Disadvantage),
            other => Err(format!("unknown advantage mode '{}'", other)),
        }
    }
}

/// Anything that can produce a die face.
///
/// Implementations must return a value in `1..=sides`. Callers that store
/// faces in narrow types clamp into that range rather than trusting it.
pub trait DieSource {
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<F: FnMut(u32) -> u32> DieSource for F {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self(sides)
    }
}

enum Source {
    Seeded(ChaCha8Rng),
    Scripted {
        queue: VecDeque<u32>,
        fallback: ChaCha8Rng,
    },
}

pub struct Dice {
    src: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { src: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self { src: Source::Seeded(ChaCha8Rng::from_entropy()) }
    }

    /// Replays `values` in order, one per die, regardless of die size.
    /// Once the script is exhausted, rolls continue from a fixed-seed stream.
    pub fn from_scripted(values: Vec<u32>) -> Self {
        Self {
            src: Source::Scripted {
                queue: values.into(),
                fallback: ChaCha8Rng::seed_from_u64(SCRIPT_FALLBACK_SEED),
            },
        }
    }
}

impl DieSource for Dice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        match &mut self.src {
            Source::Seeded(rng) => rng.gen_range(1..=sides),
            Source::Scripted { queue, fallback } => match queue.pop_front() {
                Some(v) => v,
                None => fallback.gen_range(1..=sides),
            },
        }
    }
}
