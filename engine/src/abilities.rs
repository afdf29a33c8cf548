//! 4d6-drop-lowest ability generation with a single reroll on 1s.
//!
//! Seven candidates are rolled and the worst one is thrown away, so a
//! character always gets six scores.

use serde::Serialize;

use crate::DieSource;
use crate::sheet::{Ability, AbilityScores};

pub const CANDIDATES: usize = 7;
pub const SCORES: usize = 6;
const DICE_PER_CANDIDATE: usize = 4;

/// One 4d6 candidate: final die faces, which dice were rerolled, and the kept sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CandidateRoll {
    pub dice: [u8; DICE_PER_CANDIDATE],
    pub rerolled: [bool; DICE_PER_CANDIDATE],
    pub sum: u8,
}

/// Six scores, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityScoreSet([u8; SCORES]);

impl AbilityScoreSet {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Assign in returned order to STR, DEX, CON, INT, WIS, CHA.
    pub fn into_scores(self) -> AbilityScores {
        let mut scores = AbilityScores::default();
        for (ability, value) in Ability::ALL.into_iter().zip(self.0) {
            scores.set(ability, value as i32);
        }
        scores
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatRoll {
    pub scores: AbilityScoreSet,
    /// All seven sums, highest first; the last one is the discarded candidate.
    pub candidates: [u8; CANDIDATES],
}

pub fn roll_candidate(source: &mut impl DieSource) -> CandidateRoll {
    let mut dice = [0u8; DICE_PER_CANDIDATE];
    let mut rerolled = [false; DICE_PER_CANDIDATE];
    let mut d6 = || source.roll_die(6).clamp(1, 6) as u8;
    for (die, flag) in dice.iter_mut().zip(rerolled.iter_mut()) {
        let mut face = d6();
        if face == 1 {
            // Only once; a second 1 stands.
            face = d6();
            *flag = true;
        }
        *die = face;
    }

    let mut sorted = dice;
    sorted.sort_unstable();
    let sum = sorted[1..].iter().sum();

    CandidateRoll { dice, rerolled, sum }
}

pub fn roll_stat_block(source: &mut impl DieSource) -> StatRoll {
    let mut candidates = [0u8; CANDIDATES];
    for slot in candidates.iter_mut() {
        let roll = roll_candidate(source);
        tracing::trace!(dice = ?roll.dice, rerolled = ?roll.rerolled, sum = roll.sum, "ability candidate");
        *slot = roll.sum;
    }
    // Stable: equal sums keep generation order.
    candidates.sort_by(|a, b| b.cmp(a));

    let mut top = [0u8; SCORES];
    top.copy_from_slice(&candidates[..SCORES]);
    StatRoll { scores: AbilityScoreSet(top), candidates }
}

pub fn roll_ability_scores(source: &mut impl DieSource) -> AbilityScoreSet {
    roll_stat_block(source).scores
}
