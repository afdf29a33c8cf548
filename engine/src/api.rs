use std::{fs, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::abilities::{CANDIDATES, roll_stat_block};
use crate::expr::evaluate;
use crate::sheet::{Ability, CharacterSheet, Skill, format_modifier};
use crate::{AdMode, Dice};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RollRequest {
    pub expression: String,
    #[serde(default)]
    pub mode: AdMode,
    /// Fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RollResponse {
    pub total: i64,
    pub details: Vec<String>,
    pub breakdown: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StatsRequest {
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StatsResponse {
    pub scores: Vec<u8>,
    pub candidates: [u8; CANDIDATES],
}

/// Everything a sheet view derives from the raw scores.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SheetSummary {
    pub name: String,
    pub level: u32,
    pub proficiency_bonus: i32,
    pub scores: IndexMap<Ability, i32>,
    pub modifiers: IndexMap<Ability, String>,
    pub saves: IndexMap<Ability, i32>,
    pub skills: IndexMap<Skill, i32>,
    pub initiative: i32,
    pub passive_perception: i32,
    pub hit_dice: Option<String>,
}

impl From<&CharacterSheet> for SheetSummary {
    fn from(sheet: &CharacterSheet) -> Self {
        Self {
            name: sheet.name.clone(),
            level: sheet.level,
            proficiency_bonus: sheet.proficiency_bonus(),
            scores: Ability::ALL
                .iter()
                .map(|&a| (a, sheet.abilities.get(a)))
                .collect(),
            modifiers: Ability::ALL
                .iter()
                .map(|&a| (a, format_modifier(sheet.ability_mod(a))))
                .collect(),
            saves: Ability::ALL.iter().map(|&a| (a, sheet.save_mod(a))).collect(),
            skills: Skill::ALL.iter().map(|&s| (s, sheet.skill_mod(s))).collect(),
            initiative: sheet.initiative(),
            passive_perception: sheet.passive_perception(),
            hit_dice: sheet.hit_dice(),
        }
    }
}

fn dice_for(seed: Option<u64>) -> Dice {
    match seed {
        Some(s) => Dice::from_seed(s),
        None => Dice::from_entropy(),
    }
}

pub fn roll_expression(req: &RollRequest) -> Result<RollResponse> {
    let mut dice = dice_for(req.seed);
    let res = evaluate(&req.expression, req.mode, &mut dice)
        .with_context(|| format!("cannot roll '{}'", req.expression))?;
    Ok(RollResponse {
        total: res.total,
        breakdown: res.breakdown(),
        details: res.details,
    })
}

pub fn roll_stats(req: &StatsRequest) -> StatsResponse {
    let mut dice = dice_for(req.seed);
    let roll = roll_stat_block(&mut dice);
    StatsResponse {
        scores: roll.scores.as_slice().to_vec(),
        candidates: roll.candidates,
    }
}

/// Read a sheet from JSON, or YAML when the extension says so.
pub fn load_sheet(path: impl AsRef<Path>) -> Result<CharacterSheet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read sheet: {}", path.display()))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let sheet: CharacterSheet = if yaml {
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse sheet YAML: {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse sheet JSON: {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), name = %sheet.name, level = sheet.level, "loaded sheet");
    Ok(sheet)
}

pub fn sample_fighter() -> CharacterSheet {
    let mut sheet = CharacterSheet {
        name: "Sample Fighter".to_string(),
        hit_die: Some(10),
        ..CharacterSheet::default()
    };
    for (ability, score) in Ability::ALL.into_iter().zip([16, 14, 14, 10, 12, 8]) {
        sheet.abilities.set(ability, score);
    }
    sheet.save_proficiencies.extend([Ability::Str, Ability::Con]);
    sheet.skill_proficiencies.extend([Skill::Athletics, Skill::Perception]);
    sheet
}
