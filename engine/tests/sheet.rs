use engine::api::{SheetSummary, load_sheet, sample_fighter};
use engine::{Ability, CharacterSheet, Dice, Skill, roll_ability_scores};
use std::io::Write;

#[test]
fn fighter_derived_stats() {
    let s = sample_fighter();
    assert_eq!(s.proficiency_bonus(), 2);
    assert_eq!(s.ability_mod(Ability::Str), 3);
    assert_eq!(s.ability_mod(Ability::Cha), -1);
    assert_eq!(s.save_mod(Ability::Str), 5);
    assert_eq!(s.save_mod(Ability::Dex), 2);
    assert_eq!(s.skill_mod(Skill::Athletics), 5);
    assert_eq!(s.skill_mod(Skill::Stealth), 2);
    assert_eq!(s.initiative(), 2);
    assert_eq!(s.passive_perception(), 13);
    assert_eq!(s.hit_dice().as_deref(), Some("1d10"));
}

#[test]
fn level_five_gains_proficiency() {
    let mut s = sample_fighter();
    s.level = 5;
    assert_eq!(s.save_mod(Ability::Con), 2 + 3);
    assert_eq!(s.hit_dice().as_deref(), Some("5d10"));
}

#[test]
fn rolled_scores_replace_abilities() {
    let mut s = CharacterSheet::default();
    let set = roll_ability_scores(&mut Dice::from_seed(31));
    s.apply_rolled_scores(set);
    assert_eq!(s.abilities.str_, set.as_slice()[0] as i32);
    assert_eq!(s.abilities.cha, set.as_slice()[5] as i32);
}

#[test]
fn summary_lists_skills_in_sheet_order() {
    let summary = SheetSummary::from(&sample_fighter());
    let first = summary.skills.keys().next().copied();
    assert_eq!(first, Some(Skill::Acrobatics));
    assert_eq!(summary.skills.len(), 18);
    assert_eq!(summary.modifiers[&Ability::Str], "+3");

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["skills"]["sleight_of_hand"], 2);
    assert_eq!(json["saves"]["con"], 4);
}

#[test]
fn load_sheet_from_json_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"name":"Mira","level":3,"abilities":{{"dex":16,"wis":14}},"skill_proficiencies":["perception","stealth"]}}"#
    )
    .unwrap();
    let sheet = load_sheet(file.path()).unwrap();
    assert_eq!(sheet.name, "Mira");
    assert_eq!(sheet.abilities.str_, 10);
    assert_eq!(sheet.skill_mod(Skill::Stealth), 5);
    assert_eq!(sheet.passive_perception(), 14);
    assert_eq!(sheet.hit_dice(), None);
}

#[test]
fn load_sheet_from_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "name: Bram\nlevel: 2\nhit_die: 8\nsave_proficiencies: [dex, int]").unwrap();
    let sheet = load_sheet(file.path()).unwrap();
    assert_eq!(sheet.hit_dice().as_deref(), Some("2d8"));
    assert_eq!(sheet.save_mod(Ability::Int), 2);
}

#[test]
fn load_sheet_reports_path() {
    let err = load_sheet("/definitely/not/here.json").unwrap_err();
    assert!(format!("{:#}", err).contains("/definitely/not/here.json"));
}

#[test]
fn proficiency_follows_level_table() {
    use engine::proficiency_bonus;
    assert_eq!(proficiency_bonus(4), 2);
    assert_eq!(proficiency_bonus(8), 3);
    assert_eq!(proficiency_bonus(12), 4);
    assert_eq!(proficiency_bonus(16), 5);
    assert_eq!(proficiency_bonus(20), 6);

    let mut s = sample_fighter();
    s.level = 4;
    assert_eq!(s.save_mod(Ability::Str), 3 + 2);
}
