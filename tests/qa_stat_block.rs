//! QA tests for the full stat-block editing flow.
//!
//! These tests verify the engine end to end:
//! - Building a creature from a blank draft and reading its stat block
//! - Importing flat stat-block strings through the legacy converters
//! - Searching, validating, rendering, and applying trait templates
//! - Persisting the collection and loading it back
//!
//! Run with: `cargo test --test qa_stat_block`

use statblock_core::{
    apply_effects, render_description, sample_creatures, search_traits, trait_template,
    validate_inputs, Ability, AbilityScores, ArmorType, Creature, CreatureStore, HitDie,
    SenseType, Skill, SpecialAbility, SpeedType, TraitInputs,
};
use statblock_core::legacy;
use tempfile::TempDir;

// =============================================================================
// EDIT FLOW
// =============================================================================

#[test]
fn test_blank_draft_to_finished_stat_block() {
    let mut creature = Creature::blank();
    creature.name = "Dire Badger".to_string();
    creature.challenge_rating = "1/4".to_string();
    creature.scores = AbilityScores::new(13, 10, 15, 2, 12, 5);
    creature.armor_type = ArmorType::NaturalArmor;
    creature.armor_modifier = 1;
    creature.hit_dice_count = 3;
    creature.hit_die = HitDie::D8;
    creature.set_skill(Skill::Perception, true, false);
    creature.recompute_derived();

    let block = creature.stat_block();
    assert_eq!(block.name, "Dire Badger");
    assert_eq!(block.meta, "Medium humanoid, neutral");
    // Natural armor: 10 + Dex 0 + modifier 1
    assert_eq!(block.armor_class, "11 (Natural Armor)");
    // 3d8 at CON 15: floor(3 * 4.5) + 3 * 2
    assert_eq!(block.hit_points, "19 (3d8+6)");
    assert_eq!(block.speed, "30 ft.");
    assert_eq!(block.skills, vec!["Perception +3"]);
    assert!(block
        .senses
        .contains(&"Passive Perception 13".to_string()));
    // No languages reads as an em-dash, never a stored "None"
    assert_eq!(block.languages, "\u{2014}");
}

#[test]
fn test_overrides_survive_recompute() {
    let mut creature = Creature::blank();
    creature.scores = AbilityScores::new(10, 14, 10, 10, 10, 10);
    creature.override_saving_throw(Ability::Dexterity, 9);
    creature.override_skill(Skill::Stealth, 11);
    creature.recompute_derived();

    let block = creature.stat_block();
    assert_eq!(block.saving_throws, vec!["Dex +9"]);
    assert_eq!(block.skills, vec!["Stealth +11"]);
}

#[test]
fn test_sample_creatures_render_expected_stat_blocks() {
    let samples = sample_creatures();
    assert_eq!(samples.len(), 3);

    let dragon = samples[0].stat_block();
    assert_eq!(dragon.meta, "Gargantuan dragon, chaotic evil");
    assert_eq!(dragon.armor_class, "22 (Natural Armor)");
    assert_eq!(dragon.hit_points, "546 (28d20+252)");
    assert_eq!(dragon.speed, "40 ft., climb 40 ft., fly 80 ft.");
    assert_eq!(
        dragon.saving_throws,
        vec!["Dex +7", "Con +16", "Wis +9", "Cha +13"]
    );
    assert!(dragon.senses.contains(&"Passive Perception 26".to_string()));

    let owlbear = samples[1].stat_block();
    assert_eq!(owlbear.armor_class, "13 (Natural Armor)");
    assert_eq!(owlbear.hit_points, "59 (7d10+21)");
    assert_eq!(owlbear.skills, vec!["Perception +3"]);
    assert_eq!(owlbear.languages, "\u{2014}");

    let goblin = samples[2].stat_block();
    assert_eq!(goblin.armor_class, "15 (Leather, Shield)");
    assert_eq!(goblin.hit_points, "7 (2d6+0)");
    // Proficiency + expertise on Stealth at Dex 14
    assert_eq!(goblin.skills, vec!["Stealth +6"]);
    assert_eq!(goblin.languages, "Common, Goblin");
}

// =============================================================================
// LEGACY IMPORT
// =============================================================================

#[test]
fn test_import_flat_strings_into_structured_record() {
    let mut creature = Creature::blank();
    creature.scores = AbilityScores::new(18, 14, 16, 8, 13, 10);

    creature.speed_entries = legacy::parse_speed_string("40 ft., swim 40 ft.");
    creature.sense_entries = legacy::parse_senses_strings(&[
        "Darkvision 60 ft.".to_string(),
        "Passive Perception 13".to_string(),
    ]);
    creature.language_entries =
        legacy::parse_languages_strings(&["Common, Aquan".to_string()]);
    creature.saving_throw_entries =
        legacy::parse_saving_throw_strings(&["Con +5".to_string()], &creature.scores);
    creature.skill_entries =
        legacy::parse_skill_strings(&["Athletics +6".to_string()], &creature.scores);
    creature.recompute_derived();

    let block = creature.stat_block();
    assert_eq!(block.speed, "40 ft., swim 40 ft.");
    assert!(block.senses.contains(&"Darkvision 60 ft.".to_string()));
    assert_eq!(block.languages, "Common, Aquan");
    // Con +5 at CON 16 is exactly proficiency, so it round-trips as a flag
    assert_eq!(block.saving_throws, vec!["Con +5"]);
    assert_eq!(block.skills, vec!["Athletics +6"]);
}

#[test]
fn test_import_none_language_is_not_stored() {
    let mut creature = Creature::blank();
    creature.language_entries = legacy::parse_languages_strings(&["None".to_string()]);
    assert!(creature.language_entries.is_empty());
    assert_eq!(creature.stat_block().languages, "\u{2014}");
}

// =============================================================================
// TRAIT FLOW
// =============================================================================

#[test]
fn test_add_trait_end_to_end() {
    // Search the catalog the way the trait picker does
    let results = search_traits("blindsight");
    assert_eq!(results[0].key, "blindsight");
    let template = results[0];

    // Reject incomplete inputs, then accept the corrected form
    let report = validate_inputs(template, &TraitInputs::new());
    assert!(!report.is_valid);
    assert_eq!(report.errors, vec!["Blindsight range (in feet) is required"]);

    let inputs = TraitInputs::new().with("blindsight_range", "60");
    assert!(validate_inputs(template, &inputs).is_valid);

    // Apply structural effects and record the rendered text
    let mut creature = apply_effects(&Creature::blank(), template, &inputs);
    creature.special_abilities.push(SpecialAbility::new(
        template.name,
        render_description(template, &inputs),
    ));
    creature.recompute_derived();

    let block = creature.stat_block();
    assert!(block.senses.contains(&"Blindsight 60 ft.".to_string()));
    assert_eq!(
        creature.special_abilities[0].description,
        "The creature can perceive its surroundings without relying on sight, within \
         60 feet."
    );
}

#[test]
fn test_trait_speed_effect_reaches_stat_block() {
    let template = trait_template("amphibious").expect("cataloged");
    let inputs = TraitInputs::new().with("swimming_speed", "40");
    let creature = apply_effects(&Creature::blank(), template, &inputs);
    assert_eq!(creature.stat_block().speed, "30 ft., swim 40 ft.");
}

#[test]
fn test_trait_sense_does_not_disturb_passive_perception() {
    let template = trait_template("blindsight").expect("cataloged");
    let inputs = TraitInputs::new().with("blindsight_range", "30");
    let creature = apply_effects(&Creature::blank(), template, &inputs);

    let pp: Vec<_> = creature
        .sense_entries
        .iter()
        .filter(|e| e.sense_type == SenseType::PassivePerception)
        .collect();
    assert_eq!(pp.len(), 1);
    assert!(pp[0].is_calculated);
    assert_eq!(pp[0].range, 10);
}

// =============================================================================
// PERSISTENCE
// =============================================================================

#[test]
fn test_edit_save_reload_cycle() {
    let dir = TempDir::new().expect("temp dir");
    let store = CreatureStore::new(dir.path().join("creatures.json"));

    let mut creature = Creature::blank();
    creature.name = "Cave Lurker".to_string();
    creature.scores = AbilityScores::new(16, 14, 14, 6, 12, 6);
    creature.hit_dice_count = 5;
    creature.hit_die = HitDie::D10;
    creature.recompute_derived();

    let id = store.save(&creature).expect("save draft");
    assert_eq!(id, 1);

    // Reload, edit, and save again under the same id
    let mut loaded = store.load(id).expect("load").expect("stored");
    assert_eq!(loaded, {
        let mut expected = creature.clone();
        expected.id = id;
        expected
    });

    loaded.add_speed(statblock_core::SpeedEntry::new(SpeedType::Climb, 20));
    store.save(&loaded).expect("save edit");

    let reloaded = store.load(id).expect("load").expect("still stored");
    assert_eq!(reloaded.stat_block().speed, "30 ft., climb 20 ft.");
    assert_eq!(store.load_all().expect("load all").len(), 1);
}

#[test]
fn test_trait_enriched_creature_round_trips() {
    let dir = TempDir::new().expect("temp dir");
    let store = CreatureStore::new(dir.path().join("creatures.json"));

    let template = trait_template("telepathic_bond").expect("cataloged");
    let inputs = TraitInputs::new().with("telepathic_range", "60");
    let mut creature = apply_effects(&Creature::blank(), template, &inputs);
    creature.name = "Mind Leech".to_string();
    creature.special_abilities.push(SpecialAbility::new(
        template.name,
        render_description(template, &inputs),
    ));

    let id = store.save(&creature).expect("save");
    let loaded = store.load(id).expect("load").expect("stored");
    assert_eq!(loaded.stat_block().languages, "Telepathy 60 ft.");
    assert_eq!(loaded.special_abilities.len(), 1);
}
