//! D&D 5e creature stat block engine.
//!
//! This crate provides:
//! - SRD 5.1 derivation formulas (ability modifiers, AC, HP, save/skill
//!   bonuses, passive perception)
//! - Structured speed/sense/language collections with converters to and
//!   from the flat stat-block strings published material uses
//! - Field validation for user-entered stat values
//! - A catalog of reusable trait templates with a typed effect engine
//! - Flat-file JSON persistence for the creature collection
//!
//! # Quick Start
//!
//! ```ignore
//! use statblock_core::{apply_effects, trait_template, Creature, TraitInputs};
//!
//! let mut owlbear = Creature::blank();
//! owlbear.name = "Owlbear".to_string();
//! owlbear.scores.strength = 20;
//! owlbear.recompute_derived();
//!
//! let keen_sight = trait_template("keen_sight").unwrap();
//! let owlbear = apply_effects(&owlbear, keen_sight, &TraitInputs::new());
//! println!("{}", owlbear.stat_block().armor_class);
//! ```

pub mod creature;
pub mod legacy;
pub mod rules;
pub mod store;
pub mod traits;
pub mod validation;

// Primary public API
pub use creature::{
    sample_creatures, Ability, AbilityScores, ActionEntry, Alignment, ArmorType, Creature,
    CreatureType, HitDie, LanguageEntry, LegendaryActionEntry, SavingThrowEntry, SenseEntry,
    SenseType, Size, Skill, SkillEntry, SpecialAbility, SpeedEntry, SpeedType, StatBlock,
};
pub use store::{CreatureStore, StoreError};
pub use traits::{
    all_traits, apply_effects, render_description, search_traits, trait_template,
    traits_by_category, validate_inputs, EffectKind, InputReport, TraitCategory, TraitInputs,
    TraitTemplate,
};
pub use validation::{
    validate_ability_score, validate_ac, validate_hp, validate_name, ValidationError,
};
