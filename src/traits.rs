//! Trait catalog and effect engine.
//!
//! Traits are fixed templates: a name, a description that may carry
//! `[placeholder]` tokens, a category, and a list of typed effects, some
//! of which require user input. Applying a trait folds its structural
//! effects (new languages, senses, speeds, immunities) into a creature
//! record and renders a finished description with the user's values
//! substituted in.
//!
//! User values are keyed by a stable slug derived from each input's
//! prompt, so stored values stay valid even if a template's effect order
//! changes. The older positional `input_<n>` spelling is still accepted
//! when resolving values.

use crate::creature::{Creature, SenseEntry, SenseType, SpeedEntry, SpeedType};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Template data types
// ============================================================================

/// The ten trait categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitCategory {
    #[serde(rename = "Movement & Positioning")]
    Movement,
    #[serde(rename = "Combat & Damage")]
    Combat,
    #[serde(rename = "Magical & Supernatural")]
    Magical,
    #[serde(rename = "Sensory & Perception")]
    Sensory,
    #[serde(rename = "Environmental & Elemental")]
    Environmental,
    #[serde(rename = "Social & Mental")]
    Social,
    #[serde(rename = "Physical Form & Biology")]
    Physical,
    #[serde(rename = "Defensive & Protective")]
    Defensive,
    #[serde(rename = "Racial & Heritage")]
    Racial,
    #[serde(rename = "Specialized Abilities")]
    Specialized,
}

impl TraitCategory {
    pub fn name(&self) -> &'static str {
        match self {
            TraitCategory::Movement => "Movement & Positioning",
            TraitCategory::Combat => "Combat & Damage",
            TraitCategory::Magical => "Magical & Supernatural",
            TraitCategory::Sensory => "Sensory & Perception",
            TraitCategory::Environmental => "Environmental & Elemental",
            TraitCategory::Social => "Social & Mental",
            TraitCategory::Physical => "Physical Form & Biology",
            TraitCategory::Defensive => "Defensive & Protective",
            TraitCategory::Racial => "Racial & Heritage",
            TraitCategory::Specialized => "Specialized Abilities",
        }
    }

    pub fn all() -> [TraitCategory; 10] {
        [
            TraitCategory::Movement,
            TraitCategory::Combat,
            TraitCategory::Magical,
            TraitCategory::Sensory,
            TraitCategory::Environmental,
            TraitCategory::Social,
            TraitCategory::Physical,
            TraitCategory::Defensive,
            TraitCategory::Racial,
            TraitCategory::Specialized,
        ]
    }
}

impl fmt::Display for TraitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The closed set of effect kinds a trait can carry.
///
/// Only the first six mutate creature collections; the rest are
/// narrative-only, expressed entirely through the rendered description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Language,
    Sense,
    Speed,
    DamageImmunity,
    DamageResistance,
    ConditionImmunity,
    SkillAdvantage,
    SavingThrowAdvantage,
    AcBonus,
    HpRegeneration,
    SpellImmunity,
    Custom,
}

/// How a required input is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Text,
    Number,
    Select,
}

/// The user-input requirement of an effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectInput {
    pub prompt: &'static str,
    pub input_type: InputType,
    pub options: &'static [&'static str],
}

/// One typed effect of a trait template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitEffect {
    pub kind: EffectKind,
    /// Static value (a damage type, a sense name, a speed keyword).
    pub value: Option<&'static str>,
    pub input: Option<EffectInput>,
}

impl TraitEffect {
    fn fixed(kind: EffectKind, value: &'static str) -> Self {
        Self {
            kind,
            value: Some(value),
            input: None,
        }
    }

    fn text(kind: EffectKind, prompt: &'static str) -> Self {
        Self {
            kind,
            value: None,
            input: Some(EffectInput {
                prompt,
                input_type: InputType::Text,
                options: &[],
            }),
        }
    }

    fn number(kind: EffectKind, prompt: &'static str) -> Self {
        Self {
            kind,
            value: None,
            input: Some(EffectInput {
                prompt,
                input_type: InputType::Number,
                options: &[],
            }),
        }
    }

    fn number_with_value(kind: EffectKind, value: &'static str, prompt: &'static str) -> Self {
        Self {
            kind,
            value: Some(value),
            input: Some(EffectInput {
                prompt,
                input_type: InputType::Number,
                options: &[],
            }),
        }
    }

    fn select(
        kind: EffectKind,
        prompt: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            value: None,
            input: Some(EffectInput {
                prompt,
                input_type: InputType::Select,
                options,
            }),
        }
    }

    pub fn requires_input(&self) -> bool {
        self.input.is_some()
    }

    /// Stable key user values are stored under, a slug of the prompt:
    /// `"Swimming speed (in feet)"` becomes `"swimming_speed"`.
    pub fn input_key(&self) -> Option<String> {
        self.input.as_ref().map(|i| slug(i.prompt))
    }
}

/// Slug of an input prompt: the text before any parenthetical or question
/// mark, lowercased, with non-alphanumeric runs collapsed to underscores.
fn slug(prompt: &str) -> String {
    let head = prompt.split(['(', '?']).next().unwrap_or(prompt);
    let mut out = String::new();
    for c in head.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

/// A cataloged trait template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: TraitCategory,
    pub effects: Vec<TraitEffect>,
    /// Whether the description carries `[placeholder]` tokens that are
    /// filled from user inputs.
    pub dynamic_description: bool,
}

impl TraitTemplate {
    fn new(
        key: &'static str,
        name: &'static str,
        category: TraitCategory,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            name,
            description,
            category,
            effects: Vec::new(),
            dynamic_description: false,
        }
    }

    fn dynamic(mut self) -> Self {
        self.dynamic_description = true;
        self
    }

    fn effect(mut self, effect: TraitEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The effects that require user input, in declaration order.
    pub fn required_inputs(&self) -> Vec<&TraitEffect> {
        self.effects.iter().filter(|e| e.requires_input()).collect()
    }
}

// ============================================================================
// User inputs
// ============================================================================

/// User-supplied values for a trait's required inputs, keyed by each
/// input's stable slug. Positional `input_<n>` keys from older stored
/// data are accepted as a fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitInputs {
    values: BTreeMap<String, String>,
}

impl TraitInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style insert for test and call-site brevity.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolve the value for the `index`-th required input of a template:
    /// first by the effect's stable key, then by the positional spelling.
    fn resolve(&self, effect: &TraitEffect, index: usize) -> Option<&str> {
        if let Some(key) = effect.input_key() {
            if let Some(value) = self.values.get(&key) {
                return Some(value);
            }
        }
        self.values.get(&format!("input_{index}")).map(String::as_str)
    }
}

/// Accumulated result of validating a trait's inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

// ============================================================================
// Catalog operations
// ============================================================================

lazy_static! {
    static ref CATALOG: Vec<TraitTemplate> = build_catalog();
}

/// Every cataloged trait, in catalog order.
pub fn all_traits() -> &'static [TraitTemplate] {
    &CATALOG
}

/// Look up a template by its stable key.
pub fn trait_template(key: &str) -> Option<&'static TraitTemplate> {
    CATALOG.iter().find(|t| t.key == key)
}

/// Templates in a category, catalog order preserved.
pub fn traits_by_category(category: TraitCategory) -> Vec<&'static TraitTemplate> {
    CATALOG.iter().filter(|t| t.category == category).collect()
}

/// Search the catalog. Every whitespace-separated token of the query must
/// appear (case-insensitively) somewhere in a trait's name, description,
/// or category. Results are ranked exact-name, name-starts-with,
/// name-contains, then alphabetically; ties break alphabetically.
pub fn search_traits(query: &str) -> Vec<&'static TraitTemplate> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let tokens: Vec<&str> = query.split_whitespace().collect();

    let mut results: Vec<&TraitTemplate> = CATALOG
        .iter()
        .filter(|t| {
            let text =
                format!("{} {} {}", t.name, t.description, t.category.name()).to_lowercase();
            tokens.iter().all(|token| text.contains(token))
        })
        .collect();

    fn rank(template: &TraitTemplate, query: &str) -> u8 {
        let name = template.name.to_lowercase();
        if name == query {
            0
        } else if name.starts_with(query) {
            1
        } else if name.contains(query) {
            2
        } else {
            3
        }
    }

    results.sort_by(|a, b| {
        rank(a, &query)
            .cmp(&rank(b, &query))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    results
}

/// Validate user inputs against a template's required inputs. Errors are
/// accumulated, not short-circuited, so a form can show all of them.
pub fn validate_inputs(template: &TraitTemplate, inputs: &TraitInputs) -> InputReport {
    let mut errors = Vec::new();

    for (index, effect) in template.required_inputs().into_iter().enumerate() {
        let Some(input) = effect.input.as_ref() else {
            continue;
        };
        let value = inputs.resolve(effect, index);

        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            errors.push(format!("{} is required", input.prompt));
            continue;
        };

        match input.input_type {
            InputType::Number => {
                let parsed: Option<f64> = value.parse().ok();
                if !parsed.map(|n| n.is_finite() && n >= 0.0).unwrap_or(false) {
                    errors.push(format!(
                        "{} must be a valid positive number",
                        input.prompt
                    ));
                }
            }
            InputType::Select => {
                if !input.options.contains(&value) {
                    errors.push(format!(
                        "{} must be one of: {}",
                        input.prompt,
                        input.options.join(", ")
                    ));
                }
            }
            InputType::Text => {}
        }
    }

    InputReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Render a template's description with user values substituted for its
/// `[placeholder]` tokens.
///
/// The Nth placeholder takes the Nth required input's value; a value
/// stored under the literal token name is the fallback, and a placeholder
/// with no value at all is left as-is. Substitution is purely textual.
pub fn render_description(template: &TraitTemplate, inputs: &TraitInputs) -> String {
    if !template.dynamic_description {
        return template.description.to_string();
    }

    let required = template.required_inputs();
    let mut out = String::new();
    let mut rest = template.description;
    let mut index = 0;

    while let Some(start) = rest.find('[') {
        let Some(offset) = rest[start..].find(']') else {
            break;
        };
        let end = start + offset;
        let token = &rest[start + 1..end];
        out.push_str(&rest[..start]);

        let value = required
            .get(index)
            .and_then(|effect| inputs.resolve(effect, index))
            .or_else(|| inputs.get(token));
        match value {
            Some(value) => out.push_str(value),
            None => {
                out.push('[');
                out.push_str(token);
                out.push(']');
            }
        }

        rest = &rest[end + 1..];
        index += 1;
    }
    out.push_str(rest);
    out
}

/// Fold a trait's structural effects into a creature, returning the
/// patched record.
///
/// This function is total: it assumes inputs already passed
/// [`validate_inputs`] and degrades to per-effect defaults when a value
/// is missing, so previews can render partial state. Effects apply
/// independently and cumulatively in declaration order; applying the same
/// trait twice duplicates its structural effects.
pub fn apply_effects(
    creature: &Creature,
    template: &TraitTemplate,
    inputs: &TraitInputs,
) -> Creature {
    let mut updated = creature.clone();
    let mut input_index = 0;

    for effect in &template.effects {
        let supplied = if effect.requires_input() {
            let value = inputs.resolve(effect, input_index);
            input_index += 1;
            value
        } else {
            None
        };

        match effect.kind {
            EffectKind::Language => {
                if effect.value == Some("Telepathy") {
                    let range = supplied
                        .and_then(|v| v.trim().parse::<u32>().ok())
                        .unwrap_or(120);
                    updated.add_language(&format!("Telepathy {range} ft."));
                } else if let Some(value) = effect.value {
                    updated.add_language(value);
                }
            }
            EffectKind::Sense => {
                if let Some(value) = effect.value {
                    let range = supplied
                        .and_then(|v| v.trim().parse::<u32>().ok())
                        .unwrap_or(60);
                    updated.add_sense(SenseEntry::new(
                        SenseType::from(value.to_string()),
                        range,
                    ));
                }
            }
            EffectKind::Speed => {
                if let Some(value) = effect.value {
                    let distance = supplied
                        .and_then(|v| v.trim().parse::<u32>().ok())
                        .unwrap_or(30);
                    updated.add_speed(SpeedEntry::new(
                        SpeedType::from(value.to_string()),
                        distance,
                    ));
                }
            }
            EffectKind::DamageImmunity => {
                push_flat_entry(&mut updated.damage_immunities, effect, supplied);
            }
            EffectKind::DamageResistance => {
                push_flat_entry(&mut updated.damage_resistances, effect, supplied);
            }
            EffectKind::ConditionImmunity => {
                push_flat_entry(&mut updated.condition_immunities, effect, supplied);
            }
            // Narrative-only kinds: their mechanical impact is carried by
            // the rendered description, not encoded numerically.
            EffectKind::SkillAdvantage
            | EffectKind::SavingThrowAdvantage
            | EffectKind::AcBonus
            | EffectKind::HpRegeneration
            | EffectKind::SpellImmunity
            | EffectKind::Custom => {}
        }
    }

    updated
}

/// Append an immunity/resistance value: the user-supplied value when the
/// effect takes input, the static value otherwise.
fn push_flat_entry(list: &mut Vec<String>, effect: &TraitEffect, supplied: Option<&str>) {
    let value = if effect.requires_input() {
        supplied.map(str::trim).or(effect.value)
    } else {
        effect.value
    };
    if let Some(value) = value {
        if !value.is_empty() {
            list.push(value.to_string());
        }
    }
}

// ============================================================================
// Catalog data
// ============================================================================

fn build_catalog() -> Vec<TraitTemplate> {
    use EffectKind::*;
    use TraitCategory::*;

    vec![
        // Movement & Positioning
        TraitTemplate::new(
            "amphibious",
            "Amphibious",
            Movement,
            "The creature can breathe air and water.",
        )
        .effect(TraitEffect::number_with_value(
            Speed,
            "swim",
            "Swimming speed (in feet)",
        )),
        TraitTemplate::new(
            "flyby",
            "Flyby",
            Movement,
            "The creature doesn't provoke opportunity attacks when it flies out of an \
             enemy's reach.",
        ),
        TraitTemplate::new(
            "incorporeal_movement",
            "Incorporeal Movement",
            Movement,
            "The creature can move through other creatures and objects as if they were \
             difficult terrain. It takes 5 (1d10) force damage if it ends its turn inside \
             an object.",
        ),
        TraitTemplate::new(
            "spider_climb",
            "Spider Climb",
            Movement,
            "The creature can climb difficult surfaces, including upside down on ceilings, \
             without needing to make an ability check.",
        )
        .effect(TraitEffect::number_with_value(
            Speed,
            "climb",
            "Climbing speed (in feet, usually equal to walking speed)",
        )),
        TraitTemplate::new(
            "water_breathing",
            "Water Breathing",
            Movement,
            "The creature can breathe only underwater.",
        ),
        // Combat & Damage
        TraitTemplate::new(
            "aggressive",
            "Aggressive",
            Combat,
            "As a bonus action, the creature can move up to its speed toward a hostile \
             creature that it can see.",
        ),
        TraitTemplate::new(
            "blood_frenzy",
            "Blood Frenzy",
            Combat,
            "The creature has advantage on melee attack rolls against any creature that \
             doesn't have all its hit points.",
        )
        .effect(TraitEffect::fixed(SkillAdvantage, "melee_attacks_vs_wounded")),
        TraitTemplate::new(
            "charge",
            "Charge",
            Combat,
            "If the creature moves at least [distance] feet straight toward a target and \
             then hits it with a [attack] attack on the same turn, the target takes an \
             extra [damage] damage. If the target is a creature, it must succeed on a DC \
             [dc] Strength saving throw or be knocked prone.",
        )
        .dynamic()
        .effect(TraitEffect::number(Custom, "Minimum charge distance (feet)"))
        .effect(TraitEffect::text(
            Custom,
            "Attack type (e.g., \"ram\", \"gore\", \"claw\")",
        ))
        .effect(TraitEffect::text(
            Custom,
            "Extra damage (e.g., \"7 (2d6)\", \"9 (2d8)\")",
        ))
        .effect(TraitEffect::number(Custom, "Save DC")),
        TraitTemplate::new(
            "keen_sight",
            "Keen Sight",
            Combat,
            "The creature has advantage on Wisdom (Perception) checks that rely on sight.",
        )
        .effect(TraitEffect::fixed(SkillAdvantage, "perception_sight")),
        TraitTemplate::new(
            "pack_tactics",
            "Pack Tactics",
            Combat,
            "The creature has advantage on an attack roll against a creature if at least \
             one of the creature's allies is within 5 feet of the creature and the ally \
             isn't incapacitated.",
        ),
        TraitTemplate::new(
            "pounce",
            "Pounce",
            Combat,
            "If the creature moves at least [distance] feet straight toward a creature \
             and then hits it with a [attack] attack on the same turn, that target must \
             succeed on a DC [dc] Strength saving throw or be knocked prone. If the \
             target is prone, the creature can make one [bonus_attack] attack against it \
             as a bonus action.",
        )
        .dynamic()
        .effect(TraitEffect::number(Custom, "Minimum pounce distance (feet)"))
        .effect(TraitEffect::text(
            Custom,
            "Initial attack type (e.g., \"claw\", \"bite\")",
        ))
        .effect(TraitEffect::number(Custom, "Save DC"))
        .effect(TraitEffect::text(
            Custom,
            "Bonus action attack type (e.g., \"bite\", \"claw\")",
        )),
        TraitTemplate::new(
            "reckless",
            "Reckless",
            Combat,
            "At the start of its turn, the creature can gain advantage on all melee \
             weapon attack rolls during that turn, but attack rolls against it have \
             advantage until the start of its next turn.",
        ),
        // Magical & Supernatural
        TraitTemplate::new(
            "antimagic_susceptibility",
            "Antimagic Susceptibility",
            Magical,
            "The creature is incapacitated while in the area of an antimagic field. If \
             targeted by dispel magic, the creature must succeed on a Constitution saving \
             throw against the caster's spell save DC or fall unconscious for 1 minute.",
        ),
        TraitTemplate::new(
            "false_appearance",
            "False Appearance",
            Magical,
            "While the creature remains motionless, it is indistinguishable from a normal \
             [object_type].",
        )
        .dynamic()
        .effect(TraitEffect::text(
            Custom,
            "What object does it resemble? (e.g., \"tree\", \"statue\", \"pile of bones\")",
        )),
        TraitTemplate::new(
            "magic_resistance",
            "Magic Resistance",
            Magical,
            "The creature has advantage on saving throws against spells and other magical \
             effects.",
        )
        .effect(TraitEffect::fixed(SavingThrowAdvantage, "spells_and_magic")),
        TraitTemplate::new(
            "magic_weapons",
            "Magic Weapons",
            Magical,
            "The creature's weapon attacks are magical.",
        ),
        TraitTemplate::new(
            "spell_immunity",
            "Spell Immunity",
            Magical,
            "The creature is immune to [spells].",
        )
        .dynamic()
        .effect(TraitEffect::text(
            SpellImmunity,
            "Which spells is it immune to? (e.g., \"charm person\", \"hold person\", \
             \"all enchantment spells of 3rd level or lower\")",
        )),
        TraitTemplate::new(
            "spellcasting",
            "Spellcasting",
            Magical,
            "The creature is a [caster_level] spellcaster. Its spellcasting ability is \
             [ability] (spell save DC [dc], [bonus] to hit with spell attacks).",
        )
        .dynamic()
        .effect(TraitEffect::text(
            Custom,
            "Caster level (e.g., \"5th-level\", \"18th-level\")",
        ))
        .effect(TraitEffect::select(
            Custom,
            "Spellcasting ability",
            &["Intelligence", "Wisdom", "Charisma"],
        ))
        .effect(TraitEffect::number(Custom, "Spell save DC"))
        .effect(TraitEffect::text(
            Custom,
            "Spell attack bonus (with + sign, e.g., \"+7\")",
        )),
        // Sensory & Perception
        TraitTemplate::new(
            "blindsight",
            "Blindsight",
            Sensory,
            "The creature can perceive its surroundings without relying on sight, within \
             [range] feet.",
        )
        .dynamic()
        .effect(TraitEffect::number_with_value(
            Sense,
            "Blindsight",
            "Blindsight range (in feet)",
        )),
        TraitTemplate::new(
            "echolocation",
            "Echolocation",
            Sensory,
            "The creature can't use its blindsight while deafened.",
        ),
        TraitTemplate::new(
            "keen_hearing",
            "Keen Hearing",
            Sensory,
            "The creature has advantage on Wisdom (Perception) checks that rely on hearing.",
        )
        .effect(TraitEffect::fixed(SkillAdvantage, "perception_hearing")),
        TraitTemplate::new(
            "keen_smell",
            "Keen Smell",
            Sensory,
            "The creature has advantage on Wisdom (Perception) checks that rely on smell.",
        )
        .effect(TraitEffect::fixed(SkillAdvantage, "perception_smell")),
        // Environmental & Elemental
        TraitTemplate::new(
            "fire_immunity",
            "Fire Immunity",
            Environmental,
            "The creature is immune to fire damage.",
        )
        .effect(TraitEffect::fixed(DamageImmunity, "fire")),
        TraitTemplate::new(
            "cold_immunity",
            "Cold Immunity",
            Environmental,
            "The creature is immune to cold damage.",
        )
        .effect(TraitEffect::fixed(DamageImmunity, "cold")),
        TraitTemplate::new(
            "heated_body",
            "Heated Body",
            Environmental,
            "A creature that touches the creature or hits it with a melee attack while \
             within 5 feet of it takes [damage] fire damage.",
        )
        .dynamic()
        .effect(TraitEffect::text(
            Custom,
            "Fire damage amount (e.g., \"5 (1d10)\", \"3\", \"7 (2d6)\")",
        )),
        TraitTemplate::new(
            "water_susceptibility",
            "Water Susceptibility",
            Environmental,
            "For every 5 feet the creature moves in water, or for every gallon of water \
             splashed on it, it takes [damage] cold damage.",
        )
        .dynamic()
        .effect(TraitEffect::text(
            Custom,
            "Cold damage per 5 feet/gallon (e.g., \"1\", \"2\", \"1d4\")",
        )),
        // Social & Mental
        TraitTemplate::new(
            "telepathic_bond",
            "Telepathic Bond",
            Social,
            "The creature can communicate telepathically with other creatures within \
             [range] feet.",
        )
        .dynamic()
        .effect(TraitEffect::number_with_value(
            Language,
            "Telepathy",
            "Telepathic range (in feet)",
        )),
        TraitTemplate::new(
            "mimicry",
            "Mimicry",
            Social,
            "The creature can mimic [sounds_type] it has heard, including voices. A \
             creature that hears the sounds can tell they are imitations with a \
             successful DC [dc] Wisdom (Insight) check.",
        )
        .dynamic()
        .effect(TraitEffect::text(
            Custom,
            "What sounds can it mimic? (e.g., \"simple sounds such as animal noises\", \
             \"any sounds\", \"humanoid voices\")",
        ))
        .effect(TraitEffect::number(Custom, "Insight DC to detect mimicry")),
        // Physical Form & Biology
        TraitTemplate::new(
            "amorphous",
            "Amorphous",
            Physical,
            "The creature can move through a space as narrow as 1 inch wide without \
             squeezing.",
        ),
        TraitTemplate::new(
            "immutable_form",
            "Immutable Form",
            Physical,
            "The creature is immune to any spell or effect that would alter its form.",
        )
        .effect(TraitEffect::fixed(ConditionImmunity, "shape_change")),
        TraitTemplate::new(
            "regeneration",
            "Regeneration",
            Physical,
            "The creature regains [hp_amount] hit points at the start of its turn. If \
             the creature takes [damage_types] damage, this trait doesn't function at \
             the start of the creature's next turn. The creature dies only if it starts \
             its turn with 0 hit points and doesn't regenerate.",
        )
        .dynamic()
        .effect(TraitEffect::number(
            HpRegeneration,
            "HP regenerated per turn (e.g., \"10\", \"5\", \"15\")",
        ))
        .effect(TraitEffect::text(
            Custom,
            "Damage types that stop regeneration (e.g., \"fire or radiant\", \"cold\", \
             \"necrotic\")",
        )),
        // Defensive & Protective
        TraitTemplate::new(
            "damage_transfer",
            "Damage Transfer",
            Defensive,
            "While attached to a creature, the creature takes only half the damage dealt \
             to it, and the attached creature takes the other half.",
        ),
        TraitTemplate::new(
            "turn_resistance",
            "Turn Resistance",
            Defensive,
            "The creature has advantage on saving throws against any effect that turns \
             undead.",
        )
        .effect(TraitEffect::fixed(SavingThrowAdvantage, "turn_undead")),
        // Racial & Heritage
        TraitTemplate::new(
            "fey_ancestry",
            "Fey Ancestry",
            Racial,
            "The creature has advantage on saving throws against being charmed, and magic \
             can't put the creature to sleep.",
        )
        .effect(TraitEffect::fixed(SavingThrowAdvantage, "charmed"))
        .effect(TraitEffect::fixed(ConditionImmunity, "magical_sleep")),
        TraitTemplate::new(
            "undead_fortitude",
            "Undead Fortitude",
            Racial,
            "If damage reduces the creature to 0 hit points, it must make a Constitution \
             saving throw with a DC of 5 + the damage taken, unless the damage is radiant \
             or from a critical hit. On a success, the creature drops to 1 hit point \
             instead.",
        ),
        // Specialized Abilities
        TraitTemplate::new(
            "legendary_resistance",
            "Legendary Resistance",
            Specialized,
            "If the creature fails a saving throw, it can choose to succeed instead \
             ([uses]/Day).",
        )
        .dynamic()
        .effect(TraitEffect::number(
            Custom,
            "Number of uses per day (usually 3)",
        )),
        TraitTemplate::new(
            "siege_monster",
            "Siege Monster",
            Specialized,
            "The creature deals double damage to objects and structures.",
        ),
        TraitTemplate::new(
            "tunneler",
            "Tunneler",
            Specialized,
            "The creature can burrow through solid rock at half its burrow speed and \
             leaves a tunnel in its wake.",
        )
        .effect(TraitEffect::number_with_value(
            Speed,
            "burrow",
            "Burrowing speed (in feet)",
        )),
        // Advanced traits
        TraitTemplate::new(
            "damage_absorption",
            "Damage Absorption",
            Defensive,
            "Whenever the creature is subjected to [damage_type] damage, it takes no \
             damage and instead regains a number of hit points equal to the \
             [damage_type] damage dealt.",
        )
        .dynamic()
        .effect(TraitEffect::text(
            Custom,
            "Damage type absorbed (e.g., \"fire\", \"cold\", \"necrotic\")",
        )),
        TraitTemplate::new(
            "frightful_presence",
            "Frightful Presence",
            Social,
            "Each creature of the creature's choice that is within [range] feet of the \
             creature and aware of it must succeed on a DC [dc] Wisdom saving throw or \
             become frightened for 1 minute.",
        )
        .dynamic()
        .effect(TraitEffect::number(
            Custom,
            "Frightful presence range (in feet)",
        ))
        .effect(TraitEffect::number(Custom, "Wisdom save DC")),
        TraitTemplate::new(
            "elemental_body",
            "Elemental Body",
            Environmental,
            "The creature is immune to [damage_type] damage. Additionally, when a \
             creature touches the creature or hits it with a melee attack while within \
             5 feet of it, that creature takes [damage] [damage_type] damage.",
        )
        .dynamic()
        .effect(TraitEffect::text(
            DamageImmunity,
            "Damage type for immunity (e.g., \"fire\", \"cold\", \"lightning\")",
        ))
        .effect(TraitEffect::text(
            Custom,
            "Contact damage amount (e.g., \"5 (1d10)\", \"7 (2d6)\")",
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::Creature;

    #[test]
    fn test_catalog_keys_are_unique() {
        let mut keys: Vec<&str> = all_traits().iter().map(|t| t.key).collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn test_every_category_has_traits() {
        for category in TraitCategory::all() {
            assert!(
                !traits_by_category(category).is_empty(),
                "no traits in {category}"
            );
        }
    }

    #[test]
    fn test_traits_by_category_preserves_catalog_order() {
        let movement = traits_by_category(TraitCategory::Movement);
        let names: Vec<&str> = movement.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "Amphibious",
                "Flyby",
                "Incorporeal Movement",
                "Spider Climb",
                "Water Breathing"
            ]
        );
    }

    #[test]
    fn test_search_exact_name_ranks_first() {
        let results = search_traits("pack tactics");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Pack Tactics");
    }

    #[test]
    fn test_search_requires_every_token() {
        let results = search_traits("keen smell");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Keen Smell");
    }

    #[test]
    fn test_search_prefix_before_substring() {
        let results = search_traits("magic");
        assert!(results.len() >= 2);
        // "Magic Resistance"/"Magic Weapons" (name starts with) rank ahead
        // of traits that merely mention magic in their descriptions.
        assert!(results[0].name.starts_with("Magic"));
        assert!(results[1].name.starts_with("Magic"));
    }

    #[test]
    fn test_search_empty_query_is_empty() {
        assert!(search_traits("   ").is_empty());
    }

    #[test]
    fn test_input_key_slugs() {
        let amphibious = trait_template("amphibious").unwrap();
        let keys: Vec<String> = amphibious
            .required_inputs()
            .iter()
            .map(|e| e.input_key().unwrap())
            .collect();
        assert_eq!(keys, vec!["swimming_speed"]);

        let charge = trait_template("charge").unwrap();
        let keys: Vec<String> = charge
            .required_inputs()
            .iter()
            .map(|e| e.input_key().unwrap())
            .collect();
        assert_eq!(
            keys,
            vec![
                "minimum_charge_distance",
                "attack_type",
                "extra_damage",
                "save_dc"
            ]
        );
    }

    #[test]
    fn test_validate_missing_dc_reports_one_error() {
        let charge = trait_template("charge").unwrap();
        let inputs = TraitInputs::new()
            .with("minimum_charge_distance", "20")
            .with("attack_type", "gore")
            .with("extra_damage", "9 (2d8)");
        let report = validate_inputs(charge, &inputs);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Save DC is required"]);
    }

    #[test]
    fn test_validate_accepts_positional_keys() {
        let charge = trait_template("charge").unwrap();
        let inputs = TraitInputs::new()
            .with("input_0", "20")
            .with("input_1", "gore")
            .with("input_2", "9 (2d8)")
            .with("input_3", "14");
        assert!(validate_inputs(charge, &inputs).is_valid);
    }

    #[test]
    fn test_validate_number_and_select_rules() {
        let blindsight = trait_template("blindsight").unwrap();
        let report = validate_inputs(
            blindsight,
            &TraitInputs::new().with("blindsight_range", "-10"),
        );
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec!["Blindsight range (in feet) must be a valid positive number"]
        );

        let spellcasting = trait_template("spellcasting").unwrap();
        let inputs = TraitInputs::new()
            .with("caster_level", "18th-level")
            .with("spellcasting_ability", "Strength")
            .with("spell_save_dc", "19")
            .with("spell_attack_bonus", "+11");
        let report = validate_inputs(spellcasting, &inputs);
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec!["Spellcasting ability must be one of: Intelligence, Wisdom, Charisma"]
        );
    }

    #[test]
    fn test_render_static_description_verbatim() {
        let pack_tactics = trait_template("pack_tactics").unwrap();
        assert_eq!(
            render_description(pack_tactics, &TraitInputs::new()),
            pack_tactics.description
        );
    }

    #[test]
    fn test_render_substitutes_positionally() {
        let charge = trait_template("charge").unwrap();
        let inputs = TraitInputs::new()
            .with("minimum_charge_distance", "20")
            .with("attack_type", "gore")
            .with("extra_damage", "9 (2d8)")
            .with("save_dc", "14");
        let rendered = render_description(charge, &inputs);
        assert_eq!(
            rendered,
            "If the creature moves at least 20 feet straight toward a target and then \
             hits it with a gore attack on the same turn, the target takes an extra \
             9 (2d8) damage. If the target is a creature, it must succeed on a DC 14 \
             Strength saving throw or be knocked prone."
        );
    }

    #[test]
    fn test_render_leaves_unfilled_placeholders() {
        let charge = trait_template("charge").unwrap();
        let inputs = TraitInputs::new().with("minimum_charge_distance", "20");
        let rendered = render_description(charge, &inputs);
        assert!(rendered.contains("at least 20 feet"));
        assert!(rendered.contains("[attack]"));
        assert!(rendered.contains("[dc]"));
    }

    #[test]
    fn test_render_repeated_token_falls_back_to_token_name() {
        // Elemental Body uses [damage_type] twice but has only two required
        // inputs; the third placeholder resolves by its literal token name.
        let elemental = trait_template("elemental_body").unwrap();
        let inputs = TraitInputs::new()
            .with("damage_type_for_immunity", "fire")
            .with("contact_damage_amount", "5 (1d10)")
            .with("damage_type", "fire");
        let rendered = render_description(elemental, &inputs);
        assert_eq!(
            rendered,
            "The creature is immune to fire damage. Additionally, when a creature \
             touches the creature or hits it with a melee attack while within 5 feet \
             of it, that creature takes 5 (1d10) fire damage."
        );
    }

    #[test]
    fn test_apply_blindsight_appends_sense() {
        let creature = Creature::blank();
        let blindsight = trait_template("blindsight").unwrap();
        let updated = apply_effects(
            &creature,
            blindsight,
            &TraitInputs::new().with("blindsight_range", "120"),
        );
        let added = updated
            .sense_entries
            .iter()
            .find(|e| e.sense_type == SenseType::Blindsight)
            .expect("blindsight appended");
        assert_eq!(added.range, 120);
        assert!(!added.is_calculated);
        // Everything else untouched
        assert_eq!(updated.speed_entries, creature.speed_entries);
        assert_eq!(updated.language_entries, creature.language_entries);
        assert_eq!(updated.damage_immunities, creature.damage_immunities);
    }

    #[test]
    fn test_apply_telepathy_formats_language() {
        let creature = Creature::blank();
        let bond = trait_template("telepathic_bond").unwrap();
        let updated = apply_effects(
            &creature,
            bond,
            &TraitInputs::new().with("telepathic_range", "60"),
        );
        assert_eq!(updated.language_entries.len(), 1);
        assert_eq!(updated.language_entries[0].language, "Telepathy 60 ft.");
    }

    #[test]
    fn test_apply_telepathy_default_range() {
        let creature = Creature::blank();
        let bond = trait_template("telepathic_bond").unwrap();
        let updated = apply_effects(&creature, bond, &TraitInputs::new());
        assert_eq!(updated.language_entries[0].language, "Telepathy 120 ft.");
    }

    #[test]
    fn test_apply_speed_effect() {
        let creature = Creature::blank();
        let amphibious = trait_template("amphibious").unwrap();
        let updated = apply_effects(
            &creature,
            amphibious,
            &TraitInputs::new().with("swimming_speed", "40"),
        );
        assert_eq!(
            updated.speed_entries.last(),
            Some(&SpeedEntry::new(SpeedType::Swim, 40))
        );
    }

    #[test]
    fn test_apply_fixed_immunity() {
        let creature = Creature::blank();
        let fire = trait_template("fire_immunity").unwrap();
        let updated = apply_effects(&creature, fire, &TraitInputs::new());
        assert_eq!(updated.damage_immunities, vec!["fire"]);
    }

    #[test]
    fn test_apply_input_driven_immunity() {
        let creature = Creature::blank();
        let elemental = trait_template("elemental_body").unwrap();
        let inputs = TraitInputs::new()
            .with("damage_type_for_immunity", "lightning")
            .with("contact_damage_amount", "5 (1d10)");
        let updated = apply_effects(&creature, elemental, &inputs);
        assert_eq!(updated.damage_immunities, vec!["lightning"]);
    }

    #[test]
    fn test_apply_multi_effect_trait() {
        let creature = Creature::blank();
        let fey = trait_template("fey_ancestry").unwrap();
        let updated = apply_effects(&creature, fey, &TraitInputs::new());
        // Saving throw advantage is narrative-only; only the condition
        // immunity lands structurally.
        assert_eq!(updated.condition_immunities, vec!["magical_sleep"]);
        assert_eq!(updated.saving_throw_entries, creature.saving_throw_entries);
    }

    #[test]
    fn test_apply_twice_duplicates_effects() {
        let creature = Creature::blank();
        let fire = trait_template("fire_immunity").unwrap();
        let once = apply_effects(&creature, fire, &TraitInputs::new());
        let twice = apply_effects(&once, fire, &TraitInputs::new());
        assert_eq!(twice.damage_immunities, vec!["fire", "fire"]);
    }

    #[test]
    fn test_narrative_effects_do_not_mutate() {
        let creature = Creature::blank();
        let regen = trait_template("regeneration").unwrap();
        let inputs = TraitInputs::new()
            .with("hp_regenerated_per_turn", "10")
            .with("damage_types_that_stop_regeneration", "fire or radiant");
        let updated = apply_effects(&creature, regen, &inputs);
        assert_eq!(updated, creature);
    }
}
