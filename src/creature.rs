//! The creature record and its structured collections.
//!
//! A [`Creature`] is the central editable record for one stat sheet. The
//! structured entry lists (speeds, senses, languages, saving throws,
//! skills) are the single source of truth; the flat display strings the
//! stat block shows are derived on demand through the converters in
//! [`crate::legacy`] and never stored.

use crate::legacy;
use crate::rules::{self, DEFAULT_PROFICIENCY_BONUS};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "Str",
            Ability::Dexterity => "Dex",
            Ability::Constitution => "Con",
            Ability::Intelligence => "Int",
            Ability::Wisdom => "Wis",
            Ability::Charisma => "Cha",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    /// Parse from a full name or three-letter abbreviation, case-insensitive.
    pub fn parse(s: &str) -> Option<Ability> {
        let s = s.trim();
        Ability::all()
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s) || a.abbreviation().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container. Scores are validated into [1, 1000] by the
/// validation module before they land here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u16,
    pub dexterity: u16,
    pub constitution: u16,
    pub intelligence: u16,
    pub wisdom: u16,
    pub charisma: u16,
}

impl AbilityScores {
    pub fn new(str: u16, dex: u16, con: u16, int: u16, wis: u16, cha: u16) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u16 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u16) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        rules::ability_modifier(self.get(ability) as i32)
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// D&D 5e skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Athletics,
    Acrobatics,
    SleightOfHand,
    Stealth,
    Arcana,
    History,
    Investigation,
    Nature,
    Religion,
    AnimalHandling,
    Insight,
    Medicine,
    Perception,
    Survival,
    Deception,
    Intimidation,
    Performance,
    Persuasion,
}

impl Skill {
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletics",
            Skill::Acrobatics => "Acrobatics",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Arcana => "Arcana",
            Skill::History => "History",
            Skill::Investigation => "Investigation",
            Skill::Nature => "Nature",
            Skill::Religion => "Religion",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Insight => "Insight",
            Skill::Medicine => "Medicine",
            Skill::Perception => "Perception",
            Skill::Survival => "Survival",
            Skill::Deception => "Deception",
            Skill::Intimidation => "Intimidation",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
        }
    }

    pub fn all() -> [Skill; 18] {
        [
            Skill::Athletics,
            Skill::Acrobatics,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Arcana,
            Skill::History,
            Skill::Investigation,
            Skill::Nature,
            Skill::Religion,
            Skill::AnimalHandling,
            Skill::Insight,
            Skill::Medicine,
            Skill::Perception,
            Skill::Survival,
            Skill::Deception,
            Skill::Intimidation,
            Skill::Performance,
            Skill::Persuasion,
        ]
    }

    pub fn parse(s: &str) -> Option<Skill> {
        let s = s.trim();
        Skill::all()
            .into_iter()
            .find(|sk| sk.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Descriptive enums
// ============================================================================

/// Creature sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl Size {
    pub fn name(&self) -> &'static str {
        match self {
            Size::Tiny => "Tiny",
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::Huge => "Huge",
            Size::Gargantuan => "Gargantuan",
        }
    }

    pub fn all() -> [Size; 6] {
        [
            Size::Tiny,
            Size::Small,
            Size::Medium,
            Size::Large,
            Size::Huge,
            Size::Gargantuan,
        ]
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The fourteen standard creature types, with an escape hatch for
/// homebrew types. Serialized as the plain display string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CreatureType {
    Aberration,
    Beast,
    Celestial,
    Construct,
    Dragon,
    Elemental,
    Fey,
    Fiend,
    Giant,
    Humanoid,
    Monstrosity,
    Ooze,
    Plant,
    Undead,
    Custom(String),
}

impl CreatureType {
    pub fn name(&self) -> &str {
        match self {
            CreatureType::Aberration => "Aberration",
            CreatureType::Beast => "Beast",
            CreatureType::Celestial => "Celestial",
            CreatureType::Construct => "Construct",
            CreatureType::Dragon => "Dragon",
            CreatureType::Elemental => "Elemental",
            CreatureType::Fey => "Fey",
            CreatureType::Fiend => "Fiend",
            CreatureType::Giant => "Giant",
            CreatureType::Humanoid => "Humanoid",
            CreatureType::Monstrosity => "Monstrosity",
            CreatureType::Ooze => "Ooze",
            CreatureType::Plant => "Plant",
            CreatureType::Undead => "Undead",
            CreatureType::Custom(name) => name,
        }
    }

    pub fn standard() -> [CreatureType; 14] {
        [
            CreatureType::Aberration,
            CreatureType::Beast,
            CreatureType::Celestial,
            CreatureType::Construct,
            CreatureType::Dragon,
            CreatureType::Elemental,
            CreatureType::Fey,
            CreatureType::Fiend,
            CreatureType::Giant,
            CreatureType::Humanoid,
            CreatureType::Monstrosity,
            CreatureType::Ooze,
            CreatureType::Plant,
            CreatureType::Undead,
        ]
    }
}

impl From<String> for CreatureType {
    fn from(s: String) -> Self {
        CreatureType::standard()
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .unwrap_or(CreatureType::Custom(s))
    }
}

impl From<CreatureType> for String {
    fn from(t: CreatureType) -> String {
        t.name().to_string()
    }
}

impl fmt::Display for CreatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The ten alignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    #[serde(rename = "Lawful Good")]
    LawfulGood,
    #[serde(rename = "Neutral Good")]
    NeutralGood,
    #[serde(rename = "Chaotic Good")]
    ChaoticGood,
    #[serde(rename = "Lawful Neutral")]
    LawfulNeutral,
    Neutral,
    #[serde(rename = "Chaotic Neutral")]
    ChaoticNeutral,
    #[serde(rename = "Lawful Evil")]
    LawfulEvil,
    #[serde(rename = "Neutral Evil")]
    NeutralEvil,
    #[serde(rename = "Chaotic Evil")]
    ChaoticEvil,
    Unaligned,
}

impl Alignment {
    pub fn name(&self) -> &'static str {
        match self {
            Alignment::LawfulGood => "Lawful Good",
            Alignment::NeutralGood => "Neutral Good",
            Alignment::ChaoticGood => "Chaotic Good",
            Alignment::LawfulNeutral => "Lawful Neutral",
            Alignment::Neutral => "Neutral",
            Alignment::ChaoticNeutral => "Chaotic Neutral",
            Alignment::LawfulEvil => "Lawful Evil",
            Alignment::NeutralEvil => "Neutral Evil",
            Alignment::ChaoticEvil => "Chaotic Evil",
            Alignment::Unaligned => "Unaligned",
        }
    }

    pub fn all() -> [Alignment; 10] {
        [
            Alignment::LawfulGood,
            Alignment::NeutralGood,
            Alignment::ChaoticGood,
            Alignment::LawfulNeutral,
            Alignment::Neutral,
            Alignment::ChaoticNeutral,
            Alignment::LawfulEvil,
            Alignment::NeutralEvil,
            Alignment::ChaoticEvil,
            Alignment::Unaligned,
        ]
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Defense
// ============================================================================

/// Worn armor categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ArmorType {
    #[default]
    None,
    #[serde(rename = "Light Armor")]
    LightArmor,
    #[serde(rename = "Medium Armor")]
    MediumArmor,
    #[serde(rename = "Heavy Armor")]
    HeavyArmor,
    #[serde(rename = "Natural Armor")]
    NaturalArmor,
}

impl ArmorType {
    pub fn name(&self) -> &'static str {
        match self {
            ArmorType::None => "None",
            ArmorType::LightArmor => "Light Armor",
            ArmorType::MediumArmor => "Medium Armor",
            ArmorType::HeavyArmor => "Heavy Armor",
            ArmorType::NaturalArmor => "Natural Armor",
        }
    }

    /// Valid subtype choices for this armor category. Natural armor takes
    /// free text instead.
    pub fn subtypes(&self) -> &'static [&'static str] {
        match self {
            ArmorType::None => &["Unarmored"],
            ArmorType::LightArmor => &["Padded", "Leather", "Studded Leather"],
            ArmorType::MediumArmor => {
                &["Hide", "Chain Shirt", "Scale Mail", "Breastplate", "Half Plate"]
            }
            ArmorType::HeavyArmor => &["Ring Mail", "Chain Mail", "Splint", "Plate"],
            ArmorType::NaturalArmor => &[],
        }
    }

    pub fn all() -> [ArmorType; 5] {
        [
            ArmorType::None,
            ArmorType::LightArmor,
            ArmorType::MediumArmor,
            ArmorType::HeavyArmor,
            ArmorType::NaturalArmor,
        ]
    }
}

impl fmt::Display for ArmorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Hit die sizes usable for creature hit dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HitDie {
    #[serde(rename = "d4")]
    D4,
    #[serde(rename = "d6")]
    D6,
    #[default]
    #[serde(rename = "d8")]
    D8,
    #[serde(rename = "d10")]
    D10,
    #[serde(rename = "d12")]
    D12,
    #[serde(rename = "d20")]
    D20,
}

impl HitDie {
    pub fn sides(&self) -> u32 {
        match self {
            HitDie::D4 => 4,
            HitDie::D6 => 6,
            HitDie::D8 => 8,
            HitDie::D10 => 10,
            HitDie::D12 => 12,
            HitDie::D20 => 20,
        }
    }

    /// Parse notation like `"d8"`; unknown notation normalizes to d8.
    pub fn from_notation(s: &str) -> HitDie {
        match s.trim().to_lowercase().as_str() {
            "d4" => HitDie::D4,
            "d6" => HitDie::D6,
            "d8" => HitDie::D8,
            "d10" => HitDie::D10,
            "d12" => HitDie::D12,
            "d20" => HitDie::D20,
            _ => HitDie::D8,
        }
    }

    pub fn all() -> [HitDie; 6] {
        [
            HitDie::D4,
            HitDie::D6,
            HitDie::D8,
            HitDie::D10,
            HitDie::D12,
            HitDie::D20,
        ]
    }
}

impl fmt::Display for HitDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

// ============================================================================
// Structured collection entries
// ============================================================================

/// Movement modes. Serialized as the plain display string so homebrew
/// modes survive round trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpeedType {
    Walk,
    Fly,
    Swim,
    Climb,
    Burrow,
    Hover,
    Custom(String),
}

impl SpeedType {
    pub fn name(&self) -> &str {
        match self {
            SpeedType::Walk => "Walk",
            SpeedType::Fly => "Fly",
            SpeedType::Swim => "Swim",
            SpeedType::Climb => "Climb",
            SpeedType::Burrow => "Burrow",
            SpeedType::Hover => "Hover",
            SpeedType::Custom(name) => name,
        }
    }

    /// Lowercase keyword used in flat speed strings ("fly 60 ft.").
    pub fn keyword(&self) -> String {
        self.name().to_lowercase()
    }

    pub fn standard() -> [SpeedType; 6] {
        [
            SpeedType::Walk,
            SpeedType::Fly,
            SpeedType::Swim,
            SpeedType::Climb,
            SpeedType::Burrow,
            SpeedType::Hover,
        ]
    }
}

impl From<String> for SpeedType {
    fn from(s: String) -> Self {
        SpeedType::standard()
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .unwrap_or(SpeedType::Custom(s))
    }
}

impl From<SpeedType> for String {
    fn from(t: SpeedType) -> String {
        t.name().to_string()
    }
}

/// One movement entry, e.g. fly 60 ft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedEntry {
    #[serde(rename = "type")]
    pub speed_type: SpeedType,
    pub distance: u32,
}

impl SpeedEntry {
    pub fn new(speed_type: SpeedType, distance: u32) -> Self {
        Self {
            speed_type,
            distance,
        }
    }

    /// Default placeholder entry: walk 30 ft.
    pub fn walk_default() -> Self {
        Self::new(SpeedType::Walk, 30)
    }
}

/// Sense varieties. Passive Perception is modeled as a sense entry whose
/// `range` holds the passive score.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SenseType {
    Blindsight,
    Darkvision,
    Tremorsense,
    Truesight,
    PassivePerception,
    Custom(String),
}

impl SenseType {
    pub fn name(&self) -> &str {
        match self {
            SenseType::Blindsight => "Blindsight",
            SenseType::Darkvision => "Darkvision",
            SenseType::Tremorsense => "Tremorsense",
            SenseType::Truesight => "Truesight",
            SenseType::PassivePerception => "Passive Perception",
            SenseType::Custom(name) => name,
        }
    }

    pub fn standard() -> [SenseType; 5] {
        [
            SenseType::Blindsight,
            SenseType::Darkvision,
            SenseType::Tremorsense,
            SenseType::Truesight,
            SenseType::PassivePerception,
        ]
    }
}

impl From<String> for SenseType {
    fn from(s: String) -> Self {
        SenseType::standard()
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .unwrap_or(SenseType::Custom(s))
    }
}

impl From<SenseType> for String {
    fn from(t: SenseType) -> String {
        t.name().to_string()
    }
}

/// One sense entry. When `is_calculated` is set on a Passive Perception
/// entry, its range is re-derived from Wisdom and the Perception skill on
/// every recompute instead of being user-managed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenseEntry {
    #[serde(rename = "type")]
    pub sense_type: SenseType,
    pub range: u32,
    #[serde(default)]
    pub is_calculated: bool,
}

impl SenseEntry {
    pub fn new(sense_type: SenseType, range: u32) -> Self {
        Self {
            sense_type,
            range,
            is_calculated: false,
        }
    }
}

/// One known language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
}

impl LanguageEntry {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }
}

/// Saving throw proficiency entry. The grid always carries one entry per
/// ability; only proficient or overridden entries show up in the stat
/// block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingThrowEntry {
    pub ability: Ability,
    #[serde(default)]
    pub proficient: bool,
    #[serde(default)]
    pub expertise: bool,
    #[serde(default, rename = "override")]
    pub overridden: bool,
    #[serde(default)]
    pub override_value: Option<i32>,
}

impl SavingThrowEntry {
    pub fn new(ability: Ability) -> Self {
        Self {
            ability,
            proficient: false,
            expertise: false,
            overridden: false,
            override_value: None,
        }
    }

    /// The bonus this entry contributes, honoring a manual override.
    pub fn bonus(&self, scores: &AbilityScores) -> i32 {
        if self.overridden {
            if let Some(value) = self.override_value {
                return value;
            }
        }
        rules::saving_throw_bonus(
            scores.get(self.ability) as i32,
            self.proficient,
            self.expertise,
            DEFAULT_PROFICIENCY_BONUS,
        )
    }
}

/// Skill proficiency entry, one per skill in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub skill: Skill,
    #[serde(default)]
    pub proficient: bool,
    #[serde(default)]
    pub expertise: bool,
    #[serde(default, rename = "override")]
    pub overridden: bool,
    #[serde(default)]
    pub override_value: Option<i32>,
}

impl SkillEntry {
    pub fn new(skill: Skill) -> Self {
        Self {
            skill,
            proficient: false,
            expertise: false,
            overridden: false,
            override_value: None,
        }
    }

    pub fn bonus(&self, scores: &AbilityScores) -> i32 {
        if self.overridden {
            if let Some(value) = self.override_value {
                return value;
            }
        }
        rules::skill_bonus(
            scores.get(self.skill.ability()) as i32,
            self.proficient,
            self.expertise,
            DEFAULT_PROFICIENCY_BONUS,
        )
    }
}

// ============================================================================
// Narrative blocks
// ============================================================================

/// A named special ability (trait) shown on the stat block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialAbility {
    pub name: String,
    pub description: String,
}

impl SpecialAbility {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// An action, bonus action, or mythic action entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub attack_bonus: Option<i32>,
    #[serde(default)]
    pub damage: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
}

impl ActionEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            attack_bonus: None,
            damage: None,
            range: None,
        }
    }
}

/// A legendary action entry; `cost` is the number of legendary actions it
/// consumes (at least 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendaryActionEntry {
    pub name: String,
    pub description: String,
    #[serde(default = "default_legendary_cost")]
    pub cost: u32,
}

fn default_legendary_cost() -> u32 {
    1
}

impl LegendaryActionEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>, cost: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            cost: cost.max(1),
        }
    }
}

// ============================================================================
// Creature
// ============================================================================

/// The complete editable record for one creature stat sheet.
///
/// Id 0 is reserved for the in-progress "new creature" draft; the store
/// assigns a real id on first save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    pub id: u64,
    pub name: String,
    pub size: Size,
    #[serde(rename = "type")]
    pub creature_type: CreatureType,
    pub alignment: Alignment,
    #[serde(default)]
    pub challenge_rating: String,

    // Defense. `ac` is a derived display string unless `ac_override` is set.
    pub ac: String,
    #[serde(default)]
    pub ac_override: bool,
    pub armor_type: ArmorType,
    pub armor_subtype: String,
    #[serde(default)]
    pub armor_modifier: i32,
    #[serde(default)]
    pub has_shield: bool,
    #[serde(default)]
    pub shield_modifier: i32,
    #[serde(default)]
    pub has_mage_armor: bool,

    // Health. `hp` is a derived display string unless `hp_override` is set.
    pub hp: String,
    #[serde(default)]
    pub hp_override: bool,
    pub hit_dice_count: u32,
    pub hit_die: HitDie,

    pub scores: AbilityScores,

    // Structured collections: the single source of truth for the flat
    // strings the stat block displays.
    pub speed_entries: Vec<SpeedEntry>,
    pub sense_entries: Vec<SenseEntry>,
    #[serde(default)]
    pub language_entries: Vec<LanguageEntry>,
    pub saving_throw_entries: Vec<SavingThrowEntry>,
    pub skill_entries: Vec<SkillEntry>,

    #[serde(default)]
    pub damage_resistances: Vec<String>,
    #[serde(default)]
    pub damage_immunities: Vec<String>,
    #[serde(default)]
    pub condition_immunities: Vec<String>,

    #[serde(default)]
    pub special_abilities: Vec<SpecialAbility>,
    #[serde(default)]
    pub actions: Vec<ActionEntry>,
    #[serde(default)]
    pub bonus_actions: Vec<ActionEntry>,
    #[serde(default)]
    pub legendary_actions: Vec<LegendaryActionEntry>,
    #[serde(default)]
    pub mythic_actions: Vec<ActionEntry>,
}

impl Creature {
    /// A blank "new creature" draft with the standard defaults.
    pub fn blank() -> Self {
        let mut creature = Self {
            id: 0,
            name: String::new(),
            size: Size::Medium,
            creature_type: CreatureType::Humanoid,
            alignment: Alignment::Neutral,
            challenge_rating: "0".to_string(),
            ac: String::new(),
            ac_override: false,
            armor_type: ArmorType::None,
            armor_subtype: "Unarmored".to_string(),
            armor_modifier: 0,
            has_shield: false,
            shield_modifier: 0,
            has_mage_armor: false,
            hp: String::new(),
            hp_override: false,
            hit_dice_count: 1,
            hit_die: HitDie::D8,
            scores: AbilityScores::default(),
            speed_entries: vec![SpeedEntry::walk_default()],
            sense_entries: Vec::new(),
            language_entries: Vec::new(),
            saving_throw_entries: Ability::all().map(SavingThrowEntry::new).to_vec(),
            skill_entries: Skill::all().map(SkillEntry::new).to_vec(),
            damage_resistances: Vec::new(),
            damage_immunities: Vec::new(),
            condition_immunities: Vec::new(),
            special_abilities: Vec::new(),
            actions: Vec::new(),
            bonus_actions: Vec::new(),
            legendary_actions: Vec::new(),
            mythic_actions: Vec::new(),
        };
        creature.recompute_derived();
        creature
    }

    /// Whether this record is the unsaved "new creature" draft.
    pub fn is_draft(&self) -> bool {
        self.id == 0
    }

    // ------------------------------------------------------------------
    // Derived stats
    // ------------------------------------------------------------------

    /// Re-derive the AC and HP display strings and the calculated Passive
    /// Perception entry. Call after any edit that touches a contributing
    /// field; overridden stats are left alone.
    pub fn recompute_derived(&mut self) {
        if !self.ac_override {
            self.ac = self.computed_ac().to_string();
        }
        if !self.hp_override {
            let hp = rules::hit_points(
                self.scores.constitution as i32,
                self.hit_dice_count,
                self.hit_die,
            );
            self.hp = rules::format_hp(
                hp,
                self.hit_dice_count,
                self.hit_die,
                self.scores.modifier(Ability::Constitution),
            );
        }
        self.refresh_passive_perception();
    }

    /// The numeric AC derived from the current armor inputs.
    pub fn computed_ac(&self) -> i32 {
        rules::armor_class(
            self.scores.dexterity as i32,
            self.armor_type,
            &self.armor_subtype,
            self.armor_modifier,
            self.has_shield,
            self.shield_modifier,
            self.has_mage_armor,
        )
    }

    /// The creature's passive Perception score from Wisdom and the
    /// Perception skill entry.
    pub fn passive_perception(&self) -> i32 {
        let (proficient, expertise) = self
            .skill_entry(Skill::Perception)
            .map(|e| (e.proficient, e.expertise))
            .unwrap_or((false, false));
        rules::passive_perception(
            self.scores.wisdom as i32,
            proficient,
            expertise,
            DEFAULT_PROFICIENCY_BONUS,
        )
    }

    /// Keep exactly one Passive Perception sense entry, recomputing its
    /// value while it is flagged as calculated.
    fn refresh_passive_perception(&mut self) {
        let mut seen = false;
        self.sense_entries.retain(|e| {
            if e.sense_type == SenseType::PassivePerception {
                let keep = !seen;
                seen = true;
                keep
            } else {
                true
            }
        });

        let passive = self.passive_perception().max(0) as u32;
        match self
            .sense_entries
            .iter_mut()
            .find(|e| e.sense_type == SenseType::PassivePerception)
        {
            Some(entry) => {
                if entry.is_calculated {
                    entry.range = passive;
                }
            }
            None => self.sense_entries.push(SenseEntry {
                sense_type: SenseType::PassivePerception,
                range: passive,
                is_calculated: true,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Collection editors
    // ------------------------------------------------------------------

    pub fn add_speed(&mut self, entry: SpeedEntry) {
        self.speed_entries.push(entry);
    }

    /// Remove a speed entry. Removing the last one resets it to the walk
    /// 30 ft. placeholder instead, so the collection never empties.
    pub fn remove_speed(&mut self, index: usize) {
        if index >= self.speed_entries.len() {
            return;
        }
        if self.speed_entries.len() == 1 {
            self.speed_entries[0] = SpeedEntry::walk_default();
        } else {
            self.speed_entries.remove(index);
        }
    }

    pub fn add_sense(&mut self, entry: SenseEntry) {
        self.sense_entries.push(entry);
        self.refresh_passive_perception();
    }

    /// Remove a sense entry. The auto-maintained Passive Perception entry
    /// is re-synthesized afterwards, so the collection never empties.
    pub fn remove_sense(&mut self, index: usize) {
        if index < self.sense_entries.len() {
            self.sense_entries.remove(index);
        }
        self.refresh_passive_perception();
    }

    /// Add a language. The empty list is the canonical "knows no
    /// languages" state, so the legacy `"None"` sentinel (and its em-dash
    /// display form) clears the list rather than being stored.
    pub fn add_language(&mut self, language: &str) {
        let language = language.trim();
        if language.is_empty() {
            return;
        }
        if language.eq_ignore_ascii_case("none") || language == "\u{2014}" {
            self.language_entries.clear();
            return;
        }
        self.language_entries.push(LanguageEntry::new(language));
    }

    pub fn remove_language(&mut self, index: usize) {
        if index < self.language_entries.len() {
            self.language_entries.remove(index);
        }
    }

    pub fn saving_throw_entry(&self, ability: Ability) -> Option<&SavingThrowEntry> {
        self.saving_throw_entries
            .iter()
            .find(|e| e.ability == ability)
    }

    pub fn saving_throw_entry_mut(&mut self, ability: Ability) -> &mut SavingThrowEntry {
        let position = self
            .saving_throw_entries
            .iter()
            .position(|e| e.ability == ability);
        match position {
            Some(i) => &mut self.saving_throw_entries[i],
            None => {
                // The grid should always be complete; repair it if a stored
                // record was missing this ability.
                self.saving_throw_entries.push(SavingThrowEntry::new(ability));
                self.saving_throw_entries.last_mut().unwrap()
            }
        }
    }

    pub fn skill_entry(&self, skill: Skill) -> Option<&SkillEntry> {
        self.skill_entries.iter().find(|e| e.skill == skill)
    }

    pub fn skill_entry_mut(&mut self, skill: Skill) -> &mut SkillEntry {
        let position = self.skill_entries.iter().position(|e| e.skill == skill);
        match position {
            Some(i) => &mut self.skill_entries[i],
            None => {
                self.skill_entries.push(SkillEntry::new(skill));
                self.skill_entries.last_mut().unwrap()
            }
        }
    }

    /// Set proficiency flags for a saving throw.
    pub fn set_saving_throw(&mut self, ability: Ability, proficient: bool, expertise: bool) {
        let entry = self.saving_throw_entry_mut(ability);
        entry.proficient = proficient;
        entry.expertise = expertise;
        entry.overridden = false;
        entry.override_value = None;
    }

    /// Pin a saving throw to a manually entered bonus.
    pub fn override_saving_throw(&mut self, ability: Ability, value: i32) {
        let entry = self.saving_throw_entry_mut(ability);
        entry.overridden = true;
        entry.override_value = Some(value);
    }

    /// Set proficiency flags for a skill. Perception changes feed the
    /// calculated Passive Perception entry.
    pub fn set_skill(&mut self, skill: Skill, proficient: bool, expertise: bool) {
        let entry = self.skill_entry_mut(skill);
        entry.proficient = proficient;
        entry.expertise = expertise;
        entry.overridden = false;
        entry.override_value = None;
        if skill == Skill::Perception {
            self.refresh_passive_perception();
        }
    }

    /// Pin a skill to a manually entered bonus.
    pub fn override_skill(&mut self, skill: Skill, value: i32) {
        let entry = self.skill_entry_mut(skill);
        entry.overridden = true;
        entry.override_value = Some(value);
    }

    // ------------------------------------------------------------------
    // Display view
    // ------------------------------------------------------------------

    /// The flat, render-ready view of this record. Every string here is
    /// derived from the structured collections; nothing is cached.
    pub fn stat_block(&self) -> StatBlock {
        StatBlock {
            name: if self.name.trim().is_empty() {
                "New Creature".to_string()
            } else {
                self.name.clone()
            },
            meta: format!(
                "{} {}, {}",
                self.size,
                self.creature_type.name().to_lowercase(),
                self.alignment.name().to_lowercase()
            ),
            challenge: self.challenge_rating.clone(),
            armor_class: self.ac_display(),
            hit_points: self.hp.clone(),
            speed: legacy::format_speed_string(&self.speed_entries),
            saving_throws: legacy::format_saving_throw_strings(
                &self.saving_throw_entries,
                &self.scores,
            ),
            skills: legacy::format_skill_strings(&self.skill_entries, &self.scores),
            damage_resistances: self.damage_resistances.clone(),
            damage_immunities: self.damage_immunities.clone(),
            condition_immunities: self.condition_immunities.clone(),
            senses: legacy::format_senses_strings(&self.sense_entries),
            languages: legacy::format_languages_string(&self.language_entries),
        }
    }

    /// The AC display string with its armor annotation, e.g.
    /// `16 (Chain Mail, Shield)` or `12 (15 with Mage Armor)`.
    fn ac_display(&self) -> String {
        if self.ac_override {
            return self.ac.clone();
        }

        let mut notes: Vec<String> = Vec::new();
        match self.armor_type {
            ArmorType::None => {}
            ArmorType::NaturalArmor => notes.push("Natural Armor".to_string()),
            _ => {
                if !self.armor_subtype.trim().is_empty() {
                    notes.push(self.armor_subtype.clone());
                }
            }
        }
        if self.has_shield {
            notes.push("Shield".to_string());
        }
        if self.has_mage_armor {
            // Mage armor replaces the base calculation with 13 + Dex; the
            // shield still applies. Display-only, never the stored number.
            let mut mage_ac = 13 + self.scores.modifier(Ability::Dexterity);
            if self.has_shield {
                mage_ac += 2 + self.shield_modifier;
            }
            notes.push(format!("{mage_ac} with Mage Armor"));
        }

        if notes.is_empty() {
            self.ac.clone()
        } else {
            format!("{} ({})", self.ac, notes.join(", "))
        }
    }
}

impl Default for Creature {
    fn default() -> Self {
        Self::blank()
    }
}

/// Render-ready flat view of a creature record. This is the shape the
/// presentation collaborator consumes; every field is a pure function of
/// the structured record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub name: String,
    /// Size/type/alignment line, e.g. "Large monstrosity, unaligned".
    pub meta: String,
    pub challenge: String,
    pub armor_class: String,
    pub hit_points: String,
    pub speed: String,
    pub saving_throws: Vec<String>,
    pub skills: Vec<String>,
    pub damage_resistances: Vec<String>,
    pub damage_immunities: Vec<String>,
    pub condition_immunities: Vec<String>,
    pub senses: Vec<String>,
    pub languages: String,
}

// ============================================================================
// Sample creatures
// ============================================================================

/// The built-in example set shown before any creature has been saved.
pub fn sample_creatures() -> Vec<Creature> {
    vec![sample_dragon(), sample_owlbear(), sample_goblin()]
}

fn sample_dragon() -> Creature {
    let mut dragon = Creature {
        id: 1,
        name: "Ancient Red Dragon".to_string(),
        size: Size::Gargantuan,
        creature_type: CreatureType::Dragon,
        alignment: Alignment::ChaoticEvil,
        challenge_rating: "24".to_string(),
        ac: "22 (Natural Armor)".to_string(),
        ac_override: true,
        armor_type: ArmorType::NaturalArmor,
        armor_subtype: String::new(),
        hit_dice_count: 28,
        hit_die: HitDie::D20,
        scores: AbilityScores::new(30, 10, 29, 18, 15, 23),
        speed_entries: vec![
            SpeedEntry::new(SpeedType::Walk, 40),
            SpeedEntry::new(SpeedType::Climb, 40),
            SpeedEntry::new(SpeedType::Fly, 80),
        ],
        sense_entries: vec![
            SenseEntry::new(SenseType::Blindsight, 60),
            SenseEntry::new(SenseType::Darkvision, 120),
            SenseEntry {
                sense_type: SenseType::PassivePerception,
                range: 26,
                is_calculated: false,
            },
        ],
        language_entries: vec![LanguageEntry::new("Common"), LanguageEntry::new("Draconic")],
        damage_immunities: vec!["Fire".to_string()],
        special_abilities: vec![SpecialAbility::new(
            "Legendary Resistance",
            "If the dragon fails a saving throw, it can choose to succeed instead (3/Day).",
        )],
        actions: vec![
            ActionEntry::new(
                "Multiattack",
                "The dragon can use its Frightful Presence. It then makes three attacks: \
                 one with its bite and two with its claws.",
            ),
            ActionEntry {
                name: "Bite".to_string(),
                description: "Melee Weapon Attack".to_string(),
                attack_bonus: Some(17),
                damage: Some("2d10 + 10 piercing plus 2d6 fire".to_string()),
                range: Some("15 ft.".to_string()),
            },
        ],
        legendary_actions: vec![LegendaryActionEntry::new(
            "Detect",
            "The dragon makes a Wisdom (Perception) check.",
            1,
        )],
        ..Creature::blank()
    };
    dragon.override_saving_throw(Ability::Dexterity, 7);
    dragon.override_saving_throw(Ability::Constitution, 16);
    dragon.override_saving_throw(Ability::Wisdom, 9);
    dragon.override_saving_throw(Ability::Charisma, 13);
    dragon.override_skill(Skill::Perception, 16);
    dragon.override_skill(Skill::Stealth, 7);
    dragon.recompute_derived();
    dragon
}

fn sample_owlbear() -> Creature {
    let mut owlbear = Creature {
        id: 2,
        name: "Owlbear".to_string(),
        size: Size::Large,
        creature_type: CreatureType::Monstrosity,
        alignment: Alignment::Unaligned,
        challenge_rating: "3".to_string(),
        armor_type: ArmorType::NaturalArmor,
        armor_subtype: String::new(),
        armor_modifier: 2,
        hit_dice_count: 7,
        hit_die: HitDie::D10,
        scores: AbilityScores::new(20, 12, 17, 3, 12, 7),
        speed_entries: vec![SpeedEntry::new(SpeedType::Walk, 40)],
        sense_entries: vec![SenseEntry::new(SenseType::Darkvision, 60)],
        special_abilities: vec![SpecialAbility::new(
            "Keen Sight and Smell",
            "The owlbear has advantage on Wisdom (Perception) checks that rely on sight or smell.",
        )],
        actions: vec![
            ActionEntry::new(
                "Multiattack",
                "The owlbear makes two attacks: one with its beak and one with its claws.",
            ),
            ActionEntry {
                name: "Beak".to_string(),
                description: "Melee Weapon Attack".to_string(),
                attack_bonus: Some(7),
                damage: Some("1d10 + 5 piercing".to_string()),
                range: Some("5 ft.".to_string()),
            },
            ActionEntry {
                name: "Claws".to_string(),
                description: "Melee Weapon Attack".to_string(),
                attack_bonus: Some(7),
                damage: Some("2d8 + 5 slashing".to_string()),
                range: Some("5 ft.".to_string()),
            },
        ],
        ..Creature::blank()
    };
    owlbear.set_skill(Skill::Perception, true, false);
    owlbear.recompute_derived();
    owlbear
}

fn sample_goblin() -> Creature {
    let mut goblin = Creature {
        id: 3,
        name: "Goblin".to_string(),
        size: Size::Small,
        creature_type: CreatureType::Humanoid,
        alignment: Alignment::NeutralEvil,
        challenge_rating: "1/4".to_string(),
        armor_type: ArmorType::LightArmor,
        armor_subtype: "Leather".to_string(),
        has_shield: true,
        hit_dice_count: 2,
        hit_die: HitDie::D6,
        scores: AbilityScores::new(8, 14, 10, 10, 8, 8),
        speed_entries: vec![SpeedEntry::new(SpeedType::Walk, 30)],
        sense_entries: vec![SenseEntry::new(SenseType::Darkvision, 60)],
        language_entries: vec![LanguageEntry::new("Common"), LanguageEntry::new("Goblin")],
        special_abilities: vec![SpecialAbility::new(
            "Nimble Escape",
            "The goblin can take the Disengage or Hide action as a bonus action on each of \
             its turns.",
        )],
        actions: vec![ActionEntry {
            name: "Scimitar".to_string(),
            description: "Melee Weapon Attack".to_string(),
            attack_bonus: Some(4),
            damage: Some("1d6 + 2 slashing".to_string()),
            range: Some("5 ft.".to_string()),
        }],
        ..Creature::blank()
    };
    goblin.set_skill(Skill::Stealth, true, true);
    goblin.recompute_derived();
    goblin
}
