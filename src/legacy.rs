//! Converters between flat stat-block strings and structured entries.
//!
//! Older stored records (and the classic display format) carry flat
//! strings like `"30 ft., fly 60 ft."` or `"Dex +7"`. Parsing is lenient:
//! unrecognized segments and malformed numbers normalize to sensible
//! defaults rather than failing. Formatting is canonicalizing, so
//! `format(parse(format(entries))) == format(entries)` for well-formed
//! input even when the original string was not canonical.

use crate::creature::{
    AbilityScores, LanguageEntry, SavingThrowEntry, SenseEntry, SenseType, SkillEntry, SpeedEntry,
    SpeedType,
};
use crate::rules::{format_modifier, saving_throw_bonus, skill_bonus, DEFAULT_PROFICIENCY_BONUS};

/// Display sentinel for a creature that knows no languages.
pub const NO_LANGUAGES: &str = "\u{2014}";

/// Pull the first run of digits out of a segment, with a fallback for
/// malformed or missing numbers.
fn scan_number(segment: &str, default: u32) -> u32 {
    let digits: String = segment.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(default)
}

// ============================================================================
// Speeds
// ============================================================================

/// Parse a flat speed string like `"30 ft., fly 60 ft., swim 30 ft."`.
///
/// A bare `"<n> ft."` is a walk speed; otherwise each comma-separated
/// segment is matched by keyword and anything unrecognized defaults to
/// walking. Missing numbers default to 30.
pub fn parse_speed_string(speed: &str) -> Vec<SpeedEntry> {
    let speed = speed.trim();
    if speed.is_empty() {
        return vec![SpeedEntry::walk_default()];
    }

    // Simple "30 ft." form: a bare walk speed.
    let bare = speed
        .trim_end_matches('.')
        .trim_end_matches("ft")
        .trim_end();
    if !bare.is_empty() && bare.chars().all(|c| c.is_ascii_digit()) {
        return vec![SpeedEntry::new(SpeedType::Walk, scan_number(bare, 30))];
    }

    let mut entries = Vec::new();
    for segment in speed.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let lower = segment.to_lowercase();
        let speed_type = [
            SpeedType::Fly,
            SpeedType::Swim,
            SpeedType::Climb,
            SpeedType::Burrow,
            SpeedType::Hover,
        ]
        .into_iter()
        .find(|t| lower.contains(&t.keyword()))
        .unwrap_or(SpeedType::Walk);
        entries.push(SpeedEntry::new(speed_type, scan_number(segment, 30)));
    }

    if entries.is_empty() {
        entries.push(SpeedEntry::walk_default());
    }
    entries
}

/// Format speed entries back into the flat display string. Zero-distance
/// entries are skipped; an empty list renders as `"30 ft."`.
pub fn format_speed_string(entries: &[SpeedEntry]) -> String {
    let parts: Vec<String> = entries
        .iter()
        .filter(|e| e.distance > 0)
        .map(|e| {
            if e.speed_type == SpeedType::Walk {
                format!("{} ft.", e.distance)
            } else {
                format!("{} {} ft.", e.speed_type.keyword(), e.distance)
            }
        })
        .collect();

    if parts.is_empty() {
        "30 ft.".to_string()
    } else {
        parts.join(", ")
    }
}

// ============================================================================
// Senses
// ============================================================================

/// Parse flat sense strings like `["Blindsight 60 ft.", "Darkvision 120 ft."]`.
///
/// If no Passive Perception entry is present one is synthesized as a
/// calculated entry so the stat block always shows a passive score.
pub fn parse_senses_strings(senses: &[String]) -> Vec<SenseEntry> {
    let mut entries = Vec::new();
    for segment in senses.iter().flat_map(|s| s.split(',')) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let lower = segment.to_lowercase();
        let sense_type = SenseType::standard()
            .into_iter()
            .find(|t| lower.starts_with(&t.name().to_lowercase()));
        match sense_type {
            Some(SenseType::PassivePerception) => entries.push(SenseEntry {
                sense_type: SenseType::PassivePerception,
                range: scan_number(segment, 10),
                is_calculated: false,
            }),
            Some(sense_type) => {
                entries.push(SenseEntry::new(sense_type, scan_number(segment, 60)))
            }
            None => {
                // Homebrew sense: keep the descriptive part as a custom type.
                let name: String = segment
                    .chars()
                    .take_while(|c| !c.is_ascii_digit())
                    .collect();
                let name = name.trim().to_string();
                if !name.is_empty() {
                    entries.push(SenseEntry::new(
                        SenseType::Custom(name),
                        scan_number(segment, 60),
                    ));
                }
            }
        }
    }

    if !entries
        .iter()
        .any(|e| e.sense_type == SenseType::PassivePerception)
    {
        entries.push(SenseEntry {
            sense_type: SenseType::PassivePerception,
            range: 10,
            is_calculated: true,
        });
    }
    entries
}

/// Format sense entries back into flat display strings. Passive Perception
/// renders without a `ft.` suffix.
pub fn format_senses_strings(entries: &[SenseEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.sense_type == SenseType::PassivePerception || e.range > 0)
        .map(|e| {
            if e.sense_type == SenseType::PassivePerception {
                format!("Passive Perception {}", e.range)
            } else {
                format!("{} {} ft.", e.sense_type.name(), e.range)
            }
        })
        .collect()
}

// ============================================================================
// Languages
// ============================================================================

/// Parse flat language strings. The `"None"` sentinel and its em-dash
/// display form are dropped here: the canonical "knows no languages" state
/// is the empty list.
pub fn parse_languages_strings(languages: &[String]) -> Vec<LanguageEntry> {
    languages
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none") && *s != NO_LANGUAGES)
        .map(LanguageEntry::new)
        .collect()
}

/// Format language entries into the flat display string; the empty list
/// renders as an em-dash.
pub fn format_languages_string(entries: &[LanguageEntry]) -> String {
    let parts: Vec<&str> = entries
        .iter()
        .map(|e| e.language.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        NO_LANGUAGES.to_string()
    } else {
        parts.join(", ")
    }
}

// ============================================================================
// Saving throws and skills
// ============================================================================

/// Parse the last signed integer of a segment like `"Dex +7"`.
fn parse_signed_suffix(segment: &str) -> Option<(&str, i32)> {
    let (name, value) = segment.trim().rsplit_once(char::is_whitespace)?;
    let value: i32 = value.trim_start_matches('+').parse().ok()?;
    Some((name.trim(), value))
}

/// Parse flat saving throw strings like `["Dex +7", "Con +16"]` into a
/// full six-entry grid.
///
/// When a listed bonus matches what proficiency (or proficiency plus
/// expertise) would derive from the ability score, the entry is marked
/// with those flags; any other value becomes a manual override so the
/// displayed number survives the conversion.
pub fn parse_saving_throw_strings(
    saving_throws: &[String],
    scores: &AbilityScores,
) -> Vec<SavingThrowEntry> {
    let mut entries: Vec<SavingThrowEntry> = crate::creature::Ability::all()
        .map(SavingThrowEntry::new)
        .to_vec();

    for segment in saving_throws.iter().flat_map(|s| s.split(',')) {
        let Some((name, value)) = parse_signed_suffix(segment) else {
            continue;
        };
        let Some(ability) = crate::creature::Ability::parse(name) else {
            continue;
        };
        let score = scores.get(ability) as i32;
        let entry = entries
            .iter_mut()
            .find(|e| e.ability == ability)
            .expect("grid covers every ability");
        if value == saving_throw_bonus(score, true, false, DEFAULT_PROFICIENCY_BONUS) {
            entry.proficient = true;
        } else if value == saving_throw_bonus(score, true, true, DEFAULT_PROFICIENCY_BONUS) {
            entry.proficient = true;
            entry.expertise = true;
        } else {
            entry.overridden = true;
            entry.override_value = Some(value);
        }
    }
    entries
}

/// Format the saving throw grid into flat display strings. Only entries
/// that are proficient, expert, or overridden appear.
pub fn format_saving_throw_strings(
    entries: &[SavingThrowEntry],
    scores: &AbilityScores,
) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.proficient || e.expertise || e.overridden)
        .map(|e| {
            format!(
                "{} {}",
                e.ability.abbreviation(),
                format_modifier(e.bonus(scores))
            )
        })
        .collect()
}

/// Parse flat skill strings like `["Perception +16", "Stealth +7"]` into a
/// full eighteen-entry grid, using the same flag-or-override strategy as
/// the saving throw parser.
pub fn parse_skill_strings(skills: &[String], scores: &AbilityScores) -> Vec<SkillEntry> {
    let mut entries: Vec<SkillEntry> = crate::creature::Skill::all().map(SkillEntry::new).to_vec();

    for segment in skills.iter().flat_map(|s| s.split(',')) {
        let Some((name, value)) = parse_signed_suffix(segment) else {
            continue;
        };
        let Some(skill) = crate::creature::Skill::parse(name) else {
            continue;
        };
        let score = scores.get(skill.ability()) as i32;
        let entry = entries
            .iter_mut()
            .find(|e| e.skill == skill)
            .expect("grid covers every skill");
        if value == skill_bonus(score, true, false, DEFAULT_PROFICIENCY_BONUS) {
            entry.proficient = true;
        } else if value == skill_bonus(score, true, true, DEFAULT_PROFICIENCY_BONUS) {
            entry.proficient = true;
            entry.expertise = true;
        } else {
            entry.overridden = true;
            entry.override_value = Some(value);
        }
    }
    entries
}

/// Format the skill grid into flat display strings.
pub fn format_skill_strings(entries: &[SkillEntry], scores: &AbilityScores) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.proficient || e.expertise || e.overridden)
        .map(|e| format!("{} {}", e.skill.name(), format_modifier(e.bonus(scores))))
        .collect()
}
