//! Core stat math for creature stat blocks.
//!
//! Every function here is pure and total: callers are expected to have
//! range-checked their inputs through the validation module, and anything
//! unrecognized (an unknown armor subtype, for example) normalizes to a
//! safe default instead of failing.

use crate::creature::{ArmorType, HitDie};

/// Default proficiency bonus applied to proficient saving throws and skills.
pub const DEFAULT_PROFICIENCY_BONUS: i32 = 2;

/// D&D 5e ability modifier: floor((score - 10) / 2).
///
/// Uses floor division so scores below 10 round toward negative infinity
/// (8-9 = -1, 6-7 = -2, and so on).
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Format a modifier with its sign, e.g. `+3` or `-1`.
pub fn format_modifier(n: i32) -> String {
    if n >= 0 {
        format!("+{n}")
    } else {
        n.to_string()
    }
}

/// Base AC granted by an armor subtype. Unknown subtypes fall back to 10.
pub fn armor_base_ac(subtype: &str) -> i32 {
    match subtype {
        "Unarmored" => 10,
        // Light armor
        "Padded" | "Leather" => 11,
        "Studded Leather" => 12,
        // Medium armor
        "Hide" => 12,
        "Chain Shirt" => 13,
        "Scale Mail" | "Breastplate" => 14,
        "Half Plate" => 15,
        // Heavy armor
        "Ring Mail" => 14,
        "Chain Mail" => 16,
        "Splint" => 17,
        "Plate" => 18,
        _ => 10,
    }
}

/// Compute armor class from armor, Dexterity, and shield inputs.
///
/// Natural armor always starts from base 10 (the flat bonus lives in
/// `armor_modifier`); worn armor looks its base up from the subtype table.
/// Dexterity applies in full for none/light/natural armor, is capped at +2
/// for medium armor, and is ignored for heavy armor. A shield adds 2 plus
/// its own magic modifier. `has_mage_armor` never changes the number; it
/// only matters for how the display layer annotates the result.
#[allow(clippy::too_many_arguments)]
pub fn armor_class(
    dex_score: i32,
    armor_type: ArmorType,
    armor_subtype: &str,
    armor_modifier: i32,
    has_shield: bool,
    shield_modifier: i32,
    _has_mage_armor: bool,
) -> i32 {
    let dex_mod = ability_modifier(dex_score);

    let base = if armor_type == ArmorType::NaturalArmor {
        10
    } else {
        armor_base_ac(armor_subtype)
    };

    let dex_contribution = match armor_type {
        ArmorType::None | ArmorType::LightArmor | ArmorType::NaturalArmor => dex_mod,
        ArmorType::MediumArmor => dex_mod.min(2),
        ArmorType::HeavyArmor => 0,
    };

    let mut ac = base + dex_contribution + armor_modifier;
    if has_shield {
        ac += 2 + shield_modifier;
    }

    ac.max(1)
}

/// Average hit points from hit dice and Constitution.
///
/// `floor(count * (faces + 1) / 2) + count * con_mod`, floored at 1.
pub fn hit_points(con_score: i32, hit_dice_count: u32, hit_die: HitDie) -> i32 {
    let con_mod = ability_modifier(con_score);
    let count = hit_dice_count as i32;
    let average_total = count * (hit_die.sides() as i32 + 1) / 2;
    (average_total + count * con_mod).max(1)
}

/// Format an HP display string like `60 (8d10+16)`.
pub fn format_hp(hp: i32, hit_dice_count: u32, hit_die: HitDie, con_modifier: i32) -> String {
    let total_modifier = format_modifier(con_modifier * hit_dice_count as i32);
    format!("{hp} ({hit_dice_count}{hit_die}{total_modifier})")
}

/// Saving throw bonus: ability modifier plus proficiency, plus proficiency
/// again for expertise.
///
/// Expertise is additive on top of proficiency and deliberately not gated
/// on it: an entry flagged expertise-without-proficiency still counts both
/// bonuses.
pub fn saving_throw_bonus(
    ability_score: i32,
    proficient: bool,
    expertise: bool,
    proficiency_bonus: i32,
) -> i32 {
    let mut bonus = ability_modifier(ability_score);
    if proficient {
        bonus += proficiency_bonus;
    }
    if expertise {
        bonus += proficiency_bonus;
    }
    bonus
}

/// Skill bonus. Identical formula to [`saving_throw_bonus`], keyed by the
/// skill's governing ability score.
pub fn skill_bonus(
    ability_score: i32,
    proficient: bool,
    expertise: bool,
    proficiency_bonus: i32,
) -> i32 {
    saving_throw_bonus(ability_score, proficient, expertise, proficiency_bonus)
}

/// Passive Perception: 10 + Wisdom modifier, plus proficiency when the
/// creature is proficient in Perception, plus proficiency again when it
/// also has expertise.
pub fn passive_perception(
    wis_score: i32,
    perception_proficient: bool,
    perception_expertise: bool,
    proficiency_bonus: i32,
) -> i32 {
    let mut passive = 10 + ability_modifier(wis_score);
    if perception_proficient {
        passive += proficiency_bonus;
        if perception_expertise {
            passive += proficiency_bonus;
        }
    }
    passive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ability_modifier() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(20), 5);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(7), -2);
        assert_eq!(ability_modifier(30), 10);
    }

    #[test]
    fn test_format_modifier() {
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(5), "+5");
        assert_eq!(format_modifier(-2), "-2");
    }

    #[test]
    fn test_armor_base_ac_table() {
        assert_eq!(armor_base_ac("Unarmored"), 10);
        assert_eq!(armor_base_ac("Studded Leather"), 12);
        assert_eq!(armor_base_ac("Half Plate"), 15);
        assert_eq!(armor_base_ac("Plate"), 18);
        // Unknown subtypes normalize to 10 rather than failing
        assert_eq!(armor_base_ac("Dragonhide"), 10);
    }

    #[test]
    fn test_heavy_armor_ignores_dex() {
        let ac = armor_class(14, ArmorType::HeavyArmor, "Chain Mail", 0, false, 0, false);
        assert_eq!(ac, 16);
    }

    #[test]
    fn test_medium_armor_caps_dex_at_two() {
        // Breastplate 14, Dex 16 capped at +2, +1 armor, shield +2
        let ac = armor_class(16, ArmorType::MediumArmor, "Breastplate", 1, true, 0, false);
        assert_eq!(ac, 19);
    }

    #[test]
    fn test_light_armor_full_dex() {
        let ac = armor_class(18, ArmorType::LightArmor, "Leather", 0, false, 0, false);
        assert_eq!(ac, 15);
    }

    #[test]
    fn test_natural_armor_base_ten() {
        let ac = armor_class(
            12,
            ArmorType::NaturalArmor,
            "thick scales",
            3,
            false,
            0,
            false,
        );
        assert_eq!(ac, 10 + 1 + 3);
    }

    #[test]
    fn test_shield_modifier_stacks() {
        let ac = armor_class(10, ArmorType::None, "Unarmored", 0, true, 1, false);
        assert_eq!(ac, 13);
    }

    #[test]
    fn test_mage_armor_does_not_change_result() {
        let without = armor_class(14, ArmorType::None, "Unarmored", 0, false, 0, false);
        let with = armor_class(14, ArmorType::None, "Unarmored", 0, false, 0, true);
        assert_eq!(without, with);
    }

    #[test]
    fn test_ac_floors_at_one() {
        let ac = armor_class(1, ArmorType::None, "Unarmored", -10, false, 0, false);
        assert_eq!(ac, 1);
    }

    #[test]
    fn test_hit_points_average_formula() {
        // floor(8 * 5.5) + 8 * 2 = 44 + 16 = 60
        assert_eq!(hit_points(14, 8, HitDie::D10), 60);
        // 1d8 with no CON bonus averages 4
        assert_eq!(hit_points(10, 1, HitDie::D8), 4);
    }

    #[test]
    fn test_hit_points_floor_at_one() {
        assert_eq!(hit_points(1, 1, HitDie::D4), 1);
    }

    #[test]
    fn test_format_hp() {
        assert_eq!(format_hp(60, 8, HitDie::D10, 2), "60 (8d10+16)");
        assert_eq!(format_hp(3, 1, HitDie::D6, -1), "3 (1d6-1)");
    }

    #[test]
    fn test_saving_throw_and_skill_bonus_agree() {
        for score in [1, 8, 10, 14, 20, 30] {
            for proficient in [false, true] {
                for expertise in [false, true] {
                    assert_eq!(
                        saving_throw_bonus(score, proficient, expertise, 2),
                        skill_bonus(score, proficient, expertise, 2),
                    );
                }
            }
        }
    }

    #[test]
    fn test_expertise_not_gated_on_proficiency() {
        // Expertise without proficiency still adds its bonus
        assert_eq!(saving_throw_bonus(10, false, true, 2), 2);
        assert_eq!(saving_throw_bonus(10, true, true, 2), 4);
    }

    #[test]
    fn test_passive_perception() {
        assert_eq!(passive_perception(10, false, false, 2), 10);
        assert_eq!(passive_perception(15, true, false, 2), 14);
        assert_eq!(passive_perception(15, true, true, 2), 16);
        // Expertise alone does nothing for the passive score
        assert_eq!(passive_perception(15, false, true, 2), 12);
    }
}
