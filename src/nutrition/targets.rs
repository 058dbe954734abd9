//! Daily nutrition target calculator
//!
//! Maps a biometric profile and fitness goal to a calorie target and a
//! protein/carbs/fats split:
//!
//! 1. BMR via Mifflin-St Jeor (1990)
//! 2. TDEE = BMR x activity multiplier
//! 3. Goal adjustment (+0 / -500 / +300 kcal) and macro ratios
//! 4. Grams per macro at 4 / 4 / 9 kcal per gram
//!
//! The calculation is total: implausible inputs (negative weight, tiny bodies
//! on a deficit) produce implausible outputs, including negative calories.
//! Range checks belong to whoever builds the [`Profile`].

use serde::{Deserialize, Serialize};

/// Calories per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Calories per gram of carbohydrate
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Calories per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Mifflin-St Jeor constant for men
const MSJ_MALE_OFFSET: f64 = 5.0;
/// Mifflin-St Jeor constant for women (and everyone else)
const MSJ_FEMALE_OFFSET: f64 = -161.0;

/// Biological sex as used by the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    /// Uses the female constant
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }

    /// Parse from string; anything unrecognised is `Other`
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Sex::Male,
            "female" | "f" => Sex::Female,
            _ => Sex::Other,
        }
    }

    fn bmr_offset(&self) -> f64 {
        match self {
            Sex::Male => MSJ_MALE_OFFSET,
            Sex::Female | Sex::Other => MSJ_FEMALE_OFFSET,
        }
    }
}

/// Activity level for the TDEE multiplier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Exercise 1-3 days/week
    Light,
    /// Exercise 3-5 days/week
    Moderate,
    /// Exercise 6-7 days/week
    Active,
    /// Intense daily exercise
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Parse from string. Unknown or empty values fall back to `Sedentary`.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// What the user is trying to do with their weight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    #[default]
    Maintain,
    LoseFat,
    BuildMuscle,
}

impl FitnessGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::Maintain => "maintain",
            FitnessGoal::LoseFat => "lose_fat",
            FitnessGoal::BuildMuscle => "build_muscle",
        }
    }

    /// Parse from string. Unknown values get the maintenance plan.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "lose_fat" => FitnessGoal::LoseFat,
            "build_muscle" => FitnessGoal::BuildMuscle,
            _ => FitnessGoal::Maintain,
        }
    }
}

/// Calorie adjustment and macro split for a goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalPlan {
    /// Added to TDEE (kcal/day)
    pub calorie_adjustment: f64,
    /// Share of calories from protein
    pub protein_ratio: f64,
    /// Share of calories from carbohydrate
    pub carbs_ratio: f64,
    /// Share of calories from fat
    pub fats_ratio: f64,
}

impl GoalPlan {
    pub fn for_goal(goal: FitnessGoal) -> Self {
        match goal {
            FitnessGoal::Maintain => Self {
                calorie_adjustment: 0.0,
                protein_ratio: 0.25,
                carbs_ratio: 0.45,
                fats_ratio: 0.30,
            },
            // 500 kcal deficit, protein up to hold on to muscle
            FitnessGoal::LoseFat => Self {
                calorie_adjustment: -500.0,
                protein_ratio: 0.35,
                carbs_ratio: 0.35,
                fats_ratio: 0.30,
            },
            // 300 kcal surplus
            FitnessGoal::BuildMuscle => Self {
                calorie_adjustment: 300.0,
                protein_ratio: 0.30,
                carbs_ratio: 0.45,
                fats_ratio: 0.25,
            },
        }
    }
}

/// Input to the calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: FitnessGoal,
}

/// Daily calorie and macro targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: i64,
    pub protein_grams: i64,
    pub carbs_grams: i64,
    pub fats_grams: i64,
}

impl NutritionTargets {
    /// Calories implied by the gram targets.
    ///
    /// Each macro is rounded on its own, so this drifts a few kcal from
    /// `calories`.
    pub fn macro_calories(&self) -> i64 {
        self.protein_grams * KCAL_PER_G_PROTEIN as i64
            + self.carbs_grams * KCAL_PER_G_CARBS as i64
            + self.fats_grams * KCAL_PER_G_FAT as i64
    }
}

/// Intermediate values of one calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetBreakdown {
    pub bmr: f64,
    pub tdee: f64,
    /// TDEE plus the goal adjustment, before rounding
    pub target_calories: f64,
    pub plan: GoalPlan,
    pub targets: NutritionTargets,
}

/// Basal metabolic rate (kcal/day), Mifflin-St Jeor
pub fn bmr(profile: &Profile) -> f64 {
    10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age_years)
        + profile.sex.bmr_offset()
}

/// Total daily energy expenditure (kcal/day)
pub fn tdee(profile: &Profile) -> f64 {
    bmr(profile) * profile.activity_level.multiplier()
}

/// Compute daily targets for a profile
pub fn compute(profile: &Profile) -> NutritionTargets {
    compute_breakdown(profile).targets
}

/// Compute daily targets along with BMR, TDEE and the goal plan used
pub fn compute_breakdown(profile: &Profile) -> TargetBreakdown {
    let bmr = bmr(profile);
    let tdee = tdee(profile);
    let plan = GoalPlan::for_goal(profile.goal);
    let target_calories = tdee + plan.calorie_adjustment;

    let targets = NutritionTargets {
        calories: round_half_up(target_calories),
        protein_grams: round_half_up(target_calories * plan.protein_ratio / KCAL_PER_G_PROTEIN),
        carbs_grams: round_half_up(target_calories * plan.carbs_ratio / KCAL_PER_G_CARBS),
        fats_grams: round_half_up(target_calories * plan.fats_ratio / KCAL_PER_G_FAT),
    };

    TargetBreakdown {
        bmr,
        tdee,
        target_calories,
        plan,
        targets,
    }
}

/// Nearest integer, halves toward positive infinity (-2.5 -> -2).
///
/// `f64::round` rounds halves away from zero, which differs for negatives.
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_profile() -> Profile {
        Profile {
            sex: Sex::Male,
            age_years: 25,
            height_cm: 170.0,
            weight_kg: 70.0,
            activity_level: ActivityLevel::Sedentary,
            goal: FitnessGoal::Maintain,
        }
    }

    #[test]
    fn test_maintain_reference_values() {
        let breakdown = compute_breakdown(&reference_profile());
        assert!((breakdown.bmr - 1642.5).abs() < 1e-9);
        assert!((breakdown.tdee - 1971.0).abs() < 1e-9);

        assert_eq!(
            breakdown.targets,
            NutritionTargets {
                calories: 1971,
                protein_grams: 123,
                carbs_grams: 222,
                fats_grams: 66,
            }
        );
    }

    #[test]
    fn test_lose_fat_reference_values() {
        let profile = Profile {
            goal: FitnessGoal::LoseFat,
            ..reference_profile()
        };
        assert_eq!(
            compute(&profile),
            NutritionTargets {
                calories: 1471,
                protein_grams: 129,
                carbs_grams: 129,
                fats_grams: 49,
            }
        );
    }

    #[test]
    fn test_build_muscle_adds_surplus() {
        let profile = Profile {
            goal: FitnessGoal::BuildMuscle,
            ..reference_profile()
        };
        let targets = compute(&profile);
        // 1971 + 300
        assert_eq!(targets.calories, 2271);
        // 2271 * 0.30 / 4 = 170.325
        assert_eq!(targets.protein_grams, 170);
        // 2271 * 0.45 / 4 = 255.49
        assert_eq!(targets.carbs_grams, 255);
        // 2271 * 0.25 / 9 = 63.08
        assert_eq!(targets.fats_grams, 63);
    }

    #[test]
    fn test_female_bmr_offset() {
        let male = reference_profile();
        let female = Profile {
            sex: Sex::Female,
            ..reference_profile()
        };
        assert!((bmr(&male) - bmr(&female) - 166.0).abs() < 1e-9);
    }

    #[test]
    fn test_other_sex_matches_female() {
        let female = Profile {
            sex: Sex::Female,
            ..reference_profile()
        };
        let other = Profile {
            sex: Sex::Other,
            ..reference_profile()
        };
        assert_eq!(compute(&female), compute(&other));
    }

    #[test]
    fn test_weight_increases_calories() {
        let mut previous = compute_breakdown(&reference_profile());
        for weight in [71.0, 80.0, 95.5, 120.0] {
            let profile = Profile {
                weight_kg: weight,
                ..reference_profile()
            };
            let current = compute_breakdown(&profile);
            assert!(current.bmr > previous.bmr);
            assert!(current.targets.calories > previous.targets.calories);
            previous = current;
        }
    }

    #[test]
    fn test_compute_is_idempotent() {
        let profile = Profile {
            sex: Sex::Female,
            age_years: 41,
            height_cm: 163.7,
            weight_kg: 58.3,
            activity_level: ActivityLevel::Moderate,
            goal: FitnessGoal::LoseFat,
        };
        let first = compute_breakdown(&profile);
        let second = compute_breakdown(&profile);
        assert_eq!(first.targets, second.targets);
        assert_eq!(first.target_calories.to_bits(), second.target_calories.to_bits());
    }

    #[test]
    fn test_unknown_activity_falls_back_to_sedentary() {
        let parsed = ActivityLevel::from_str("couch_potato");
        assert_eq!(parsed, ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_str(""), ActivityLevel::Sedentary);

        let fallback = Profile {
            activity_level: parsed,
            ..reference_profile()
        };
        assert_eq!(compute(&fallback), compute(&reference_profile()));
    }

    #[test]
    fn test_activity_multipliers() {
        let expected = [
            ("sedentary", 1.2),
            ("light", 1.375),
            ("moderate", 1.55),
            ("active", 1.725),
            ("very_active", 1.9),
        ];
        for (name, multiplier) in expected {
            let level = ActivityLevel::from_str(name);
            assert_eq!(level.as_str(), name);
            assert_eq!(level.multiplier(), multiplier);
        }
        assert_eq!(ActivityLevel::from_str("Very Active"), ActivityLevel::VeryActive);
    }

    #[test]
    fn test_goal_parsing() {
        assert_eq!(FitnessGoal::from_str("lose_fat"), FitnessGoal::LoseFat);
        assert_eq!(FitnessGoal::from_str("BUILD_MUSCLE"), FitnessGoal::BuildMuscle);
        assert_eq!(FitnessGoal::from_str("bulk"), FitnessGoal::Maintain);
    }

    #[test]
    fn test_goal_ratios_sum_to_one() {
        for goal in [FitnessGoal::Maintain, FitnessGoal::LoseFat, FitnessGoal::BuildMuscle] {
            let plan = GoalPlan::for_goal(goal);
            let total = plan.protein_ratio + plan.carbs_ratio + plan.fats_ratio;
            assert!((total - 1.0).abs() < 1e-9, "{:?}", goal);
        }
    }

    #[test]
    fn test_macro_calories_close_to_target() {
        for goal in [FitnessGoal::Maintain, FitnessGoal::LoseFat, FitnessGoal::BuildMuscle] {
            let profile = Profile {
                goal,
                activity_level: ActivityLevel::Active,
                ..reference_profile()
            };
            let targets = compute(&profile);
            // Worst case drift: 0.5 g off on each macro
            assert!((targets.macro_calories() - targets.calories).abs() <= 9);
        }
    }

    #[test]
    fn test_extreme_inputs_are_not_clamped() {
        let profile = Profile {
            sex: Sex::Female,
            age_years: 90,
            height_cm: 50.0,
            weight_kg: 10.0,
            activity_level: ActivityLevel::Sedentary,
            goal: FitnessGoal::LoseFat,
        };
        let breakdown = compute_breakdown(&profile);
        // bmr = 100 + 312.5 - 450 - 161 = -198.5
        assert!((breakdown.bmr + 198.5).abs() < 1e-9);
        assert!(breakdown.targets.calories < 0);
        assert!(breakdown.targets.protein_grams < 0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(0.0), 0);
        assert_eq!(round_half_up(0.49999999999999994), 0);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(4503599627370497.0), 4503599627370497);
    }

    #[test]
    fn test_profile_serde_defaults() {
        let json = r#"{"sex":"female","age_years":30,"height_cm":165.0,"weight_kg":60.0}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.activity_level, ActivityLevel::Sedentary);
        assert_eq!(profile.goal, FitnessGoal::Maintain);

        let out = serde_json::to_value(ActivityLevel::VeryActive).unwrap();
        assert_eq!(out, "very_active");
    }
}
