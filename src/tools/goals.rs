//! Goal Tools
//!
//! Editing the profile (which recalculates goals) and manual goal overrides.

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{DailyGoals, GoalSource, UserProfile};
use crate::nutrition::{
    compute_breakdown, ActivityLevel, FitnessGoal, NutritionTargets, Profile, Sex,
    TargetBreakdown,
};

use super::onboarding::{validate_age, validate_measurement, warn_if_implausible};
use super::{WorkflowError, WorkflowResult};

/// Partial profile changes. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub sex: Option<String>,
    pub age_years: Option<i64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

/// Manually entered goals
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ManualGoals {
    pub calorie_goal: i64,
    pub protein_goal: i64,
    pub carbs_goal: i64,
    pub fats_goal: i64,
}

/// Response for update_profile and recalculate_goals
#[derive(Debug, Serialize)]
pub struct RecalculatedGoalsResponse {
    pub profile: UserProfile,
    pub goals: DailyGoals,
    pub breakdown: TargetBreakdown,
    /// Goals stored before this call, if any
    pub previous_goals: Option<NutritionTargets>,
}

fn apply_changes(current: &Profile, changes: &ProfileChanges) -> WorkflowResult<Profile> {
    let mut profile = current.clone();

    if let Some(ref sex) = changes.sex {
        profile.sex = Sex::from_str(sex);
    }
    if changes.age_years.is_some() {
        profile.age_years = validate_age(changes.age_years)?;
    }
    if changes.height_cm.is_some() {
        profile.height_cm = validate_measurement("height_cm", changes.height_cm)?;
    }
    if changes.weight_kg.is_some() {
        profile.weight_kg = validate_measurement("weight_kg", changes.weight_kg)?;
    }
    if let Some(ref level) = changes.activity_level {
        profile.activity_level = ActivityLevel::from_str(level);
    }
    if let Some(ref goal) = changes.goal {
        profile.goal = FitnessGoal::from_str(goal);
    }

    Ok(profile)
}

/// Store a profile and the goals calculated from it
fn store_recalculated(
    db: &Database,
    profile: &Profile,
) -> WorkflowResult<RecalculatedGoalsResponse> {
    let breakdown = compute_breakdown(profile);
    warn_if_implausible(&breakdown);

    let (stored, goals, previous_goals) = db.with_transaction(|tx| {
        let previous = DailyGoals::get(tx)?.map(|g| g.targets());
        let stored = UserProfile::upsert(tx, profile)?;
        let goals = DailyGoals::upsert(tx, &breakdown.targets, GoalSource::Calculated)?;
        Ok((stored, goals, previous))
    })?;

    tracing::info!(
        goal = stored.fitness_goal.as_str(),
        activity = stored.activity_level.as_str(),
        calories = goals.calorie_goal,
        "Recalculated daily goals"
    );

    Ok(RecalculatedGoalsResponse {
        profile: stored,
        goals,
        breakdown,
        previous_goals,
    })
}

fn stored_profile(db: &Database) -> WorkflowResult<Profile> {
    let conn = db.get_conn()?;
    UserProfile::get(&conn)?
        .map(|p| p.to_profile())
        .ok_or(WorkflowError::ProfileNotFound)
}

// ============================================================================
// Tools
// ============================================================================

pub fn get_goals(db: &Database) -> WorkflowResult<Option<DailyGoals>> {
    let conn = db.get_conn()?;
    Ok(DailyGoals::get(&conn)?)
}

/// Change profile fields and recalculate goals from the result
pub fn update_profile(
    db: &Database,
    changes: &ProfileChanges,
) -> WorkflowResult<RecalculatedGoalsResponse> {
    let current = stored_profile(db)?;
    let updated = apply_changes(&current, changes)?;
    store_recalculated(db, &updated)
}

/// Recalculate goals from the stored profile, replacing any manual goals
pub fn recalculate_goals(db: &Database) -> WorkflowResult<RecalculatedGoalsResponse> {
    let profile = stored_profile(db)?;
    store_recalculated(db, &profile)
}

/// Override the goals by hand
pub fn set_goals(db: &Database, goals: &ManualGoals) -> WorkflowResult<DailyGoals> {
    let fields = [
        ("calorie_goal", goals.calorie_goal),
        ("protein_goal", goals.protein_goal),
        ("carbs_goal", goals.carbs_goal),
        ("fats_goal", goals.fats_goal),
    ];
    for (field, value) in fields {
        if value < 0 {
            return Err(WorkflowError::invalid(
                field,
                format!("must not be negative, got {}", value),
            ));
        }
    }

    let targets = NutritionTargets {
        calories: goals.calorie_goal,
        protein_grams: goals.protein_goal,
        carbs_grams: goals.carbs_goal,
        fats_grams: goals.fats_goal,
    };

    let conn = db.get_conn()?;
    let stored = DailyGoals::upsert(&conn, &targets, GoalSource::Manual)?;
    tracing::info!(calories = stored.calorie_goal, "Daily goals set manually");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::onboarding::{complete_onboarding, ProfileInput};
    use crate::tools::test_db;

    fn onboard(db: &Database) {
        let input = ProfileInput {
            sex: "male".into(),
            age_years: Some(25),
            height_cm: Some(170.0),
            weight_kg: Some(70.0),
            activity_level: Some("sedentary".into()),
            goal: Some("maintain".into()),
        };
        complete_onboarding(db, &input).unwrap();
    }

    #[test]
    fn test_update_requires_profile() {
        let db = test_db();
        let err = update_profile(&db, &ProfileChanges::default()).unwrap_err();
        assert!(matches!(err, WorkflowError::ProfileNotFound));
        assert!(matches!(recalculate_goals(&db), Err(WorkflowError::ProfileNotFound)));
    }

    #[test]
    fn test_changing_goal_recalculates() {
        let db = test_db();
        onboard(&db);

        let changes = ProfileChanges {
            goal: Some("lose_fat".into()),
            ..Default::default()
        };
        let response = update_profile(&db, &changes).unwrap();
        assert_eq!(response.previous_goals.map(|g| g.calories), Some(1971));
        assert_eq!(response.goals.calorie_goal, 1471);
        assert_eq!(response.goals.fats_goal, 49);
        assert_eq!(response.profile.fitness_goal, FitnessGoal::LoseFat);
        // Untouched fields survive
        assert_eq!(response.profile.weight_kg, 70.0);
    }

    #[test]
    fn test_invalid_change_leaves_store_alone() {
        let db = test_db();
        onboard(&db);

        let changes = ProfileChanges {
            weight_kg: Some(-5.0),
            ..Default::default()
        };
        assert!(update_profile(&db, &changes).is_err());
        assert_eq!(get_goals(&db).unwrap().unwrap().calorie_goal, 1971);
    }

    #[test]
    fn test_manual_goals_until_recalculated() {
        let db = test_db();
        onboard(&db);

        let manual = ManualGoals {
            calorie_goal: 2400,
            protein_goal: 180,
            carbs_goal: 250,
            fats_goal: 75,
        };
        let stored = set_goals(&db, &manual).unwrap();
        assert_eq!(stored.source, GoalSource::Manual);
        assert_eq!(get_goals(&db).unwrap().unwrap().calorie_goal, 2400);

        let response = recalculate_goals(&db).unwrap();
        assert_eq!(response.previous_goals.map(|g| g.calories), Some(2400));
        assert_eq!(response.goals.calorie_goal, 1971);
        assert_eq!(response.goals.source, GoalSource::Calculated);
    }

    #[test]
    fn test_negative_manual_goal_rejected() {
        let db = test_db();
        let manual = ManualGoals {
            calorie_goal: 2000,
            protein_goal: -1,
            carbs_goal: 250,
            fats_goal: 75,
        };
        let err = set_goals(&db, &manual).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidField { field: "protein_goal", .. }));
        assert!(get_goals(&db).unwrap().is_none());
    }
}
