//! Onboarding Tools
//!
//! First-run setup: validate the profile, calculate targets, store both.

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{DailyGoals, GoalSource, UserProfile};
use crate::nutrition::{
    compute_breakdown, ActivityLevel, FitnessGoal, Profile, Sex, TargetBreakdown,
};

use super::{WorkflowError, WorkflowResult};

/// Raw profile fields as entered by the user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub sex: String,
    pub age_years: Option<i64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

/// Response for complete_onboarding
#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub profile: UserProfile,
    pub goals: DailyGoals,
    pub breakdown: TargetBreakdown,
}

/// Response for onboarding_status
#[derive(Debug, Serialize)]
pub struct OnboardingStatusResponse {
    pub has_profile: bool,
    pub has_goals: bool,
}

// ============================================================================
// Validation
// ============================================================================

pub(crate) fn validate_age(age: Option<i64>) -> WorkflowResult<u32> {
    let age = age.ok_or_else(|| WorkflowError::invalid("age_years", "is required"))?;
    if age <= 0 {
        return Err(WorkflowError::invalid("age_years", format!("must be positive, got {}", age)));
    }
    u32::try_from(age)
        .map_err(|_| WorkflowError::invalid("age_years", format!("{} is out of range", age)))
}

pub(crate) fn validate_measurement(field: &'static str, value: Option<f64>) -> WorkflowResult<f64> {
    let value = value.ok_or_else(|| WorkflowError::invalid(field, "is required"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(WorkflowError::invalid(
            field,
            format!("must be a positive number, got {}", value),
        ));
    }
    Ok(value)
}

/// Turn raw input into a calculator profile.
///
/// Measurements must be present and positive. The enumerations never fail:
/// unknown strings take their fallback values.
pub fn build_profile(input: &ProfileInput) -> WorkflowResult<Profile> {
    if input.sex.trim().is_empty() {
        return Err(WorkflowError::invalid("sex", "is required"));
    }

    let activity_level = input
        .activity_level
        .as_deref()
        .map(ActivityLevel::from_str)
        .unwrap_or_default();
    let goal = input.goal.as_deref().map(FitnessGoal::from_str).unwrap_or_default();

    Ok(Profile {
        sex: Sex::from_str(&input.sex),
        age_years: validate_age(input.age_years)?,
        height_cm: validate_measurement("height_cm", input.height_cm)?,
        weight_kg: validate_measurement("weight_kg", input.weight_kg)?,
        activity_level,
        goal,
    })
}

/// Log targets that no one should eat to. They are still stored as computed.
pub(crate) fn warn_if_implausible(breakdown: &TargetBreakdown) {
    if breakdown.targets.calories <= 0 {
        tracing::warn!(
            calories = breakdown.targets.calories,
            bmr = breakdown.bmr,
            "Calculated calorie target is not positive"
        );
    }
}

// ============================================================================
// Tools
// ============================================================================

/// Compute targets without storing anything
pub fn preview_targets(input: &ProfileInput) -> WorkflowResult<TargetBreakdown> {
    let profile = build_profile(input)?;
    Ok(compute_breakdown(&profile))
}

/// Store the profile and its calculated goals
pub fn complete_onboarding(
    db: &Database,
    input: &ProfileInput,
) -> WorkflowResult<OnboardingResponse> {
    let profile = build_profile(input)?;
    let breakdown = compute_breakdown(&profile);
    warn_if_implausible(&breakdown);

    let (profile, goals) = db.with_transaction(|tx| {
        let stored = UserProfile::upsert(tx, &profile)?;
        let goals = DailyGoals::upsert(tx, &breakdown.targets, GoalSource::Calculated)?;
        Ok((stored, goals))
    })?;

    tracing::info!(
        goal = profile.fitness_goal.as_str(),
        calories = goals.calorie_goal,
        "Onboarding complete"
    );

    Ok(OnboardingResponse {
        profile,
        goals,
        breakdown,
    })
}

/// Whether onboarding still has to run
pub fn onboarding_status(db: &Database) -> WorkflowResult<OnboardingStatusResponse> {
    let conn = db.get_conn()?;
    Ok(OnboardingStatusResponse {
        has_profile: UserProfile::exists(&conn)?,
        has_goals: DailyGoals::get(&conn)?.is_some(),
    })
}

pub fn get_profile(db: &Database) -> WorkflowResult<Option<UserProfile>> {
    let conn = db.get_conn()?;
    Ok(UserProfile::get(&conn)?)
}
