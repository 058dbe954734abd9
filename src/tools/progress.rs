//! Daily Progress Tool
//!
//! Compares a day's meals with the stored goals.

use chrono::{Local, NaiveDate};

use crate::db::Database;
use crate::models::DailyGoals;
use crate::nutrition::{daily_progress, DailyProgress, GoalValues, GoalsSource, MealMacros};

use super::{WorkflowError, WorkflowResult};

/// Progress for `date` (today when `None`) against the stored goals.
///
/// Without stored goals the default 2000 kcal goal applies.
pub fn get_daily_progress(
    db: &Database,
    date: Option<&str>,
    meals: &[MealMacros],
) -> WorkflowResult<DailyProgress> {
    let date = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| WorkflowError::invalid("date", format!("expected YYYY-MM-DD: {}", e)))?,
        None => Local::now().date_naive(),
    };

    if let Some(meal) = meals.iter().find(|m| !m.calories.is_finite()) {
        return Err(WorkflowError::invalid(
            "meals",
            format!(
                "calories must be a number for {}",
                meal.name.as_deref().unwrap_or("unnamed meal")
            ),
        ));
    }

    let conn = db.get_conn()?;
    let (goals, source) = match DailyGoals::get(&conn)? {
        Some(goals) => (goals.goal_values(), GoalsSource::from(goals.source)),
        None => (GoalValues::default(), GoalsSource::Default),
    };

    let progress = daily_progress(&date.format("%Y-%m-%d").to_string(), meals, goals, source);
    tracing::debug!(
        date = %progress.date,
        consumed = progress.consumed.calories,
        goal = progress.goals.calories,
        "Computed daily progress"
    );
    Ok(progress)
}
