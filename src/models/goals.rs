//! Daily goals model
//!
//! Calorie and macro goals, written by the calculator or by hand.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{GoalValues, GoalsSource, NutritionTargets, DEFAULT_CALORIE_GOAL};

/// Who set the goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalSource {
    Calculated,
    Manual,
}

impl GoalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalSource::Calculated => "calculated",
            GoalSource::Manual => "manual",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "manual" => GoalSource::Manual,
            _ => GoalSource::Calculated,
        }
    }
}

impl From<GoalSource> for GoalsSource {
    fn from(source: GoalSource) -> Self {
        match source {
            GoalSource::Calculated => GoalsSource::Calculated,
            GoalSource::Manual => GoalsSource::Manual,
        }
    }
}

/// Stored daily goals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyGoals {
    pub calorie_goal: i64,
    pub protein_goal: i64, // grams
    pub carbs_goal: i64,   // grams
    pub fats_goal: i64,    // grams
    pub source: GoalSource,
    pub created_at: String,
    pub updated_at: String,
}

impl DailyGoals {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let source: String = row.get("source")?;
        Ok(Self {
            calorie_goal: row.get("calorie_goal")?,
            protein_goal: row.get("protein_goal")?,
            carbs_goal: row.get("carbs_goal")?,
            fats_goal: row.get("fats_goal")?,
            source: GoalSource::from_str(&source),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn targets(&self) -> NutritionTargets {
        NutritionTargets {
            calories: self.calorie_goal,
            protein_grams: self.protein_goal,
            carbs_grams: self.carbs_goal,
            fats_grams: self.fats_goal,
        }
    }

    /// Goal values for progress tracking
    /// Goal values for progress. A stored calorie goal of 0 means "unset" and
    /// falls back to `DEFAULT_CALORIE_GOAL`.
    pub fn goal_values(&self) -> GoalValues {
        let calories = if self.calorie_goal == 0 {
            DEFAULT_CALORIE_GOAL
        } else {
            self.calorie_goal as f64
        };

        GoalValues {
            calories,
            protein: Some(self.protein_goal as f64),
            carbs: Some(self.carbs_goal as f64),
            fats: Some(self.fats_goal as f64),
        }
    }

    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_goals WHERE id = 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(goals) => Ok(Some(goals)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or replace the goals (upsert)
    pub fn upsert(
        conn: &Connection,
        targets: &NutritionTargets,
        source: GoalSource,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO daily_goals (id, calorie_goal, protein_goal, carbs_goal, fats_goal, source)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                calorie_goal = excluded.calorie_goal,
                protein_goal = excluded.protein_goal,
                carbs_goal = excluded.carbs_goal,
                fats_goal = excluded.fats_goal,
                source = excluded.source,
                updated_at = datetime('now')
            "#,
            params![
                targets.calories,
                targets.protein_grams,
                targets.carbs_grams,
                targets.fats_grams,
                source.as_str(),
            ],
        )?;

        Self::get(conn)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}
