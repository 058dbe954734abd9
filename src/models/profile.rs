//! User profile model
//!
//! The biometrics and fitness goal the targets are calculated from.
//! Single row table: there is one local user.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{ActivityLevel, FitnessGoal, Profile, Sex};

/// Stored user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub sex: Sex,
    pub age_years: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub fitness_goal: FitnessGoal,
    pub created_at: String,
    pub updated_at: String,
}

impl UserProfile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex: String = row.get("sex")?;
        let activity_level: String = row.get("activity_level")?;
        let fitness_goal: String = row.get("fitness_goal")?;

        Ok(Self {
            sex: Sex::from_str(&sex),
            age_years: row.get("age_years")?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            activity_level: ActivityLevel::from_str(&activity_level),
            fitness_goal: FitnessGoal::from_str(&fitness_goal),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The calculator input for this profile
    pub fn to_profile(&self) -> Profile {
        Profile {
            sex: self.sex,
            age_years: self.age_years,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            activity_level: self.activity_level,
            goal: self.fitness_goal,
        }
    }

    /// Get the profile, if onboarding has happened
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profile WHERE id = 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(conn: &Connection) -> DbResult<bool> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM user_profile WHERE id = 1", [], |row| {
                row.get(0)
            })?;
        Ok(count > 0)
    }

    /// Set or update the profile (upsert)
    pub fn upsert(conn: &Connection, profile: &Profile) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_profile
                (id, sex, age_years, height_cm, weight_kg, activity_level, fitness_goal)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                sex = excluded.sex,
                age_years = excluded.age_years,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level = excluded.activity_level,
                fitness_goal = excluded.fitness_goal,
                updated_at = datetime('now')
            "#,
            params![
                profile.sex.as_str(),
                profile.age_years,
                profile.height_cm,
                profile.weight_kg,
                profile.activity_level.as_str(),
                profile.goal.as_str(),
            ],
        )?;

        Self::get(conn)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}
