//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: profile and daily goals
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER PROFILE
        -- Biometrics and fitness goal of the (single) local user
        -- ============================================
        CREATE TABLE user_profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            sex TEXT NOT NULL CHECK(sex IN ('male', 'female', 'other')),
            age_years INTEGER NOT NULL,
            height_cm REAL NOT NULL,
            weight_kg REAL NOT NULL,
            activity_level TEXT NOT NULL
                CHECK(activity_level IN ('sedentary', 'light', 'moderate', 'active', 'very_active')),
            fitness_goal TEXT NOT NULL
                CHECK(fitness_goal IN ('maintain', 'lose_fat', 'build_muscle')),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- DAILY GOALS
        -- Calculated from the profile, or entered manually
        -- ============================================
        CREATE TABLE daily_goals (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            calorie_goal INTEGER NOT NULL,
            protein_goal INTEGER NOT NULL,       -- grams
            carbs_goal INTEGER NOT NULL,         -- grams
            fats_goal INTEGER NOT NULL,          -- grams
            source TEXT NOT NULL CHECK(source IN ('calculated', 'manual')) DEFAULT 'calculated',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version (0 for an empty database)
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_single_row_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let second = conn.execute(
            "INSERT INTO daily_goals (id, calorie_goal, protein_goal, carbs_goal, fats_goal)
             VALUES (2, 2000, 100, 200, 60)",
            [],
        );
        assert!(second.is_err());
    }
}
