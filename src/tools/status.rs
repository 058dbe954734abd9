//! CaloriTrack Status Tool
//!
//! Runtime status of the service, plus the usage guide handed to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// How to use the target tools, for AI assistants
pub const TARGET_INSTRUCTIONS: &str = r#"
# CaloriTrack Instructions

## First run

1. Call `onboarding_status`. If `has_profile` is false, collect:
   - sex: male, female or other
   - age_years (whole years), height_cm, weight_kg
   - activity_level: sedentary, light, moderate, active, very_active
   - goal: maintain, lose_fat, build_muscle
2. Call `complete_onboarding`. It stores the profile and the calculated goals.

Use `preview_targets` to show numbers without saving anything.

## How targets are calculated

- BMR (Mifflin-St Jeor): 10 x kg + 6.25 x cm - 5 x age, then +5 for men, -161 otherwise
- TDEE = BMR x activity multiplier (1.2 / 1.375 / 1.55 / 1.725 / 1.9)
- maintain: +0 kcal, 25% protein / 45% carbs / 30% fat
- lose_fat: -500 kcal, 35% / 35% / 30%
- build_muscle: +300 kcal, 30% / 45% / 25%
- grams = calories x share / 4 (protein, carbs) or / 9 (fat)

An unrecognised activity level is treated as sedentary; an unrecognised goal as maintain.
Targets are not clamped. Very small or light profiles on lose_fat can produce
low or negative numbers; tell the user instead of adjusting them.

## Changing goals

- `update_profile` with only the fields that changed (e.g. new weight or goal).
  Goals are recalculated.
- `set_goals` stores goals typed in by the user. They stay until the next
  `update_profile` or `recalculate_goals`.

## Daily progress

Call `daily_progress` with the meals eaten that day (calories required,
protein/carbs/fats optional). Without stored goals a 2000 kcal goal is used.
"#;

/// Runtime status of the service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information for the status tool
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/caloritrack.db"));
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_instructions_mention_every_goal() {
        for goal in ["maintain", "lose_fat", "build_muscle"] {
            assert!(TARGET_INSTRUCTIONS.contains(goal));
        }
    }
}
