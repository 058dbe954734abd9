//! CaloriTrack MCP Server Implementation
//!
//! Exposes the target, goal and progress workflows as MCP tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::nutrition::MealMacros;
use crate::tools::goals::{self, ManualGoals, ProfileChanges};
use crate::tools::onboarding::{self, ProfileInput};
use crate::tools::progress;
use crate::tools::status::StatusTracker;
use crate::tools::WorkflowError;

/// CaloriTrack MCP Service
#[derive(Clone)]
pub struct CaloriTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<CaloriTrackService>,
}

impl CaloriTrackService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn workflow_error(e: WorkflowError) -> McpError {
    if e.is_invalid_input() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        tracing::error!(error = %e, "Tool failed");
        McpError::internal_error(e.to_string(), None)
    }
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProfileParams {
    /// male, female or other (other uses the female formula)
    pub sex: String,
    /// Age in whole years
    pub age_years: Option<i64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// sedentary, light, moderate, active or very_active (default sedentary)
    pub activity_level: Option<String>,
    /// maintain, lose_fat or build_muscle (default maintain)
    pub goal: Option<String>,
}

impl From<ProfileParams> for ProfileInput {
    fn from(p: ProfileParams) -> Self {
        ProfileInput {
            sex: p.sex,
            age_years: p.age_years,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            activity_level: p.activity_level,
            goal: p.goal,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// New sex (optional)
    pub sex: Option<String>,
    /// New age in years (optional)
    pub age_years: Option<i64>,
    /// New height in cm (optional)
    pub height_cm: Option<f64>,
    /// New weight in kg (optional)
    pub weight_kg: Option<f64>,
    /// New activity level (optional)
    pub activity_level: Option<String>,
    /// New goal: maintain, lose_fat or build_muscle (optional)
    pub goal: Option<String>,
}

// ============================================================================
// Goal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetGoalsParams {
    /// Daily calories (kcal)
    pub calorie_goal: i64,
    /// Daily protein (g)
    pub protein_goal: i64,
    /// Daily carbohydrate (g)
    pub carbs_goal: i64,
    /// Daily fat (g)
    pub fats_goal: i64,
}

// ============================================================================
// Progress Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealParams {
    /// Meal name (optional, for reference)
    pub name: Option<String>,
    /// Calories (kcal)
    pub calories: f64,
    /// Protein in grams (optional)
    pub protein: Option<f64>,
    /// Carbohydrate in grams (optional)
    pub carbs: Option<f64>,
    /// Fat in grams (optional)
    pub fats: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyProgressParams {
    /// Date in ISO format: YYYY-MM-DD (default today)
    pub date: Option<String>,
    /// Meals eaten that day
    #[serde(default)]
    pub meals: Vec<MealParams>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl CaloriTrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the CaloriTrack service including build info, database status, and process information")]
    async fn caloritrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for onboarding, goal editing and daily progress. Call this when unsure how to use the CaloriTrack tools.")]
    fn target_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TARGET_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(TARGET_INSTRUCTIONS)]))
    }

    // --- Onboarding ---

    #[tool(description = "Calculate daily calorie and macro targets (with BMR and TDEE) for a profile without saving anything")]
    fn preview_targets(
        &self,
        Parameters(p): Parameters<ProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = onboarding::preview_targets(&p.into()).map_err(workflow_error)?;
        json_result(&result)
    }

    #[tool(description = "Save the user's profile and the daily goals calculated from it. Replaces any existing profile and goals.")]
    fn complete_onboarding(
        &self,
        Parameters(p): Parameters<ProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let result =
            onboarding::complete_onboarding(&self.database, &p.into()).map_err(workflow_error)?;
        json_result(&result)
    }

    #[tool(description = "Check whether a profile and daily goals have been stored")]
    fn onboarding_status(&self) -> Result<CallToolResult, McpError> {
        let result = onboarding::onboarding_status(&self.database).map_err(workflow_error)?;
        json_result(&result)
    }

    #[tool(description = "Get the stored user profile")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        match onboarding::get_profile(&self.database).map_err(workflow_error)? {
            Some(profile) => json_result(&profile),
            None => Ok(CallToolResult::success(vec![Content::text(
                r#"{"error": "No profile found; call complete_onboarding first"}"#,
            )])),
        }
    }

    // --- Goals ---

    #[tool(description = "Update profile fields (weight, goal, activity level, ...) and recalculate daily goals")]
    fn update_profile(
        &self,
        Parameters(p): Parameters<UpdateProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let changes = ProfileChanges {
            sex: p.sex,
            age_years: p.age_years,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            activity_level: p.activity_level,
            goal: p.goal,
        };
        let result = goals::update_profile(&self.database, &changes).map_err(workflow_error)?;
        json_result(&result)
    }

    #[tool(description = "Get the stored daily calorie and macro goals")]
    fn get_goals(&self) -> Result<CallToolResult, McpError> {
        match goals::get_goals(&self.database).map_err(workflow_error)? {
            Some(goals) => json_result(&goals),
            None => Ok(CallToolResult::success(vec![Content::text(
                r#"{"error": "No goals stored; call complete_onboarding or set_goals first"}"#,
            )])),
        }
    }

    #[tool(description = "Set daily goals manually. They are kept until the profile is updated or goals are recalculated.")]
    fn set_goals(
        &self,
        Parameters(p): Parameters<SetGoalsParams>,
    ) -> Result<CallToolResult, McpError> {
        let manual = ManualGoals {
            calorie_goal: p.calorie_goal,
            protein_goal: p.protein_goal,
            carbs_goal: p.carbs_goal,
            fats_goal: p.fats_goal,
        };
        let result = goals::set_goals(&self.database, &manual).map_err(workflow_error)?;
        json_result(&result)
    }

    #[tool(description = "Recalculate daily goals from the stored profile, replacing manual goals")]
    fn recalculate_goals(&self) -> Result<CallToolResult, McpError> {
        let result = goals::recalculate_goals(&self.database).map_err(workflow_error)?;
        json_result(&result)
    }

    // --- Progress ---

    #[tool(description = "Sum a day's meals and compare them with the daily goals (progress percent and calories remaining)")]
    fn daily_progress(
        &self,
        Parameters(p): Parameters<DailyProgressParams>,
    ) -> Result<CallToolResult, McpError> {
        let meals: Vec<MealMacros> = p
            .meals
            .into_iter()
            .map(|m| MealMacros {
                name: m.name,
                calories: m.calories,
                protein: m.protein,
                carbs: m.carbs,
                fats: m.fats,
            })
            .collect();
        let result = progress::get_daily_progress(&self.database, p.date.as_deref(), &meals)
            .map_err(workflow_error)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for CaloriTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "caloritrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("CaloriTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "CaloriTrack - daily calorie and macro targets from a biometric profile. \
                 Call target_instructions first. \
                 Onboarding: onboarding_status, preview_targets, complete_onboarding, get_profile. \
                 Goals: get_goals, update_profile, set_goals, recalculate_goals. \
                 Progress: daily_progress."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_db;

    fn json_of(result: &CallToolResult) -> serde_json::Value {
        let raw = serde_json::to_value(result).unwrap();
        let text = raw["content"][0]["text"].as_str().unwrap().to_string();
        serde_json::from_str(&text).unwrap()
    }

    fn profile_params() -> ProfileParams {
        ProfileParams {
            sex: "male".into(),
            age_years: Some(25),
            height_cm: Some(170.0),
            weight_kg: Some(70.0),
            activity_level: Some("sedentary".into()),
            goal: Some("maintain".into()),
        }
    }

    #[test]
    fn test_preview_targets_tool() {
        let service = CaloriTrackService::new(PathBuf::from(":memory:"), test_db());
        let result = service.preview_targets(Parameters(profile_params())).unwrap();
        let json = json_of(&result);
        assert_eq!(json["targets"]["calories"], 1971);
        assert_eq!(json["targets"]["carbs_grams"], 222);
    }

    #[test]
    fn test_invalid_profile_maps_to_invalid_params() {
        let service = CaloriTrackService::new(PathBuf::from(":memory:"), test_db());
        let params = ProfileParams {
            height_cm: None,
            ..profile_params()
        };
        let err = service.complete_onboarding(Parameters(params)).unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_onboarding_then_progress() {
        let service = CaloriTrackService::new(PathBuf::from(":memory:"), test_db());
        service.complete_onboarding(Parameters(profile_params())).unwrap();

        let params = DailyProgressParams {
            date: Some("2026-10-17".into()),
            meals: vec![MealParams {
                name: Some("Lunch".into()),
                calories: 971.0,
                protein: None,
                carbs: None,
                fats: None,
            }],
        };
        let result = service.daily_progress(Parameters(params)).unwrap();
        let json = json_of(&result);
        assert_eq!(json["calories_remaining"], 1000.0);
        assert_eq!(json["goals_source"], "calculated");
    }
}
