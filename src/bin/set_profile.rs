//! Utility to set the user profile and recalculate daily goals
//!
//! Usage: set_profile <sex> <age_years> <height_cm> <weight_kg> [activity_level] [goal]

use caloritrack::tools::onboarding::{complete_onboarding, ProfileInput};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: set_profile <sex> <age_years> <height_cm> <weight_kg> [activity_level] [goal]";

fn parse_args(args: &[String]) -> Result<ProfileInput, String> {
    if args.len() < 4 {
        return Err(USAGE.to_string());
    }

    let number = |name: &str, s: &str| -> Result<f64, String> {
        s.parse::<f64>().map_err(|_| format!("{} must be a number, got '{}'", name, s))
    };
    let age = args[1]
        .parse::<i64>()
        .map_err(|_| format!("age_years must be a whole number, got '{}'", args[1]))?;

    Ok(ProfileInput {
        sex: args[0].clone(),
        age_years: Some(age),
        height_cm: Some(number("height_cm", &args[2])?),
        weight_kg: Some(number("weight_kg", &args[3])?),
        activity_level: args.get(4).cloned(),
        goal: args.get(5).cloned(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let directive = caloritrack::config::DEFAULT_LOG_DIRECTIVE.parse()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let input = parse_args(&args)?;

    let db_path = caloritrack::config::database_path();
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = caloritrack::db::Database::new(&db_path)?;
    database.with_conn(caloritrack::db::migrations::run_migrations)?;

    let response = complete_onboarding(&database, &input)?;
    let b = &response.breakdown;
    println!("Profile set:");
    println!("  Sex: {}", response.profile.sex.as_str());
    println!("  Activity: {}", response.profile.activity_level.as_str());
    println!("  Goal: {}", response.profile.fitness_goal.as_str());
    println!("  BMR: {:.1} kcal | TDEE: {:.1} kcal", b.bmr, b.tdee);
    println!("Daily goals:");
    println!("  Calories: {}", response.goals.calorie_goal);
    println!("  Protein: {} g", response.goals.protein_goal);
    println!("  Carbs: {} g", response.goals.carbs_goal);
    println!("  Fats: {} g", response.goals.fats_goal);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full_args() {
        let argv = args(&["female", "30", "165", "60.5", "moderate", "build_muscle"]);
        let input = parse_args(&argv).unwrap();
        assert_eq!(input.sex, "female");
        assert_eq!(input.age_years, Some(30));
        assert_eq!(input.weight_kg, Some(60.5));
        assert_eq!(input.goal.as_deref(), Some("build_muscle"));
    }

    #[test]
    fn test_parse_optional_args_missing() {
        let input = parse_args(&args(&["male", "25", "170", "70"])).unwrap();
        assert_eq!(input.activity_level, None);
        assert_eq!(input.goal, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&["male", "25"])).is_err());
        assert!(parse_args(&args(&["male", "twenty", "170", "70"])).is_err());
        assert!(parse_args(&args(&["male", "25", "tall", "70"])).is_err());
    }
}
