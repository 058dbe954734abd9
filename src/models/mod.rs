//! Data models
//!
//! Rust structs representing database entities.

mod goals;
mod profile;

pub use goals::{DailyGoals, GoalSource};
pub use profile::UserProfile;
