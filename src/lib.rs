//! CaloriTrack Library
//!
//! Daily calorie and macro targets from a biometric profile, the local
//! profile/goals store, and the workflows the MCP server exposes.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
