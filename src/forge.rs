//! Remote repository operations against GitHub.
pub mod config;
pub mod github;
pub mod manager;
pub mod traits;
pub mod types;
