//! Configuration module

use std::env;
use std::path::PathBuf;

use cardio_core::constants;
use cardio_core::{CardioResult, EngineConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Model artifact (JSON forest)
    pub model_path: PathBuf,

    /// Column-ordering artifact
    pub columns_path: PathBuf,

    /// JSON Lines prediction history
    pub history_path: PathBuf,

    /// Threshold, explanation switch, tip cut-offs
    pub engine: EngineConfig,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> CardioResult<Self> {
        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            model_path: constants::get_model_path(),
            columns_path: constants::get_columns_path(),
            history_path: constants::get_history_path(),

            engine: EngineConfig::from_env()?,

            environment: environment(),
        })
    }
}

/// Deployment environment (development, production)
pub fn environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

/// Check if running in production
pub fn is_production() -> bool {
    environment() == "production"
}
