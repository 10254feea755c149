pub mod ads;
pub mod app_config;
pub mod config;
pub mod scoring;

use thiserror::Error;

pub use ads::{ActiveStatus, AdRecord, CreativeVariant, AD_TYPE};
pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use scoring::{score_ad, ScoreBreakdown, ScoreInputs, SCORE_VERSION};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid active status: {0} (expected ACTIVE, INACTIVE or ALL)")]
    InvalidActiveStatus(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
