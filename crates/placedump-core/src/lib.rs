pub mod app_config;
pub mod config;
pub mod places;

pub use app_config::{AppConfig, ListingPolicy};
pub use config::{load_app_config, load_app_config_from_env};
pub use places::{DayHours, PlaceRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
