pub mod app_config;
pub mod config;
pub mod offers;
pub mod route;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use offers::{FailureTag, OfferRecord, Provenance, NO_PRICE};
pub use route::{DateWindow, Route};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid route \"{route}\": {reason}")]
    InvalidRoute { route: String, reason: String },

    #[error("invalid date window [{start}, {end}): end offset must be greater than start offset")]
    InvalidDateWindow { start: i64, end: i64 },
}
