pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LambdaConfig, TomlConfig};

pub use adapters::conda::CondaInspector;
pub use core::predictor::PredictionEngine;
pub use domain::model::{Prediction, SetupFailurePolicy};
pub use utils::error::{PredictError, Result};
