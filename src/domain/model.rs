use crate::utils::error::PredictError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_INPUT_MATRIX: &str = "[[1, 2], [3, 4]]";
pub const DEFAULT_ENV_NAME: &str = "myenv";
pub const DEFAULT_CONDA_ROOT: &str = "/cog/miniconda";
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// 初始化時列出套件失敗的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupFailurePolicy {
    #[default]
    Abort,
    Continue,
}

impl FromStr for SetupFailurePolicy {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(SetupFailurePolicy::Abort),
            "continue" => Ok(SetupFailurePolicy::Continue),
            other => Err(PredictError::InvalidConfigValueError {
                field: "on_setup_failure".to_string(),
                value: other.to_string(),
                reason: "Expected 'abort' or 'continue'".to_string(),
            }),
        }
    }
}

impl fmt::Display for SetupFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupFailurePolicy::Abort => f.write_str("abort"),
            SetupFailurePolicy::Continue => f.write_str("continue"),
        }
    }
}

/// Outcome of a single prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub input_matrix: String,
    pub input_shape: Vec<usize>,
    pub result_shape: Vec<usize>,
    pub result: String,
    pub output: String,
    pub computed_at: DateTime<Utc>,
}
