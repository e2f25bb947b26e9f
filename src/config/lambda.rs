use crate::core::{ConfigProvider, SetupFailurePolicy};
use crate::domain::model::{
    DEFAULT_CONDA_ROOT, DEFAULT_ENV_NAME, DEFAULT_INPUT_MATRIX, DEFAULT_SHELL,
};
use crate::utils::error::{PredictError, Result};
use crate::utils::validation::{self, Validate};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub env_name: String,
    pub conda_root: String,
    pub shell: String,
    pub default_input: String,
    pub on_setup_failure: SetupFailurePolicy,
    pub setup_timeout_seconds: Option<u64>,
    pub max_elements: Option<usize>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 以任意查詢函式取得設定值，方便測試時不必修改行程環境變數
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            env_name: lookup("ENV_NAME").unwrap_or_else(|| DEFAULT_ENV_NAME.to_string()),
            conda_root: lookup("CONDA_ROOT").unwrap_or_else(|| DEFAULT_CONDA_ROOT.to_string()),
            shell: lookup("SHELL_PATH").unwrap_or_else(|| DEFAULT_SHELL.to_string()),
            default_input: lookup("DEFAULT_INPUT_MATRIX")
                .unwrap_or_else(|| DEFAULT_INPUT_MATRIX.to_string()),
            on_setup_failure: lookup("ON_SETUP_FAILURE")
                .map(|v| SetupFailurePolicy::from_str(&v))
                .transpose()?
                .unwrap_or_default(),
            setup_timeout_seconds: parse_optional(&lookup, "SETUP_TIMEOUT_SECONDS")?,
            max_elements: parse_optional(&lookup, "MAX_ELEMENTS")?,
        })
    }
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| PredictError::InvalidConfigValueError {
                    field: key.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

impl ConfigProvider for LambdaConfig {
    fn env_name(&self) -> &str {
        &self.env_name
    }

    fn conda_root(&self) -> &str {
        &self.conda_root
    }

    fn shell(&self) -> &str {
        &self.shell
    }

    fn default_input(&self) -> &str {
        &self.default_input
    }

    fn setup_failure_policy(&self) -> SetupFailurePolicy {
        self.on_setup_failure
    }

    fn setup_timeout(&self) -> Option<Duration> {
        self.setup_timeout_seconds.map(Duration::from_secs)
    }

    fn max_elements(&self) -> Option<usize> {
        self.max_elements
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_env_name("ENV_NAME", &self.env_name)?;
        validation::validate_path("CONDA_ROOT", &self.conda_root)?;
        validation::validate_path("SHELL_PATH", &self.shell)?;
        validation::validate_non_empty_string("DEFAULT_INPUT_MATRIX", &self.default_input)?;

        if let Some(timeout) = self.setup_timeout_seconds {
            validation::validate_range("SETUP_TIMEOUT_SECONDS", timeout, 1, 900)?;
        }
        if let Some(max) = self.max_elements {
            validation::validate_positive_number("MAX_ELEMENTS", max, 1)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
