use crate::core::{ConfigProvider, SetupFailurePolicy};
use crate::domain::model::{
    DEFAULT_CONDA_ROOT, DEFAULT_ENV_NAME, DEFAULT_INPUT_MATRIX, DEFAULT_SHELL,
};
use crate::utils::error::{PredictError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub predictor: PredictorSection,
    pub environment: EnvironmentConfig,
    pub predict: Option<PredictConfig>,
    pub error_handling: Option<ErrorHandlingConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorSection {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub name: Option<String>,
    pub conda_root: Option<String>,
    pub shell: Option<String>,
    pub setup_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictConfig {
    pub default_input: Option<String>,
    pub max_elements: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    pub on_setup_failure: Option<SetupFailurePolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PredictError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PredictError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CONDA_ROOT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;

        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PredictError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("predictor.name", &self.predictor.name)?;
        validation::validate_env_name("environment.name", self.env_name())?;
        validation::validate_path("environment.conda_root", self.conda_root())?;
        validation::validate_path("environment.shell", self.shell())?;

        if let Some(timeout) = self.environment.setup_timeout_seconds {
            validation::validate_range("environment.setup_timeout_seconds", timeout, 1, 3600)?;
        }

        if let Some(predict) = &self.predict {
            if let Some(max) = predict.max_elements {
                validation::validate_positive_number("predict.max_elements", max, 1)?;
            }
            if let Some(input) = &predict.default_input {
                validation::validate_non_empty_string("predict.default_input", input)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn env_name(&self) -> &str {
        self.environment.name.as_deref().unwrap_or(DEFAULT_ENV_NAME)
    }

    fn conda_root(&self) -> &str {
        self.environment
            .conda_root
            .as_deref()
            .unwrap_or(DEFAULT_CONDA_ROOT)
    }

    fn shell(&self) -> &str {
        self.environment.shell.as_deref().unwrap_or(DEFAULT_SHELL)
    }

    fn default_input(&self) -> &str {
        self.predict
            .as_ref()
            .and_then(|p| p.default_input.as_deref())
            .unwrap_or(DEFAULT_INPUT_MATRIX)
    }

    fn setup_failure_policy(&self) -> SetupFailurePolicy {
        self.error_handling
            .as_ref()
            .and_then(|e| e.on_setup_failure)
            .unwrap_or_default()
    }

    fn setup_timeout(&self) -> Option<Duration> {
        self.environment
            .setup_timeout_seconds
            .map(Duration::from_secs)
    }

    fn max_elements(&self) -> Option<usize> {
        self.predict.as_ref().and_then(|p| p.max_elements)
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
