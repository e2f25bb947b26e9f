use crate::config::toml_config::{
    ErrorHandlingConfig, MonitoringConfig, PredictConfig, TomlConfig,
};
use crate::core::{ConfigProvider, SetupFailurePolicy};
use crate::domain::model::{
    DEFAULT_CONDA_ROOT, DEFAULT_ENV_NAME, DEFAULT_INPUT_MATRIX, DEFAULT_SHELL,
};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "dot-predictor")]
#[command(about = "Squares a matrix with its own dot product")]
pub struct CliConfig {
    /// Numpy-style nested list, defaults to "[[1, 2], [3, 4]]"
    #[arg(long)]
    pub input_matrix: Option<String>,

    /// Conda environment name [default: myenv]
    #[arg(long)]
    pub env_name: Option<String>,

    /// Conda installation root [default: /cog/miniconda]
    #[arg(long)]
    pub conda_root: Option<String>,

    /// Shell used to activate the environment [default: /bin/bash]
    #[arg(long)]
    pub shell: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Skip the environment package listing")]
    pub skip_setup: bool,

    #[arg(long, help = "Log setup failures instead of aborting")]
    pub continue_on_setup_failure: bool,

    #[arg(long)]
    pub setup_timeout_seconds: Option<u64>,

    #[arg(long)]
    pub max_elements: Option<usize>,

    #[arg(long, help = "Print the prediction as JSON")]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn env_name(&self) -> &str {
        self.env_name.as_deref().unwrap_or(DEFAULT_ENV_NAME)
    }

    fn conda_root(&self) -> &str {
        self.conda_root.as_deref().unwrap_or(DEFAULT_CONDA_ROOT)
    }

    fn shell(&self) -> &str {
        self.shell.as_deref().unwrap_or(DEFAULT_SHELL)
    }

    fn default_input(&self) -> &str {
        DEFAULT_INPUT_MATRIX
    }

    fn setup_failure_policy(&self) -> SetupFailurePolicy {
        if self.continue_on_setup_failure {
            SetupFailurePolicy::Continue
        } else {
            SetupFailurePolicy::Abort
        }
    }

    fn setup_timeout(&self) -> Option<Duration> {
        self.setup_timeout_seconds.map(Duration::from_secs)
    }

    fn max_elements(&self) -> Option<usize> {
        self.max_elements
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitor
    }
}

impl CliConfig {
    /// 將明確指定的命令列旗標覆蓋到 TOML 設定上
    pub fn apply_to(&self, mut config: TomlConfig) -> TomlConfig {
        if let Some(env_name) = &self.env_name {
            config.environment.name = Some(env_name.clone());
        }
        if let Some(conda_root) = &self.conda_root {
            config.environment.conda_root = Some(conda_root.clone());
        }
        if let Some(shell) = &self.shell {
            config.environment.shell = Some(shell.clone());
        }
        if let Some(timeout) = self.setup_timeout_seconds {
            config.environment.setup_timeout_seconds = Some(timeout);
        }

        if self.continue_on_setup_failure {
            config
                .error_handling
                .get_or_insert(ErrorHandlingConfig {
                    on_setup_failure: None,
                })
                .on_setup_failure = Some(SetupFailurePolicy::Continue);
            tracing::info!("🔧 Setup failure policy overridden to: continue");
        }

        if let Some(max) = self.max_elements {
            config
                .predict
                .get_or_insert(PredictConfig {
                    default_input: None,
                    max_elements: None,
                })
                .max_elements = Some(max);
        }

        if self.monitor {
            config.monitoring = Some(MonitoringConfig { enabled: true });
        }

        config
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_env_name("env_name", self.env_name())?;
        validation::validate_path("conda_root", self.conda_root())?;
        validation::validate_path("shell", self.shell())?;

        if let Some(timeout) = self.setup_timeout_seconds {
            validation::validate_range("setup_timeout_seconds", timeout, 1, 3600)?;
        }
        if let Some(max) = self.max_elements {
            validation::validate_positive_number("max_elements", max, 1)?;
        }

        Ok(())
    }
}
