use crate::core::{ConfigProvider, EnvironmentInspector};
use crate::utils::error::{PredictError, Result};
use crate::utils::validation::validate_env_name;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// `$1` 為 conda 根目錄、`$2` 為環境名稱，皆以參數傳入而不拼接進腳本
const LIST_PACKAGES_SCRIPT: &str = r#"source "$1/bin/activate" && conda activate "$2" && conda list"#;

/// Runs `conda list` inside a named conda environment through a shell.
#[derive(Debug, Clone)]
pub struct CondaInspector {
    conda_root: PathBuf,
    shell: String,
}

impl CondaInspector {
    pub fn new(conda_root: impl Into<PathBuf>, shell: impl Into<String>) -> Self {
        Self {
            conda_root: conda_root.into(),
            shell: shell.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.conda_root(), config.shell())
    }

    pub fn conda_root(&self) -> &Path {
        &self.conda_root
    }

    /// Install prefix of the environment, e.g. `/cog/miniconda/envs/myenv`.
    pub fn env_prefix(&self, env_name: &str) -> PathBuf {
        self.conda_root.join("envs").join(env_name)
    }
}

impl EnvironmentInspector for CondaInspector {
    async fn list_installed_packages(&self, env_name: &str) -> Result<String> {
        validate_env_name("env_name", env_name)?;

        tracing::debug!(
            "Listing packages with {} (env prefix: {})",
            self.shell,
            self.env_prefix(env_name).display()
        );

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(LIST_PACKAGES_SCRIPT)
            .arg(&self.shell)
            .arg(&self.conda_root)
            .arg(env_name)
            .stdin(Stdio::null())
            // 逾時取消 future 時一併結束 shell
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| PredictError::ShellUnavailable {
                shell: self.shell.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PredictError::EnvironmentError {
                env_name: env_name.to_string(),
                message: if stderr.is_empty() {
                    format!("package listing exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
