use crate::domain::model::SetupFailurePolicy;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Lists the packages installed in a named runtime environment.
pub trait EnvironmentInspector: Send + Sync {
    fn list_installed_packages(
        &self,
        env_name: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn env_name(&self) -> &str;
    fn conda_root(&self) -> &str;
    fn shell(&self) -> &str;
    fn default_input(&self) -> &str;
    fn setup_failure_policy(&self) -> SetupFailurePolicy;
    fn setup_timeout(&self) -> Option<Duration>;
    fn max_elements(&self) -> Option<usize>;

    fn monitoring_enabled(&self) -> bool {
        false
    }
}

#[async_trait]
pub trait Predictor: Send + Sync {
    async fn setup(&self) -> Result<()>;
    async fn predict(&self, input_matrix: &str) -> Result<String>;
    fn default_input(&self) -> &str;
}
