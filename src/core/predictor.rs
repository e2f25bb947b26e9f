use crate::core::linalg::Operand;
use crate::core::parser::parse_literal;
use crate::core::{ConfigProvider, EnvironmentInspector, Prediction, Predictor, SetupFailurePolicy};
use crate::utils::error::{PredictError, Result};
use crate::utils::monitor::{MonitorPhase, SystemMonitor};
use async_trait::async_trait;
use chrono::Utc;

pub const RESULT_PREFIX: &str = "The dot product of the matrix with itself results in: ";

pub struct PredictionEngine<I: EnvironmentInspector, C: ConfigProvider> {
    inspector: I,
    config: C,
    monitor: SystemMonitor,
}

impl<I: EnvironmentInspector, C: ConfigProvider> PredictionEngine<I, C> {
    pub fn new(inspector: I, config: C) -> Self {
        Self::new_with_monitoring(inspector, config, false)
    }

    pub fn new_with_monitoring(inspector: I, config: C, monitor_enabled: bool) -> Self {
        Self {
            inspector,
            config,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// One-time environment introspection. The package listing is only
    /// logged, never kept.
    pub async fn setup(&self) -> Result<()> {
        let env_name = self.config.env_name();
        tracing::info!("🔧 Inspecting runtime environment '{}'", env_name);

        let listing = match self.config.setup_timeout() {
            Some(limit) => {
                match tokio::time::timeout(limit, self.inspector.list_installed_packages(env_name))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(PredictError::EnvironmentError {
                        env_name: env_name.to_string(),
                        message: format!("package listing timed out after {:?}", limit),
                    }),
                }
            }
            None => self.inspector.list_installed_packages(env_name).await,
        };

        match listing {
            Ok(packages) => {
                let count = count_packages(&packages);
                tracing::info!("Installed packages:\n{}", packages);
                tracing::info!("📦 {} packages installed in '{}'", count, env_name);
                self.monitor
                    .record(MonitorPhase::EnvironmentSetup { packages: count });
                Ok(())
            }
            Err(e) => match self.config.setup_failure_policy() {
                SetupFailurePolicy::Abort => {
                    tracing::error!("❌ Environment setup failed: {}", e);
                    Err(e)
                }
                SetupFailurePolicy::Continue => {
                    tracing::warn!("⚠️ Environment setup failed, continuing: {}", e);
                    Ok(())
                }
            },
        }
    }

    pub fn predict_detailed(&self, input_matrix: &str) -> Result<Prediction> {
        let literal = parse_literal(input_matrix)?;
        let operand = Operand::from_literal(&literal)?;

        if let Some(limit) = self.config.max_elements() {
            if operand.len() > limit {
                return Err(PredictError::InputTooLarge {
                    elements: operand.len(),
                    limit,
                });
            }
        }

        tracing::info!("Operation:\n{}\n(dot)\n{}", operand, operand);

        let result = operand.self_dot()?;
        let rendered = result.to_string();

        tracing::info!("= Result:\n{}", rendered);
        self.monitor.record(MonitorPhase::Prediction {
            elements: operand.len(),
        });

        Ok(Prediction {
            input_matrix: input_matrix.to_string(),
            input_shape: operand.shape(),
            result_shape: result.shape(),
            output: format!("{}{}", RESULT_PREFIX, rendered),
            result: rendered,
            computed_at: Utc::now(),
        })
    }

    pub fn predict(&self, input_matrix: &str) -> Result<String> {
        self.predict_detailed(input_matrix).map(|p| p.output)
    }

    pub fn predict_default(&self) -> Result<String> {
        self.predict(self.config.default_input())
    }

    pub fn log_final_stats(&self) {
        self.monitor.log_final_stats();
    }
}

#[async_trait]
impl<I: EnvironmentInspector, C: ConfigProvider> Predictor for PredictionEngine<I, C> {
    async fn setup(&self) -> Result<()> {
        PredictionEngine::setup(self).await
    }

    async fn predict(&self, input_matrix: &str) -> Result<String> {
        PredictionEngine::predict(self, input_matrix)
    }

    fn default_input(&self) -> &str {
        self.config.default_input()
    }
}

/// `conda list` 輸出中非註解的行數
fn count_packages(listing: &str) -> usize {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DEFAULT_INPUT_MATRIX;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct TestConfig {
        policy: SetupFailurePolicy,
        timeout: Option<Duration>,
        max_elements: Option<usize>,
    }

    impl ConfigProvider for TestConfig {
        fn env_name(&self) -> &str {
            "myenv"
        }

        fn conda_root(&self) -> &str {
            "/cog/miniconda"
        }

        fn shell(&self) -> &str {
            "/bin/bash"
        }

        fn default_input(&self) -> &str {
            DEFAULT_INPUT_MATRIX
        }

        fn setup_failure_policy(&self) -> SetupFailurePolicy {
            self.policy
        }

        fn setup_timeout(&self) -> Option<Duration> {
            self.timeout
        }

        fn max_elements(&self) -> Option<usize> {
            self.max_elements
        }
    }

    #[derive(Clone)]
    struct MockInspector {
        listing: Option<String>,
        delay: Option<Duration>,
        calls: Arc<AtomicUsize>,
    }

    impl MockInspector {
        fn ok(listing: &str) -> Self {
            Self {
                listing: Some(listing.to_string()),
                delay: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing() -> Self {
            Self {
                listing: None,
                delay: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl EnvironmentInspector for MockInspector {
        async fn list_installed_packages(&self, env_name: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.listing
                .clone()
                .ok_or_else(|| PredictError::EnvironmentError {
                    env_name: env_name.to_string(),
                    message: "EnvironmentNameNotFound".to_string(),
                })
        }
    }

    #[tokio::test]
    async fn test_setup_lists_packages_once() {
        let inspector = MockInspector::ok("# packages\nnumpy 1.26.4 py310_0\n");
        let calls = inspector.calls.clone();
        let engine = PredictionEngine::new(inspector, TestConfig::default());

        engine.setup().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_setup_failure_aborts_by_default() {
        let engine = PredictionEngine::new(MockInspector::failing(), TestConfig::default());
        assert!(matches!(
            engine.setup().await,
            Err(PredictError::EnvironmentError { .. })
        ));
    }

    #[tokio::test]
    async fn test_setup_failure_can_continue() {
        let config = TestConfig {
            policy: SetupFailurePolicy::Continue,
            ..Default::default()
        };
        let engine = PredictionEngine::new(MockInspector::failing(), config);
        assert!(engine.setup().await.is_ok());
        assert!(engine.predict_default().is_ok());
    }

    #[tokio::test]
    async fn test_setup_timeout() {
        let mut inspector = MockInspector::ok("numpy 1.26.4");
        inspector.delay = Some(Duration::from_millis(200));
        let config = TestConfig {
            timeout: Some(Duration::from_millis(10)),
            ..Default::default()
        };
        let engine = PredictionEngine::new(inspector, config);

        match engine.setup().await {
            Err(PredictError::EnvironmentError { message, .. }) => {
                assert!(message.contains("timed out"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_predict_default() {
        let engine = PredictionEngine::new(MockInspector::ok(""), TestConfig::default());
        let output = engine.predict_default().unwrap();
        assert_eq!(
            output,
            "The dot product of the matrix with itself results in: [[ 7 10]\n [15 22]]"
        );
    }

    #[test]
    fn test_predict_detailed_shapes() {
        let engine = PredictionEngine::new(MockInspector::ok(""), TestConfig::default());
        let prediction = engine.predict_detailed("[1, 2, 3]").unwrap();
        assert_eq!(prediction.input_shape, vec![3]);
        assert!(prediction.result_shape.is_empty());
        assert_eq!(prediction.result, "14");
        assert!(!prediction.output.contains("[1, 2, 3]"));
    }

    #[test]
    fn test_max_elements() {
        let config = TestConfig {
            max_elements: Some(3),
            ..Default::default()
        };
        let engine = PredictionEngine::new(MockInspector::ok(""), config);
        assert!(matches!(
            engine.predict(DEFAULT_INPUT_MATRIX),
            Err(PredictError::InputTooLarge { elements: 4, limit: 3 })
        ));
        assert!(engine.predict("[[2]]").is_ok());
    }

    #[test]
    fn test_count_packages() {
        let listing = "# packages in environment at /cog/miniconda/envs/myenv:\n#\n# Name Version Build Channel\nnumpy 1.26.4 py310_0\npython 3.10.14 h955ad1f_1\n\n";
        assert_eq!(count_packages(listing), 2);
    }
}
