use anyhow::Result;
use dot_predictor::core::{ConfigProvider, EnvironmentInspector, Predictor};
use dot_predictor::{LambdaConfig, PredictError, PredictionEngine, TomlConfig};

/// 不啟動任何子行程的環境檢查替身
struct StaticInspector(&'static str);

impl EnvironmentInspector for StaticInspector {
    async fn list_installed_packages(&self, _env_name: &str) -> dot_predictor::Result<String> {
        Ok(self.0.to_string())
    }
}

fn engine() -> Result<PredictionEngine<StaticInspector, LambdaConfig>> {
    let config = LambdaConfig::from_lookup(|_| None)?;
    Ok(PredictionEngine::new(
        StaticInspector("numpy 1.26.4 py310_0"),
        config,
    ))
}

#[tokio::test]
async fn test_default_input_squares_two_by_two() -> Result<()> {
    let engine = engine()?;
    engine.setup().await?;

    let output = engine.predict(engine.config().default_input())?;
    assert!(output.contains("[[ 7 10]\n [15 22]]"));
    assert!(output.starts_with("The dot product of the matrix with itself"));
    Ok(())
}

#[tokio::test]
async fn test_single_element_matrix() -> Result<()> {
    let output = engine()?.predict("[[2]]")?;
    assert!(output.ends_with("[[4]]"));
    Ok(())
}

#[tokio::test]
async fn test_repeated_calls_are_identical() -> Result<()> {
    let engine = engine()?;
    let first = engine.predict("[[1.5, -2], [0, 3]]")?;
    let second = engine.predict("[[1.5, -2], [0, 3]]")?;
    assert_eq!(first, second);
    assert!(first.ends_with("[[ 2.25 -9.  ]\n [ 0.    9.  ]]"));
    Ok(())
}

#[tokio::test]
async fn test_non_square_matrix_fails() -> Result<()> {
    let result = engine()?.predict("[[1, 2, 3], [4, 5, 6]]");
    assert!(matches!(result, Err(PredictError::ShapeError { .. })));
    Ok(())
}

#[tokio::test]
async fn test_malformed_input_fails() -> Result<()> {
    let engine = engine()?;
    assert!(matches!(
        engine.predict("not a matrix"),
        Err(PredictError::InputParseError { .. })
    ));
    assert!(matches!(
        engine.predict("__import__('os').system('id')"),
        Err(PredictError::InputParseError { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_non_numeric_elements_fail() -> Result<()> {
    let result = engine()?.predict("[['a', 'b'], ['c', 'd']]");
    assert!(matches!(result, Err(PredictError::TypeError { .. })));
    Ok(())
}

#[tokio::test]
async fn test_predictor_trait_object() -> Result<()> {
    let predictor: Box<dyn Predictor> = Box::new(engine()?);
    predictor.setup().await?;
    let output = predictor.predict(predictor.default_input()).await?;
    assert!(output.contains("[15 22]"));
    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_engine() -> Result<()> {
    let config = TomlConfig::from_toml_str(
        r#"
[predictor]
name = "toml-driven"
version = "1.0.0"

[environment]
name = "myenv"

[predict]
default_input = "[[0, 1], [1, 0]]"
max_elements = 4
"#,
    )?;

    let engine = PredictionEngine::new(StaticInspector(""), config);
    let output = engine.predict_default()?;
    assert!(output.ends_with("[[1 0]\n [0 1]]"));

    assert!(matches!(
        engine.predict("[[1, 2, 3], [4, 5, 6], [7, 8, 9]]"),
        Err(PredictError::InputTooLarge { elements: 9, limit: 4 })
    ));
    Ok(())
}

#[tokio::test]
async fn test_detailed_prediction_serializes() -> Result<()> {
    let prediction = engine()?.predict_detailed("[[1, 2], [3, 4]]")?;
    let json = serde_json::to_value(&prediction)?;

    assert_eq!(json["input_shape"], serde_json::json!([2, 2]));
    assert_eq!(json["result"], "[[ 7 10]\n [15 22]]");
    assert_eq!(json["input_matrix"], "[[1, 2], [3, 4]]");
    Ok(())
}
