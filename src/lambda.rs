#[cfg(feature = "lambda")]
use dot_predictor::core::Predictor;
#[cfg(feature = "lambda")]
use dot_predictor::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use dot_predictor::{CondaInspector, LambdaConfig, PredictionEngine};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub input_matrix: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
pub struct Response {
    pub output: String,
}

#[cfg(feature = "lambda")]
async fn function_handler<P: Predictor>(
    predictor: &P,
    event: LambdaEvent<Request>,
) -> Result<Response, Error> {
    let input = event
        .payload
        .input_matrix
        .unwrap_or_else(|| predictor.default_input().to_string());

    tracing::info!("Handling prediction request {}", event.context.request_id);

    let output = predictor
        .predict(&input)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    Ok(Response { output })
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = LambdaConfig::from_env()?;
    config.validate()?;

    // 冷啟動時執行一次環境檢查
    let inspector = CondaInspector::from_config(&config);
    let engine = PredictionEngine::new(inspector, config);
    engine.setup().await?;

    let engine = &engine;
    run(service_fn(move |event: LambdaEvent<Request>| async move {
        function_handler(engine, event).await
    }))
    .await
}
