use clap::Parser;
use dot_predictor::core::ConfigProvider;
use dot_predictor::utils::{logger, validation::Validate};
use dot_predictor::{CliConfig, CondaInspector, PredictError, PredictionEngine, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting dot-predictor CLI");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let outcome = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(file_config) => run(args.apply_to(file_config), &args).await,
                Err(e) => Err(e),
            }
        }
        None => run(args.clone(), &args).await,
    };

    match outcome {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Prediction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run<C>(config: C, args: &CliConfig) -> Result<String, PredictError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    tracing::info!("✅ Configuration validated");

    let monitor_enabled = args.monitor || config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let inspector = CondaInspector::from_config(&config);
    let engine = PredictionEngine::new_with_monitoring(inspector, config, monitor_enabled);

    if args.skip_setup {
        tracing::info!("⏭️ Skipping environment setup");
    } else {
        engine.setup().await?;
    }

    let input = args
        .input_matrix
        .clone()
        .unwrap_or_else(|| engine.config().default_input().to_string());

    let prediction = engine.predict_detailed(&input)?;
    engine.log_final_stats();

    if args.json {
        Ok(serde_json::to_string_pretty(&prediction)?)
    } else {
        Ok(prediction.output)
    }
}
