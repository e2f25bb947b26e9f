use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directives when `RUST_LOG` is unset. The engine logs operands and
/// package listings at `info`; `debug` adds the env prefix and shell details.
fn default_directives(verbose: bool, lambda: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    if lambda {
        // runtime 的逐次呼叫日誌太吵
        format!("dot_predictor={level},lambda={level},lambda_runtime=warn,warn")
    } else {
        format!("dot_predictor={level},warn")
    }
}

fn env_filter(verbose: bool, lambda: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, lambda)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose, false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(env_filter(false, true))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .json() // CloudWatch 以 JSON 格式較易查詢
                .with_current_span(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false, false), "dot_predictor=info,warn");
        assert_eq!(default_directives(true, false), "dot_predictor=debug,warn");
        assert_eq!(
            default_directives(false, true),
            "dot_predictor=info,lambda=info,lambda_runtime=warn,warn"
        );
    }
}
