use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATE_TARGET: &str = "content_stats";

/// `RUST_LOG` wins; otherwise our own events at info (debug when verbose).
fn stats_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if verbose {
            format!("{}=debug,info", CRATE_TARGET)
        } else {
            format!("{}=info", CRATE_TARGET)
        };
        EnvFilter::new(directive)
    })
}

// 日誌寫到 stderr，stdout 保留給 JSON 報表
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(stats_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(stats_filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false),
        )
        .init();
}
