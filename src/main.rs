use anyhow::Context;
use clap::Parser;
use content_stats::domain::model::{ContentBundle, PricingCustomization};
use content_stats::utils::error::ErrorSeverity;
use content_stats::utils::{logger, validation::Validate};
use content_stats::{
    CliConfig, ContentSource, EngineConfig, LocalContent, Report, StatsEngine, StatsError,
};
use serde_json::{Map, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting content-stats");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config) {
        Ok(report) => {
            let rendered =
                serde_json::to_string_pretty(&report).context("failed to render report")?;
            println!("{}", rendered);
            tracing::info!("✅ Report generated");
        }
        Err(e) => {
            tracing::error!(
                "❌ content-stats failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn run(config: &CliConfig) -> Result<Value, StatsError> {
    let engine_config = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading engine configuration from: {}", path);
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::default(),
    };
    engine_config.validate()?;

    let engine = StatsEngine::new(engine_config.to_settings()?);
    // 單次執行不啟動背景清理，此設定給嵌入 StatsEngine 的長駐程式用
    if let Some(interval) = engine_config.cleanup_interval() {
        tracing::debug!(
            "Ignoring cache.cleanup_interval_seconds ({:?}) for a one-shot report",
            interval
        );
    }

    let content = LocalContent::new(&config.content).load()?;
    tracing::info!(
        "📦 Loaded content: {} testimonials, {} packages, {} portfolio items",
        content.testimonials.len(),
        content.packages.len(),
        content.portfolio.len()
    );

    let mut report = build_report(&engine, &content, config)?;

    if config.metrics {
        let metrics = engine.get_performance_metrics();
        tracing::info!(
            "📊 Cache hits: {}, misses: {}, fallbacks: {}, avg compute: {:.3}ms",
            metrics.cache_hits,
            metrics.cache_misses,
            metrics.fallbacks,
            metrics.average_computation_time_ms
        );
        report.insert("metrics".to_string(), serde_json::to_value(metrics)?);
    }

    Ok(Value::Object(report))
}

fn build_report(
    engine: &StatsEngine,
    content: &ContentBundle,
    config: &CliConfig,
) -> Result<Map<String, Value>, StatsError> {
    let mut report = Map::new();
    let wants = |section: Report| config.report == Report::All || config.report == section;

    if wants(Report::Testimonials) {
        let stats = engine.calculate_testimonial_stats(&content.testimonials);
        report.insert("testimonials".to_string(), serde_json::to_value(stats)?);
    }

    if wants(Report::Performance) {
        let data = engine.calculate_performance_data(
            &content.testimonials,
            &content.portfolio,
            &content.services,
        );
        report.insert("performance".to_string(), serde_json::to_value(data)?);
    }

    if wants(Report::Stats) {
        let stats = engine.calculate_stats(&content.testimonials, &content.packages);
        report.insert("stats".to_string(), serde_json::to_value(stats)?);
    }

    if wants(Report::Pricing) {
        let customization = config.discount.map(|discount_percent| PricingCustomization {
            discount_percent,
        });
        let pricing: Vec<Value> = content
            .packages
            .iter()
            .map(|package| {
                let breakdown = engine.calculate_package_pricing(package, customization.as_ref());
                serde_json::to_value(breakdown)
            })
            .collect::<Result<_, _>>()?;
        report.insert("pricing".to_string(), Value::Array(pricing));
    }

    Ok(report)
}
