pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::{Result, StatsError};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_range, Validate};
#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Report {
    All,
    Testimonials,
    Performance,
    Stats,
    Pricing,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "content-stats")]
#[command(about = "Derived statistics for the site's content collections")]
pub struct CliConfig {
    /// Path to the content bundle (JSON)
    #[arg(long, default_value = "./content.json")]
    pub content: String,

    /// Path to TOML engine configuration
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "all")]
    pub report: Report,

    /// Discount percentage applied to every package in the pricing report
    #[arg(long)]
    pub discount: Option<f64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Print cache metrics after the report")]
    pub metrics: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("content", &self.content)?;
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        if let Some(discount) = self.discount {
            validate_range("discount", discount, 0.0, 100.0)?;
        }
        if self.discount.is_some() && !matches!(self.report, Report::All | Report::Pricing) {
            return Err(StatsError::ConfigValidationError {
                field: "discount".to_string(),
                message: "--discount only applies to the pricing report".to_string(),
            });
        }
        Ok(())
    }
}
