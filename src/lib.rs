pub mod cache;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Report};

pub use cache::{CacheStats, CleanupTask, ContentHasher, ManualClock, StatCategory, TtlCache};
pub use config::{cli::LocalContent, toml_config::EngineConfig};
pub use core::engine::{CachedStat, EngineSettings, PerformanceMetrics, StatsEngine};
pub use core::scale::{ScaleCategory, ScaleRule, ScaleTable};
pub use domain::ports::{Clock, ContentSource};
pub use utils::error::{Result, StatsError};
