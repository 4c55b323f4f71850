use crate::cache::StatCategory;
use crate::core::engine::EngineSettings;
use crate::core::scale::{ScaleCategory, ScaleRule};
use crate::utils::error::{Result, StatsError};
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const MAX_SCALE_FACTOR: f64 = 1000.0;
const MAX_FLOOR: u32 = 1_000_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    /// Keyed by scale category name, e.g. `venue_wedding`.
    #[serde(default)]
    pub scale: BTreeMap<String, ScaleRuleConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    pub default_ttl_seconds: Option<u64>,
    pub cleanup_interval_seconds: Option<u64>,
    /// Keyed by statistic category, e.g. `performance_data`.
    pub ttl_seconds: Option<BTreeMap<String, u64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaleRuleConfig {
    pub scale_factor: Option<f64>,
    pub floor: Option<u32>,
}

impl EngineConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StatsError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StatsError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STATS_TTL})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StatsError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(ttl) = self.cache.default_ttl_seconds {
            validate_positive_number("cache.default_ttl_seconds", ttl, 1)?;
        }
        if let Some(interval) = self.cache.cleanup_interval_seconds {
            validate_positive_number("cache.cleanup_interval_seconds", interval, 1)?;
        }
        for (name, ttl) in self.cache.ttl_seconds.iter().flatten() {
            let field = format!("cache.ttl_seconds.{}", name);
            parse_stat_category(&field, name)?;
            validate_positive_number(&field, *ttl, 1)?;
        }

        for (name, rule) in &self.scale {
            let field = format!("scale.{}", name);
            parse_scale_category(&field, name)?;
            if let Some(factor) = rule.scale_factor {
                validate_range(&format!("{}.scale_factor", field), factor, 0.0, MAX_SCALE_FACTOR)?;
                if factor == 0.0 {
                    return Err(StatsError::InvalidConfigValueError {
                        field: format!("{}.scale_factor", field),
                        value: factor.to_string(),
                        reason: "Scale factor must be greater than 0".to_string(),
                    });
                }
            }
            if let Some(floor) = rule.floor {
                validate_range(&format!("{}.floor", field), floor, 0, MAX_FLOOR)?;
            }
        }

        Ok(())
    }

    /// 取得清理間隔（未設定則不啟用背景清理）
    pub fn cleanup_interval(&self) -> Option<Duration> {
        self.cache.cleanup_interval_seconds.map(Duration::from_secs)
    }

    /// Defaults overlaid with whatever this file sets.
    pub fn to_settings(&self) -> Result<EngineSettings> {
        let mut settings = EngineSettings::default();

        if let Some(ttl) = self.cache.default_ttl_seconds {
            settings.default_ttl = Duration::from_secs(ttl);
        }
        for (name, ttl) in self.cache.ttl_seconds.iter().flatten() {
            let category = parse_stat_category(&format!("cache.ttl_seconds.{}", name), name)?;
            settings.ttls.insert(category, Duration::from_secs(*ttl));
        }

        for (name, override_rule) in &self.scale {
            let category = parse_scale_category(&format!("scale.{}", name), name)?;
            let current = settings.scale.rule(category);
            settings.scale.set(
                category,
                ScaleRule::new(
                    override_rule.scale_factor.unwrap_or(current.scale_factor),
                    override_rule.floor.unwrap_or(current.floor),
                ),
            );
        }

        Ok(settings)
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

fn parse_stat_category(field: &str, name: &str) -> Result<StatCategory> {
    StatCategory::parse(name).ok_or_else(|| StatsError::InvalidConfigValueError {
        field: field.to_string(),
        value: name.to_string(),
        reason: format!(
            "Unknown statistic. Valid names: {}",
            StatCategory::ALL.map(|c| c.as_str()).join(", ")
        ),
    })
}

fn parse_scale_category(field: &str, name: &str) -> Result<ScaleCategory> {
    ScaleCategory::parse(name).ok_or_else(|| StatsError::InvalidConfigValueError {
        field: field.to_string(),
        value: name.to_string(),
        reason: format!(
            "Unknown scale category. Valid names: {}",
            ScaleCategory::ALL.map(|c| c.as_str()).join(", ")
        ),
    })
}
