use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace for each calculator's cache entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    TestimonialStats,
    PerformanceData,
    CalculatedStats,
    PackagePricing,
}

impl StatCategory {
    pub const ALL: [StatCategory; 4] = [
        StatCategory::TestimonialStats,
        StatCategory::PerformanceData,
        StatCategory::CalculatedStats,
        StatCategory::PackagePricing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatCategory::TestimonialStats => "testimonial_stats",
            StatCategory::PerformanceData => "performance_data",
            StatCategory::CalculatedStats => "calculated_stats",
            StatCategory::PackagePricing => "package_pricing",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == value)
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// `<category>_<hash|default>`
    pub fn build(category: StatCategory, content_hash: Option<&str>) -> String {
        format!("{}_{}", category, content_hash.unwrap_or("default"))
    }

    /// `<category>_<entityId>_<customizationHash|default>`
    pub fn build_entity(
        category: StatCategory,
        entity_id: &str,
        customization_hash: Option<&str>,
    ) -> String {
        format!(
            "{}_{}_{}",
            category,
            entity_id,
            customization_hash.unwrap_or("default")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key() {
        assert_eq!(
            CacheKeyBuilder::build(StatCategory::PerformanceData, Some("9f3a1c2")),
            "performance_data_9f3a1c2"
        );
        assert_eq!(
            CacheKeyBuilder::build(StatCategory::TestimonialStats, None),
            "testimonial_stats_default"
        );
    }

    #[test]
    fn test_build_entity_key() {
        assert_eq!(
            CacheKeyBuilder::build_entity(StatCategory::PackagePricing, "starter-4", None),
            "package_pricing_starter-4_default"
        );
        assert_eq!(
            CacheKeyBuilder::build_entity(StatCategory::PackagePricing, "starter-4", Some("ab12")),
            "package_pricing_starter-4_ab12"
        );
    }

    #[test]
    fn test_same_hash_different_category_never_collides() {
        let keys: Vec<String> = StatCategory::ALL
            .iter()
            .map(|category| CacheKeyBuilder::build(*category, Some("same")))
            .collect();
        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
    }

    #[test]
    fn test_parse_round_trips_names() {
        assert_eq!(
            StatCategory::parse("package_pricing"),
            Some(StatCategory::PackagePricing)
        );
        assert_eq!(StatCategory::parse("unknown"), None);
    }
}
