use crate::cache::{
    CacheKeyBuilder, CleanupTask, ContentHasher, StatCategory, TtlCache, DEFAULT_TTL,
};
use crate::core::performance::{PerformanceCalculator, PerformanceInput};
use crate::core::pricing::{PricingCalculator, PricingInput};
use crate::core::scale::ScaleTable;
use crate::core::stats::{StatsCalculator, StatsInput};
use crate::core::testimonial::TestimonialCalculator;
use crate::domain::model::{
    CalculatedPerformanceData, CalculatedStats, LessonPackage, PortfolioItem, PricingBreakdown,
    PricingCustomization, ServiceDefinitions, Testimonial, TestimonialStats,
};
use crate::domain::ports::Calculator;
use crate::utils::error::{Result, StatsError};
use crate::utils::metrics::MetricsRecorder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One shared cache holds every statistic; keys are namespaced per category.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedStat {
    Testimonials(TestimonialStats),
    Performance(Box<CalculatedPerformanceData>),
    Stats(CalculatedStats),
    Pricing(PricingBreakdown),
}

pub trait CacheableStat: Sized {
    fn into_cached(self) -> CachedStat;
    fn from_cached(cached: CachedStat) -> Option<Self>;
}

macro_rules! cacheable {
    ($ty:ty, $variant:ident, $wrap:expr, $unwrap:expr) => {
        impl CacheableStat for $ty {
            fn into_cached(self) -> CachedStat {
                CachedStat::$variant($wrap(self))
            }

            fn from_cached(cached: CachedStat) -> Option<Self> {
                match cached {
                    CachedStat::$variant(inner) => Some($unwrap(inner)),
                    _ => None,
                }
            }
        }
    };
}

cacheable!(TestimonialStats, Testimonials, |s| s, |s| s);
cacheable!(CalculatedPerformanceData, Performance, Box::new, |b: Box<_>| *b);
cacheable!(CalculatedStats, Stats, |s| s, |s| s);
cacheable!(PricingBreakdown, Pricing, |s| s, |s| s);

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub default_ttl: Duration,
    pub ttls: BTreeMap<StatCategory, Duration>,
    pub scale: ScaleTable,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let ttls = [
            (StatCategory::TestimonialStats, Duration::from_secs(10 * 60)),
            (StatCategory::PerformanceData, Duration::from_secs(30 * 60)),
            (StatCategory::CalculatedStats, Duration::from_secs(60 * 60)),
            (StatCategory::PackagePricing, Duration::from_secs(60 * 60)),
        ]
        .into_iter()
        .collect();

        Self {
            default_ttl: DEFAULT_TTL,
            ttls,
            scale: ScaleTable::default(),
        }
    }
}

impl EngineSettings {
    pub fn ttl_for(&self, category: StatCategory) -> Duration {
        self.ttls.get(&category).copied().unwrap_or(self.default_ttl)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub hit_rate: f64,
    pub average_computation_time_ms: f64,
    pub computations: u64,
    pub fallbacks: u64,
    pub cache_size: usize,
    pub expired_entries: usize,
}

/// Entry point for every derived statistic: hash, look up, compute, store.
///
/// `calculate_*` never fails. A calculator error is logged and answered with
/// that calculator's fallback dataset, which is never written to the cache.
pub struct StatsEngine {
    cache: Arc<TtlCache<CachedStat>>,
    metrics: MetricsRecorder,
    settings: EngineSettings,
    testimonials: TestimonialCalculator,
    performance: PerformanceCalculator,
    stats: StatsCalculator,
    pricing: PricingCalculator,
}

impl StatsEngine {
    pub fn new(settings: EngineSettings) -> Self {
        let cache = Arc::new(TtlCache::new(settings.default_ttl));
        Self::with_cache(cache, settings)
    }

    pub fn with_cache(cache: Arc<TtlCache<CachedStat>>, settings: EngineSettings) -> Self {
        let scale = Arc::new(settings.scale.clone());
        Self {
            cache,
            metrics: MetricsRecorder::new(),
            testimonials: TestimonialCalculator::new(),
            performance: PerformanceCalculator::new(scale.clone()),
            stats: StatsCalculator::new(scale),
            pricing: PricingCalculator::new(),
            settings,
        }
    }

    pub fn cache(&self) -> &Arc<TtlCache<CachedStat>> {
        &self.cache
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn calculate_testimonial_stats(&self, testimonials: &[Testimonial]) -> TestimonialStats {
        let key = content_key(StatCategory::TestimonialStats, || {
            ContentHasher::hash_collection(testimonials)
        });
        self.run(
            &self.testimonials,
            StatCategory::TestimonialStats,
            key,
            testimonials,
        )
    }

    pub fn calculate_performance_data(
        &self,
        testimonials: &[Testimonial],
        portfolio: &[PortfolioItem],
        services: &ServiceDefinitions,
    ) -> CalculatedPerformanceData {
        // 輸出依賴輸入順序，不能用 hash_collection
        let key = content_key(StatCategory::PerformanceData, || {
            let testimonials = ContentHasher::hash_value(testimonials)?;
            let portfolio = ContentHasher::hash_value(portfolio)?;
            let services = ContentHasher::hash_value(services)?;
            Ok(ContentHasher::combine(&[&testimonials, &portfolio, &services]))
        });
        self.run(
            &self.performance,
            StatCategory::PerformanceData,
            key,
            PerformanceInput {
                testimonials,
                portfolio,
                services,
            },
        )
    }

    pub fn calculate_stats(
        &self,
        testimonials: &[Testimonial],
        packages: &[LessonPackage],
    ) -> CalculatedStats {
        let key = content_key(StatCategory::CalculatedStats, || {
            let testimonials = ContentHasher::hash_collection(testimonials)?;
            let packages = ContentHasher::hash_collection(packages)?;
            Ok(ContentHasher::combine(&[&testimonials, &packages]))
        });
        self.run(
            &self.stats,
            StatCategory::CalculatedStats,
            key,
            StatsInput {
                testimonials,
                packages,
            },
        )
    }

    /// Cached per package id; the customization only adds a suffix to the key.
    pub fn calculate_package_pricing(
        &self,
        package: &LessonPackage,
        customization: Option<&PricingCustomization>,
    ) -> PricingBreakdown {
        let key = match customization.map(ContentHasher::hash_value).transpose() {
            Ok(hash) => Some(CacheKeyBuilder::build_entity(
                StatCategory::PackagePricing,
                &package.id,
                hash.as_deref(),
            )),
            Err(e) => {
                tracing::warn!("⚠️ Could not fingerprint pricing customization: {}", e);
                None
            }
        };
        self.run(
            &self.pricing,
            StatCategory::PackagePricing,
            key,
            PricingInput {
                package,
                customization,
            },
        )
    }

    pub fn get_performance_metrics(&self) -> PerformanceMetrics {
        let snapshot = self.metrics.snapshot();
        let cache = self.cache.get_stats();
        PerformanceMetrics {
            cache_hits: snapshot.cache_hits,
            cache_misses: snapshot.cache_misses,
            hit_rate: snapshot.hit_rate,
            average_computation_time_ms: snapshot.average_computation_time_ms,
            computations: snapshot.computations,
            fallbacks: snapshot.fallbacks,
            cache_size: cache.size,
            expired_entries: cache.expired,
        }
    }

    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("🗑️ Statistics cache cleared");
    }

    pub fn cleanup(&self) -> usize {
        let evicted = self.cache.cleanup();
        tracing::debug!("🧹 Cleanup evicted {} expired entries", evicted);
        evicted
    }

    /// Starts the periodic sweeper; needs a tokio runtime.
    pub fn spawn_cleanup(&self, interval: Duration) -> CleanupTask {
        CleanupTask::spawn(self.cache.clone(), interval)
    }

    fn run<C>(
        &self,
        calculator: &C,
        category: StatCategory,
        key: Option<String>,
        input: C::Input<'_>,
    ) -> C::Output
    where
        C: Calculator,
        C::Output: CacheableStat,
    {
        let compute = || {
            let started = Instant::now();
            let result = calculator.calculate(input);
            let elapsed = started.elapsed();
            self.metrics.record_computation(elapsed);
            tracing::debug!("⏱️ {} finished in {:?}", calculator.name(), elapsed);
            result
        };

        let outcome = match key {
            Some(key) => {
                let mut computed = false;
                let cached = self.cache.try_get_or_set(
                    &key,
                    || {
                        computed = true;
                        compute().map(CacheableStat::into_cached)
                    },
                    Some(self.settings.ttl_for(category)),
                );

                if computed {
                    self.metrics.record_miss();
                    tracing::debug!("Cache miss: {}", key);
                } else {
                    self.metrics.record_hit();
                    tracing::debug!("Cache hit: {}", key);
                }

                cached.and_then(|stat| {
                    <C::Output as CacheableStat>::from_cached(stat).ok_or_else(|| {
                        StatsError::computation(
                            calculator.name(),
                            format!("cache entry '{}' holds a different statistic", key),
                        )
                    })
                })
            }
            None => {
                self.metrics.record_miss();
                compute()
            }
        };

        match outcome {
            Ok(output) => output,
            Err(e) => {
                self.metrics.record_fallback();
                tracing::warn!(
                    "⚠️ {} failed, serving fallback data: {} (Category: {:?})",
                    calculator.name(),
                    e,
                    e.category()
                );
                calculator.fallback(input)
            }
        }
    }
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

fn content_key<F>(category: StatCategory, hash: F) -> Option<String>
where
    F: FnOnce() -> Result<String>,
{
    match hash() {
        Ok(hash) => Some(CacheKeyBuilder::build(category, Some(&hash))),
        Err(e) => {
            // 沒有 key 就不快取，直接計算
            tracing::warn!("⚠️ Could not fingerprint {} input: {}", category, e);
            None
        }
    }
}
