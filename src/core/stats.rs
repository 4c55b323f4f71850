use crate::core::defaults::{
    CERTIFICATIONS, DEFAULT_AVERAGE_RATING, DEFAULT_COMPLETION_RATE, DEFAULT_SATISFACTION_SCORE,
    FALLBACK_CALCULATED_STATS, SOCIAL, YEARS_ACTIVE,
};
use crate::core::scale::{ScaleCategory, ScaleTable};
use crate::core::{mean_rating, performance_only, round_to, validate_ratings};
use crate::domain::model::{
    CalculatedStats, ExperienceSummary, LessonPackage, PerformanceSummary, Service, StudentStats,
    Testimonial,
};
use crate::domain::ports::Calculator;
use crate::utils::error::{Result, StatsError};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct StatsInput<'a> {
    pub testimonials: &'a [Testimonial],
    pub packages: &'a [LessonPackage],
}

/// Site-wide numbers: static constants mixed with values estimated from content.
pub struct StatsCalculator {
    scale: Arc<ScaleTable>,
}

impl StatsCalculator {
    pub fn new(scale: Arc<ScaleTable>) -> Self {
        Self { scale }
    }

    pub fn calculate_stats(&self, input: StatsInput<'_>) -> Result<CalculatedStats> {
        validate_ratings(self.name(), input.testimonials)?;
        self.validate_packages(input.packages)?;

        let overall = mean_rating(input.testimonials.iter());

        Ok(CalculatedStats {
            experience: ExperienceSummary {
                years_experience: YEARS_ACTIVE,
                certifications: CERTIFICATIONS,
            },
            students: self.student_stats(input),
            performances: self.performance_summary(input.testimonials),
            social: SOCIAL,
            average_rating: overall
                .map(|mean| round_to(mean, 1))
                .unwrap_or(DEFAULT_AVERAGE_RATING),
            satisfaction_score: overall
                .map(rating_to_percent)
                .unwrap_or(DEFAULT_SATISFACTION_SCORE),
        })
    }

    fn validate_packages(&self, packages: &[LessonPackage]) -> Result<()> {
        for package in packages {
            if package.sessions == 0 {
                return Err(StatsError::computation(
                    self.name(),
                    format!("package '{}' has no sessions", package.id),
                ));
            }
            if !package.price.is_finite() || package.price < 0.0 {
                return Err(StatsError::computation(
                    self.name(),
                    format!("package '{}' has invalid price {}", package.id, package.price),
                ));
            }
        }
        Ok(())
    }

    fn student_stats(&self, input: StatsInput<'_>) -> StudentStats {
        let complexity: usize = input
            .packages
            .iter()
            .map(|package| 1 + package.features.len())
            .sum();
        let sessions: usize = input
            .packages
            .iter()
            .map(|package| package.sessions as usize)
            .sum();
        let teaching = mean_rating(
            input
                .testimonials
                .iter()
                .filter(|t| t.service == Service::Teaching),
        );

        StudentStats {
            total_students: self.scale.project(ScaleCategory::TotalStudents, complexity),
            active_students: self
                .scale
                .project(ScaleCategory::ActiveStudents, input.packages.len()),
            lessons_delivered: self.scale.project(ScaleCategory::LessonsDelivered, sessions),
            completion_rate: teaching
                .map(rating_to_percent)
                .unwrap_or(DEFAULT_COMPLETION_RATE),
        }
    }

    fn performance_summary(&self, testimonials: &[Testimonial]) -> PerformanceSummary {
        let performances = performance_only(testimonials);
        let count = |category: ScaleCategory| {
            let raw = performances
                .iter()
                .filter(|t| ScaleCategory::for_sub_type(&t.service_sub_type) == Some(category))
                .count();
            self.scale.project(category, raw)
        };

        PerformanceSummary {
            total_performances: self
                .scale
                .project(ScaleCategory::EventsTotal, performances.len()),
            weddings: count(ScaleCategory::VenueWedding),
            corporate_events: count(ScaleCategory::VenueCorporate),
            venue_shows: count(ScaleCategory::VenueVenue),
            private_events: count(ScaleCategory::VenuePrivate),
        }
    }
}

impl Calculator for StatsCalculator {
    type Input<'a> = StatsInput<'a>;
    type Output = CalculatedStats;

    fn name(&self) -> &'static str {
        "StatsCalculator"
    }

    fn calculate(&self, input: StatsInput<'_>) -> Result<CalculatedStats> {
        self.calculate_stats(input)
    }

    fn fallback(&self, _input: StatsInput<'_>) -> CalculatedStats {
        FALLBACK_CALCULATED_STATS
    }
}

/// A 1..=5 mean as a 0..=100 score.
fn rating_to_percent(mean: f64) -> u32 {
    (mean * 20.0).round().clamp(0.0, 100.0) as u32
}
