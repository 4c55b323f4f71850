use crate::core::defaults::FALLBACK_TESTIMONIAL_STATS;
use crate::core::{mean_rating, round_to, validate_ratings};
use crate::domain::model::{Service, ServiceBreakdowns, Testimonial, TestimonialStats};
use crate::domain::ports::Calculator;
use crate::utils::error::Result;

const SERVICES: [Service; 3] = [Service::Performance, Service::Teaching, Service::Collaboration];

#[derive(Debug, Clone, Copy, Default)]
pub struct TestimonialCalculator;

impl TestimonialCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate_stats(&self, testimonials: &[Testimonial]) -> Result<TestimonialStats> {
        validate_ratings(self.name(), testimonials)?;

        let total = testimonials.len();
        if total == 0 {
            return Ok(TestimonialStats::default());
        }

        let mut by_service = ServiceBreakdowns::default();
        for service in SERVICES {
            let subset: Vec<&Testimonial> = testimonials
                .iter()
                .filter(|t| t.service == service)
                .collect();
            let count = subset.len();

            let breakdown = by_service.get_mut(service);
            breakdown.count = count as u32;
            breakdown.percentage = (count as f64 / total as f64 * 100.0).round() as u32;
            breakdown.average_rating = mean_rating(subset.iter().copied())
                .map(|mean| round_to(mean, 1))
                .unwrap_or(0.0);
        }

        let average_rating = mean_rating(testimonials.iter())
            .map(|mean| round_to(mean, 1))
            .unwrap_or(0.0);

        Ok(TestimonialStats {
            total: total as u32,
            average_rating,
            by_service,
            featured: testimonials.iter().filter(|t| t.featured).count() as u32,
            verified: testimonials.iter().filter(|t| t.verified).count() as u32,
        })
    }
}

impl Calculator for TestimonialCalculator {
    type Input<'a> = &'a [Testimonial];
    type Output = TestimonialStats;

    fn name(&self) -> &'static str {
        "TestimonialCalculator"
    }

    fn calculate(&self, testimonials: &[Testimonial]) -> Result<TestimonialStats> {
        self.calculate_stats(testimonials)
    }

    fn fallback(&self, _testimonials: &[Testimonial]) -> TestimonialStats {
        FALLBACK_TESTIMONIAL_STATS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::testimonial;

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = TestimonialCalculator::new().calculate_stats(&[]).unwrap();

        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.featured, 0);
        assert_eq!(stats.verified, 0);
        for service in SERVICES {
            let breakdown = stats.by_service.get(service);
            assert_eq!(breakdown.count, 0);
            assert_eq!(breakdown.percentage, 0);
            assert_eq!(breakdown.average_rating, 0.0);
        }
    }

    #[test]
    fn test_average_is_rounded_to_one_decimal() {
        let testimonials = vec![
            testimonial("1", Service::Performance, "wedding", 5),
            testimonial("2", Service::Performance, "corporate", 5),
            testimonial("3", Service::Teaching, "private", 5),
            testimonial("4", Service::Collaboration, "studio", 4),
        ];

        let stats = TestimonialCalculator::new().calculate_stats(&testimonials).unwrap();
        assert_eq!(stats.total, 4);
        // 4.75 -> 4.8
        assert_eq!(stats.average_rating, 4.8);
    }

    #[test]
    fn test_service_breakdown() {
        let testimonials = vec![
            testimonial("1", Service::Performance, "wedding", 5),
            testimonial("2", Service::Performance, "venue", 4),
            testimonial("3", Service::Teaching, "private", 5),
        ];

        let stats = TestimonialCalculator::new().calculate_stats(&testimonials).unwrap();
        let by = stats.by_service;

        assert_eq!(by.performance.count, 2);
        assert_eq!(by.performance.percentage, 67);
        assert_eq!(by.performance.average_rating, 4.5);
        assert_eq!(by.teaching.count, 1);
        assert_eq!(by.teaching.percentage, 33);
        assert_eq!(by.collaboration.count, 0);
        assert_eq!(by.collaboration.average_rating, 0.0);
    }

    #[test]
    fn test_percentages_sum_to_100_within_rounding() {
        let mut testimonials = Vec::new();
        for i in 0..7 {
            let service = SERVICES[i % 3];
            testimonials.push(testimonial(&i.to_string(), service, "private", 5));
        }

        let stats = TestimonialCalculator::new().calculate_stats(&testimonials).unwrap();
        let by = stats.by_service;
        let sum = by.performance.percentage + by.teaching.percentage + by.collaboration.percentage;
        assert!((99..=101).contains(&sum), "sum was {}", sum);
    }

    #[test]
    fn test_counts_featured_and_verified() {
        let mut a = testimonial("1", Service::Teaching, "private", 5);
        a.featured = true;
        a.verified = true;
        let mut b = testimonial("2", Service::Teaching, "private", 4);
        b.verified = true;

        let stats = TestimonialCalculator::new().calculate_stats(&[a, b]).unwrap();
        assert_eq!(stats.featured, 1);
        assert_eq!(stats.verified, 2);
    }

    #[test]
    fn test_out_of_range_rating_is_a_computation_error() {
        let testimonials = vec![testimonial("1", Service::Teaching, "private", 0)];
        assert!(TestimonialCalculator::new().calculate_stats(&testimonials).is_err());

        let calculator = TestimonialCalculator::new();
        assert_eq!(calculator.fallback(&testimonials), FALLBACK_TESTIMONIAL_STATS);
    }
}
