pub mod defaults;
pub mod engine;
pub mod performance;
pub mod pricing;
pub mod scale;
pub mod stats;
pub mod testimonial;

pub use crate::domain::model::*;
pub use crate::domain::ports::{Calculator, Clock};
pub use crate::utils::error::Result;

use crate::utils::error::StatsError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub(crate) fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

pub(crate) fn validate_ratings(calculator: &str, testimonials: &[Testimonial]) -> Result<()> {
    match testimonials.iter().find(|t| !(1..=5).contains(&t.rating)) {
        Some(bad) => Err(StatsError::computation(
            calculator,
            format!(
                "testimonial '{}' has rating {} outside 1..=5",
                bad.id, bad.rating
            ),
        )),
        None => Ok(()),
    }
}

pub(crate) fn mean_rating<'a>(testimonials: impl Iterator<Item = &'a Testimonial>) -> Option<f64> {
    let (sum, count) = testimonials.fold((0u64, 0u64), |(sum, count), t| {
        (sum + u64::from(t.rating), count + 1)
    });
    (count > 0).then(|| sum as f64 / count as f64)
}

pub(crate) fn performance_only(testimonials: &[Testimonial]) -> Vec<&Testimonial> {
    testimonials
        .iter()
        .filter(|t| t.service == Service::Performance)
        .collect()
}

/// Accepts `YYYY-MM-DD` or RFC 3339; the latter is normalised to UTC.
pub(crate) fn parse_event_date(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::default()));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.naive_utc())
        .map_err(|source| StatsError::DateParseError {
            value: value.to_string(),
            source,
        })
}
