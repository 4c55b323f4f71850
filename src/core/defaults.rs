//! Static business constants and the fallback datasets returned when a
//! calculation fails. Fallback counts sit at or above the default scale floors.

use crate::domain::model::{
    Availability, CalculatedPerformanceData, CalculatedStats, EventStats, ExperienceStats,
    ExperienceSummary, GeographicReach, MediaBreakdown, PerformanceSummary,
    PerformanceTypeBreakdown, PortfolioStats, PricingBreakdown, RecentEvent, ServiceBreakdown,
    ServiceBreakdowns, ServiceStats, SocialStats, StudentStats, TestimonialStats, VenueBreakdown,
    VenueStats,
};
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const YEARS_ACTIVE: u32 = 15;
pub const CERTIFICATIONS: u32 = 3;

pub const SOCIAL: SocialStats = SocialStats {
    instagram_followers: 2_400,
    youtube_subscribers: 850,
    facebook_followers: 1_200,
};

pub const DEFAULT_LOCATION: &str = "Melbourne, VIC";
pub const DEFAULT_EVENT_RATING: f64 = 4.9;
pub const DEFAULT_AVERAGE_RATING: f64 = 4.9;
pub const DEFAULT_COMPLETION_RATE: u32 = 95;
pub const DEFAULT_SATISFACTION_SCORE: u32 = 98;
pub const RECENT_EVENT_LIMIT: usize = 6;

pub const AVAILABILITY: Availability = Availability {
    weddings: true,
    corporate: true,
    private_events: true,
    venues: true,
    festivals: true,
    travel: true,
};

pub const BAND_SPECIALIZATION: &str = "Electric Blues & Rock";
pub const ACOUSTIC_SPECIALIZATION: &str = "Acoustic Covers & Originals";
pub const SOLO_SPECIALIZATION: &str = "Solo Guitar & Vocals";

pub const FALLBACK_TESTIMONIAL_STATS: TestimonialStats = TestimonialStats {
    total: 24,
    average_rating: 4.9,
    by_service: ServiceBreakdowns {
        performance: ServiceBreakdown {
            count: 12,
            percentage: 50,
            average_rating: 4.9,
        },
        teaching: ServiceBreakdown {
            count: 9,
            percentage: 38,
            average_rating: 5.0,
        },
        collaboration: ServiceBreakdown {
            count: 3,
            percentage: 12,
            average_rating: 4.7,
        },
    },
    featured: 6,
    verified: 20,
};

pub const FALLBACK_CALCULATED_STATS: CalculatedStats = CalculatedStats {
    experience: ExperienceSummary {
        years_experience: YEARS_ACTIVE,
        certifications: CERTIFICATIONS,
    },
    students: StudentStats {
        total_students: 120,
        active_students: 15,
        lessons_delivered: 500,
        completion_rate: DEFAULT_COMPLETION_RATE,
    },
    performances: PerformanceSummary {
        total_performances: 150,
        weddings: 8,
        corporate_events: 6,
        venue_shows: 12,
        private_events: 4,
    },
    social: SOCIAL,
    average_rating: DEFAULT_AVERAGE_RATING,
    satisfaction_score: DEFAULT_SATISFACTION_SCORE,
};

const FALLBACK_LOCATIONS: [&str; 4] = [
    "Melbourne, VIC",
    "Carlton, VIC",
    "Richmond, VIC",
    "Fitzroy, VIC",
];

pub static FALLBACK_PERFORMANCE_DATA: LazyLock<CalculatedPerformanceData> = LazyLock::new(|| {
    let locations: Vec<String> = FALLBACK_LOCATIONS.iter().map(|l| l.to_string()).collect();

    let by_sub_type: BTreeMap<String, u32> = [
        ("corporate", 1),
        ("private", 1),
        ("venue", 2),
        ("wedding", 2),
    ]
    .into_iter()
    .map(|(sub_type, count)| (sub_type.to_string(), count))
    .collect();

    let recent_events = [
        ("Wedding Reception", "Melbourne, VIC", "wedding"),
        ("Friday Night Blues", "Fitzroy, VIC", "venue"),
        ("End of Year Function", "Melbourne CBD", "corporate"),
    ]
    .into_iter()
    .map(|(event, location, event_type)| RecentEvent {
        event: event.to_string(),
        location: location.to_string(),
        date: None,
        event_type: event_type.to_string(),
    })
    .collect();

    CalculatedPerformanceData {
        venues: VenueStats {
            total: 25,
            by_type: VenueBreakdown {
                venue: 12,
                wedding: 8,
                corporate: 6,
                private: 4,
                festival: 4,
            },
            unique_locations: locations.len() as u32,
            locations: locations.clone(),
        },
        events: EventStats {
            total_events: 150,
            by_sub_type,
            recent_events,
            average_rating: DEFAULT_EVENT_RATING,
        },
        portfolio: PortfolioStats {
            total_items: 12,
            by_type: MediaBreakdown {
                images: 6,
                videos: 4,
                audio: 2,
            },
            by_performance_type: PerformanceTypeBreakdown {
                acoustic: 5,
                band: 4,
                solo: 3,
            },
            featured: 4,
        },
        experience: ExperienceStats {
            years_active: YEARS_ACTIVE,
            total_performances: "150+".to_string(),
            regular_venues: 8,
            geographic_reach: GeographicReach {
                cities: locations.len() as u32,
                regions: locations,
                primary_location: DEFAULT_LOCATION.to_string(),
            },
        },
        services: ServiceStats {
            event_types: ["Weddings", "Corporate Events", "Private Parties", "Venue Performances"]
                .into_iter()
                .map(String::from)
                .collect(),
            specializations: [BAND_SPECIALIZATION, ACOUSTIC_SPECIALIZATION, SOLO_SPECIALIZATION]
                .into_iter()
                .map(String::from)
                .collect(),
            availability: AVAILABILITY,
        },
    }
});

const FALLBACK_LESSON_PRICE: f64 = 75.0;

/// Standard single lesson, labelled with the package that was asked for.
pub fn fallback_pricing(package_id: &str) -> PricingBreakdown {
    PricingBreakdown {
        package_id: package_id.to_string(),
        base_price: FALLBACK_LESSON_PRICE,
        discount_percent: 0.0,
        discount_amount: 0.0,
        final_price: FALLBACK_LESSON_PRICE,
        sessions: Some(1),
        per_lesson_cost: Some(FALLBACK_LESSON_PRICE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scale::{ScaleCategory, ScaleTable};

    #[test]
    fn test_fallback_testimonial_percentages_sum_to_100() {
        let by = FALLBACK_TESTIMONIAL_STATS.by_service;
        let sum = by.performance.percentage + by.teaching.percentage + by.collaboration.percentage;
        assert_eq!(sum, 100);
        assert_eq!(
            by.performance.count + by.teaching.count + by.collaboration.count,
            FALLBACK_TESTIMONIAL_STATS.total
        );
    }

    #[test]
    fn test_fallback_performance_data_respects_default_floors() {
        let table = ScaleTable::default();
        let data = &*FALLBACK_PERFORMANCE_DATA;

        assert!(data.venues.total >= table.floor(ScaleCategory::VenuesTotal));
        assert!(data.venues.by_type.venue >= table.floor(ScaleCategory::VenueVenue));
        assert!(data.venues.by_type.wedding >= table.floor(ScaleCategory::VenueWedding));
        assert!(data.venues.by_type.corporate >= table.floor(ScaleCategory::VenueCorporate));
        assert!(data.venues.by_type.private >= table.floor(ScaleCategory::VenuePrivate));
        assert!(data.venues.by_type.festival >= table.floor(ScaleCategory::VenueFestival));
        assert!(data.events.total_events >= table.floor(ScaleCategory::EventsTotal));
        assert!(data.experience.regular_venues >= table.floor(ScaleCategory::RegularVenues));

        let media = data.portfolio.by_type;
        assert_eq!(media.images + media.videos + media.audio, data.portfolio.total_items);
    }

    #[test]
    fn test_fallback_pricing_keeps_package_id() {
        let pricing = fallback_pricing("intensive-8");
        assert_eq!(pricing.package_id, "intensive-8");
        assert_eq!(pricing.final_price, pricing.base_price);
    }
}
