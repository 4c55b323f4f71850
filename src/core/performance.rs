use crate::core::defaults::{
    ACOUSTIC_SPECIALIZATION, AVAILABILITY, BAND_SPECIALIZATION, DEFAULT_EVENT_RATING,
    DEFAULT_LOCATION, FALLBACK_PERFORMANCE_DATA, RECENT_EVENT_LIMIT, SOLO_SPECIALIZATION,
    YEARS_ACTIVE,
};
use crate::core::scale::{ScaleCategory, ScaleTable};
use crate::core::{has_text, mean_rating, parse_event_date, performance_only, validate_ratings};
use crate::domain::model::{
    CalculatedPerformanceData, EventStats, ExperienceStats, GeographicReach, MediaBreakdown,
    PerformanceType, PerformanceTypeBreakdown, PortfolioItem, PortfolioStats, RecentEvent,
    ServiceDefinition, ServiceDefinitions, ServiceStats, Testimonial, VenueBreakdown, VenueStats,
};
use crate::domain::ports::Calculator;
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, LazyLock};

static REGULAR_GIG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Regular|Weekly|Monthly").expect("static regex"));

#[derive(Debug, Clone, Copy)]
pub struct PerformanceInput<'a> {
    pub testimonials: &'a [Testimonial],
    pub portfolio: &'a [PortfolioItem],
    pub services: &'a ServiceDefinitions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl MediaKind {
    /// Video wins over audio when an item carries both.
    pub fn classify(item: &PortfolioItem) -> Self {
        if has_text(item.video_url.as_deref()) {
            MediaKind::Video
        } else if has_text(item.audio_url.as_deref()) {
            MediaKind::Audio
        } else {
            MediaKind::Image
        }
    }
}

pub struct PerformanceCalculator {
    scale: Arc<ScaleTable>,
}

impl PerformanceCalculator {
    pub fn new(scale: Arc<ScaleTable>) -> Self {
        Self { scale }
    }

    pub fn calculate_performance_data(
        &self,
        input: PerformanceInput<'_>,
    ) -> Result<CalculatedPerformanceData> {
        validate_ratings(self.name(), input.testimonials)?;
        let performances = performance_only(input.testimonials);

        let venues = self.venue_stats(&performances);
        let events = self.event_stats(&performances)?;
        let portfolio = portfolio_stats(input.portfolio);
        let experience = self.experience_stats(&performances, &venues, &events);
        let services = service_stats(input.services);

        Ok(CalculatedPerformanceData {
            venues,
            events,
            portfolio,
            experience,
            services,
        })
    }

    fn venue_stats(&self, performances: &[&Testimonial]) -> VenueStats {
        let mut raw: HashMap<ScaleCategory, usize> = HashMap::new();
        for testimonial in performances {
            if let Some(category) = ScaleCategory::for_sub_type(&testimonial.service_sub_type) {
                *raw.entry(category).or_default() += 1;
            }
        }
        let scaled = |category: ScaleCategory| {
            self.scale
                .project(category, raw.get(&category).copied().unwrap_or(0))
        };

        let locations = unique_locations(performances);

        VenueStats {
            total: self.scale.project(ScaleCategory::VenuesTotal, performances.len()),
            by_type: VenueBreakdown {
                venue: scaled(ScaleCategory::VenueVenue),
                wedding: scaled(ScaleCategory::VenueWedding),
                corporate: scaled(ScaleCategory::VenueCorporate),
                private: scaled(ScaleCategory::VenuePrivate),
                festival: scaled(ScaleCategory::VenueFestival),
            },
            unique_locations: locations.len() as u32,
            locations,
        }
    }

    fn event_stats(&self, performances: &[&Testimonial]) -> Result<EventStats> {
        let mut by_sub_type: BTreeMap<String, u32> = BTreeMap::new();
        for testimonial in performances {
            *by_sub_type.entry(sub_type_label(testimonial)).or_default() += 1;
        }

        // 日期解析失敗會讓整個計算退回 fallback
        let mut dated: Vec<(Option<NaiveDateTime>, &Testimonial)> = performances
            .iter()
            .map(|t| match t.date.as_deref().filter(|d| !d.trim().is_empty()) {
                Some(date) => parse_event_date(date).map(|parsed| (Some(parsed), *t)),
                None => Ok((None, *t)),
            })
            .collect::<Result<_>>()?;
        dated.sort_by(|a, b| b.0.cmp(&a.0));

        let recent_events = dated
            .into_iter()
            .take(RECENT_EVENT_LIMIT)
            .map(|(_, t)| recent_event(t))
            .collect();

        Ok(EventStats {
            total_events: self.scale.project(ScaleCategory::EventsTotal, performances.len()),
            by_sub_type,
            recent_events,
            average_rating: mean_rating(performances.iter().copied())
                .unwrap_or(DEFAULT_EVENT_RATING),
        })
    }

    fn experience_stats(
        &self,
        performances: &[&Testimonial],
        venues: &VenueStats,
        events: &EventStats,
    ) -> ExperienceStats {
        let regular = performances
            .iter()
            .filter(|t| t.event.as_deref().is_some_and(|e| REGULAR_GIG.is_match(e)))
            .count();

        ExperienceStats {
            years_active: YEARS_ACTIVE,
            total_performances: format!("{}+", events.total_events),
            regular_venues: self.scale.project(ScaleCategory::RegularVenues, regular),
            geographic_reach: GeographicReach {
                cities: venues.locations.len() as u32,
                regions: venues.locations.clone(),
                primary_location: primary_location(performances),
            },
        }
    }
}

impl Calculator for PerformanceCalculator {
    type Input<'a> = PerformanceInput<'a>;
    type Output = CalculatedPerformanceData;

    fn name(&self) -> &'static str {
        "PerformanceCalculator"
    }

    fn calculate(&self, input: PerformanceInput<'_>) -> Result<CalculatedPerformanceData> {
        self.calculate_performance_data(input)
    }

    fn fallback(&self, _input: PerformanceInput<'_>) -> CalculatedPerformanceData {
        FALLBACK_PERFORMANCE_DATA.clone()
    }
}

fn sub_type_label(testimonial: &Testimonial) -> String {
    let sub_type = testimonial.service_sub_type.trim();
    if sub_type.is_empty() {
        "live".to_string()
    } else {
        sub_type.to_ascii_lowercase()
    }
}

fn recent_event(testimonial: &Testimonial) -> RecentEvent {
    let event_type = sub_type_label(testimonial);
    let event = match testimonial.event.as_deref().map(str::trim) {
        Some(event) if !event.is_empty() => event.to_string(),
        _ => format!("{} performance", event_type),
    };
    let location = match testimonial.location.as_deref().map(str::trim) {
        Some(location) if !location.is_empty() => location.to_string(),
        _ => DEFAULT_LOCATION.to_string(),
    };

    RecentEvent {
        event,
        location,
        date: testimonial
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from),
        event_type,
    }
}

fn unique_locations(performances: &[&Testimonial]) -> Vec<String> {
    let mut seen = HashSet::new();
    performances
        .iter()
        .filter_map(|t| t.location.as_deref().map(str::trim))
        .filter(|location| !location.is_empty() && seen.insert(*location))
        .map(String::from)
        .collect()
}

/// Most frequent location; on a tie the one seen first wins.
fn primary_location(performances: &[&Testimonial]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for location in performances
        .iter()
        .filter_map(|t| t.location.as_deref().map(str::trim))
        .filter(|location| !location.is_empty())
    {
        match counts.iter_mut().find(|(seen, _)| *seen == location) {
            Some((_, count)) => *count += 1,
            None => counts.push((location, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (location, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((location, count)),
        }
    }
    best.map(|(location, _)| location.to_string())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string())
}

fn portfolio_stats(items: &[PortfolioItem]) -> PortfolioStats {
    let mut by_type = MediaBreakdown::default();
    let mut by_performance_type = PerformanceTypeBreakdown::default();

    for item in items {
        match MediaKind::classify(item) {
            MediaKind::Video => by_type.videos += 1,
            MediaKind::Audio => by_type.audio += 1,
            MediaKind::Image => by_type.images += 1,
        }
        match item.performance_type {
            PerformanceType::Acoustic => by_performance_type.acoustic += 1,
            PerformanceType::Band => by_performance_type.band += 1,
            PerformanceType::Solo => by_performance_type.solo += 1,
        }
    }

    PortfolioStats {
        total_items: items.len() as u32,
        by_type,
        by_performance_type,
        featured: items.iter().filter(|item| item.featured).count() as u32,
    }
}

fn service_stats(services: &ServiceDefinitions) -> ServiceStats {
    let mut seen = HashSet::new();
    let event_types = services
        .values()
        .flat_map(|definition| definition.event_types.iter())
        .map(|event_type| event_type.trim())
        .filter(|event_type| !event_type.is_empty() && seen.insert(*event_type))
        .map(String::from)
        .collect();

    let mut specializations = Vec::new();
    if any_described(services, |d| d.band_description.as_deref()) {
        specializations.push(BAND_SPECIALIZATION.to_string());
    }
    if any_described(services, |d| d.acoustic_description.as_deref()) {
        specializations.push(ACOUSTIC_SPECIALIZATION.to_string());
    }
    if any_described(services, |d| d.solo_description.as_deref()) {
        specializations.push(SOLO_SPECIALIZATION.to_string());
    }
    if specializations.is_empty() {
        specializations.push(ACOUSTIC_SPECIALIZATION.to_string());
    }

    ServiceStats {
        event_types,
        specializations,
        availability: AVAILABILITY,
    }
}

fn any_described(
    services: &ServiceDefinitions,
    field: impl Fn(&ServiceDefinition) -> Option<&str>,
) -> bool {
    services.values().any(|definition| has_text(field(definition)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scale::ScaleRule;
    use crate::core::test_support::{portfolio_item, testimonial};
    use crate::domain::model::Service;

    fn calculator() -> PerformanceCalculator {
        PerformanceCalculator::new(Arc::new(ScaleTable::default()))
    }

    fn run(
        testimonials: &[Testimonial],
        portfolio: &[PortfolioItem],
        services: &ServiceDefinitions,
    ) -> Result<CalculatedPerformanceData> {
        calculator().calculate_performance_data(PerformanceInput {
            testimonials,
            portfolio,
            services,
        })
    }

    fn located(id: &str, sub_type: &str, rating: u8, location: &str) -> Testimonial {
        let mut t = testimonial(id, Service::Performance, sub_type, rating);
        t.location = Some(location.to_string());
        t
    }

    #[test]
    fn test_example_scenario() {
        let testimonials = vec![
            located("1", "wedding", 5, "Melbourne, VIC"),
            located("2", "corporate", 5, "Melbourne CBD"),
            located("3", "venue", 5, "Carlton, VIC"),
            located("4", "private", 4, "Richmond, VIC"),
        ];

        let data = run(&testimonials, &[], &ServiceDefinitions::new()).unwrap();

        assert_eq!(data.events.average_rating, 4.75);
        assert_eq!(data.venues.unique_locations, 4);
        assert!(data.venues.by_type.wedding >= 6);
        assert!(data.events.total_events >= 40);
        assert!(data.venues.total >= 25);
    }

    #[test]
    fn test_one_per_sub_type_respects_floors() {
        let testimonials = vec![
            located("1", "wedding", 5, "A"),
            located("2", "corporate", 5, "B"),
            located("3", "venue", 5, "C"),
            located("4", "private", 5, "D"),
        ];
        let data = run(&testimonials, &[], &ServiceDefinitions::new()).unwrap();
        let table = ScaleTable::default();

        assert!(data.venues.total >= 25);
        assert!(data.venues.by_type.wedding >= table.floor(ScaleCategory::VenueWedding));
        assert!(data.venues.by_type.corporate >= table.floor(ScaleCategory::VenueCorporate));
        assert!(data.venues.by_type.venue >= table.floor(ScaleCategory::VenueVenue));
        assert!(data.venues.by_type.private >= table.floor(ScaleCategory::VenuePrivate));
        assert!(data.venues.by_type.festival >= table.floor(ScaleCategory::VenueFestival));
    }

    #[test]
    fn test_scaling_above_floor() {
        let testimonials: Vec<Testimonial> = (0..4)
            .map(|i| located(&i.to_string(), "wedding", 5, "Melbourne, VIC"))
            .collect();
        let data = run(&testimonials, &[], &ServiceDefinitions::new()).unwrap();

        // 4 * 6.5 = 26
        assert_eq!(data.venues.by_type.wedding, 26);
        assert_eq!(data.venues.total, 26);
        assert_eq!(data.events.by_sub_type.get("wedding"), Some(&4));
    }

    #[test]
    fn test_only_performance_testimonials_are_used() {
        let testimonials = vec![
            located("1", "wedding", 4, "Melbourne, VIC"),
            testimonial("2", Service::Teaching, "private", 1),
        ];
        let data = run(&testimonials, &[], &ServiceDefinitions::new()).unwrap();
        assert_eq!(data.events.average_rating, 4.0);
        assert_eq!(data.events.by_sub_type.len(), 1);
    }

    #[test]
    fn test_empty_input_uses_defaults() {
        let data = run(&[], &[], &ServiceDefinitions::new()).unwrap();
        assert_eq!(data.events.average_rating, DEFAULT_EVENT_RATING);
        assert_eq!(data.events.total_events, 150);
        assert_eq!(data.experience.total_performances, "150+");
        assert_eq!(data.experience.geographic_reach.primary_location, DEFAULT_LOCATION);
        assert_eq!(data.venues.unique_locations, 0);
        assert!(data.events.recent_events.is_empty());
    }

    #[test]
    fn test_recent_events_sorted_and_limited() {
        let mut testimonials = Vec::new();
        for day in 1..=8 {
            let mut t = located(&day.to_string(), "venue", 5, "Fitzroy, VIC");
            t.date = Some(format!("2024-03-{:02}", day));
            t.event = Some(format!("Gig {}", day));
            testimonials.push(t);
        }
        let mut undated = located("x", "wedding", 5, "");
        undated.date = None;
        testimonials.push(undated);

        let data = run(&testimonials, &[], &ServiceDefinitions::new()).unwrap();
        let recent = &data.events.recent_events;

        assert_eq!(recent.len(), RECENT_EVENT_LIMIT);
        assert_eq!(recent[0].event, "Gig 8");
        assert_eq!(recent[0].date.as_deref(), Some("2024-03-08"));
        assert_eq!(recent[5].event, "Gig 3");
    }

    #[test]
    fn test_recent_event_fills_missing_fields() {
        let mut t = testimonial("1", Service::Performance, "corporate", 5);
        t.date = Some("2024-05-01T19:30:00+10:00".to_string());

        let data = run(&[t], &[], &ServiceDefinitions::new()).unwrap();
        let event = &data.events.recent_events[0];
        assert_eq!(event.event, "corporate performance");
        assert_eq!(event.location, "Melbourne, VIC");
        assert_eq!(event.event_type, "corporate");
    }

    #[test]
    fn test_unparsable_date_is_an_error() {
        let mut t = located("1", "wedding", 5, "Melbourne, VIC");
        t.date = Some("last summer".to_string());
        assert!(run(&[t], &[], &ServiceDefinitions::new()).is_err());
    }

    #[test]
    fn test_media_tie_break_prefers_video() {
        let mut both = portfolio_item("1", PerformanceType::Band);
        both.video_url = Some("https://example.com/v.mp4".to_string());
        both.audio_url = Some("https://example.com/a.mp3".to_string());
        assert_eq!(MediaKind::classify(&both), MediaKind::Video);

        let mut audio = portfolio_item("2", PerformanceType::Solo);
        audio.audio_url = Some("https://example.com/a.mp3".to_string());
        assert_eq!(MediaKind::classify(&audio), MediaKind::Audio);

        let mut blank_video = portfolio_item("3", PerformanceType::Solo);
        blank_video.video_url = Some(String::new());
        assert_eq!(MediaKind::classify(&blank_video), MediaKind::Image);
    }

    #[test]
    fn test_portfolio_counts_add_up() {
        let mut video = portfolio_item("1", PerformanceType::Band);
        video.video_url = Some("v".to_string());
        video.featured = true;
        let mut audio = portfolio_item("2", PerformanceType::Acoustic);
        audio.audio_url = Some("a".to_string());
        let image = portfolio_item("3", PerformanceType::Acoustic);

        let data = run(&[], &[video, audio, image], &ServiceDefinitions::new()).unwrap();
        let stats = data.portfolio;

        assert_eq!(stats.total_items, 3);
        assert_eq!(
            stats.by_type.images + stats.by_type.videos + stats.by_type.audio,
            stats.total_items
        );
        assert_eq!(stats.by_type.videos, 1);
        assert_eq!(stats.by_performance_type.acoustic, 2);
        assert_eq!(stats.featured, 1);
    }

    #[test]
    fn test_regular_venues_and_primary_location() {
        let mut a = located("1", "venue", 5, "Fitzroy, VIC");
        a.event = Some("Weekly Thursday Residency".to_string());
        let mut b = located("2", "venue", 5, "Carlton, VIC");
        b.event = Some("Regular Sunday Session".to_string());
        let c = located("3", "venue", 5, "Carlton, VIC");
        let d = located("4", "wedding", 5, "Fitzroy, VIC");
        let mut e = located("5", "venue", 5, "Brunswick, VIC");
        e.event = Some("weekly jam".to_string());

        let table = ScaleTable::default()
            .with_override(ScaleCategory::RegularVenues, ScaleRule::new(2.0, 0));
        let data = PerformanceCalculator::new(Arc::new(table))
            .calculate_performance_data(PerformanceInput {
                testimonials: &[a, b, c, d, e],
                portfolio: &[],
                services: &ServiceDefinitions::new(),
            })
            .unwrap();

        // 大小寫有別："weekly jam" 不算
        assert_eq!(data.experience.regular_venues, 4);
        // Fitzroy 與 Carlton 同為 2 次，先出現者勝
        assert_eq!(data.experience.geographic_reach.primary_location, "Fitzroy, VIC");
        assert_eq!(data.experience.geographic_reach.cities, 3);
    }

    #[test]
    fn test_service_stats_union_and_specializations() {
        let mut services = ServiceDefinitions::new();
        services.insert(
            "band".to_string(),
            ServiceDefinition {
                event_types: vec!["Weddings".to_string(), "Festivals".to_string()],
                band_description: Some("Four-piece electric band".to_string()),
                ..Default::default()
            },
        );
        services.insert(
            "solo".to_string(),
            ServiceDefinition {
                event_types: vec!["Weddings".to_string(), "Private Parties".to_string()],
                solo_description: Some("Just me and a guitar".to_string()),
                ..Default::default()
            },
        );

        let data = run(&[], &[], &services).unwrap();
        assert_eq!(
            data.services.event_types,
            vec!["Weddings", "Festivals", "Private Parties"]
        );
        assert_eq!(
            data.services.specializations,
            vec![BAND_SPECIALIZATION, SOLO_SPECIALIZATION]
        );
        assert_eq!(data.services.availability, AVAILABILITY);
    }

    #[test]
    fn test_no_descriptions_gives_default_specialization() {
        let data = run(&[], &[], &ServiceDefinitions::new()).unwrap();
        assert_eq!(data.services.specializations, vec![ACOUSTIC_SPECIALIZATION]);
    }
}
