use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---- 輸入 ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Performance,
    Teaching,
    Collaboration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub service: Service,
    #[serde(default)]
    pub service_sub_type: String,
    pub rating: u8,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    /// ISO date, either `YYYY-MM-DD` or RFC 3339.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPackage {
    pub id: String,
    pub name: String,
    pub sessions: u32,
    #[serde(default)]
    pub features: Vec<String>,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceType {
    Acoustic,
    Band,
    Solo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: String,
    pub performance_type: PerformanceType,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_types: Vec<String>,
    #[serde(default)]
    pub band_description: Option<String>,
    #[serde(default)]
    pub acoustic_description: Option<String>,
    #[serde(default)]
    pub solo_description: Option<String>,
}

pub type ServiceDefinitions = BTreeMap<String, ServiceDefinition>;

/// Everything the content layer hands over in one go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
    #[serde(default)]
    pub packages: Vec<LessonPackage>,
    #[serde(default)]
    pub portfolio: Vec<PortfolioItem>,
    #[serde(default)]
    pub services: ServiceDefinitions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCustomization {
    pub discount_percent: f64,
}

// ---- 輸出：見證統計 ----

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBreakdown {
    pub count: u32,
    pub percentage: u32,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBreakdowns {
    pub performance: ServiceBreakdown,
    pub teaching: ServiceBreakdown,
    pub collaboration: ServiceBreakdown,
}

impl ServiceBreakdowns {
    pub fn get(&self, service: Service) -> &ServiceBreakdown {
        match service {
            Service::Performance => &self.performance,
            Service::Teaching => &self.teaching,
            Service::Collaboration => &self.collaboration,
        }
    }

    pub fn get_mut(&mut self, service: Service) -> &mut ServiceBreakdown {
        match service {
            Service::Performance => &mut self.performance,
            Service::Teaching => &mut self.teaching,
            Service::Collaboration => &mut self.collaboration,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialStats {
    pub total: u32,
    pub average_rating: f64,
    pub by_service: ServiceBreakdowns,
    pub featured: u32,
    pub verified: u32,
}

// ---- 輸出：演出資料 ----

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueBreakdown {
    pub venue: u32,
    pub wedding: u32,
    pub corporate: u32,
    pub private: u32,
    pub festival: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueStats {
    pub total: u32,
    pub by_type: VenueBreakdown,
    pub locations: Vec<String>,
    pub unique_locations: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEvent {
    pub event: String,
    pub location: String,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_events: u32,
    pub by_sub_type: BTreeMap<String, u32>,
    pub recent_events: Vec<RecentEvent>,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaBreakdown {
    pub images: u32,
    pub videos: u32,
    pub audio: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTypeBreakdown {
    pub acoustic: u32,
    pub band: u32,
    pub solo: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_items: u32,
    pub by_type: MediaBreakdown,
    pub by_performance_type: PerformanceTypeBreakdown,
    pub featured: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicReach {
    pub cities: u32,
    pub regions: Vec<String>,
    pub primary_location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceStats {
    pub years_active: u32,
    /// Display string, e.g. `"150+"`.
    pub total_performances: String,
    pub regular_venues: u32,
    pub geographic_reach: GeographicReach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub weddings: bool,
    pub corporate: bool,
    pub private_events: bool,
    pub venues: bool,
    pub festivals: bool,
    pub travel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStats {
    pub event_types: Vec<String>,
    pub specializations: Vec<String>,
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedPerformanceData {
    pub venues: VenueStats,
    pub events: EventStats,
    pub portfolio: PortfolioStats,
    pub experience: ExperienceStats,
    pub services: ServiceStats,
}

// ---- 輸出：整站統計 ----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceSummary {
    pub years_experience: u32,
    pub certifications: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total_students: u32,
    pub active_students: u32,
    pub lessons_delivered: u32,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_performances: u32,
    pub weddings: u32,
    pub corporate_events: u32,
    pub venue_shows: u32,
    pub private_events: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialStats {
    pub instagram_followers: u32,
    pub youtube_subscribers: u32,
    pub facebook_followers: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedStats {
    pub experience: ExperienceSummary,
    pub students: StudentStats,
    pub performances: PerformanceSummary,
    pub social: SocialStats,
    pub average_rating: f64,
    pub satisfaction_score: u32,
}

// ---- 輸出：價格 ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub package_id: String,
    pub base_price: f64,
    pub discount_percent: f64,
    pub discount_amount: f64,
    pub final_price: f64,
    pub sessions: Option<u32>,
    pub per_lesson_cost: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testimonial_deserializes_from_camel_case() {
        let json = serde_json::json!({
            "id": "t1",
            "name": "Sarah & Tom",
            "service": "performance",
            "serviceSubType": "wedding",
            "rating": 5,
            "location": "Melbourne, VIC",
            "date": "2024-02-10",
            "verified": true
        });

        let testimonial: Testimonial = serde_json::from_value(json).unwrap();
        assert_eq!(testimonial.service, Service::Performance);
        assert_eq!(testimonial.service_sub_type, "wedding");
        assert!(testimonial.verified);
        assert!(!testimonial.featured);
        assert!(testimonial.event.is_none());
    }

    #[test]
    fn test_recent_event_serializes_type_field() {
        let event = RecentEvent {
            event: "wedding performance".to_string(),
            location: "Melbourne, VIC".to_string(),
            date: None,
            event_type: "wedding".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "wedding");
    }
}
