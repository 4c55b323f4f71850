use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every place a small sample count gets projected into a displayed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleCategory {
    VenuesTotal,
    VenueVenue,
    VenueWedding,
    VenueCorporate,
    VenuePrivate,
    VenueFestival,
    EventsTotal,
    RegularVenues,
    TotalStudents,
    ActiveStudents,
    LessonsDelivered,
}

impl ScaleCategory {
    pub const ALL: [ScaleCategory; 11] = [
        ScaleCategory::VenuesTotal,
        ScaleCategory::VenueVenue,
        ScaleCategory::VenueWedding,
        ScaleCategory::VenueCorporate,
        ScaleCategory::VenuePrivate,
        ScaleCategory::VenueFestival,
        ScaleCategory::EventsTotal,
        ScaleCategory::RegularVenues,
        ScaleCategory::TotalStudents,
        ScaleCategory::ActiveStudents,
        ScaleCategory::LessonsDelivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleCategory::VenuesTotal => "venues_total",
            ScaleCategory::VenueVenue => "venue_venue",
            ScaleCategory::VenueWedding => "venue_wedding",
            ScaleCategory::VenueCorporate => "venue_corporate",
            ScaleCategory::VenuePrivate => "venue_private",
            ScaleCategory::VenueFestival => "venue_festival",
            ScaleCategory::EventsTotal => "events_total",
            ScaleCategory::RegularVenues => "regular_venues",
            ScaleCategory::TotalStudents => "total_students",
            ScaleCategory::ActiveStudents => "active_students",
            ScaleCategory::LessonsDelivered => "lessons_delivered",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == value)
    }

    /// Maps a testimonial `serviceSubType` onto its venue rule, case-insensitively.
    pub fn for_sub_type(sub_type: &str) -> Option<Self> {
        match sub_type.trim().to_ascii_lowercase().as_str() {
            "venue" => Some(ScaleCategory::VenueVenue),
            "wedding" => Some(ScaleCategory::VenueWedding),
            "corporate" => Some(ScaleCategory::VenueCorporate),
            "private" => Some(ScaleCategory::VenuePrivate),
            "festival" => Some(ScaleCategory::VenueFestival),
            _ => None,
        }
    }
}

impl fmt::Display for ScaleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRule {
    pub scale_factor: f64,
    pub floor: u32,
}

impl ScaleRule {
    pub const fn new(scale_factor: f64, floor: u32) -> Self {
        Self {
            scale_factor,
            floor,
        }
    }

    /// `max(floor, round(raw * scale_factor))`
    pub fn project(&self, raw: usize) -> u32 {
        let scaled = (raw as f64 * self.scale_factor).round();
        let scaled = if scaled.is_finite() && scaled > 0.0 {
            scaled.min(u32::MAX as f64) as u32
        } else {
            0
        };
        scaled.max(self.floor)
    }
}

// 行銷用的放大倍數，保留原值，可用設定檔覆寫
pub const DEFAULT_SCALE_RULES: [(ScaleCategory, ScaleRule); 11] = [
    (ScaleCategory::VenuesTotal, ScaleRule::new(6.5, 25)),
    (ScaleCategory::VenueVenue, ScaleRule::new(6.5, 12)),
    (ScaleCategory::VenueWedding, ScaleRule::new(6.5, 8)),
    (ScaleCategory::VenueCorporate, ScaleRule::new(6.5, 6)),
    (ScaleCategory::VenuePrivate, ScaleRule::new(6.5, 4)),
    (ScaleCategory::VenueFestival, ScaleRule::new(6.5, 4)),
    (ScaleCategory::EventsTotal, ScaleRule::new(10.0, 150)),
    (ScaleCategory::RegularVenues, ScaleRule::new(2.0, 8)),
    (ScaleCategory::TotalStudents, ScaleRule::new(8.0, 120)),
    (ScaleCategory::ActiveStudents, ScaleRule::new(5.0, 15)),
    (ScaleCategory::LessonsDelivered, ScaleRule::new(25.0, 500)),
];

/// Scale factors and floors shared by every calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTable {
    rules: BTreeMap<ScaleCategory, ScaleRule>,
}

impl Default for ScaleTable {
    fn default() -> Self {
        Self {
            rules: DEFAULT_SCALE_RULES.into_iter().collect(),
        }
    }
}

impl ScaleTable {
    pub fn rule(&self, category: ScaleCategory) -> ScaleRule {
        self.rules
            .get(&category)
            .copied()
            .unwrap_or_else(|| default_rule(category))
    }

    pub fn set(&mut self, category: ScaleCategory, rule: ScaleRule) {
        self.rules.insert(category, rule);
    }

    pub fn with_override(mut self, category: ScaleCategory, rule: ScaleRule) -> Self {
        self.set(category, rule);
        self
    }

    pub fn project(&self, category: ScaleCategory, raw: usize) -> u32 {
        self.rule(category).project(raw)
    }

    pub fn floor(&self, category: ScaleCategory) -> u32 {
        self.rule(category).floor
    }
}

fn default_rule(category: ScaleCategory) -> ScaleRule {
    DEFAULT_SCALE_RULES
        .iter()
        .find(|(candidate, _)| *candidate == category)
        .map(|(_, rule)| *rule)
        .unwrap_or(ScaleRule::new(1.0, 0))
}
