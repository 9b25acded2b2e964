//! Time-of-day traffic model.
//!
//! A deterministic rule table, not a prediction: the hour of day picks a
//! rush period, the road name picks a major/minor class, and the pair maps
//! to a condition and vehicle count.  [`RoadGraph::update_traffic`] applies
//! the table as a **full overwrite** of every segment — there is no
//! incremental update path.

use pw_core::Timestamp;

use crate::RoadGraph;

// ── TrafficCondition ──────────────────────────────────────────────────────────

/// Discrete congestion level modulating a segment's effective speed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficCondition {
    Free,
    Light,
    Moderate,
    Heavy,
    Blocked,
}

impl TrafficCondition {
    /// Multiplier applied to the free-flow speed limit.
    #[inline]
    pub fn speed_factor(self) -> f64 {
        match self {
            TrafficCondition::Free => 1.0,
            TrafficCondition::Light => 0.8,
            TrafficCondition::Moderate => 0.6,
            TrafficCondition::Heavy => 0.3,
            TrafficCondition::Blocked => 0.05,
        }
    }
}

impl std::fmt::Display for TrafficCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrafficCondition::Free => "free",
            TrafficCondition::Light => "light",
            TrafficCondition::Moderate => "moderate",
            TrafficCondition::Heavy => "heavy",
            TrafficCondition::Blocked => "blocked",
        };
        f.write_str(s)
    }
}

// ── TrafficRules ──────────────────────────────────────────────────────────────

/// Rush-hour windows and major-road classification for the rule table.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficRules {
    /// Morning rush window as inclusive hours, default 07:00–10:59.
    pub morning_rush: (u32, u32),
    /// Evening rush window as inclusive hours, default 17:00–20:59.
    pub evening_rush: (u32, u32),
    /// A road is "major" when its name contains any of these substrings
    /// (case-insensitive).
    pub major_road_names: Vec<String>,
}

impl Default for TrafficRules {
    fn default() -> Self {
        Self {
            morning_rush: (7, 10),
            evening_rush: (17, 20),
            major_road_names: vec![
                "ring road".to_owned(),
                "highway".to_owned(),
                "main".to_owned(),
            ],
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum RushPeriod {
    Morning,
    Evening,
    OffPeak,
}

impl TrafficRules {
    fn period(&self, hour: u32) -> RushPeriod {
        if (self.morning_rush.0..=self.morning_rush.1).contains(&hour) {
            RushPeriod::Morning
        } else if (self.evening_rush.0..=self.evening_rush.1).contains(&hour) {
            RushPeriod::Evening
        } else {
            RushPeriod::OffPeak
        }
    }

    fn is_major(&self, road_name: &str) -> bool {
        let name = road_name.to_lowercase();
        self.major_road_names
            .iter()
            .any(|m| name.contains(&m.to_lowercase()))
    }
}

// ── Graph-wide overwrite ──────────────────────────────────────────────────────

impl RoadGraph {
    /// Overwrite every segment's condition and vehicle count from the rule
    /// table at the given timestamp.
    ///
    /// Takes `&mut self`, so the borrow checker guarantees no search is in
    /// flight over the same graph while conditions change.
    pub fn update_traffic(&mut self, rules: &TrafficRules, at: Timestamp) {
        use TrafficCondition::{Free, Heavy, Light, Moderate};

        let period = rules.period(at.hour_of_day());
        for segment in self.segments.values_mut() {
            let (condition, vehicle_count) = match (period, rules.is_major(&segment.name)) {
                (RushPeriod::Morning, true) => (Heavy, 200),
                (RushPeriod::Morning, false) => (Moderate, 50),
                (RushPeriod::Evening, true) => (Heavy, 250),
                (RushPeriod::Evening, false) => (Light, 30),
                (RushPeriod::OffPeak, _) => (Free, 10),
            };
            segment.condition = condition;
            segment.vehicle_count = vehicle_count;
        }
        self.last_traffic_update = Some(at);
    }
}
