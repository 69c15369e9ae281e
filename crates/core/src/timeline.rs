use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

const BUNDLED_TIMELINE: &str = include_str!("../data/timeline.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Announcement,
    Implementation,
    Escalation,
    Pause,
    Agreement,
    Retaliation,
}

impl EventCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Announcement => "Announcement",
            Self::Implementation => "Implementation",
            Self::Escalation => "Escalation",
            Self::Pause => "Pause",
            Self::Agreement => "Agreement",
            Self::Retaliation => "Retaliation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    /// Country ids the event applies to. Empty means global.
    #[serde(default)]
    pub countries: Vec<String>,
}

impl TimelineEvent {
    pub fn is_global(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn involves(&self, country_id: &str) -> bool {
        self.countries
            .iter()
            .any(|id| id.eq_ignore_ascii_case(country_id))
    }
}

/// Policy events in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new(mut events: Vec<TimelineEvent>) -> Self {
        // Stable, so same-day events keep their authored order.
        events.sort_by_key(|event| event.date);
        Self { events }
    }

    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        let events: Vec<TimelineEvent> = serde_json::from_str(json)?;
        Ok(Self::new(events))
    }

    pub fn bundled() -> Result<Self, TimelineError> {
        Self::from_json(BUNDLED_TIMELINE)
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events naming `country_id`, plus global ones when `include_global`.
    pub fn events_for(&self, country_id: &str, include_global: bool) -> Vec<&TimelineEvent> {
        self.events
            .iter()
            .filter(|event| event.involves(country_id) || (include_global && event.is_global()))
            .collect()
    }

    /// Events strictly after `date`.
    pub fn upcoming(&self, date: NaiveDate) -> &[TimelineEvent] {
        let start = self.events.partition_point(|event| event.date <= date);
        &self.events[start..]
    }

    pub fn latest(&self) -> Option<&TimelineEvent> {
        self.events.last()
    }
}
