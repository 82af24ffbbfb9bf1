//! Event model

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Whether an event is still ahead or already happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Upcoming,
    Past,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Upcoming => "upcoming",
            EventKind::Past => "past",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A club event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub link_text: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tags: Vec<String>,
}

impl Event {
    pub fn is_upcoming(&self) -> bool {
        self.kind == EventKind::Upcoming
    }

    /// Date formatted as `M/D/YYYY`, or the raw value when unparseable
    pub fn display_date(&self) -> String {
        let parsed = DateTime::parse_from_rfc3339(&self.date)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(&self.date, "%Y-%m-%d"));

        match parsed {
            Ok(date) => date.format("%-m/%-d/%Y").to_string(),
            Err(_) => self.date.clone(),
        }
    }

    /// Label for the call-to-action link
    pub fn link_label(&self) -> &str {
        self.link_text
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Learn More")
    }
}

/// Admin form payload for creating or updating an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub date: String,
    pub time: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image: String,
    pub link: String,
    pub link_text: String,
    pub tags: Vec<String>,
}

impl Default for EventDraft {
    fn default() -> Self {
        Self {
            kind: EventKind::Upcoming,
            date: String::new(),
            time: String::new(),
            title: String::new(),
            description: String::new(),
            location: String::new(),
            image: String::new(),
            link: String::new(),
            link_text: String::new(),
            tags: Vec::new(),
        }
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        Self {
            kind: event.kind,
            date: event.date.clone(),
            time: event.time.clone().unwrap_or_default(),
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone().unwrap_or_default(),
            image: event.image.clone().unwrap_or_default(),
            link: event.link.clone().unwrap_or_default(),
            link_text: event.link_text.clone().unwrap_or_default(),
            tags: event.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: &str) -> Event {
        serde_json::from_value(serde_json::json!({
            "_id": "e1",
            "type": "upcoming",
            "date": date,
            "title": "Hackathon",
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_minimal_event() {
        let e = event("2025-09-09");
        assert_eq!(e.id, "e1");
        assert!(e.is_upcoming());
        assert!(e.tags.is_empty());
        assert_eq!(e.time, None);
        assert_eq!(e.link_label(), "Learn More");
    }

    #[test]
    fn test_id_alias() {
        let e: Event = serde_json::from_str(
            r#"{"id":"e2","type":"past","date":"2024-01-01","title":"Talk","linkText":"Slides"}"#,
        )
        .unwrap();
        assert_eq!(e.id, "e2");
        assert_eq!(e.kind, EventKind::Past);
        assert_eq!(e.link_label(), "Slides");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(event("2025-09-09").display_date(), "9/9/2025");
        assert_eq!(event("2025-09-09T10:00:00.000Z").display_date(), "9/9/2025");
        assert_eq!(event("soon").display_date(), "soon");
    }

    #[test]
    fn test_draft_serializes_type_field() {
        let draft = EventDraft {
            title: "Meetup".into(),
            tags: vec!["rust".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["type"], "upcoming");
        assert_eq!(json["linkText"], "");
        assert_eq!(json["tags"][0], "rust");
    }
}
