//! List views over store snapshots: the events page tabs and gallery slides

use serde::{Deserialize, Serialize};

use crate::models::{Event, EventKind, GalleryItem};

/// Tab on the events page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventTab {
    #[default]
    Upcoming,
    Past,
}

impl EventTab {
    pub fn kind(&self) -> EventKind {
        match self {
            EventTab::Upcoming => EventKind::Upcoming,
            EventTab::Past => EventKind::Past,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Some(EventTab::Upcoming),
            "past" => Some(EventTab::Past),
            _ => None,
        }
    }
}

/// What the events section shows for the active tab
#[derive(Debug, Clone, PartialEq)]
pub enum EventListing {
    Loading,
    Events(Vec<Event>),
    Empty { heading: String, message: &'static str },
}

impl EventListing {
    /// Filter `events` for `tab`, keeping backend order
    pub fn build(events: &[Event], tab: EventTab, loading: bool) -> Self {
        if loading {
            return EventListing::Loading;
        }

        let kind = tab.kind();
        let filtered: Vec<Event> = events.iter().filter(|e| e.kind == kind).cloned().collect();
        if !filtered.is_empty() {
            return EventListing::Events(filtered);
        }

        EventListing::Empty {
            heading: format!("No {} events found", kind),
            message: match tab {
                EventTab::Upcoming => "Stay tuned for exciting upcoming events!",
                EventTab::Past => "Check back later for past event highlights.",
            },
        }
    }
}

/// One slide of the photo gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySlide {
    pub src: String,
    pub caption: String,
}

const FALLBACK_SLIDES: [(&str, &str); 4] = [
    (
        "https://images.unsplash.com/photo-1517180102446-f3ece451e9d8?w=800&h=600&fit=crop",
        "Hackathon 2024 - Innovation in Action",
    ),
    (
        "https://images.unsplash.com/photo-1522071820081-009f0129c71c?w=800&h=600&fit=crop",
        "Team Collaboration Workshop",
    ),
    (
        "https://images.unsplash.com/photo-1515169067868-5387ec356754?w=800&h=600&fit=crop",
        "AI/ML Conference 2024",
    ),
    (
        "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=800&h=600&fit=crop",
        "Open Source Contribution Day",
    ),
];

/// Gallery slides, falling back to built-in photos when there are none
pub fn gallery_slides(items: &[GalleryItem]) -> Vec<GallerySlide> {
    if items.is_empty() {
        return FALLBACK_SLIDES
            .iter()
            .map(|(src, caption)| GallerySlide {
                src: src.to_string(),
                caption: caption.to_string(),
            })
            .collect();
    }

    items
        .iter()
        .map(|item| GallerySlide {
            src: item.image_url.clone(),
            caption: item.title.clone(),
        })
        .collect()
}

/// The gallery only loops with more than one slide
pub fn gallery_loops(slides: &[GallerySlide]) -> bool {
    slides.len() > 1
}
