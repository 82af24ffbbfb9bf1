//! Plain-text rendering of the page views

use std::fmt::Write;

use csquare_core::carousel::{CarouselView, PlayControl};
use csquare_core::detail::{Avatar, SectionBody};
use csquare_core::listing::GallerySlide;
use csquare_core::toast::ToastCard;
use csquare_core::{DetailView, Event, EventListing, FacultyMember, TeamMember};

use crate::viewmodel::{AdminData, Status, StatusKind};

pub fn event_line(event: &Event) -> String {
    let mut line = format!("{}  {}", event.display_date(), event.title);
    if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
        let _ = write!(line, " @ {location}");
    }
    line
}

pub fn member_line(member: &TeamMember) -> String {
    format!("[{}] {} - {}", member.display_initials(), member.name, member.position)
}

pub fn faculty_line(member: &FacultyMember) -> String {
    let initial = member.initial().unwrap_or('?');
    format!("[{}] {} - {}", initial, member.name, member.designation)
}

pub fn slide_line(slide: &GallerySlide) -> String {
    format!("{} ({})", slide.caption, slide.src)
}

pub fn carousel(title: &str, view: CarouselView<String>) -> String {
    let mut out = format!("== {title} ==\n");
    match view {
        CarouselView::Empty { message } => {
            let _ = writeln!(out, "  {message}");
        }
        CarouselView::Slides(slides) => {
            for item in &slides.items {
                let _ = writeln!(out, "  {item}");
            }
            if !slides.dots.is_empty() {
                let dots: String = slides
                    .dots
                    .iter()
                    .map(|d| if d.active { '●' } else { '○' })
                    .collect();
                let _ = write!(out, "  {dots}");
                if let Some(control) = slides.play_control {
                    let state = match control {
                        PlayControl::Pause => "playing",
                        PlayControl::Play => "paused",
                    };
                    let _ = write!(out, "  ({state})");
                }
                out.push('\n');
            }
        }
    }
    out
}

pub fn listing(listing: &EventListing) -> String {
    match listing {
        EventListing::Loading => "Loading events...\n".to_string(),
        EventListing::Events(events) => events
            .iter()
            .map(|e| format!("  {}\n", event_line(e)))
            .collect(),
        EventListing::Empty { heading, message } => format!("{heading}\n{message}\n"),
    }
}

pub fn toast(card: &ToastCard) -> String {
    let mut out = String::new();
    if let Some(badge) = card.badge {
        let _ = writeln!(out, "[{badge}]");
    }
    let _ = writeln!(out, "{}", card.headline);
    for detail in &card.details {
        let _ = writeln!(out, "  {detail}");
    }
    if let Some(label) = card.action_label {
        let _ = writeln!(out, "  > {label}");
    }
    out
}

pub fn detail(view: &DetailView) -> String {
    let mut out = String::new();
    match &view.avatar {
        Avatar::Photo(url) | Avatar::Banner(url) => {
            let _ = writeln!(out, "<{url}>");
        }
        Avatar::Initials(initials) => {
            let _ = writeln!(out, "({initials})");
        }
        Avatar::None | Avatar::Placeholder => {}
    }
    let _ = writeln!(out, "{}", view.title);
    if let Some(subtitle) = &view.subtitle {
        let _ = writeln!(out, "{subtitle}");
    }
    if let Some(badge) = &view.badge {
        let _ = writeln!(out, "[{badge}]");
    }
    for section in &view.sections {
        if let Some(heading) = section.heading {
            let _ = writeln!(out, "\n{heading}");
        }
        match &section.body {
            SectionBody::Text(text) => {
                let _ = writeln!(out, "  {text}");
            }
            SectionBody::Chips(chips) => {
                let _ = writeln!(out, "  {}", chips.join(" | "));
            }
        }
    }
    for link in &view.links {
        let _ = writeln!(out, "{}: {}", link.label, link.href);
    }
    out
}

pub fn status(status: &Status) -> String {
    match status.kind {
        StatusKind::Success => format!("ok: {}", status.message),
        StatusKind::Error => format!("error: {}", status.message),
    }
}

pub fn admin_data(data: &AdminData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Events ({})", data.events.len());
    for event in &data.events {
        let _ = writeln!(out, "  {}  [{}] {}", event.id, event.kind, event_line(event));
    }
    let _ = writeln!(out, "Team ({})", data.team.len());
    for member in &data.team {
        let _ = writeln!(out, "  {}  {}", member.id, member_line(member));
    }
    let _ = writeln!(out, "Faculty ({})", data.faculty.len());
    for member in &data.faculty {
        let _ = writeln!(out, "  {}  {}", member.id, faculty_line(member));
    }
    let _ = writeln!(out, "Gallery ({})", data.gallery.len());
    for item in &data.gallery {
        let _ = writeln!(out, "  {}  {} ({})", item.id, item.title, item.image_url);
    }
    out
}
