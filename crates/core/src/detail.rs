//! Detail view renderer
//!
//! A clicked team member, faculty mentor or event opens in a modal. The
//! selection is a tagged union; a type tag nobody recognises becomes
//! [`Selection::Unsupported`] and renders a placeholder instead of failing.
//!
//! While the modal is open the page behind it must not scroll. That is a
//! scoped resource: [`ScrollGuard`] suppresses on acquire and restores on
//! drop, whichever way the modal goes away.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::models::{decode, Event, FacultyMember, TeamMember};

/// What the modal is showing
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Team(TeamMember),
    Faculty(FacultyMember),
    Event(Event),
    /// Raw type tag that matched no variant
    Unsupported(String),
}

impl Selection {
    /// Build a selection from a type tag and a raw record
    pub fn from_tagged(kind: &str, record: Value) -> Result<Self> {
        Ok(match kind {
            "team" => Selection::Team(decode(record)?),
            "faculty" => Selection::Faculty(decode(record)?),
            "event" => Selection::Event(decode(record)?),
            other => Selection::Unsupported(other.to_string()),
        })
    }

    pub fn render(&self) -> DetailView {
        match self {
            Selection::Team(member) => render_team(member),
            Selection::Faculty(member) => render_faculty(member),
            Selection::Event(event) => render_event(event),
            Selection::Unsupported(kind) => render_unsupported(kind),
        }
    }
}

/// Rendered modal body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub subtitle: Option<String>,
    pub badge: Option<String>,
    pub avatar: Avatar,
    pub sections: Vec<DetailSection>,
    pub links: Vec<DetailLink>,
}

impl DetailView {
    pub fn is_placeholder(&self) -> bool {
        self.avatar == Avatar::Placeholder
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Photo(String),
    /// Text drawn in place of a missing photo
    Initials(String),
    Banner(String),
    None,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub heading: Option<&'static str>,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Text(String),
    Chips(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLink {
    pub label: String,
    pub href: String,
}

fn text(heading: Option<&'static str>, value: &str) -> Option<DetailSection> {
    let value = value.trim();
    (!value.is_empty()).then(|| DetailSection {
        heading,
        body: SectionBody::Text(value.to_string()),
    })
}

fn chips(heading: &'static str, values: &[String]) -> Option<DetailSection> {
    (!values.is_empty()).then(|| DetailSection {
        heading: Some(heading),
        body: SectionBody::Chips(values.to_vec()),
    })
}

fn link(label: &str, href: Option<&String>) -> Option<DetailLink> {
    href.filter(|h| !h.trim().is_empty()).map(|h| DetailLink {
        label: label.to_string(),
        href: h.clone(),
    })
}

fn email(address: Option<&String>) -> Option<DetailLink> {
    link("Email", address).map(|l| DetailLink {
        href: format!("mailto:{}", l.href),
        ..l
    })
}

fn photo_or(photo: Option<&String>, fallback: impl FnOnce() -> Avatar) -> Avatar {
    match photo.filter(|p| !p.trim().is_empty()) {
        Some(p) => Avatar::Photo(p.clone()),
        None => fallback(),
    }
}

fn render_team(member: &TeamMember) -> DetailView {
    let sections = [
        text(None, member.bio.as_deref().unwrap_or_default()),
        chips("Skills", &member.skills),
    ];
    let links = [
        email(member.email.as_ref()),
        link("LinkedIn", member.linkedin.as_ref()),
        link("GitHub", member.github.as_ref()),
        link("Portfolio", member.portfolio.as_ref()),
    ];

    DetailView {
        title: member.name.clone(),
        subtitle: Some(member.position.clone()),
        badge: member.is_core.then(|| "Core Member".to_string()),
        avatar: photo_or(member.photo.as_ref(), || {
            Avatar::Initials(member.display_initials())
        }),
        sections: sections.into_iter().flatten().collect(),
        links: links.into_iter().flatten().collect(),
    }
}

fn render_faculty(member: &FacultyMember) -> DetailView {
    let sections = [
        text(None, &member.department),
        text(None, member.bio.as_deref().unwrap_or_default()),
        text(Some("Experience"), member.experience.as_deref().unwrap_or_default()),
        text(Some("Education"), member.education.as_deref().unwrap_or_default()),
        chips("Specialization", &member.specialization),
    ];
    let links = [
        email(member.email.as_ref()),
        link("LinkedIn", member.linkedin.as_ref()),
    ];

    DetailView {
        title: member.name.clone(),
        subtitle: Some(member.designation.clone()),
        badge: None,
        avatar: photo_or(member.photo.as_ref(), || match member.initial() {
            Some(c) => Avatar::Initials(c.to_string()),
            None => Avatar::None,
        }),
        sections: sections.into_iter().flatten().collect(),
        links: links.into_iter().flatten().collect(),
    }
}

fn render_event(event: &Event) -> DetailView {
    let mut when = event.display_date();
    if let Some(time) = event.time.as_deref().filter(|t| !t.trim().is_empty()) {
        when = format!("{when} at {time}");
    }

    let sections = [
        text(Some("When"), &when),
        text(Some("Where"), event.location.as_deref().unwrap_or_default()),
        text(None, &event.description),
        chips("Tags", &event.tags),
    ];
    let cta = link(event.link_label(), event.link.as_ref());

    DetailView {
        title: event.title.clone(),
        subtitle: None,
        badge: Some(event.kind.to_string()),
        avatar: event
            .image
            .as_ref()
            .filter(|i| !i.trim().is_empty())
            .map(|i| Avatar::Banner(i.clone()))
            .unwrap_or(Avatar::None),
        sections: sections.into_iter().flatten().collect(),
        links: cta.into_iter().collect(),
    }
}

fn render_unsupported(kind: &str) -> DetailView {
    debug!(kind, "No detail renderer for type");
    DetailView {
        title: "Invalid type".to_string(),
        subtitle: None,
        badge: None,
        avatar: Avatar::Placeholder,
        sections: Vec::new(),
        links: Vec::new(),
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(subtitle) = &self.subtitle {
            writeln!(f, "{subtitle}")?;
        }
        if let Some(badge) = &self.badge {
            writeln!(f, "[{badge}]")?;
        }
        for section in &self.sections {
            if let Some(heading) = section.heading {
                write!(f, "{heading}: ")?;
            }
            match &section.body {
                SectionBody::Text(t) => writeln!(f, "{t}")?,
                SectionBody::Chips(items) => writeln!(f, "{}", items.join(", "))?,
            }
        }
        for l in &self.links {
            writeln!(f, "{} <{}>", l.label, l.href)?;
        }
        Ok(())
    }
}

/// Background scroll control provided by the host page
pub trait ScrollLock: Send + Sync {
    fn suppress(&self);
    fn restore(&self);
}

/// Counting scroll lock; suppressed while any guard is alive
#[derive(Debug, Default)]
pub struct ScrollState {
    holders: AtomicUsize,
}

impl ScrollState {
    pub fn is_suppressed(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }
}

impl ScrollLock for ScrollState {
    fn suppress(&self) {
        self.holders.fetch_add(1, Ordering::SeqCst);
    }

    fn restore(&self) {
        let _ = self
            .holders
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

/// Held while background scrolling is suppressed
pub struct ScrollGuard {
    lock: Arc<dyn ScrollLock>,
}

impl ScrollGuard {
    pub fn acquire(lock: Arc<dyn ScrollLock>) -> Self {
        lock.suppress();
        Self { lock }
    }
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.lock.restore();
    }
}

/// How the modal was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    Backdrop,
    CloseButton,
    Escape,
}

struct OpenModal {
    selection: Selection,
    _scroll: ScrollGuard,
}

/// Modal shell around the detail renderer
pub struct DetailModal {
    scroll: Arc<dyn ScrollLock>,
    open: Option<OpenModal>,
}

impl DetailModal {
    pub fn new(scroll: Arc<dyn ScrollLock>) -> Self {
        Self { scroll, open: None }
    }

    /// Show `selection`. Reopening swaps the content and keeps the one lock.
    pub fn open(&mut self, selection: Selection) {
        match &mut self.open {
            Some(open) => open.selection = selection,
            None => {
                self.open = Some(OpenModal {
                    selection,
                    _scroll: ScrollGuard::acquire(self.scroll.clone()),
                });
            }
        }
    }

    pub fn close(&mut self, trigger: CloseTrigger) -> bool {
        let was_open = self.open.take().is_some();
        if was_open {
            debug!(?trigger, "Detail modal closed");
        }
        was_open
    }

    /// Keyboard input while the modal is mounted
    pub fn handle_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.close(CloseTrigger::Escape)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.open.as_ref().map(|o| &o.selection)
    }

    pub fn view(&self) -> Option<DetailView> {
        self.selection().map(Selection::render)
    }
}
