//! Home page view model
//!
//! One carousel per section over the shared store, the promotional toast
//! and the detail modal.

use std::sync::Arc;
use std::time::Duration;

use csquare_core::listing::{gallery_slides, EventListing};
use csquare_core::{
    Backend, Carousel, CarouselConfig, CarouselController, CloseTrigger, Collection, DataStore,
    DetailModal, DetailView, Event, EventTab, FacultyMember, FetchOutcome, GallerySlide,
    ItemsPerView, ScrollLock, Selection, TeamMember, TimedToast, ViewportProvider,
};
use tracing::{info, warn};

use crate::config::AppConfig;

const TEAM_SLIDE_INTERVAL: Duration = Duration::from_millis(5000);
const FACULTY_SLIDE_INTERVAL: Duration = Duration::from_millis(6000);

fn team_config(base: &CarouselConfig) -> CarouselConfig {
    CarouselConfig {
        slide_interval: TEAM_SLIDE_INTERVAL,
        items_per_view: ItemsPerView {
            desktop: 4,
            ..base.items_per_view
        },
        ..base.clone()
    }
}

fn faculty_config(base: &CarouselConfig) -> CarouselConfig {
    CarouselConfig {
        slide_interval: FACULTY_SLIDE_INTERVAL,
        ..base.clone()
    }
}

/// The gallery shows one photo at a time on every breakpoint
fn gallery_config(base: &CarouselConfig) -> CarouselConfig {
    CarouselConfig {
        items_per_view: ItemsPerView {
            mobile: 1,
            tablet: 1,
            desktop: 1,
        },
        ..base.clone()
    }
}

pub struct HomePage {
    events: CarouselController<Event>,
    team: CarouselController<TeamMember>,
    faculty: CarouselController<FacultyMember>,
    gallery: CarouselController<GallerySlide>,
    toast: TimedToast,
    modal: DetailModal,
    tab: EventTab,
    viewport: Arc<dyn ViewportProvider>,
}

impl HomePage {
    /// Start the section timers and the toast. Must be called inside a
    /// tokio runtime; the carousels stay empty until [`HomePage::load`].
    pub fn mount<B: Backend + Clone + 'static>(
        store: &DataStore<B>,
        config: &AppConfig,
        viewport: Arc<dyn ViewportProvider>,
        scroll: Arc<dyn ScrollLock>,
    ) -> Self {
        let width = viewport.width();
        let base = &config.carousel;

        Self {
            events: CarouselController::spawn(Carousel::new(Vec::new(), base.clone(), width)),
            team: CarouselController::spawn(Carousel::new(Vec::new(), team_config(base), width)),
            faculty: CarouselController::spawn(Carousel::new(
                Vec::new(),
                faculty_config(base),
                width,
            )),
            gallery: CarouselController::spawn(Carousel::new(
                Vec::new(),
                gallery_config(base),
                width,
            )),
            toast: TimedToast::mount_with(
                store.backend().clone(),
                config.toast.source,
                config.toast.timing(),
                config.request_timeout(),
            ),
            modal: DetailModal::new(scroll),
            tab: EventTab::default(),
            viewport,
        }
    }

    /// Run the initial load and fill every section from the store
    pub async fn load<B: Backend>(&self, store: &DataStore<B>) -> Vec<(Collection, csquare_core::Result<FetchOutcome>)> {
        let results = store.load_all().await;
        for (collection, result) in &results {
            match result {
                Ok(outcome) => info!(collection = %collection, ?outcome, "Section loaded"),
                Err(e) => warn!(collection = %collection, error = %e, "Section failed to load"),
            }
        }
        self.sync(store);
        results
    }

    /// Push the current store snapshots into the carousels
    pub fn sync<B: Backend>(&self, store: &DataStore<B>) {
        self.sync_events(store);
        self.team.set_items(store.team().to_vec());
        self.faculty.set_items(store.faculty().to_vec());
        self.gallery.set_items(gallery_slides(&store.gallery()));
    }

    fn sync_events<B: Backend>(&self, store: &DataStore<B>) {
        let events = match EventListing::build(&store.events(), self.tab, false) {
            EventListing::Events(events) => events,
            _ => Vec::new(),
        };
        self.events.set_items(events);
    }

    pub fn tab(&self) -> EventTab {
        self.tab
    }

    pub fn set_tab<B: Backend>(&mut self, tab: EventTab, store: &DataStore<B>) {
        self.tab = tab;
        self.sync_events(store);
    }

    /// Events section content for the active tab
    pub fn event_listing<B: Backend>(&self, store: &DataStore<B>) -> EventListing {
        EventListing::build(
            &store.events(),
            self.tab,
            store.is_loading(Collection::Events),
        )
    }

    /// Re-read the viewport width and resize every section
    pub fn handle_resize(&self) {
        let width = self.viewport.width();
        self.events.resize(width);
        self.team.resize(width);
        self.faculty.resize(width);
        self.gallery.resize(width);
    }

    pub fn events(&self) -> &CarouselController<Event> {
        &self.events
    }

    pub fn team(&self) -> &CarouselController<TeamMember> {
        &self.team
    }

    pub fn faculty(&self) -> &CarouselController<FacultyMember> {
        &self.faculty
    }

    pub fn gallery(&self) -> &CarouselController<GallerySlide> {
        &self.gallery
    }

    pub fn toast(&self) -> &TimedToast {
        &self.toast
    }

    /// Open the detail modal for a record in the store
    pub fn open_detail<B: Backend>(&mut self, store: &DataStore<B>, collection: Collection, id: &str) -> bool {
        let selection = match collection {
            Collection::Events => store
                .events()
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .map(Selection::Event),
            Collection::Team => store
                .team()
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .map(Selection::Team),
            Collection::Faculty => store
                .faculty()
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .map(Selection::Faculty),
            Collection::Gallery => None,
        };

        match selection {
            Some(selection) => {
                self.modal.open(selection);
                true
            }
            None => false,
        }
    }

    pub fn detail(&self) -> Option<DetailView> {
        self.modal.view()
    }

    pub fn close_detail(&mut self, trigger: CloseTrigger) -> bool {
        self.modal.close(trigger)
    }

    pub fn handle_key(&mut self, key: &str) -> bool {
        self.modal.handle_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use csquare_core::{FixedViewport, ScrollState, ToastPhase};
    use serde_json::{json, Value};

    #[derive(Clone, Default)]
    struct MapBackend {
        bodies: Arc<Mutex<HashMap<String, Value>>>,
    }

    impl MapBackend {
        fn with(pairs: &[(&str, Value)]) -> Self {
            let backend = Self::default();
            for (path, body) in pairs {
                backend
                    .bodies
                    .lock()
                    .unwrap()
                    .insert(path.to_string(), body.clone());
            }
            backend
        }
    }

    impl Backend for MapBackend {
        async fn get_json(&self, path: &str) -> csquare_core::Result<Value> {
            let body = self.bodies.lock().unwrap().get(path).cloned();
            Ok(body.unwrap_or_else(|| json!({ "data": [] })))
        }
    }

    fn backend() -> MapBackend {
        MapBackend::with(&[
            (
                "/events",
                json!({ "data": [
                    { "_id": "e1", "type": "upcoming", "date": "2025-09-09", "title": "Hackathon" },
                    { "_id": "e2", "type": "past", "date": "2024-01-10", "title": "Talk" },
                    { "_id": "e3", "type": "upcoming", "date": "2025-10-01", "title": "Meetup" }
                ]}),
            ),
            (
                "/team",
                json!({ "data": (0..6).map(|i| json!({
                    "_id": format!("t{i}"), "name": format!("Member {i}"), "position": "Lead"
                })).collect::<Vec<_>>() }),
            ),
            (
                "/toast",
                json!({ "data": [{ "_id": "n1", "message": "Join us", "isActive": true }] }),
            ),
        ])
    }

    fn mount(store: &DataStore<MapBackend>, width: u32) -> (HomePage, Arc<FixedViewport>, Arc<ScrollState>) {
        let viewport = Arc::new(FixedViewport::new(width));
        let scroll = Arc::new(ScrollState::default());
        let page = HomePage::mount(store, &AppConfig::default(), viewport.clone(), scroll.clone());
        (page, viewport, scroll)
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_fills_sections() {
        let store = DataStore::new(backend());
        let (page, _, _) = mount(&store, 1280);

        page.load(&store).await;

        // Upcoming tab by default
        assert_eq!(page.events().snapshot().total_slides, 0);
        assert_eq!(page.team().snapshot().total_slides, 3);
        // Empty gallery falls back to the built-in photos
        assert_eq!(page.gallery().snapshot().total_slides, 4);
        assert_eq!(page.faculty().snapshot().total_slides, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_switch_filters_events() {
        let store = DataStore::new(backend());
        let (mut page, _, _) = mount(&store, 375);
        page.load(&store).await;
        assert_eq!(page.events().snapshot().total_slides, 2);

        page.set_tab(EventTab::Past, &store);
        assert_eq!(page.events().snapshot().total_slides, 1);
        assert!(matches!(page.event_listing(&store), EventListing::Events(ref e) if e.len() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_clamps_team_carousel() {
        let store = DataStore::new(backend());
        let (page, viewport, _) = mount(&store, 375);
        page.load(&store).await;

        page.team().go_to(5);
        assert_eq!(page.team().current_slide(), 5);

        viewport.set_width(1280);
        page.handle_resize();
        assert_eq!(page.team().snapshot().items_to_show, 4);
        assert_eq!(page.team().current_slide(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_appears_after_show_delay() {
        let store = DataStore::new(backend());
        let (page, _, _) = mount(&store, 1280);

        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert_eq!(page.toast().phase(), ToastPhase::Visible);
        assert_eq!(page.toast().card().unwrap().headline, "Join us");
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_modal_holds_scroll_until_closed() {
        let store = DataStore::new(backend());
        let (mut page, _, scroll) = mount(&store, 1280);
        page.load(&store).await;

        assert!(!page.open_detail(&store, Collection::Team, "nobody"));
        assert!(page.open_detail(&store, Collection::Team, "t2"));
        assert!(scroll.is_suppressed());
        assert_eq!(page.detail().unwrap().title, "Member 2");

        assert!(page.handle_key("Escape"));
        assert!(!scroll.is_suppressed());
        assert!(!page.close_detail(CloseTrigger::CloseButton));
    }
}
