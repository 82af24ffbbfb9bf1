//! Carousel / slideshow engine
//!
//! A sliding window over an ordered item list. `current_slide` is the offset
//! of the first visible item and `items_to_show` the window width, so the
//! number of reachable offsets is `max(0, len - items_to_show + 1)`. The last
//! offset still shows a full window.
//!
//! [`Carousel`] is the synchronous state machine. [`CarouselController`]
//! shares it with the auto-advance timer task.

mod autoplay;

pub use autoplay::CarouselController;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::viewport::ItemsPerView;

pub const DEFAULT_SLIDE_INTERVAL: Duration = Duration::from_millis(4000);

const EMPTY_MESSAGE: &str = "No items to display";

/// Static carousel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub auto_slide: bool,
    #[serde(rename = "slide_interval_ms", with = "millis")]
    pub slide_interval: Duration,
    pub show_dots: bool,
    pub show_arrows: bool,
    pub items_per_view: ItemsPerView,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_slide: true,
            slide_interval: DEFAULT_SLIDE_INTERVAL,
            show_dots: true,
            show_arrows: true,
            items_per_view: ItemsPerView::default(),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

/// Observable carousel state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselSnapshot {
    pub current_slide: usize,
    pub total_slides: usize,
    pub items_to_show: usize,
    pub is_auto_playing: bool,
}

/// Sliding-window state over `items`
#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    config: CarouselConfig,
    current_slide: usize,
    is_auto_playing: bool,
    items_to_show: usize,
}

impl<T> Carousel<T> {
    /// Create a carousel sized for a viewport of `width` pixels
    pub fn new(items: Vec<T>, config: CarouselConfig, width: u32) -> Self {
        let items_to_show = config.items_per_view.for_width(width);
        Self {
            items,
            is_auto_playing: config.auto_slide,
            config,
            current_slide: 0,
            items_to_show,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    pub fn is_auto_playing(&self) -> bool {
        self.is_auto_playing
    }

    pub fn items_to_show(&self) -> usize {
        self.items_to_show
    }

    pub fn total_slides(&self) -> usize {
        (self.items.len() + 1).saturating_sub(self.items_to_show)
    }

    /// Arrows, dots and the timer only exist with more than one slide
    pub fn is_navigable(&self) -> bool {
        self.total_slides() > 1
    }

    /// Whether the auto-advance timer should be running
    pub fn should_auto_advance(&self) -> bool {
        self.is_auto_playing && self.is_navigable()
    }

    pub fn next(&mut self) {
        if !self.is_navigable() {
            return;
        }
        self.current_slide = (self.current_slide + 1) % self.total_slides();
    }

    pub fn prev(&mut self) {
        if !self.is_navigable() {
            return;
        }
        let total = self.total_slides();
        self.current_slide = (self.current_slide + total - 1) % total;
    }

    /// Jump to a slide, clamped into the valid range
    pub fn go_to(&mut self, index: usize) {
        self.current_slide = index.min(self.last_slide());
    }

    pub fn toggle_play(&mut self) {
        self.is_auto_playing = !self.is_auto_playing;
    }

    /// Pointer entered the carousel
    pub fn hover_enter(&mut self) {
        self.is_auto_playing = false;
    }

    /// Pointer left the carousel; autoplay returns to its configured value
    pub fn hover_leave(&mut self) {
        self.is_auto_playing = self.config.auto_slide;
    }

    /// Recompute the window width for a new viewport width.
    ///
    /// `current_slide` is clamped so the window never runs past the end.
    pub fn resize(&mut self, width: u32) {
        self.items_to_show = self.config.items_per_view.for_width(width);
        self.clamp();
    }

    /// Replace the items (e.g. after a refresh), keeping the offset if valid
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.clamp();
    }

    /// Items currently inside the window
    pub fn visible(&self) -> &[T] {
        let start = self.current_slide.min(self.items.len());
        let end = (start + self.items_to_show).min(self.items.len());
        &self.items[start..end]
    }

    /// Resolve a click on the item at `index`
    pub fn click(&self, index: usize) -> Option<(&T, usize)> {
        self.items.get(index).map(|item| (item, index))
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            current_slide: self.current_slide,
            total_slides: self.total_slides(),
            items_to_show: self.items_to_show,
            is_auto_playing: self.is_auto_playing,
        }
    }

    /// Render the visible window with `render_item(item, index)`
    pub fn render<R>(&self, mut render_item: impl FnMut(&T, usize) -> R) -> CarouselView<R> {
        if self.items.is_empty() {
            return CarouselView::Empty {
                message: EMPTY_MESSAGE,
            };
        }

        let start = self.current_slide.min(self.items.len());
        let items = self
            .visible()
            .iter()
            .enumerate()
            .map(|(offset, item)| render_item(item, start + offset))
            .collect();

        let navigable = self.is_navigable();
        let dots = if self.config.show_dots && navigable {
            (0..self.total_slides())
                .map(|index| Dot {
                    index,
                    active: index == self.current_slide,
                    label: format!("Go to slide {}", index + 1),
                })
                .collect()
        } else {
            Vec::new()
        };

        let play_control = (self.config.auto_slide && navigable).then(|| {
            if self.is_auto_playing {
                PlayControl::Pause
            } else {
                PlayControl::Play
            }
        });

        CarouselView::Slides(SlidesView {
            items,
            current_slide: self.current_slide,
            total_slides: self.total_slides(),
            offset_percent: self.current_slide as f64 * (100.0 / self.items_to_show as f64),
            show_arrows: self.config.show_arrows && navigable,
            dots,
            show_progress: self.is_auto_playing && navigable,
            play_control,
        })
    }

    fn last_slide(&self) -> usize {
        self.total_slides().saturating_sub(1)
    }

    fn clamp(&mut self) {
        self.current_slide = self.current_slide.min(self.last_slide());
    }

    /// Values the timer depends on; a change restarts the interval
    fn timer_key(&self) -> (bool, usize, Duration) {
        (
            self.is_auto_playing,
            self.total_slides(),
            self.config.slide_interval,
        )
    }
}

/// Rendered carousel
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselView<R> {
    Empty { message: &'static str },
    Slides(SlidesView<R>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlidesView<R> {
    /// Rendered items inside the window
    pub items: Vec<R>,
    pub current_slide: usize,
    pub total_slides: usize,
    /// Horizontal translation of the track, in percent
    pub offset_percent: f64,
    pub show_arrows: bool,
    pub dots: Vec<Dot>,
    pub show_progress: bool,
    pub play_control: Option<PlayControl>,
}

/// Pagination dot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dot {
    pub index: usize,
    pub active: bool,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayControl {
    Pause,
    Play,
}

impl PlayControl {
    pub fn title(&self) -> &'static str {
        match self {
            PlayControl::Pause => "Pause",
            PlayControl::Play => "Play",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: u32 = 1280;
    const TABLET: u32 = 900;
    const MOBILE: u32 = 375;

    fn config(desktop: usize) -> CarouselConfig {
        CarouselConfig {
            items_per_view: ItemsPerView {
                mobile: 1,
                tablet: 2,
                desktop,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_seven_items_four_wide_wraps_after_four_steps() {
        let mut carousel = Carousel::new((0..7).collect(), config(4), DESKTOP);
        assert_eq!(carousel.total_slides(), 4);

        for _ in 0..4 {
            carousel.next();
        }
        assert_eq!(carousel.current_slide(), 0);
    }

    #[test]
    fn test_prev_wraps_to_last_slide() {
        let mut carousel = Carousel::new((0..7).collect(), config(4), DESKTOP);
        carousel.prev();
        assert_eq!(carousel.current_slide(), 3);
        assert_eq!(carousel.visible(), &[3, 4, 5, 6]);
    }

    #[test]
    fn test_fewer_items_than_window_is_inert() {
        let mut carousel = Carousel::new(vec!['a', 'b'], config(3), DESKTOP);
        assert_eq!(carousel.total_slides(), 0);
        assert!(!carousel.should_auto_advance());

        carousel.next();
        carousel.prev();
        carousel.go_to(5);
        assert_eq!(carousel.current_slide(), 0);
        assert_eq!(carousel.visible(), &['a', 'b']);
    }

    #[test]
    fn test_hover_restores_configured_autoplay() {
        let mut carousel = Carousel::new((0..5).collect(), config(3), DESKTOP);
        carousel.hover_enter();
        assert!(!carousel.is_auto_playing());
        carousel.hover_leave();
        assert!(carousel.is_auto_playing());

        let manual = CarouselConfig {
            auto_slide: false,
            ..config(3)
        };
        let mut carousel = Carousel::new((0..5).collect(), manual, DESKTOP);
        carousel.hover_enter();
        carousel.hover_leave();
        assert!(!carousel.is_auto_playing());
    }

    #[test]
    fn test_go_to_clamps() {
        let mut carousel = Carousel::new((0..6).collect(), config(3), DESKTOP);
        carousel.go_to(2);
        assert_eq!(carousel.current_slide(), 2);
        carousel.go_to(99);
        assert_eq!(carousel.current_slide(), 3);
    }

    #[test]
    fn test_resize_changes_window_and_clamps() {
        let mut carousel = Carousel::new((0..6).collect(), config(3), MOBILE);
        assert_eq!(carousel.items_to_show(), 1);
        assert_eq!(carousel.total_slides(), 6);
        carousel.go_to(5);

        carousel.resize(TABLET);
        assert_eq!(carousel.items_to_show(), 2);
        assert_eq!(carousel.current_slide(), 4);

        carousel.resize(DESKTOP);
        assert_eq!(carousel.current_slide(), 3);
        assert_eq!(carousel.visible(), &[3, 4, 5]);
    }

    #[test]
    fn test_set_items_clamps_offset() {
        let mut carousel = Carousel::new((0..8).collect(), config(3), DESKTOP);
        carousel.go_to(5);
        carousel.set_items((0..4).collect());
        assert_eq!(carousel.current_slide(), 1);
    }

    #[test]
    fn test_toggle_play() {
        let mut carousel = Carousel::new((0..5).collect(), config(3), DESKTOP);
        carousel.toggle_play();
        assert!(!carousel.is_auto_playing());
        carousel.toggle_play();
        assert!(carousel.is_auto_playing());
    }

    #[test]
    fn test_render_empty_state() {
        let carousel: Carousel<u32> = Carousel::new(Vec::new(), config(3), DESKTOP);
        let view = carousel.render(|item, _| *item);
        assert_eq!(
            view,
            CarouselView::Empty {
                message: "No items to display"
            }
        );
    }

    #[test]
    fn test_render_window_and_controls() {
        let mut carousel = Carousel::new(vec!["a", "b", "c", "d", "e"], config(3), DESKTOP);
        carousel.next();

        let CarouselView::Slides(view) = carousel.render(|item, index| format!("{index}:{item}"))
        else {
            panic!("expected slides");
        };
        assert_eq!(view.items, vec!["1:b", "2:c", "3:d"]);
        assert_eq!(view.total_slides, 3);
        assert!(view.show_arrows);
        assert!(view.show_progress);
        assert_eq!(view.dots.len(), 3);
        assert!(view.dots[1].active);
        assert_eq!(view.dots[2].label, "Go to slide 3");
        assert_eq!(view.play_control, Some(PlayControl::Pause));
        assert!((view.offset_percent - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_render_single_slide_hides_controls() {
        let carousel = Carousel::new(vec![1, 2, 3], config(3), DESKTOP);
        let CarouselView::Slides(view) = carousel.render(|item, _| *item) else {
            panic!("expected slides");
        };
        assert_eq!(view.total_slides, 1);
        assert!(!view.show_arrows);
        assert!(view.dots.is_empty());
        assert!(!view.show_progress);
        assert_eq!(view.play_control, None);
    }

    #[test]
    fn test_click_reports_item_and_index() {
        let carousel = Carousel::new(vec!["a", "b"], config(1), DESKTOP);
        assert_eq!(carousel.click(1), Some((&"b", 1)));
        assert_eq!(carousel.click(2), None);
    }
}
