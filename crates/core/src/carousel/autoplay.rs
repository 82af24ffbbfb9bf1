//! Auto-advance driver
//!
//! The carousel lives behind a mutex shared with one timer task. Every tick
//! re-checks `should_auto_advance` under the lock, so a hover pause takes
//! effect immediately. Changes to the play state, slide count or interval
//! restart the interval from zero. Dropping the controller aborts the task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::trace;

use super::{Carousel, CarouselSnapshot, CarouselView};

struct Shared<T> {
    carousel: Mutex<Carousel<T>>,
    /// Signalled when the timer inputs change
    restart: Notify,
    state_tx: watch::Sender<CarouselSnapshot>,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, Carousel<T>> {
        self.carousel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle owning a carousel and its auto-advance timer
pub struct CarouselController<T> {
    shared: Arc<Shared<T>>,
    timer: JoinHandle<()>,
}

impl<T: Send + 'static> CarouselController<T> {
    /// Start driving `carousel`. Must be called inside a tokio runtime.
    pub fn spawn(carousel: Carousel<T>) -> Self {
        let (state_tx, _) = watch::channel(carousel.snapshot());
        let shared = Arc::new(Shared {
            carousel: Mutex::new(carousel),
            restart: Notify::new(),
            state_tx,
        });
        let timer = tokio::spawn(run_timer(shared.clone()));
        Self { shared, timer }
    }

    /// Observe state changes (manual and timer-driven)
    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.shared.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        self.shared.lock().snapshot()
    }

    pub fn current_slide(&self) -> usize {
        self.shared.lock().current_slide()
    }

    pub fn is_auto_playing(&self) -> bool {
        self.shared.lock().is_auto_playing()
    }

    /// Whether the timer is currently counting towards a tick
    pub fn timer_active(&self) -> bool {
        self.shared.lock().should_auto_advance()
    }

    pub fn next(&self) {
        self.update(Carousel::next);
    }

    pub fn prev(&self) {
        self.update(Carousel::prev);
    }

    pub fn go_to(&self, index: usize) {
        self.update(|c| c.go_to(index));
    }

    pub fn toggle_play(&self) {
        self.update(Carousel::toggle_play);
    }

    pub fn hover_enter(&self) {
        self.update(Carousel::hover_enter);
    }

    pub fn hover_leave(&self) {
        self.update(Carousel::hover_leave);
    }

    pub fn resize(&self, width: u32) {
        self.update(|c| c.resize(width));
    }

    pub fn set_items(&self, items: Vec<T>) {
        self.update(|c| c.set_items(items));
    }

    pub fn render<R>(&self, render_item: impl FnMut(&T, usize) -> R) -> CarouselView<R> {
        self.shared.lock().render(render_item)
    }

    fn update(&self, apply: impl FnOnce(&mut Carousel<T>)) {
        let mut carousel = self.shared.lock();
        let before = carousel.timer_key();
        apply(&mut carousel);
        let restart = carousel.timer_key() != before;
        let snapshot = carousel.snapshot();
        drop(carousel);

        self.shared.state_tx.send_replace(snapshot);
        if restart {
            self.shared.restart.notify_one();
        }
    }
}

impl<T> Drop for CarouselController<T> {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

async fn run_timer<T>(shared: Arc<Shared<T>>) {
    loop {
        let (active, interval) = {
            let carousel = shared.lock();
            (
                carousel.should_auto_advance(),
                carousel.config().slide_interval,
            )
        };

        if !active {
            shared.restart.notified().await;
            continue;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                let mut carousel = shared.lock();
                if carousel.should_auto_advance() {
                    carousel.next();
                    let snapshot = carousel.snapshot();
                    drop(carousel);
                    trace!(slide = snapshot.current_slide, "Auto-advanced carousel");
                    shared.state_tx.send_replace(snapshot);
                }
            }
            _ = shared.restart.notified() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::carousel::CarouselConfig;
    use crate::viewport::ItemsPerView;

    const DESKTOP: u32 = 1280;

    fn controller(len: usize, auto_slide: bool) -> CarouselController<usize> {
        let config = CarouselConfig {
            auto_slide,
            slide_interval: Duration::from_millis(4000),
            items_per_view: ItemsPerView {
                mobile: 1,
                tablet: 2,
                desktop: 3,
            },
            ..Default::default()
        };
        CarouselController::spawn(Carousel::new((0..len).collect(), config, DESKTOP))
    }

    async fn wait(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_advance_every_interval_and_wraps() {
        let carousel = controller(5, true);
        assert_eq!(carousel.snapshot().total_slides, 3);

        wait(3999).await;
        assert_eq!(carousel.current_slide(), 0);
        wait(2).await;
        assert_eq!(carousel.current_slide(), 1);
        wait(4000).await;
        assert_eq!(carousel.current_slide(), 2);
        wait(4000).await;
        assert_eq!(carousel.current_slide(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_pauses_and_leave_restarts_interval() {
        let carousel = controller(5, true);

        wait(3000).await;
        carousel.hover_enter();
        assert!(!carousel.is_auto_playing());
        wait(20_000).await;
        assert_eq!(carousel.current_slide(), 0);

        carousel.hover_leave();
        assert!(carousel.is_auto_playing());
        wait(3999).await;
        assert_eq!(carousel.current_slide(), 0);
        wait(2).await;
        assert_eq!(carousel.current_slide(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_leave_respects_disabled_autoplay() {
        let carousel = controller(5, false);
        carousel.hover_enter();
        carousel.hover_leave();
        assert!(!carousel.is_auto_playing());

        wait(20_000).await;
        assert_eq!(carousel.current_slide(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_timer_with_single_window() {
        let carousel = controller(2, true);
        assert_eq!(carousel.snapshot().total_slides, 0);
        assert!(!carousel.timer_active());

        carousel.next();
        carousel.prev();
        wait(60_000).await;
        assert_eq!(carousel.current_slide(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_navigation_keeps_timer_phase() {
        let carousel = controller(6, true);

        wait(2000).await;
        carousel.next();
        assert_eq!(carousel.current_slide(), 1);
        wait(2001).await;
        assert_eq!(carousel.current_slide(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_play_stops_and_restarts() {
        let carousel = controller(5, true);
        carousel.toggle_play();
        assert!(!carousel.timer_active());
        wait(10_000).await;
        assert_eq!(carousel.current_slide(), 0);

        carousel.toggle_play();
        wait(4001).await;
        assert_eq!(carousel.current_slide(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_items_arriving_later_start_timer() {
        let carousel = controller(0, true);
        assert!(!carousel.timer_active());

        carousel.set_items((0..5).collect());
        assert!(carousel.timer_active());
        wait(4001).await;
        assert_eq!(carousel.current_slide(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_ticks() {
        let carousel = controller(5, true);
        let mut rx = carousel.subscribe();

        wait(4001).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().current_slide, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_after_drop() {
        let carousel = controller(5, true);
        let rx = carousel.subscribe();

        wait(1000).await;
        drop(carousel);
        wait(20_000).await;

        assert_eq!(rx.borrow().current_slide, 0);
        assert!(rx.has_changed().is_err());
    }
}
