//! C-Square Core Library
//!
//! Models, the cached data store, carousel and toast engines, detail views
//! and local storage for the C-Square club site client.

pub mod backend;
pub mod carousel;
pub mod detail;
pub mod error;
pub mod listing;
pub mod models;
pub mod storage;
pub mod store;
pub mod toast;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use backend::{Backend, Collection};
pub use carousel::{Carousel, CarouselConfig, CarouselController, CarouselView};
pub use detail::{CloseTrigger, DetailModal, DetailView, ScrollLock, ScrollState, Selection};
pub use error::{Error, Result};
pub use listing::{EventListing, EventTab, GallerySlide};
pub use models::*;
pub use storage::{Database, MemoryTokenStore, TokenStore, TOKEN_KEY};
pub use store::{DataStore, FetchOutcome, LoadingFlags};
pub use toast::{TimedToast, ToastCandidate, ToastPhase, ToastSource, ToastTiming};
pub use viewport::{Breakpoint, FixedViewport, ItemsPerView, ViewportProvider};
