//! Viewport classification
//!
//! Responsive layouts only care which of three breakpoints the current width
//! falls into. The width itself comes from an injected provider.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

/// Widths below this are mobile
pub const TABLET_MIN_WIDTH: u32 = 768;
/// Widths at or above this are desktop
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    pub fn classify(width: u32) -> Self {
        if width < TABLET_MIN_WIDTH {
            Breakpoint::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }
}

/// Items visible at once, per breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsPerView {
    pub mobile: usize,
    pub tablet: usize,
    pub desktop: usize,
}

impl Default for ItemsPerView {
    fn default() -> Self {
        Self {
            mobile: 1,
            tablet: 2,
            desktop: 3,
        }
    }
}

impl ItemsPerView {
    pub fn for_breakpoint(&self, breakpoint: Breakpoint) -> usize {
        let count = match breakpoint {
            Breakpoint::Mobile => self.mobile,
            Breakpoint::Tablet => self.tablet,
            Breakpoint::Desktop => self.desktop,
        };
        count.max(1)
    }

    pub fn for_width(&self, width: u32) -> usize {
        self.for_breakpoint(Breakpoint::classify(width))
    }
}

/// Source of the current viewport width
pub trait ViewportProvider: Send + Sync {
    fn width(&self) -> u32;

    fn breakpoint(&self) -> Breakpoint {
        Breakpoint::classify(self.width())
    }
}

/// Width set by the host (a resize handler, a config value, a test)
#[derive(Debug)]
pub struct FixedViewport {
    width: AtomicU32,
}

impl FixedViewport {
    pub fn new(width: u32) -> Self {
        Self {
            width: AtomicU32::new(width),
        }
    }

    pub fn set_width(&self, width: u32) {
        self.width.store(width, Ordering::Relaxed);
    }
}

impl ViewportProvider for FixedViewport {
    fn width(&self) -> u32 {
        self.width.load(Ordering::Relaxed)
    }
}
