//! Time sources (milliseconds)

use std::cell::Cell;

/// Monotonic wall clock in milliseconds
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

/// Clock advanced by hand, for tests and the headless host
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl TimeSource for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// `performance.now()`, falling back to `Date.now()`
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct BrowserClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for BrowserClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl TimeSource for BrowserClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}
