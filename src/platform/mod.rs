//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (performance.now on web, a manual clock natively and in tests)
//! - Input events (key names to game commands)
//!
//! Storage lives in `persistence`.

pub mod input;
pub mod time;

pub use input::{Command, map_key};
#[cfg(target_arch = "wasm32")]
pub use time::BrowserClock;
pub use time::{ManualClock, TimeSource};
