//! Inverted Snake - a grid arcade chase where you play the apple
//!
//! Core modules:
//! - `sim`: Grid simulation (entities, pursuer AI, collisions, power-ups)
//! - `session`: Session lifecycle, best score and the per-second stats tick
//! - `runner`: Host-independent frame loop over an injected time source
//! - `renderer`: Layered drawing onto an abstract 2D display surface
//! - `platform`: Time sources and input mapping
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance
//! - `audio`: Procedural sound effects (Web Audio)

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod runner;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{GameError, GameResult};
pub use highscores::BestScore;
pub use session::{HudSnapshot, Session, SessionPhase, SessionSummary, TickerToken};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Side of one grid cell in pixels
    pub const CELL_SIZE: u32 = 20;
    /// Period of the stats tick (elapsed time, growth, speed-ups)
    pub const STATS_TICK_MS: f64 = 1000.0;
    /// Random placement attempts before a spawn/relocation is skipped
    pub const SPAWN_ATTEMPTS: u32 = 100;
    /// Chance per rendered frame of an opportunistic collectible spawn attempt
    pub const FRAME_SPAWN_CHANCE: f64 = 0.01;
    /// Particles per burst
    pub const PARTICLE_BURST: usize = 15;
    /// Particle lifetime in frames
    pub const PARTICLE_LIFE: u32 = 30;
}

/// Wrap a coordinate into `[0, len)`
#[inline]
pub fn wrap(value: i32, len: i32) -> i32 {
    value.rem_euclid(len)
}

/// Top-left pixel of a grid cell
#[inline]
pub fn cell_to_pixel(cell: IVec2, cell_size: f32) -> Vec2 {
    cell.as_vec2() * cell_size
}

/// Pixel center of a grid cell
#[inline]
pub fn cell_center(cell: IVec2, cell_size: f32) -> Vec2 {
    cell_to_pixel(cell, cell_size) + Vec2::splat(cell_size / 2.0)
}

/// Format whole seconds as `MM:SS`
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
