//! Deterministic grid simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time comes in as arguments, never read from the platform
//! - Seeded RNG only
//! - Stable iteration order (collectibles by ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod grid;
pub mod modifier;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ai::{PursuitMode, select_heading};
pub use autopilot::autopilot_heading;
pub use clock::{GameClock, Interval, StepTimer};
pub use collision::{Contact, Resolution, resolve_player_cell};
pub use grid::{Grid, GridPosition, Heading};
pub use state::{
    ActiveModifier, Collectible, CollectibleKind, GameEvent, GamePhase, GameState, Notification,
    Outcome, Player, Pursuer, SessionStats,
};
pub use tick::{advance_player, advance_pursuer, frame, stats_tick, steer, toggle_pause};
