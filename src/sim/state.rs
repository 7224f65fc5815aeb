//! Game state and core simulation types
//!
//! Everything a session mutates lives in one [`GameState`] owned by the
//! session controller.

use std::collections::VecDeque;

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::{GameClock, StepTimer};
use super::grid::{Grid, GridPosition, Heading};
use crate::tuning::Tuning;

/// Current phase of a live game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Gameplay time frozen, rendering continues
    Paused,
    /// Run finished
    Ended(Outcome),
}

/// How a run finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The pursuer was eaten down to nothing
    Win,
    /// The player ran out of lives
    Loss,
}

/// The player-controlled point (the apple)
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: GridPosition,
    pub heading: Heading,
    pub timer: StepTimer,
}

/// The AI-controlled chaser (the snake), head first
#[derive(Debug, Clone, PartialEq)]
pub struct Pursuer {
    pub body: VecDeque<GridPosition>,
    pub heading: Heading,
    pub timer: StepTimer,
}

impl Pursuer {
    /// A straight pursuer whose tail trails behind `head` opposite to `heading`
    pub fn new(grid: &Grid, head: GridPosition, length: usize, heading: Heading, timer: StepTimer) -> Self {
        let back = heading.reverse().delta();
        let body = (0..length as i32)
            .map(|i| grid.wrap(head + back * i))
            .collect();
        Self { body, heading, timer }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Option<GridPosition> {
        self.body.front().copied()
    }

    pub fn tail(&self) -> Option<GridPosition> {
        self.body.back().copied()
    }

    pub fn occupies(&self, pos: GridPosition) -> bool {
        self.body.contains(&pos)
    }

    /// Move the head one cell along `heading`; the tail vacates its cell
    pub fn advance(&mut self, grid: &Grid, heading: Heading) {
        let Some(head) = self.head() else { return };
        self.heading = heading;
        self.body.push_front(grid.step(head, heading));
        self.body.pop_back();
    }

    /// Duplicate the tail segment
    pub fn grow(&mut self) -> Option<GridPosition> {
        let tail = self.tail()?;
        self.body.push_back(tail);
        Some(tail)
    }

    /// Remove the tail segment
    pub fn shrink(&mut self) -> Option<GridPosition> {
        self.body.pop_back()
    }
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectibleKind {
    /// Slows the pursuer
    Slow,
    /// Pursuer flees instead of chasing
    Reverse,
    /// Contact eats the pursuer instead of costing a life
    Hunt,
}

impl CollectibleKind {
    pub const ALL: [CollectibleKind; 3] = [
        CollectibleKind::Slow,
        CollectibleKind::Reverse,
        CollectibleKind::Hunt,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CollectibleKind::Slow => "linux",
            CollectibleKind::Reverse => "github",
            CollectibleKind::Hunt => "opensource",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            CollectibleKind::Slow => "🐧",
            CollectibleKind::Reverse => "🐙",
            CollectibleKind::Hunt => "🔓",
        }
    }

    /// RGBA color
    pub fn color(&self) -> [f32; 4] {
        match self {
            CollectibleKind::Slow => [0.0, 0.6, 0.4, 1.0],
            CollectibleKind::Reverse => [1.0, 1.0, 1.0, 1.0],
            CollectibleKind::Hunt => [0.616, 0.306, 0.867, 1.0],
        }
    }

    /// How long the modifier lasts (ms)
    pub fn duration_ms(&self) -> f64 {
        match self {
            CollectibleKind::Slow | CollectibleKind::Reverse => 5000.0,
            CollectibleKind::Hunt => 10_000.0,
        }
    }
}

/// A power-up lying on the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub id: u32,
    pub pos: GridPosition,
    pub kind: CollectibleKind,
    pub collected: bool,
}

/// The single timed modifier currently in effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveModifier {
    pub kind: CollectibleKind,
    /// Gameplay time after which the modifier lapses
    pub expires_at: f64,
}

/// Score and bookkeeping for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub score: u64,
    pub lives: u8,
    pub elapsed_secs: u64,
    pub collected: u32,
}

/// Transient "+1" banner shown after a pickup
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: CollectibleKind,
    pub message: String,
    pub started_at: f64,
    pub duration: f64,
    pub fade: f64,
}

impl Notification {
    pub fn pickup(kind: CollectibleKind, now: f64, tuning: &Tuning) -> Self {
        Self {
            kind,
            message: format!("+1 {} {}", kind.glyph(), kind.label()),
            started_at: now,
            duration: tuning.notification_ms,
            fade: tuning.notification_fade_ms,
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now - self.started_at > self.duration
    }

    /// Opacity with linear fade in and out
    pub fn opacity(&self, now: f64) -> f32 {
        let elapsed = now - self.started_at;
        let alpha = if self.fade <= 0.0 {
            1.0
        } else if elapsed < self.fade {
            elapsed / self.fade
        } else if elapsed > self.duration - self.fade {
            (self.duration - elapsed) / self.fade
        } else {
            1.0
        };
        alpha.clamp(0.0, 1.0) as f32
    }
}

/// Something that happened during a simulation step
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CollectibleSpawned { kind: CollectibleKind, pos: GridPosition },
    Collected { kind: CollectibleKind, pos: GridPosition },
    ModifierActivated(CollectibleKind),
    ModifierExpired(CollectibleKind),
    PursuerBitten { pos: GridPosition, remaining: usize },
    PursuerGrew { tail: GridPosition, length: usize },
    PlayerSpedUp { speed: u32 },
    LifeLost { lives: u8 },
    Relocated { pos: GridPosition },
    Won { final_score: u64 },
    Lost { final_score: u64 },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub grid: Grid,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub clock: GameClock,
    pub player: Player,
    pub pursuer: Pursuer,
    /// Live collectibles (sorted by id)
    pub collectibles: Vec<Collectible>,
    pub modifier: Option<ActiveModifier>,
    pub stats: SessionStats,
    pub notification: Option<Notification>,
    /// Final score once the run has ended
    pub final_score: Option<u64>,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh run starting at wall time `now`
    pub fn new(seed: u64, grid: Grid, tuning: Tuning, now: f64) -> Self {
        let player = Player {
            pos: grid.wrap(IVec2::new(grid.width / 4, grid.height / 2)),
            heading: Heading::Right,
            timer: StepTimer::new(tuning.player_start_speed, now),
        };
        let pursuer = Pursuer::new(
            &grid,
            IVec2::new(grid.width * 3 / 4, grid.height / 2),
            tuning.pursuer_start_length,
            Heading::Right,
            StepTimer::new(tuning.pursuer_base_speed, now),
        );
        let stats = SessionStats {
            lives: tuning.start_lives,
            ..SessionStats::default()
        };

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            grid,
            tuning,
            phase: GamePhase::Running,
            clock: GameClock::new(),
            player,
            pursuer,
            collectibles: Vec::new(),
            modifier: None,
            stats,
            notification: None,
            final_score: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Ended(_))
    }

    /// Gameplay time for a wall-clock reading
    pub fn game_time(&self, wall_now: f64) -> f64 {
        self.clock.game_time(wall_now)
    }

    pub fn modifier_kind(&self) -> Option<CollectibleKind> {
        self.modifier.map(|m| m.kind)
    }

    pub fn is_hunting(&self) -> bool {
        self.modifier_kind() == Some(CollectibleKind::Hunt)
    }

    pub fn collectible_at(&self, pos: GridPosition) -> Option<usize> {
        self.collectibles
            .iter()
            .position(|c| !c.collected && c.pos == pos)
    }

    pub fn live_collectibles(&self) -> usize {
        self.collectibles.iter().filter(|c| !c.collected).count()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Finish the run; later calls are ignored so the outcome fires once
    pub fn end(&mut self, outcome: Outcome, final_score: u64) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::Ended(outcome);
        self.final_score = Some(final_score);
        self.events.push(match outcome {
            Outcome::Win => GameEvent::Won { final_score },
            Outcome::Loss => GameEvent::Lost { final_score },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(40, 30).unwrap()
    }

    #[test]
    fn new_game_layout() {
        let state = GameState::new(1, grid(), Tuning::default(), 0.0);
        assert_eq!(state.player.pos, IVec2::new(10, 15));
        assert_eq!(state.player.heading, Heading::Right);
        assert_eq!(state.player.timer.speed, 8);
        assert_eq!(
            state.pursuer.body.iter().copied().collect::<Vec<_>>(),
            vec![
                IVec2::new(30, 15),
                IVec2::new(29, 15),
                IVec2::new(28, 15),
                IVec2::new(27, 15),
                IVec2::new(26, 15),
            ]
        );
        assert_eq!(state.pursuer.timer.speed, 7);
        assert_eq!(state.stats.lives, 3);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn pursuer_advance_keeps_length() {
        let g = grid();
        let mut pursuer = Pursuer::new(&g, IVec2::new(39, 0), 3, Heading::Right, StepTimer::new(7, 0.0));
        pursuer.advance(&g, Heading::Right);
        assert_eq!(pursuer.head(), Some(IVec2::new(0, 0)));
        assert_eq!(pursuer.tail(), Some(IVec2::new(38, 0)));
        assert_eq!(pursuer.len(), 3);
    }

    #[test]
    fn pursuer_grow_and_shrink() {
        let g = grid();
        let mut pursuer = Pursuer::new(&g, IVec2::new(5, 5), 2, Heading::Down, StepTimer::new(7, 0.0));
        assert_eq!(pursuer.tail(), Some(IVec2::new(5, 4)));
        assert_eq!(pursuer.grow(), Some(IVec2::new(5, 4)));
        assert_eq!(pursuer.len(), 3);
        pursuer.shrink();
        pursuer.shrink();
        pursuer.shrink();
        assert!(pursuer.is_empty());
        assert_eq!(pursuer.shrink(), None);
        assert_eq!(pursuer.grow(), None);
        pursuer.advance(&g, Heading::Up);
        assert!(pursuer.is_empty());
    }

    #[test]
    fn notification_fades() {
        let n = Notification::pickup(CollectibleKind::Hunt, 1000.0, &Tuning::default());
        assert_eq!(n.message, "+1 🔓 opensource");
        assert_eq!(n.opacity(1000.0), 0.0);
        assert!((n.opacity(1150.0) - 0.5).abs() < 1e-6);
        assert_eq!(n.opacity(1750.0), 1.0);
        assert!((n.opacity(2350.0) - 0.5).abs() < 1e-6);
        assert!(!n.is_expired(2500.0));
        assert!(n.is_expired(2501.0));
    }

    #[test]
    fn end_fires_once() {
        let mut state = GameState::new(1, grid(), Tuning::default(), 0.0);
        state.end(Outcome::Win, 500);
        state.end(Outcome::Loss, 0);
        assert_eq!(state.phase, GamePhase::Ended(Outcome::Win));
        assert_eq!(state.final_score, Some(500));
        assert_eq!(state.drain_events(), vec![GameEvent::Won { final_score: 500 }]);
    }
}
