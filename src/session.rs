//! Session controller
//!
//! Owns the current run, the best score and the stats-tick liveness token.
//! Hosts drive it with wall-clock times; it never reads a clock itself.

use crate::highscores::BestScore;
use crate::persistence::KeyValueStore;
use crate::sim::spawn::try_spawn_collectible;
use crate::sim::{self, GameEvent, GamePhase, GameState, Grid, Heading, Outcome, autopilot_heading, modifier};
use crate::tuning::Tuning;
use crate::format_clock;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Intro screen, no run yet (or back at the menu)
    Idle,
    Running,
    Paused,
    Ended(Outcome),
}

/// Ties a periodic stats task to the run that started it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerToken(u64);

/// Result of a finished run, for the game-over screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub outcome: Outcome,
    pub final_score: u64,
    pub elapsed_secs: u64,
    pub collected: u32,
    pub new_best: bool,
}

/// Values the host shows in the stat panel after every frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudSnapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub lives: u8,
    pub pursuer_length: usize,
    /// "Hunt" while the hunt modifier is active, "Flee" otherwise
    pub mode_label: &'static str,
    /// Elapsed play time as `MM:SS`
    pub elapsed: String,
    /// Whole seconds left on the active modifier
    pub modifier_secs_left: Option<u64>,
    pub collected: u32,
    pub games_played: u32,
    pub best_score: u64,
    pub autopilot: bool,
}

/// One player's session: menu, runs, and the record across runs
pub struct Session {
    grid: Grid,
    tuning: Tuning,
    game: Option<GameState>,
    best: BestScore,
    store: Box<dyn KeyValueStore>,
    games_played: u32,
    /// Bumped whenever a run starts, ends or is abandoned
    epoch: u64,
    last_summary: Option<SessionSummary>,
    autopilot: bool,
}

impl Session {
    pub fn new(grid: Grid, tuning: Tuning, store: Box<dyn KeyValueStore>) -> Self {
        let best = BestScore::load(store.as_ref());
        Self {
            grid,
            tuning,
            game: None,
            best,
            store,
            games_played: 0,
            epoch: 0,
            last_summary: None,
            autopilot: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match self.game.as_ref().map(|g| g.phase) {
            None => SessionPhase::Idle,
            Some(GamePhase::Running) => SessionPhase::Running,
            Some(GamePhase::Paused) => SessionPhase::Paused,
            Some(GamePhase::Ended(outcome)) => SessionPhase::Ended(outcome),
        }
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn best_score(&self) -> u64 {
        self.best.value()
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        if self.autopilot != on {
            self.autopilot = on;
            log::info!("Autopilot: {on}");
        }
    }

    pub fn toggle_autopilot(&mut self) -> bool {
        self.set_autopilot(!self.autopilot);
        self.autopilot
    }

    /// Start a fresh run at wall time `now`, abandoning any current one.
    ///
    /// The returned token is the only one [`Session::stats_tick`] accepts.
    pub fn start(&mut self, seed: u64, now: f64) -> TickerToken {
        let mut game = GameState::new(seed, self.grid, self.tuning.clone(), now);
        try_spawn_collectible(&mut game);
        game.drain_events();
        self.game = Some(game);
        self.last_summary = None;
        self.epoch += 1;
        log::info!(
            "Game started (seed {seed}, grid {}x{})",
            self.grid.width,
            self.grid.height
        );
        TickerToken(self.epoch)
    }

    /// Leave the game-over screen for the menu
    pub fn back_to_menu(&mut self) -> bool {
        if !matches!(self.phase(), SessionPhase::Ended(_)) {
            return false;
        }
        self.game = None;
        self.epoch += 1;
        log::info!("Back to menu");
        true
    }

    /// Pause or resume. Returns the new phase, `None` outside a live run.
    pub fn toggle_pause(&mut self, now: f64) -> Option<SessionPhase> {
        let game = self.game.as_mut()?;
        if game.is_over() {
            return None;
        }
        sim::toggle_pause(game, now);
        Some(self.phase())
    }

    /// Player steering; ignored unless running
    pub fn steer(&mut self, heading: Heading) -> bool {
        match self.game.as_mut() {
            Some(game) => sim::steer(game, heading),
            None => false,
        }
    }

    /// Advance one rendered frame at wall time `now`
    pub fn frame(&mut self, now: f64) -> Vec<GameEvent> {
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        let was_over = game.is_over();

        if self.autopilot && game.is_running() {
            let heading = autopilot_heading(game);
            sim::steer(game, heading);
        }
        sim::frame(game, now);

        let just_ended = !was_over && game.is_over();
        let events = game.drain_events();
        if just_ended {
            self.finish();
        }
        events
    }

    /// One period of the stats task. Returns false when `token` is stale
    /// and the host should cancel the task.
    pub fn stats_tick(&mut self, token: TickerToken) -> bool {
        if !self.is_ticker_live(token) {
            return false;
        }
        match self.game.as_mut() {
            Some(game) => {
                sim::stats_tick(game);
                true
            }
            None => false,
        }
    }

    /// Events raised by the stats tick since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.game
            .as_mut()
            .map(GameState::drain_events)
            .unwrap_or_default()
    }

    pub fn is_ticker_live(&self, token: TickerToken) -> bool {
        token.0 == self.epoch && self.game.as_ref().is_some_and(|g| !g.is_over())
    }

    pub fn hud(&self, now: f64) -> HudSnapshot {
        let mut hud = HudSnapshot {
            phase: self.phase(),
            score: 0,
            lives: self.tuning.start_lives,
            pursuer_length: self.tuning.pursuer_start_length,
            mode_label: "Flee",
            elapsed: format_clock(0),
            modifier_secs_left: None,
            collected: 0,
            games_played: self.games_played,
            best_score: self.best.value(),
            autopilot: self.autopilot,
        };
        if let Some(game) = &self.game {
            let game_now = game.game_time(now);
            hud.score = game.final_score.unwrap_or(game.stats.score);
            hud.lives = game.stats.lives;
            hud.pursuer_length = game.pursuer.len();
            hud.mode_label = if game.is_hunting() { "Hunt" } else { "Flee" };
            hud.elapsed = format_clock(game.stats.elapsed_secs);
            hud.modifier_secs_left =
                modifier::remaining_ms(game, game_now).map(|ms| (ms / 1000.0).ceil() as u64);
            hud.collected = game.stats.collected;
        }
        hud
    }

    fn finish(&mut self) {
        let Some(game) = self.game.as_ref() else { return };
        let GamePhase::Ended(outcome) = game.phase else { return };
        let final_score = game.final_score.unwrap_or(game.stats.score);

        self.games_played += 1;
        self.epoch += 1;

        let new_best = match self.best.submit(final_score, self.store.as_mut()) {
            Ok(new_best) => new_best,
            Err(e) => {
                log::warn!("Could not save best score: {e}");
                self.best.value() == final_score
            }
        };

        log::info!(
            "Run over ({outcome:?}): score {final_score}, {} collected, {}",
            game.stats.collected,
            format_clock(game.stats.elapsed_secs)
        );
        self.last_summary = Some(SessionSummary {
            outcome,
            final_score,
            elapsed_secs: game.stats.elapsed_secs,
            collected: game.stats.collected,
            new_best,
        });
    }
}
