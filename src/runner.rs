//! Host-independent frame loop
//!
//! Per frame: fire any due stats ticks, step the session, update effects,
//! draw. The stats interval runs only while a run is in progress and stops
//! for good once its token goes stale.

use crate::platform::{Command, TimeSource};
use crate::renderer::{Effects, Surface, colors, draw_frame};
use crate::session::{HudSnapshot, Session, SessionPhase, TickerToken};
use crate::settings::Settings;
use crate::sim::{GameEvent, Interval};
use crate::consts::STATS_TICK_MS;

pub struct Runner<T: TimeSource> {
    session: Session,
    time: T,
    stats: Interval,
    token: Option<TickerToken>,
    effects: Effects,
    pub settings: Settings,
}

impl<T: TimeSource> Runner<T> {
    pub fn new(session: Session, time: T, settings: Settings) -> Self {
        Self {
            session,
            time,
            stats: Interval::stopped(STATS_TICK_MS),
            token: None,
            effects: Effects::new(0x5eed),
            settings,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn now(&self) -> f64 {
        self.time.now_ms()
    }

    /// Whether the stats interval is scheduled
    pub fn ticking(&self) -> bool {
        self.stats.is_running()
    }

    /// Start (or restart) a run
    pub fn start(&mut self, seed: u64) {
        let now = self.now();
        self.token = Some(self.session.start(seed, now));
        self.stats.start(now);
        self.effects.reset();
    }

    pub fn back_to_menu(&mut self) -> bool {
        let left = self.session.back_to_menu();
        if left {
            self.stop_ticker();
            self.effects.reset();
        }
        left
    }

    pub fn toggle_pause(&mut self) -> Option<SessionPhase> {
        let now = self.now();
        let phase = self.session.toggle_pause(now)?;
        match phase {
            SessionPhase::Paused => self.stats.freeze(now),
            SessionPhase::Running if self.token.is_some() => self.stats.thaw(now),
            _ => {}
        }
        Some(phase)
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Steer(heading) => {
                self.session.steer(heading);
            }
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::ToggleAutopilot => {
                self.session.toggle_autopilot();
            }
        }
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.session.set_autopilot(on);
    }

    /// Run one frame and draw it. Returns the frame's game events.
    pub fn run_frame(&mut self, surface: &mut dyn Surface) -> Vec<GameEvent> {
        let now = self.now();

        for _ in 0..self.stats.poll(now) {
            let live = self.token.is_some_and(|t| self.session.stats_tick(t));
            if !live {
                self.stop_ticker();
                break;
            }
        }

        let mut events = self.session.drain_events();
        events.extend(self.session.frame(now));
        if self.token.is_some_and(|t| !self.session.is_ticker_live(t)) {
            self.stop_ticker();
        }

        self.effects.update();
        match self.session.game() {
            Some(game) => {
                self.effects.apply_events(&events, game, &self.settings, now);
                draw_frame(surface, game, &self.effects, &self.settings, now);
            }
            None => surface.clear(colors::BACKGROUND),
        }
        events
    }

    pub fn hud(&self) -> HudSnapshot {
        self.session.hud(self.now())
    }

    pub fn glow(&self) -> Option<crate::renderer::Color> {
        self.effects.glow(self.now())
    }

    fn stop_ticker(&mut self) {
        if self.token.take().is_some() {
            log::debug!("Stats ticker stopped");
        }
        self.stats.cancel();
    }
}
