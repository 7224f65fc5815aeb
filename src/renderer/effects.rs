//! Cosmetic effects: particle bursts and the canvas glow flash
//!
//! Driven by [`GameEvent`]s after each frame. Uses its own RNG so visuals
//! never disturb the simulation's random stream.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Color, Fill, Surface, colors, with_alpha};
use crate::consts::{CELL_SIZE, PARTICLE_BURST, PARTICLE_LIFE};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState};
use crate::cell_center;

/// Maximum live particles
pub const MAX_PARTICLES: usize = 256;

const FLASH_MS: f64 = 300.0;
const GAME_OVER_FLASH_MS: f64 = 500.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub size: f32,
    pub color: Color,
    /// Frames left
    pub life: u32,
}

impl Particle {
    pub fn alpha(&self) -> f32 {
        self.life as f32 / PARTICLE_LIFE as f32
    }
}

/// Glow around the play field until `until` (wall time)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Color,
    pub until: f64,
}

#[derive(Debug, Clone)]
pub struct Effects {
    rng: Pcg32,
    particles: Vec<Particle>,
    glow: Option<Glow>,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            particles: Vec::new(),
            glow: None,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn reset(&mut self) {
        self.particles.clear();
        self.glow = None;
    }

    /// Spray particles from `at`
    pub fn burst(&mut self, at: Vec2, color: Color) {
        for _ in 0..PARTICLE_BURST {
            if self.particles.len() >= MAX_PARTICLES {
                // Drop the oldest to make room
                self.particles.remove(0);
            }
            let vel = Vec2::new(
                self.rng.random_range(-3.0..3.0),
                self.rng.random_range(-3.0..3.0),
            );
            self.particles.push(Particle {
                pos: at,
                vel,
                size: self.rng.random_range(2.0..7.0),
                color,
                life: PARTICLE_LIFE,
            });
        }
    }

    pub fn flash(&mut self, color: Color, now: f64, duration_ms: f64) {
        self.glow = Some(Glow {
            color,
            until: now + duration_ms,
        });
    }

    /// Current glow color, if any
    pub fn glow(&self, now: f64) -> Option<Color> {
        self.glow.filter(|g| now < g.until).map(|g| g.color)
    }

    /// React to the events of one frame at wall time `now`
    pub fn apply_events(&mut self, events: &[GameEvent], game: &GameState, settings: &Settings, now: f64) {
        let cell = CELL_SIZE as f32;
        for event in events {
            let (burst, flash) = match *event {
                GameEvent::Collected { kind, pos } => (Some((pos, kind.color())), None),
                GameEvent::ModifierActivated(kind) => (None, Some((kind.color(), FLASH_MS))),
                GameEvent::PursuerBitten { pos, .. } => (
                    Some((pos, colors::SNAKE_HEAD)),
                    Some((colors::APPLE_EDGE, FLASH_MS)),
                ),
                GameEvent::PursuerGrew { tail, .. } => (Some((tail, colors::SNAKE_HEAD)), None),
                GameEvent::PlayerSpedUp { .. } => (Some((game.player.pos, colors::SPEED_UP)), None),
                GameEvent::LifeLost { .. } => (None, Some((colors::HIT, FLASH_MS))),
                GameEvent::Won { .. } | GameEvent::Lost { .. } => {
                    (None, Some((colors::HIT, GAME_OVER_FLASH_MS)))
                }
                GameEvent::CollectibleSpawned { .. }
                | GameEvent::ModifierExpired(_)
                | GameEvent::Relocated { .. } => (None, None),
            };

            if let Some((pos, color)) = burst {
                if settings.particles {
                    self.burst(cell_center(pos, cell), color);
                }
            }
            if let Some((color, duration)) = flash {
                if settings.effective_glow_flash() {
                    self.flash(color, now, duration);
                }
            }
        }
    }

    /// Advance particles by one frame
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            surface.fill_circle(p.pos, p.size, Fill::Solid(with_alpha(p.color, p.alpha())));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CollectibleKind, Grid};
    use crate::tuning::Tuning;
    use glam::IVec2;

    fn game() -> GameState {
        GameState::new(1, Grid::new(40, 30).unwrap(), Tuning::default(), 0.0)
    }

    #[test]
    fn particles_fade_out() {
        let mut fx = Effects::new(7);
        fx.burst(Vec2::new(50.0, 50.0), colors::SPEED_UP);
        assert_eq!(fx.particles().len(), PARTICLE_BURST);
        for p in fx.particles() {
            assert!(p.vel.x.abs() <= 3.0 && p.vel.y.abs() <= 3.0);
            assert!((2.0..7.0).contains(&p.size));
        }
        for _ in 0..PARTICLE_LIFE - 1 {
            fx.update();
        }
        assert_eq!(fx.particles().len(), PARTICLE_BURST);
        fx.update();
        assert!(fx.particles().is_empty());
    }

    #[test]
    fn particle_cap() {
        let mut fx = Effects::new(7);
        for _ in 0..50 {
            fx.burst(Vec2::ZERO, colors::WHITE);
        }
        assert_eq!(fx.particles().len(), MAX_PARTICLES);
    }

    #[test]
    fn events_drive_effects() {
        let mut fx = Effects::new(1);
        let events = [
            GameEvent::Collected {
                kind: CollectibleKind::Slow,
                pos: IVec2::new(2, 3),
            },
            GameEvent::ModifierActivated(CollectibleKind::Slow),
        ];
        fx.apply_events(&events, &game(), &Settings::default(), 1000.0);
        assert_eq!(fx.particles().len(), PARTICLE_BURST);
        assert_eq!(fx.particles()[0].pos, Vec2::new(50.0, 70.0));
        assert_eq!(fx.glow(1299.0), Some(CollectibleKind::Slow.color()));
        assert_eq!(fx.glow(1300.0), None);
    }

    #[test]
    fn settings_disable_effects() {
        let mut fx = Effects::new(1);
        let settings = Settings {
            particles: false,
            reduced_motion: true,
            ..Settings::default()
        };
        let events = [GameEvent::PlayerSpedUp { speed: 9 }, GameEvent::LifeLost { lives: 2 }];
        fx.apply_events(&events, &game(), &settings, 0.0);
        assert!(fx.particles().is_empty());
        assert_eq!(fx.glow(10.0), None);
    }
}
