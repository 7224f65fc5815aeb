//! Frame composition
//!
//! Layers, back to front: background and grid lines, collectibles, pursuer,
//! player, pickup notification, particles.

use glam::Vec2;

use super::effects::Effects;
use super::{Fill, Surface, TextStyle, colors, with_alpha};
use crate::consts::CELL_SIZE;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, GridPosition};
use crate::{cell_center, cell_to_pixel};

/// Collectible icon size relative to half a cell
const COLLECTIBLE_SCALE: f32 = 1.4;
/// Manhattan distance under which the snake shows its tongue
const TONGUE_RANGE: i32 = 5;

/// Draw one frame of `game` at wall time `now`
pub fn draw_frame(surface: &mut dyn Surface, game: &GameState, effects: &Effects, settings: &Settings, now: f64) {
    let cell = CELL_SIZE as f32;
    let game_now = game.game_time(now);

    surface.clear(colors::BACKGROUND);
    if settings.grid_lines {
        draw_grid(surface, cell);
    }

    let pulse = if settings.effective_pulse() {
        ((now / 300.0).sin() * 3.0 + 3.0) as f32
    } else {
        0.0
    };
    for item in game.collectibles.iter().filter(|c| !c.collected) {
        draw_collectible(surface, item.pos, item.kind.color(), item.kind.glyph(), pulse, cell);
    }

    draw_pursuer(surface, game, cell);
    draw_player(surface, game, cell);

    if let Some(note) = &game.notification {
        let opacity = note.opacity(game_now);
        let width = surface.size().x;
        surface.fill_rect(Vec2::new(width - 200.0, 10.0), Vec2::new(190.0, 60.0), Fill::Solid(colors::PANEL));
        surface.stroke_rect(
            Vec2::new(width - 200.0, 10.0),
            Vec2::new(190.0, 60.0),
            2.0,
            with_alpha(colors::WHITE, opacity),
        );
        surface.text(
            Vec2::new(width - 175.0, 40.0),
            note.kind.glyph(),
            TextStyle::new(24.0, note.kind.color()),
        );
        let white = with_alpha(colors::WHITE, opacity);
        surface.text(
            Vec2::new(width - 145.0, 40.0),
            &note.message,
            TextStyle::new(16.0, white).bold().left(),
        );
        surface.text(
            Vec2::new(width - 145.0, 60.0),
            &format!("Total: {}", game.stats.collected),
            TextStyle::new(14.0, white).left(),
        );
    }

    effects.draw(surface);

    if game.phase == GamePhase::Paused {
        let center = surface.size() / 2.0;
        surface.text(center, "PAUSED", TextStyle::new(32.0, colors::WHITE).bold());
    }
}

fn draw_grid(surface: &mut dyn Surface, cell: f32) {
    let size = surface.size();
    let mut x = 0.0;
    while x <= size.x {
        surface.line(Vec2::new(x, 0.0), Vec2::new(x, size.y), 1.0, colors::GRID_LINE);
        x += cell;
    }
    let mut y = 0.0;
    while y <= size.y {
        surface.line(Vec2::new(0.0, y), Vec2::new(size.x, y), 1.0, colors::GRID_LINE);
        y += cell;
    }
}

fn draw_collectible(
    surface: &mut dyn Surface,
    pos: GridPosition,
    color: [f32; 4],
    glyph: &str,
    pulse: f32,
    cell: f32,
) {
    let center = cell_center(pos, cell);
    let base = cell / 2.0 * COLLECTIBLE_SCALE;
    surface.fill_circle(center, base + pulse, Fill::Solid(with_alpha(color, 0.25)));
    surface.fill_circle(center, base - 2.0, Fill::Solid(color));
    surface.stroke_circle(center, base - 2.0, 2.0, color);
    surface.text(center, glyph, TextStyle::new(16.0, colors::WHITE).bold());
}

fn draw_pursuer(surface: &mut dyn Surface, game: &GameState, cell: f32) {
    let len = game.pursuer.len();
    for (i, &segment) in game.pursuer.body.iter().enumerate() {
        let min = cell_to_pixel(segment, cell) + Vec2::ONE;
        let size = Vec2::splat(cell - 2.0);
        let fill = if i == 0 {
            Fill::Radial {
                inner: colors::SNAKE_HEAD,
                outer: colors::SNAKE_HEAD_EDGE,
                radius: cell / 2.0,
            }
        } else {
            let intensity = 1.0 - (i as f32 / len as f32) * 0.7;
            Fill::Radial {
                inner: [0.0, intensity, 158.0 / 255.0 * intensity, 1.0],
                outer: [0.0, 204.0 / 255.0 * intensity, 122.0 / 255.0 * intensity, 1.0],
                radius: cell / 2.0,
            }
        };
        surface.fill_rect(min, size, fill);
        surface.stroke_rect(min, size, 1.0, colors::SNAKE_OUTLINE);
    }

    // Face on top of the head
    let Some(head) = game.pursuer.head() else { return };
    let center = cell_center(head, cell);
    for dx in [-3.0, 3.0] {
        surface.fill_circle(center + Vec2::new(dx, -3.0), 2.0, Fill::Solid(colors::SNAKE_EYE));
    }
    let gap = (head - game.player.pos).abs();
    if gap.x + gap.y < TONGUE_RANGE {
        surface.line(
            center + Vec2::new(0.0, 5.0),
            center + Vec2::new(8.0, 8.0),
            2.0,
            colors::TONGUE,
        );
    }
}

fn draw_player(surface: &mut dyn Surface, game: &GameState, cell: f32) {
    let hunting = game.is_hunting();
    let top_left = cell_to_pixel(game.player.pos, cell);
    let center = cell_center(game.player.pos, cell);

    let (inner, outer) = if hunting {
        (colors::APPLE_EDGE, colors::APPLE_HUNT_EDGE)
    } else {
        (colors::APPLE, colors::APPLE_EDGE)
    };
    surface.fill_circle(center, cell / 2.0 - 2.0, Fill::Radial { inner, outer, radius: cell });

    // Stem and leaf
    surface.fill_rect(
        Vec2::new(center.x - 1.0, top_left.y + 2.0),
        Vec2::new(2.0, 5.0),
        Fill::Solid(colors::STEM),
    );
    surface.fill_circle(
        Vec2::new(center.x + 5.0, top_left.y + 5.0),
        2.5,
        Fill::Solid(colors::LEAF),
    );

    // Outer ring thickens with speed
    let speed_glow = (game.player.timer.speed as f32 / 15.0).min(1.0) * 2.0 + 2.0;
    let ring = if hunting { colors::APPLE_EDGE } else { colors::APPLE };
    surface.stroke_circle(center, cell / 2.0, speed_glow, ring);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandList, DrawCommand};
    use crate::sim::{CollectibleKind, Grid, modifier, tick};
    use crate::tuning::Tuning;
    use glam::IVec2;

    fn setup() -> (GameState, CommandList) {
        let game = GameState::new(1, Grid::new(40, 30).unwrap(), Tuning::default(), 0.0);
        (game, CommandList::new(800.0, 600.0))
    }

    fn has_tongue(list: &CommandList) -> bool {
        list.frame().iter().any(|c| {
            matches!(c, DrawCommand::Line { color, .. } if *color == colors::TONGUE)
        })
    }

    #[test]
    fn frame_starts_with_clear_and_draws_every_segment() {
        let (game, mut list) = setup();
        draw_frame(&mut list, &game, &Effects::new(0), &Settings::default(), 0.0);
        assert_eq!(list.frame()[0], DrawCommand::Clear(colors::BACKGROUND));
        let outlines = list
            .frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeRect { color, .. } if *color == colors::SNAKE_OUTLINE))
            .count();
        assert_eq!(outlines, 5);
    }

    #[test]
    fn grid_lines_follow_settings() {
        let (game, mut list) = setup();
        let lines = |list: &CommandList| {
            list.frame()
                .iter()
                .filter(|c| matches!(c, DrawCommand::Line { color, .. } if *color == colors::GRID_LINE))
                .count()
        };
        draw_frame(&mut list, &game, &Effects::new(0), &Settings::default(), 0.0);
        assert_eq!(lines(&list), 41 + 31);
        let settings = Settings {
            grid_lines: false,
            ..Settings::default()
        };
        draw_frame(&mut list, &game, &Effects::new(0), &settings, 0.0);
        assert_eq!(lines(&list), 0);
    }

    #[test]
    fn tongue_only_when_close() {
        let (mut game, mut list) = setup();
        draw_frame(&mut list, &game, &Effects::new(0), &Settings::default(), 0.0);
        assert!(!has_tongue(&list));
        game.player.pos = IVec2::new(27, 14);
        draw_frame(&mut list, &game, &Effects::new(0), &Settings::default(), 0.0);
        assert!(has_tongue(&list));
    }

    #[test]
    fn notification_panel_and_hunt_colors() {
        let (mut game, mut list) = setup();
        modifier::activate(&mut game, CollectibleKind::Hunt, 0.0);
        game.notification = Some(crate::sim::Notification::pickup(
            CollectibleKind::Hunt,
            0.0,
            &game.tuning,
        ));
        draw_frame(&mut list, &game, &Effects::new(0), &Settings::default(), 700.0);
        let texts: Vec<_> = list.texts().collect();
        assert!(texts.contains(&"+1 🔓 opensource"));
        assert!(texts.contains(&"Total: 0"));
        assert!(list.frame().iter().any(|c| matches!(
            c,
            DrawCommand::FillCircle { fill: Fill::Radial { outer, .. }, .. } if *outer == colors::APPLE_HUNT_EDGE
        )));
    }

    #[test]
    fn paused_banner() {
        let (mut game, mut list) = setup();
        tick::toggle_pause(&mut game, 0.0);
        draw_frame(&mut list, &game, &Effects::new(0), &Settings::default(), 0.0);
        assert!(list.texts().any(|t| t == "PAUSED"));
    }
}
