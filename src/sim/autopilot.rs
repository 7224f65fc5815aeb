//! Idle/demo mode - the computer steers the apple
//!
//! Reuses the pursuer's greedy heading choice with the player as a one-cell
//! body: run from the snake, grab power-ups when it is safe, and go for the
//! snake's tail while hunting.

use std::collections::VecDeque;

use super::ai::{PursuitMode, select_heading};
use super::grid::{GridPosition, Heading};
use super::state::GameState;

/// Manhattan distance at which the snake counts as close
const DANGER_RADIUS: i32 = 6;

/// Heading the autopilot wants for the player this frame
pub fn autopilot_heading(state: &GameState) -> Heading {
    let player = state.player.pos;
    let (target, mode) = pick_target(state, player);
    let body = VecDeque::from([player]);
    select_heading(&state.grid, player, &body, target, state.player.heading, mode)
}

fn pick_target(state: &GameState, player: GridPosition) -> (GridPosition, PursuitMode) {
    let Some(head) = state.pursuer.head() else {
        return (player, PursuitMode::Pursue);
    };

    if state.is_hunting() {
        if let Some(tail) = state.pursuer.tail() {
            return (tail, PursuitMode::Pursue);
        }
    }

    let danger = manhattan(head, player) < DANGER_RADIUS;
    if !danger {
        let nearest = state
            .collectibles
            .iter()
            .filter(|c| !c.collected)
            .min_by_key(|c| manhattan(c.pos, player));
        if let Some(item) = nearest {
            return (item.pos, PursuitMode::Pursue);
        }
    }

    (head, PursuitMode::Evade)
}

fn manhattan(a: GridPosition, b: GridPosition) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Grid;
    use crate::sim::modifier;
    use crate::sim::state::{Collectible, CollectibleKind};
    use crate::tuning::Tuning;
    use glam::IVec2;

    fn state() -> GameState {
        GameState::new(8, Grid::new(40, 30).unwrap(), Tuning::default(), 0.0)
    }

    #[test]
    fn runs_from_a_close_snake() {
        let mut s = state();
        s.player.pos = IVec2::new(27, 13);
        s.player.heading = Heading::Up;
        assert_eq!(autopilot_heading(&s), Heading::Left);
    }

    #[test]
    fn fetches_power_ups_when_safe() {
        let mut s = state();
        let id = s.next_entity_id();
        s.collectibles.push(Collectible {
            id,
            pos: IVec2::new(10, 5),
            kind: CollectibleKind::Hunt,
            collected: false,
        });
        assert_eq!(autopilot_heading(&s), Heading::Up);
    }

    #[test]
    fn hunts_the_tail() {
        let mut s = state();
        modifier::activate(&mut s, CollectibleKind::Hunt, 0.0);
        assert_eq!(autopilot_heading(&s), Heading::Right);
    }
}
