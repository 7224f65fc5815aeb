//! Pursuer heading selection
//!
//! A one-step greedy choice: look at every legal neighbouring cell and take
//! the one closest to (or, while evading, farthest from) the target. It can
//! and does get stuck; that is part of the game's feel.

use std::collections::VecDeque;

use super::grid::{Grid, GridPosition, Heading};

/// Whether the pursuer is chasing or fleeing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PursuitMode {
    #[default]
    Pursue,
    Evade,
}

/// Pick the next heading for a body moving one cell per step.
///
/// The tail cell is treated as free because it is vacated on the same step.
/// When every candidate is blocked the current heading is kept, even if that
/// runs into the body.
pub fn select_heading(
    grid: &Grid,
    head: GridPosition,
    body: &VecDeque<GridPosition>,
    target: GridPosition,
    current: Heading,
    mode: PursuitMode,
) -> Heading {
    let blocking = body.len().saturating_sub(1);
    let target = target.as_dvec2();

    let mut best: Option<(Heading, f64)> = None;
    for heading in Heading::ALL {
        if heading == current.reverse() {
            continue;
        }
        let cell = grid.step(head, heading);
        if body.iter().take(blocking).any(|&segment| segment == cell) {
            continue;
        }
        let distance = cell.as_dvec2().distance(target);
        let better = match (best, mode) {
            (None, _) => true,
            (Some((_, d)), PursuitMode::Pursue) => distance < d,
            (Some((_, d)), PursuitMode::Evade) => distance > d,
        };
        if better {
            best = Some((heading, distance));
        }
    }

    best.map_or(current, |(heading, _)| heading)
}
