//! Frame and stats steps
//!
//! [`frame`] runs once per rendered frame, [`stats_tick`] once per real
//! second. Both are driven from the same thread and do nothing unless the
//! run is in progress.

use rand::Rng;

use super::ai::select_heading;
use super::collision::{Resolution, resolve_player_cell};
use super::grid::Heading;
use super::modifier;
use super::spawn::try_spawn_collectible;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::FRAME_SPAWN_CHANCE;

/// Advance the simulation for one rendered frame at wall time `wall_now`.
///
/// Order: player step (with collision resolution), pursuer step, modifier
/// expiry, opportunistic spawn, notification expiry.
pub fn frame(state: &mut GameState, wall_now: f64) {
    if !state.is_running() {
        return;
    }
    let now = state.game_time(wall_now);

    advance_player(state, now);
    if state.is_over() {
        return;
    }
    advance_pursuer(state, now);
    modifier::expire_if_due(state, now);

    if state.rng.random_bool(FRAME_SPAWN_CHANCE) {
        try_spawn_collectible(state);
    }

    if state.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
        state.notification = None;
    }
}

/// Move the player one cell if its step is due, then resolve the new cell
pub fn advance_player(state: &mut GameState, now: f64) -> Option<Resolution> {
    if !state.player.timer.try_step(now) {
        return None;
    }
    state.player.pos = state.grid.step(state.player.pos, state.player.heading);
    Some(resolve_player_cell(state, now))
}

/// Move the pursuer one cell if its step is due, steering first
pub fn advance_pursuer(state: &mut GameState, now: f64) -> bool {
    let Some(head) = state.pursuer.head() else {
        return false;
    };
    if !state.pursuer.timer.try_step(now) {
        return false;
    }
    let heading = select_heading(
        &state.grid,
        head,
        &state.pursuer.body,
        state.player.pos,
        state.pursuer.heading,
        modifier::pursuit_mode(state),
    );
    state.pursuer.advance(&state.grid, heading);
    true
}

/// Change the player's heading; a direct reversal is ignored
pub fn steer(state: &mut GameState, heading: Heading) -> bool {
    if !state.is_running() || heading == state.player.heading.reverse() {
        return false;
    }
    state.player.heading = heading;
    true
}

/// Toggle pause at wall time `wall_now`. Returns the new phase.
pub fn toggle_pause(state: &mut GameState, wall_now: f64) -> GamePhase {
    match state.phase {
        GamePhase::Running => {
            state.clock.pause(wall_now);
            state.phase = GamePhase::Paused;
            log::info!("Game paused");
        }
        GamePhase::Paused => {
            state.clock.resume(wall_now);
            state.phase = GamePhase::Running;
            log::info!("Game resumed");
        }
        GamePhase::Ended(_) => {}
    }
    state.phase
}

/// One real second of play: elapsed time, scheduled spawns, growth, speed-ups
pub fn stats_tick(state: &mut GameState) {
    if !state.is_running() {
        return;
    }
    state.stats.elapsed_secs += 1;
    let secs = state.stats.elapsed_secs;
    let tuning = state.tuning.clone();

    if secs % tuning.spawn_every_secs == 0 {
        try_spawn_collectible(state);
    }

    if secs % tuning.pursuer_growth_every_secs == 0 {
        if let Some(tail) = state.pursuer.grow() {
            let length = state.pursuer.len();
            state.events.push(GameEvent::PursuerGrew { tail, length });
            log::info!("The snake grew! New length: {length}");
        }
    }

    if secs % tuning.player_speed_up_every_secs == 0 {
        let timer = &mut state.player.timer;
        let speed = (timer.speed + tuning.player_speed_step).min(tuning.player_max_speed);
        if speed != timer.speed {
            timer.speed = speed;
            state.events.push(GameEvent::PlayerSpedUp { speed });
            log::info!("Apple speed increased to {speed} cells/second");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Grid;
    use crate::sim::state::{Collectible, CollectibleKind, Outcome};
    use crate::tuning::Tuning;
    use glam::IVec2;

    fn quiet() -> Tuning {
        Tuning {
            spawn_chance: 0.0,
            ..Tuning::default()
        }
    }

    fn state() -> GameState {
        GameState::new(12345, Grid::new(40, 30).unwrap(), quiet(), 0.0)
    }

    #[test]
    fn player_moves_right_after_one_interval() {
        let mut s = state();
        assert!(steer(&mut s, Heading::Right));
        let start = s.player.pos;
        frame(&mut s, 124.0);
        assert_eq!(s.player.pos, start);
        frame(&mut s, 125.0);
        assert_eq!(s.player.pos, IVec2::new((start.x + 1) % 40, start.y));
    }

    #[test]
    fn player_wraps_around() {
        let mut s = state();
        s.player.pos = IVec2::new(39, 3);
        frame(&mut s, 125.0);
        assert_eq!(s.player.pos, IVec2::new(0, 3));
    }

    #[test]
    fn steering_rejects_reversal() {
        let mut s = state();
        assert!(!steer(&mut s, Heading::Left));
        assert_eq!(s.player.heading, Heading::Right);
        assert!(steer(&mut s, Heading::Up));
        assert!(steer(&mut s, Heading::Left));
    }

    #[test]
    fn speeds_are_independent() {
        let mut s = state();
        let pursuer_head = s.pursuer.head().unwrap();
        // 7 cells/s -> 142.857 ms; player at 8 cells/s -> 125 ms
        frame(&mut s, 130.0);
        assert_ne!(s.player.pos, IVec2::new(10, 15));
        assert_eq!(s.pursuer.head(), Some(pursuer_head));
        frame(&mut s, 143.0);
        assert_ne!(s.pursuer.head(), Some(pursuer_head));
    }

    #[test]
    fn pursuer_heads_for_the_player() {
        let mut s = state();
        s.player.timer.speed = 0;
        s.pursuer.heading = Heading::Left;
        s.pursuer.body = [IVec2::new(30, 15), IVec2::new(31, 15)].into_iter().collect();
        frame(&mut s, 200.0);
        assert_eq!(s.pursuer.head(), Some(IVec2::new(29, 15)));
        assert_eq!(s.pursuer.heading, Heading::Left);
    }

    #[test]
    fn nothing_moves_while_paused() {
        let mut s = state();
        toggle_pause(&mut s, 10.0);
        let before = (s.player.pos, s.pursuer.body.clone());
        frame(&mut s, 10_000.0);
        stats_tick(&mut s);
        assert_eq!((s.player.pos, s.pursuer.body.clone()), before);
        assert_eq!(s.stats.elapsed_secs, 0);
    }

    #[test]
    fn pause_pair_is_idempotent() {
        let mut a = state();
        let mut b = state();
        frame(&mut a, 100.0);
        frame(&mut b, 100.0);
        toggle_pause(&mut b, 100.0);
        toggle_pause(&mut b, 100.0);
        assert_eq!(a.player, b.player);
        assert_eq!(a.pursuer, b.pursuer);
        assert_eq!(a.game_time(500.0), b.game_time(500.0));
        for t in [200.0, 300.0, 400.0, 500.0] {
            frame(&mut a, t);
            frame(&mut b, t);
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.pursuer, b.pursuer);
    }

    #[test]
    fn long_pause_leaks_no_time() {
        let mut s = state();
        toggle_pause(&mut s, 50.0);
        toggle_pause(&mut s, 60_050.0);
        let start = s.player.pos;
        frame(&mut s, 60_050.0 + 74.0);
        assert_eq!(s.player.pos, start);
        frame(&mut s, 60_050.0 + 75.0);
        assert_ne!(s.player.pos, start);
    }

    #[test]
    fn modifier_expiry_runs_on_gameplay_time() {
        let mut s = state();
        modifier::activate(&mut s, CollectibleKind::Slow, 0.0);
        toggle_pause(&mut s, 1000.0);
        toggle_pause(&mut s, 100_000.0);
        frame(&mut s, 100_000.0);
        assert_eq!(s.modifier_kind(), Some(CollectibleKind::Slow));
        frame(&mut s, 104_002.0);
        assert_eq!(s.modifier_kind(), None);
        assert_eq!(s.pursuer.timer.speed, 7);
    }

    #[test]
    fn stats_tick_growth_and_speed_up() {
        let mut s = state();
        for _ in 0..9 {
            stats_tick(&mut s);
        }
        assert_eq!(s.pursuer.len(), 5);
        stats_tick(&mut s);
        assert_eq!(s.pursuer.len(), 6);
        assert_eq!(s.pursuer.body[4], s.pursuer.body[5]);
        for _ in 10..30 {
            stats_tick(&mut s);
        }
        assert_eq!(s.stats.elapsed_secs, 30);
        assert_eq!(s.pursuer.len(), 8);
        assert_eq!(s.player.timer.speed, 9);
    }

    #[test]
    fn player_speed_caps() {
        let mut s = state();
        for _ in 0..(30 * 20) {
            stats_tick(&mut s);
        }
        assert_eq!(s.player.timer.speed, 15);
    }

    #[test]
    fn pursuer_grows_while_not_hunted() {
        let mut s = state();
        let mut last = s.pursuer.len();
        for _ in 0..100 {
            stats_tick(&mut s);
            assert!(s.pursuer.len() >= last);
            last = s.pursuer.len();
        }
    }

    #[test]
    fn frame_stops_after_the_run_ends() {
        let mut s = state();
        s.stats.lives = 1;
        s.player.pos = IVec2::new(25, 15);
        frame(&mut s, 125.0);
        assert_eq!(s.phase, GamePhase::Ended(Outcome::Loss));
        let frozen = s.pursuer.clone();
        frame(&mut s, 10_000.0);
        assert_eq!(s.pursuer, frozen);
    }

    #[test]
    fn determinism() {
        let tuning = Tuning::default();
        let grid = Grid::new(40, 30).unwrap();
        let mut a = GameState::new(99999, grid, tuning.clone(), 0.0);
        let mut b = GameState::new(99999, grid, tuning, 0.0);
        for i in 0..2000 {
            let t = i as f64 * 16.0;
            if i % 60 == 0 {
                stats_tick(&mut a);
                stats_tick(&mut b);
            }
            if i % 97 == 0 {
                let h = Heading::ALL[(i / 97) % 4];
                steer(&mut a, h);
                steer(&mut b, h);
            }
            frame(&mut a, t);
            frame(&mut b, t);
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.pursuer, b.pursuer);
        assert_eq!(a.collectibles, b.collectibles);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.phase, b.phase);
    }

    #[test]
    fn collectible_on_path_is_picked_up() {
        let mut s = state();
        let id = s.next_entity_id();
        s.collectibles.push(Collectible {
            id,
            pos: IVec2::new(11, 15),
            kind: CollectibleKind::Reverse,
            collected: false,
        });
        frame(&mut s, 125.0);
        assert!(s.collectibles.is_empty());
        assert_eq!(s.modifier_kind(), Some(CollectibleKind::Reverse));
        assert!(s.notification.is_some());
        frame(&mut s, 125.0 + 1501.0);
        assert!(s.notification.is_none());
    }
}
