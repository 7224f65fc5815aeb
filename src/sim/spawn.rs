//! Collectible spawning and player relocation
//!
//! Placement samples random cells a bounded number of times. When nothing
//! free turns up the event is skipped and the next opportunity tries again.

use rand::Rng;

use super::state::{Collectible, CollectibleKind, GameEvent, GameState};
use crate::consts::SPAWN_ATTEMPTS;

/// Roll for a new collectible. Returns its id when one was placed.
pub fn try_spawn_collectible(state: &mut GameState) -> Option<u32> {
    if state.live_collectibles() >= state.tuning.max_collectibles {
        return None;
    }
    if !state.rng.random_bool(state.tuning.spawn_chance) {
        return None;
    }

    let kind = CollectibleKind::ALL[state.rng.random_range(0..CollectibleKind::ALL.len())];

    let player = state.player.pos;
    let pursuer = &state.pursuer;
    let collectibles = &state.collectibles;
    let pos = state.grid.find_free_cell(&mut state.rng, SPAWN_ATTEMPTS, |cell| {
        cell != player && !pursuer.occupies(cell) && !collectibles.iter().any(|c| c.pos == cell)
    });
    let Some(pos) = pos else {
        log::warn!("No free cell for a {} collectible, skipping", kind.label());
        return None;
    };

    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        pos,
        kind,
        collected: false,
    });
    state.events.push(GameEvent::CollectibleSpawned { kind, pos });
    log::debug!("Spawned {} at ({}, {})", kind.label(), pos.x, pos.y);
    Some(id)
}

/// Move the player to a random cell off the pursuer. Returns false if skipped.
pub fn relocate_player(state: &mut GameState) -> bool {
    let pursuer = &state.pursuer;
    let pos = state
        .grid
        .find_free_cell(&mut state.rng, SPAWN_ATTEMPTS, |cell| !pursuer.occupies(cell));
    match pos {
        Some(pos) => {
            state.player.pos = pos;
            state.events.push(GameEvent::Relocated { pos });
            true
        }
        None => {
            log::warn!("No free cell to relocate the player, staying put");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Grid;
    use crate::tuning::Tuning;

    fn state_with(tuning: Tuning) -> GameState {
        GameState::new(11, Grid::new(40, 30).unwrap(), tuning, 0.0)
    }

    fn always() -> Tuning {
        Tuning {
            spawn_chance: 1.0,
            ..Tuning::default()
        }
    }

    #[test]
    fn spawns_on_free_cells_up_to_cap() {
        let mut s = state_with(always());
        for _ in 0..10 {
            try_spawn_collectible(&mut s);
        }
        assert_eq!(s.collectibles.len(), 3);
        for c in &s.collectibles {
            assert_ne!(c.pos, s.player.pos);
            assert!(!s.pursuer.occupies(c.pos));
            assert!(s.grid.contains(c.pos));
        }
        let mut cells: Vec<_> = s.collectibles.iter().map(|c| (c.pos.x, c.pos.y)).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 3);
    }

    #[test]
    fn zero_chance_never_spawns() {
        let mut s = state_with(Tuning {
            spawn_chance: 0.0,
            ..Tuning::default()
        });
        for _ in 0..50 {
            assert_eq!(try_spawn_collectible(&mut s), None);
        }
        assert!(s.collectibles.is_empty());
    }

    #[test]
    fn full_grid_skips_spawn() {
        let mut s = GameState::new(5, Grid::new(6, 1).unwrap(), always(), 0.0);
        // Player at (1,0), pursuer covers (4,0),(3,0),(2,0),(1,0),(0,0); (5,0) is left
        s.pursuer.body.push_back(glam::IVec2::new(5, 0));
        assert_eq!(try_spawn_collectible(&mut s), None);
        assert!(s.collectibles.is_empty());
    }

    #[test]
    fn relocation_avoids_pursuer() {
        let mut s = state_with(always());
        s.player.pos = s.pursuer.head().unwrap();
        assert!(relocate_player(&mut s));
        assert!(!s.pursuer.occupies(s.player.pos));
    }

    #[test]
    fn relocation_skipped_when_no_room() {
        let mut s = GameState::new(5, Grid::new(5, 1).unwrap(), always(), 0.0);
        let before = s.player.pos;
        assert_eq!(s.pursuer.len(), 5);
        assert!(!relocate_player(&mut s));
        assert_eq!(s.player.pos, before);
    }
}
