//! Collision and collection resolution
//!
//! Runs after every player step, pickup first and pursuer contact second.
//! Both can fire on the same step.

use super::modifier;
use super::spawn::relocate_player;
use super::state::{GameEvent, GameState, Notification, Outcome};

/// What the player's new cell caused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub picked_up: bool,
    pub contact: Contact,
}

/// Result of touching the pursuer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Contact {
    #[default]
    None,
    /// Hunt mode ate one tail segment
    Bite,
    /// A life was lost and play continues
    Hit,
    /// The run ended
    Terminal(Outcome),
}

/// Resolve the player's current cell at gameplay time `now`
pub fn resolve_player_cell(state: &mut GameState, now: f64) -> Resolution {
    let picked_up = collect_at_player(state, now);
    let contact = pursuer_contact(state);
    Resolution { picked_up, contact }
}

fn collect_at_player(state: &mut GameState, now: f64) -> bool {
    let Some(index) = state.collectible_at(state.player.pos) else {
        return false;
    };

    let item = &mut state.collectibles[index];
    item.collected = true;
    let (kind, pos) = (item.kind, item.pos);

    state.stats.collected += 1;
    state.stats.score += state.tuning.pickup_bonus;
    state.notification = Some(Notification::pickup(kind, now, &state.tuning));
    state.events.push(GameEvent::Collected { kind, pos });
    modifier::activate(state, kind, now);
    state.collectibles.retain(|c| !c.collected);

    log::info!("Collected {} (total {})", kind.label(), state.stats.collected);
    true
}

fn pursuer_contact(state: &mut GameState) -> Contact {
    let pos = state.player.pos;
    if !state.pursuer.occupies(pos) {
        return Contact::None;
    }

    if state.is_hunting() {
        state.pursuer.shrink();
        state.stats.score += state.tuning.bite_bonus;
        let remaining = state.pursuer.len();
        state.events.push(GameEvent::PursuerBitten { pos, remaining });

        if state.pursuer.is_empty() {
            let final_score = state.stats.score + state.tuning.win_time_bonus(state.stats.elapsed_secs);
            state.end(Outcome::Win, final_score);
            log::info!("Victory! Final score: {final_score}");
            return Contact::Terminal(Outcome::Win);
        }
        return Contact::Bite;
    }

    state.stats.lives = state.stats.lives.saturating_sub(1);
    let lives = state.stats.lives;
    state.events.push(GameEvent::LifeLost { lives });

    if lives == 0 {
        let final_score = state.stats.score;
        state.end(Outcome::Loss, final_score);
        log::info!("Game over. Final score: {final_score}");
        return Contact::Terminal(Outcome::Loss);
    }

    relocate_player(state);
    Contact::Hit
}
