//! Power-up lifecycle
//!
//! At most one modifier is active. A new pickup replaces the current one,
//! undoing its parameter change first, so effects never stack.

use super::ai::PursuitMode;
use super::state::{ActiveModifier, CollectibleKind, GameEvent, GameState};

/// Activate `kind` at gameplay time `now`, replacing any active modifier
pub fn activate(state: &mut GameState, kind: CollectibleKind, now: f64) {
    if let Some(old) = state.modifier.take() {
        revert(state, old.kind);
        log::debug!("Modifier {} replaced by {}", old.kind.label(), kind.label());
    }
    apply(state, kind);
    state.modifier = Some(ActiveModifier {
        kind,
        expires_at: now + kind.duration_ms(),
    });
    state.events.push(GameEvent::ModifierActivated(kind));
    log::info!("Power activated: {}", kind.label());
}

/// Deactivate the modifier once gameplay time passes its expiry
pub fn expire_if_due(state: &mut GameState, now: f64) -> Option<CollectibleKind> {
    let active = state.modifier?;
    if now <= active.expires_at {
        return None;
    }
    state.modifier = None;
    revert(state, active.kind);
    state.events.push(GameEvent::ModifierExpired(active.kind));
    log::info!("Power expired: {}", active.kind.label());
    Some(active.kind)
}

/// Milliseconds left on the active modifier
pub fn remaining_ms(state: &GameState, now: f64) -> Option<f64> {
    state.modifier.map(|m| (m.expires_at - now).max(0.0))
}

/// How the pursuer steers under the current modifier
pub fn pursuit_mode(state: &GameState) -> PursuitMode {
    match state.modifier_kind() {
        Some(CollectibleKind::Reverse) => PursuitMode::Evade,
        _ => PursuitMode::Pursue,
    }
}

fn apply(state: &mut GameState, kind: CollectibleKind) {
    match kind {
        CollectibleKind::Slow => {
            let tuning = &state.tuning;
            let timer = &mut state.pursuer.timer;
            timer.speed = timer
                .speed
                .saturating_sub(tuning.slow_penalty)
                .max(tuning.slow_min_speed);
        }
        // Read by the decision function and the collision resolver
        CollectibleKind::Reverse | CollectibleKind::Hunt => {}
    }
}

fn revert(state: &mut GameState, kind: CollectibleKind) {
    match kind {
        CollectibleKind::Slow => state.pursuer.timer.speed = state.tuning.pursuer_base_speed,
        CollectibleKind::Reverse | CollectibleKind::Hunt => {}
    }
}
