//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a host can load a JSON
//! override without recompiling.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lives at session start
    pub start_lives: u8,

    // === Player ===
    /// Player speed at session start (cells per second)
    pub player_start_speed: u32,
    /// Player speed cap
    pub player_max_speed: u32,
    /// Player speed gained on each speed-up
    pub player_speed_step: u32,
    /// Seconds of play between player speed-ups
    pub player_speed_up_every_secs: u64,

    // === Pursuer ===
    /// Baseline pursuer speed (cells per second)
    pub pursuer_base_speed: u32,
    /// Pursuer segments at session start
    pub pursuer_start_length: usize,
    /// Seconds of play between pursuer growth
    pub pursuer_growth_every_secs: u64,
    /// Speed removed by the slow modifier
    pub slow_penalty: u32,
    /// Floor for the slowed pursuer speed
    pub slow_min_speed: u32,

    // === Scoring ===
    /// Score for picking up a collectible
    pub pickup_bonus: u64,
    /// Score for eating one pursuer segment in hunt mode
    pub bite_bonus: u64,
    /// Numerator of the victory time bonus (`numerator / seconds`)
    pub win_time_numerator: u64,
    /// Multiplier applied to the victory time bonus
    pub win_time_multiplier: u64,

    // === Collectibles ===
    /// Maximum live collectibles
    pub max_collectibles: usize,
    /// Chance that a spawn attempt actually places a collectible
    pub spawn_chance: f64,
    /// Seconds of play between scheduled spawn attempts
    pub spawn_every_secs: u64,

    // === Notification ===
    /// How long the pickup notification stays up (ms)
    pub notification_ms: f64,
    /// Fade in/out duration of the notification (ms)
    pub notification_fade_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_lives: 3,

            player_start_speed: 8,
            player_max_speed: 15,
            player_speed_step: 1,
            player_speed_up_every_secs: 30,

            pursuer_base_speed: 7,
            pursuer_start_length: 5,
            pursuer_growth_every_secs: 10,
            slow_penalty: 3,
            slow_min_speed: 3,

            pickup_bonus: 100,
            bite_bonus: 200,
            win_time_numerator: 1000,
            win_time_multiplier: 10,

            max_collectibles: 3,
            spawn_chance: 0.7,
            spawn_every_secs: 10,

            notification_ms: 1500.0,
            notification_fade_ms: 300.0,
        }
    }
}

impl Tuning {
    /// Parse a JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> GameResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> GameResult<()> {
        if self.start_lives == 0 {
            return Err(GameError::Tuning("start_lives must be at least 1".into()));
        }
        if self.player_start_speed == 0 || self.pursuer_base_speed == 0 {
            return Err(GameError::Tuning("speeds must be positive".into()));
        }
        if self.player_max_speed < self.player_start_speed {
            return Err(GameError::Tuning(
                "player_max_speed is below player_start_speed".into(),
            ));
        }
        if self.slow_min_speed == 0 {
            return Err(GameError::Tuning("slow_min_speed must be positive".into()));
        }
        if self.pursuer_start_length == 0 {
            return Err(GameError::Tuning(
                "pursuer_start_length must be at least 1".into(),
            ));
        }
        if self.player_speed_up_every_secs == 0
            || self.pursuer_growth_every_secs == 0
            || self.spawn_every_secs == 0
        {
            return Err(GameError::Tuning("periodic intervals must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(GameError::Tuning("spawn_chance must be within 0..=1".into()));
        }
        Ok(())
    }

    /// Score bonus for a victory after `elapsed_secs` of play
    pub fn win_time_bonus(&self, elapsed_secs: u64) -> u64 {
        (self.win_time_numerator / elapsed_secs.max(1)) * self.win_time_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "start_lives": 5, "pursuer_base_speed": 9 }"#).unwrap();
        assert_eq!(tuning.start_lives, 5);
        assert_eq!(tuning.pursuer_base_speed, 9);
        assert_eq!(tuning.player_start_speed, 8);
    }

    #[test]
    fn rejects_zero_speed() {
        let err = Tuning::from_json(r#"{ "pursuer_base_speed": 0 }"#).unwrap_err();
        assert!(matches!(err, GameError::Tuning(_)));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(Tuning::from_json("{"), Err(GameError::Json(_))));
    }

    #[test]
    fn win_bonus_guards_zero_seconds() {
        let tuning = Tuning::default();
        assert_eq!(tuning.win_time_bonus(0), 10_000);
        assert_eq!(tuning.win_time_bonus(1), 10_000);
        assert_eq!(tuning.win_time_bonus(30), 330);
        assert_eq!(tuning.win_time_bonus(2000), 0);
    }
}
