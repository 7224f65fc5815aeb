//! Simulation timing
//!
//! Entities move on their own cadence (cells per second) sampled once per
//! rendered frame, so gameplay speed does not depend on the display refresh
//! rate. All times are milliseconds.

/// Maps wall-clock time to gameplay time, which stands still while paused
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameClock {
    /// Gameplay time lost to completed pauses
    paused_total: f64,
    /// Wall time when the current pause began
    paused_at: Option<f64>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gameplay time for a wall-clock reading
    pub fn game_time(&self, wall_now: f64) -> f64 {
        self.paused_at.unwrap_or(wall_now) - self.paused_total
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self, wall_now: f64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(wall_now);
        }
    }

    pub fn resume(&mut self, wall_now: f64) {
        if let Some(start) = self.paused_at.take() {
            self.paused_total += (wall_now - start).max(0.0);
        }
    }
}

/// Rate limiter for one moving entity
#[derive(Debug, Clone, PartialEq)]
pub struct StepTimer {
    /// Cells per second
    pub speed: u32,
    /// Gameplay time of the last step taken
    pub last_step: f64,
}

impl StepTimer {
    pub fn new(speed: u32, now: f64) -> Self {
        Self { speed, last_step: now }
    }

    /// Milliseconds between steps, `None` when stopped
    pub fn interval(&self) -> Option<f64> {
        (self.speed > 0).then(|| 1000.0 / self.speed as f64)
    }

    pub fn is_due(&self, now: f64) -> bool {
        self.interval()
            .is_some_and(|interval| now - self.last_step >= interval)
    }

    /// Consume a step if one is due
    pub fn try_step(&mut self, now: f64) -> bool {
        if self.is_due(now) {
            self.last_step = now;
            true
        } else {
            false
        }
    }
}

/// Wall-clock periodic task, polled from the frame loop
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    period: f64,
    next_due: Option<f64>,
    /// Time left until the next firing while frozen
    remaining: Option<f64>,
}

impl Interval {
    /// An interval that is not yet running
    pub fn stopped(period: f64) -> Self {
        Self {
            period,
            next_due: None,
            remaining: None,
        }
    }

    pub fn start(&mut self, now: f64) {
        self.next_due = Some(now + self.period);
        self.remaining = None;
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
        self.remaining = None;
    }

    /// Stop firing but keep the progress toward the next period
    pub fn freeze(&mut self, now: f64) {
        if let Some(due) = self.next_due.take() {
            self.remaining = Some((due - now).clamp(0.0, self.period));
        }
    }

    /// Resume a frozen interval where it left off
    pub fn thaw(&mut self, now: f64) {
        if let Some(remaining) = self.remaining.take() {
            self.next_due = Some(now + remaining);
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.next_due
    }

    /// Number of periods elapsed since the last poll
    pub fn poll(&mut self, now: f64) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut fired = 0;
        while now >= due {
            fired += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_freezes_game_time() {
        let mut clock = GameClock::new();
        assert_eq!(clock.game_time(1000.0), 1000.0);
        clock.pause(1000.0);
        assert_eq!(clock.game_time(5000.0), 1000.0);
        clock.resume(5000.0);
        assert_eq!(clock.game_time(5000.0), 1000.0);
        assert_eq!(clock.game_time(5100.0), 1100.0);
    }

    #[test]
    fn double_pause_and_stray_resume_are_harmless() {
        let mut clock = GameClock::new();
        clock.resume(50.0);
        assert_eq!(clock.game_time(100.0), 100.0);
        clock.pause(100.0);
        clock.pause(300.0);
        clock.resume(400.0);
        assert_eq!(clock.game_time(400.0), 100.0);
    }

    #[test]
    fn frozen_interval_keeps_its_phase() {
        let mut stats = Interval::stopped(1000.0);
        stats.start(0.0);
        assert_eq!(stats.poll(700.0), 0);
        stats.freeze(700.0);
        assert!(!stats.is_running());
        assert_eq!(stats.poll(5000.0), 0);
        stats.thaw(5000.0);
        assert_eq!(stats.next_due(), Some(5300.0));
        assert_eq!(stats.poll(5299.0), 0);
        assert_eq!(stats.poll(5300.0), 1);
        assert_eq!(stats.poll(6299.0), 0);
        assert_eq!(stats.poll(6300.0), 1);
    }

    #[test]
    fn thaw_without_freeze_does_nothing() {
        let mut stats = Interval::stopped(1000.0);
        stats.thaw(10.0);
        assert!(!stats.is_running());
        stats.start(0.0);
        stats.freeze(200.0);
        stats.cancel();
        stats.thaw(300.0);
        assert!(!stats.is_running());
    }

    #[test]
    fn step_timer_rate_limits() {
        let mut timer = StepTimer::new(8, 0.0);
        assert_eq!(timer.interval(), Some(125.0));
        assert!(!timer.try_step(124.9));
        assert!(timer.try_step(125.0));
        assert_eq!(timer.last_step, 125.0);
        // A late frame does not bank the lateness
        assert!(timer.try_step(300.0));
        assert!(!timer.try_step(400.0));
    }

    #[test]
    fn stopped_timer_never_steps() {
        let mut timer = StepTimer::new(0, 0.0);
        assert_eq!(timer.interval(), None);
        assert!(!timer.try_step(1e9));
    }

    #[test]
    fn interval_counts_missed_periods() {
        let mut interval = Interval::stopped(1000.0);
        assert_eq!(interval.poll(5000.0), 0);
        interval.start(0.0);
        assert_eq!(interval.poll(999.0), 0);
        assert_eq!(interval.poll(1000.0), 1);
        assert_eq!(interval.poll(3500.0), 2);
        interval.cancel();
        assert!(!interval.is_running());
        assert_eq!(interval.poll(10_000.0), 0);
    }
}
