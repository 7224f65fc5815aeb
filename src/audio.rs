//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, no external files needed. Each
//! effect is a short table of oscillator tones; only playback is web-only.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Power-up picked up
    Collect,
    /// Modifier kicked in
    PowerUp,
    /// Hunt mode bite off the tail
    Bite,
    /// Caught by the snake
    Hit,
    /// Snake grew
    Grow,
    /// Apple got faster
    SpeedUp,
    /// Snake eaten completely
    Victory,
    GameOver,
    /// New best score
    NewBest,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Collected { .. } => Some(SoundEffect::Collect),
            GameEvent::ModifierActivated(_) => Some(SoundEffect::PowerUp),
            GameEvent::PursuerBitten { .. } => Some(SoundEffect::Bite),
            GameEvent::LifeLost { lives } if *lives > 0 => Some(SoundEffect::Hit),
            GameEvent::PursuerGrew { .. } => Some(SoundEffect::Grow),
            GameEvent::PlayerSpedUp { .. } => Some(SoundEffect::SpeedUp),
            GameEvent::Won { .. } => Some(SoundEffect::Victory),
            GameEvent::Lost { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }

    /// Tones making up the effect
    pub fn tones(self) -> &'static [Tone] {
        match self {
            SoundEffect::Collect => COLLECT,
            SoundEffect::PowerUp => POWER_UP,
            SoundEffect::Bite => BITE,
            SoundEffect::Hit => HIT,
            SoundEffect::Grow => GROW,
            SoundEffect::SpeedUp => SPEED_UP,
            SoundEffect::Victory => VICTORY,
            SoundEffect::GameOver => GAME_OVER,
            SoundEffect::NewBest => NEW_BEST,
        }
    }
}

// === Tone tables ===

/// Happy ding
const COLLECT: &[Tone] = &[
    Tone::new(600.0, 0.0, 0.15, 0.25, Wave::Sine),
    Tone::new(800.0, 0.08, 0.15, 0.25, Wave::Sine),
    Tone::new(1000.0, 0.16, 0.15, 0.25, Wave::Sine),
];

const POWER_UP: &[Tone] = &[Tone::new(300.0, 0.0, 0.3, 0.3, Wave::Triangle).glide(900.0)];

/// Two quick crunches
const BITE: &[Tone] = &[
    Tone::new(220.0, 0.0, 0.08, 0.35, Wave::Square).glide(110.0),
    Tone::new(180.0, 0.06, 0.08, 0.25, Wave::Square).glide(90.0),
];

const HIT: &[Tone] = &[Tone::new(150.0, 0.0, 0.3, 0.5, Wave::Sawtooth).glide(50.0)];

const GROW: &[Tone] = &[Tone::new(90.0, 0.0, 0.25, 0.2, Wave::Triangle).glide(140.0)];

/// Whoosh up
const SPEED_UP: &[Tone] = &[Tone::new(200.0, 0.0, 0.2, 0.3, Wave::Triangle).glide(600.0)];

const VICTORY: &[Tone] = &[
    Tone::new(400.0, 0.0, 0.4, 0.3, Wave::Triangle),
    Tone::new(500.0, 0.1, 0.4, 0.3, Wave::Triangle),
    Tone::new(600.0, 0.2, 0.4, 0.3, Wave::Triangle),
    Tone::new(800.0, 0.3, 0.4, 0.3, Wave::Triangle),
];

/// Sad descending
const GAME_OVER: &[Tone] = &[
    Tone::new(400.0, 0.0, 0.3, 0.3, Wave::Sine),
    Tone::new(350.0, 0.2, 0.3, 0.3, Wave::Sine),
    Tone::new(300.0, 0.4, 0.3, 0.3, Wave::Sine),
    Tone::new(200.0, 0.6, 0.3, 0.3, Wave::Sine),
];

const NEW_BEST: &[Tone] = &[
    Tone::new(500.0, 0.0, 0.25, 0.25, Wave::Triangle),
    Tone::new(600.0, 0.08, 0.25, 0.25, Wave::Triangle),
    Tone::new(700.0, 0.16, 0.25, 0.25, Wave::Triangle),
    Tone::new(800.0, 0.24, 0.25, 0.25, Wave::Triangle),
    Tone::new(1000.0, 0.32, 0.25, 0.25, Wave::Triangle),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator with an exponential decay (seconds, relative gain)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Frequency reached by the end of the decay
    pub end_freq: Option<f32>,
    pub delay: f64,
    pub decay: f64,
    pub gain: f32,
    pub wave: Wave,
}

impl Tone {
    const fn new(freq: f32, delay: f64, decay: f64, gain: f32, wave: Wave) -> Self {
        Self {
            freq,
            end_freq: None,
            delay,
            decay,
            gain,
            wave,
        }
    }

    const fn glide(mut self, to: f32) -> Self {
        self.end_freq = Some(to);
        self
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Wave};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up sound toggle and volume changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                self.play_tone(ctx, tone);
            }
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, tone.wave) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;

            gain.gain().set_value_at_time(self.volume * tone.gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + tone.decay)
                .ok();
            if let Some(end) = tone.end_freq {
                osc.frequency().set_value_at_time(tone.freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end, t + tone.decay)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.decay + 0.05).ok();
        }

        /// Create an oscillator with gain envelope
        fn create_osc(&self, ctx: &AudioContext, freq: f32, wave: Wave) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            });
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }
}
