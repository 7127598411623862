//! Sound effects
//!
//! Effects are synthesized with the Web Audio API, no asset files. Each
//! effect is a short list of oscillator voices with a pitch glide and a
//! decaying envelope. The simulation never waits on audio: events are mapped
//! to effects after each tick and fired off.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired a bullet
    Fire,
    /// Asteroid destroyed
    Explosion,
    /// Asteroid rammed the ship
    PlayerHit,
    /// Lives ran out
    GameOver,
    /// Final score beat the stored best
    NewBest,
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator of an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub wave: Wave,
    pub start_hz: f32,
    /// Pitch reached at the end of the voice
    pub end_hz: f32,
    /// Offset from the effect's start (seconds)
    pub delay_s: f64,
    pub duration_s: f64,
    /// Peak level relative to the master volume
    pub gain: f32,
}

const fn voice(
    wave: Wave,
    start_hz: f32,
    end_hz: f32,
    delay_s: f64,
    duration_s: f64,
    gain: f32,
) -> Voice {
    Voice {
        wave,
        start_hz,
        end_hz,
        delay_s,
        duration_s,
        gain,
    }
}

// Laser zap
const FIRE: [Voice; 1] = [voice(Wave::Square, 1200.0, 300.0, 0.0, 0.09, 0.12)];

// Crunch on top of a low rumble
const EXPLOSION: [Voice; 2] = [
    voice(Wave::Sawtooth, 180.0, 40.0, 0.0, 0.35, 0.45),
    voice(Wave::Triangle, 90.0, 30.0, 0.02, 0.3, 0.3),
];

// Double buzz
const PLAYER_HIT: [Voice; 2] = [
    voice(Wave::Square, 220.0, 110.0, 0.0, 0.12, 0.35),
    voice(Wave::Square, 220.0, 110.0, 0.14, 0.12, 0.35),
];

// Three falling notes
const GAME_OVER: [Voice; 3] = [
    voice(Wave::Triangle, 330.0, 320.0, 0.0, 0.25, 0.3),
    voice(Wave::Triangle, 262.0, 254.0, 0.22, 0.25, 0.3),
    voice(Wave::Triangle, 196.0, 150.0, 0.44, 0.45, 0.3),
];

// Rising C major arpeggio
const NEW_BEST: [Voice; 4] = [
    voice(Wave::Sine, 523.0, 523.0, 0.0, 0.18, 0.22),
    voice(Wave::Sine, 659.0, 659.0, 0.09, 0.18, 0.22),
    voice(Wave::Sine, 784.0, 784.0, 0.18, 0.18, 0.22),
    voice(Wave::Sine, 1047.0, 1047.0, 0.27, 0.3, 0.22),
];

impl SoundEffect {
    /// Effect for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Fired { .. } => Some(SoundEffect::Fire),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::PlayerHit { lives_left } if *lives_left > 0 => Some(SoundEffect::PlayerHit),
            GameEvent::PlayerHit { .. } => None,
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::EnemyEscaped => None,
        }
    }

    pub fn voices(&self) -> &'static [Voice] {
        match self {
            SoundEffect::Fire => &FIRE,
            SoundEffect::Explosion => &EXPLOSION,
            SoundEffect::PlayerHit => &PLAYER_HIT,
            SoundEffect::GameOver => &GAME_OVER,
            SoundEffect::NewBest => &NEW_BEST,
        }
    }

    /// Time until the last voice has finished (seconds)
    pub fn length_s(&self) -> f64 {
        self.voices()
            .iter()
            .map(|v| v.delay_s + v.duration_s)
            .fold(0.0, f64::max)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, AudioContextState, OscillatorType};

    use super::{SoundEffect, Voice, Wave};

    /// Envelope floor; exponential ramps cannot reach zero
    const SILENCE: f32 = 0.001;

    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.3,
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Resume a suspended context. Call from a user gesture.
        pub fn unlock(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == AudioContextState::Suspended {
                    if let Err(e) = ctx.resume() {
                        log::warn!("AudioContext resume failed: {:?}", e);
                    }
                }
            }
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.master_volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            self.unlock();

            let start = ctx.current_time();
            for voice in effect.voices() {
                if let Err(e) = self.play_voice(ctx, start, voice) {
                    log::debug!("{:?} voice dropped: {:?}", effect, e);
                }
            }
        }

        fn play_voice(
            &self,
            ctx: &AudioContext,
            start: f64,
            voice: &Voice,
        ) -> Result<(), wasm_bindgen::JsValue> {
            let osc = ctx.create_oscillator()?;
            let gain = ctx.create_gain()?;
            osc.set_type(oscillator_type(voice.wave));
            osc.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&ctx.destination())?;

            let t = start + voice.delay_s;
            let end = t + voice.duration_s;

            gain.gain()
                .set_value_at_time(self.master_volume * voice.gain, t)?;
            gain.gain().exponential_ramp_to_value_at_time(SILENCE, end)?;

            osc.frequency().set_value_at_time(voice.start_hz, t)?;
            if voice.end_hz != voice.start_hz {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(voice.end_hz, end)?;
            }

            osc.start_with_when(t)?;
            osc.stop_with_when(end + 0.02)?;
            Ok(())
        }
    }

    fn oscillator_type(wave: Wave) -> OscillatorType {
        match wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Sawtooth => OscillatorType::Sawtooth,
            Wave::Triangle => OscillatorType::Triangle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const ALL: [SoundEffect; 5] = [
        SoundEffect::Fire,
        SoundEffect::Explosion,
        SoundEffect::PlayerHit,
        SoundEffect::GameOver,
        SoundEffect::NewBest,
    ];

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Fired { at_ms: 0.0 }),
            Some(SoundEffect::Fire)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::EnemyDestroyed {
                center: Vec2::ZERO,
                points: 10
            }),
            Some(SoundEffect::Explosion)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PlayerHit { lives_left: 2 }),
            Some(SoundEffect::PlayerHit)
        );
        // The game-over jingle covers the final hit
        assert_eq!(SoundEffect::for_event(&GameEvent::PlayerHit { lives_left: 0 }), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::EnemyEscaped), None);
    }

    #[test]
    fn test_voices_are_playable() {
        for effect in ALL {
            assert!(!effect.voices().is_empty(), "{:?} is silent", effect);
            for v in effect.voices() {
                // Exponential ramps need strictly positive targets
                assert!(v.start_hz > 0.0 && v.end_hz > 0.0);
                assert!(v.duration_s > 0.0 && v.delay_s >= 0.0);
                assert!(v.gain > 0.0 && v.gain <= 1.0);
            }
        }
    }

    #[test]
    fn test_fire_is_the_shortest_effect() {
        // Fires up to five times a second, so it must not pile up
        let fire = SoundEffect::Fire.length_s();
        assert!(fire < 0.2);
        for effect in ALL.into_iter().filter(|e| *e != SoundEffect::Fire) {
            assert!(effect.length_s() > fire);
        }
    }
}
