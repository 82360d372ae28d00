//! Audio event routing
//!
//! The simulation emits semantic `GameEvent`s; this layer maps them to
//! sound effects and hands them to whatever output backend the frontend
//! wires in. With no backend attached everything degrades to silence,
//! so the sim never blocks on audio.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player cannon shot
    Fire,
    /// Enemy or boss shot
    AlienFire,
    /// Asteroid or ship destroyed
    Explosion,
    /// Player took a hit
    Hit,
    /// Boost engaged
    Boost,
    /// Extra life milestone
    ExtraLife,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    pub fn from_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Fire => SoundEffect::Fire,
            GameEvent::AlienFire => SoundEffect::AlienFire,
            GameEvent::Explosion => SoundEffect::Explosion,
            GameEvent::Hit => SoundEffect::Hit,
            GameEvent::Boost => SoundEffect::Boost,
            GameEvent::ExtraLife => SoundEffect::ExtraLife,
            GameEvent::GameOver => SoundEffect::GameOver,
        }
    }
}

/// Receives resolved sound effects with a final volume
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    /// Create a manager with no output attached (silent)
    pub fn new() -> Self {
        Self {
            sink: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn with_sink(sink: Box<dyn AudioSink>) -> Self {
        let mut mgr = Self::new();
        mgr.sink = Some(sink);
        mgr
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Route one simulation event to the output
    pub fn handle_event(&mut self, event: GameEvent) {
        self.play(SoundEffect::from_event(event));
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        match self.sink.as_mut() {
            Some(sink) => sink.play(effect, vol),
            None => log::trace!("audio (no sink): {:?}", effect),
        }
    }
}
