//! Audio sink
//!
//! The simulation only emits events; this module turns them into sound
//! requests. Missing assets are skipped, never fatal.

use thiserror::Error;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Bounce off any platform
    Jump,
    /// Spring launch (plays on top of `Jump`)
    Spring,
    /// Player burst, by spikes or by falling
    Pop,
    /// Looping background track
    Music,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::Jump,
        SoundEffect::Spring,
        SoundEffect::Pop,
        SoundEffect::Music,
    ];

    /// Sound for a gameplay event
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Jump => SoundEffect::Jump,
            GameEvent::Spring => SoundEffect::Spring,
            GameEvent::Popped(_) => SoundEffect::Pop,
        }
    }

    pub fn asset(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "assets/jump.wav",
            SoundEffect::Spring => "assets/spring.wav",
            SoundEffect::Pop => "assets/pop.mp3",
            SoundEffect::Music => "assets/background.mp3",
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to load sound asset {asset}: {reason}")]
    AssetLoad { asset: &'static str, reason: String },
}

/// Fire-and-forget sound requests
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    /// Start the looping background track if it isn't already playing
    fn start_music(&mut self);
}

/// Whatever actually produces sound
pub trait AudioBackend {
    fn load(&mut self, effect: SoundEffect) -> Result<(), AudioError>;
    fn start(&mut self, effect: SoundEffect, volume: f32, looping: bool);
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    loaded: Vec<SoundEffect>,
    sfx_volume: f32,
    music_volume: f32,
    music_playing: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    /// Load every sound up front; failures only disable that sound
    pub fn new(mut backend: B, settings: &Settings) -> Self {
        let mut loaded = Vec::with_capacity(SoundEffect::ALL.len());
        for effect in SoundEffect::ALL {
            match backend.load(effect) {
                Ok(()) => loaded.push(effect),
                Err(e) => log::warn!("{} - {:?} disabled", e, effect),
            }
        }
        Self {
            backend,
            loaded,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            music_playing: false,
        }
    }

    pub fn is_loaded(&self, effect: SoundEffect) -> bool {
        self.loaded.contains(&effect)
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: AudioBackend> AudioSink for AudioManager<B> {
    fn play(&mut self, effect: SoundEffect) {
        if effect == SoundEffect::Music {
            self.start_music();
            return;
        }
        if self.sfx_volume <= 0.0 || !self.is_loaded(effect) {
            return;
        }
        self.backend.start(effect, self.sfx_volume, false);
    }

    fn start_music(&mut self) {
        if self.music_playing || self.music_volume <= 0.0 || !self.is_loaded(SoundEffect::Music) {
            return;
        }
        self.backend.start(SoundEffect::Music, self.music_volume, true);
        self.music_playing = true;
    }
}

/// Headless backend: logs what would play. Assets listed in `missing` fail to load.
#[derive(Debug, Clone, Default)]
pub struct LogBackend {
    pub missing: Vec<SoundEffect>,
}

impl AudioBackend for LogBackend {
    fn load(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
        if self.missing.contains(&effect) {
            return Err(AudioError::AssetLoad {
                asset: effect.asset(),
                reason: "not found".into(),
            });
        }
        Ok(())
    }

    fn start(&mut self, effect: SoundEffect, volume: f32, looping: bool) {
        log::debug!("sound {:?} at {:.2}{}", effect, volume, if looping { " (loop)" } else { "" });
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
    fn start_music(&mut self) {}
}
