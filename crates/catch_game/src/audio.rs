//! kira-backed music loops and one-shot cues.
//!
//! Audio is cosmetic: a missing device or file disables the affected track
//! with a warning and the game carries on without it.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use catch_core::config::AudioConfig;
use catch_core::{AudioBank, AudioTrack};
use kira::manager::backend::DefaultBackend;
use kira::manager::{AudioManager, AudioManagerSettings};
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings};
use kira::sound::PlaybackState;
use kira::tween::Tween;
use kira::Volume;

type SharedManager = Rc<RefCell<AudioManager<DefaultBackend>>>;

pub struct KiraTrack {
    name: String,
    manager: SharedManager,
    data: StaticSoundData,
    looping: bool,
    handle: Option<StaticSoundHandle>,
    muted: bool,
}

impl KiraTrack {
    fn volume(&self) -> Volume {
        if self.muted {
            Volume::Amplitude(0.0)
        } else {
            Volume::Amplitude(1.0)
        }
    }

    fn apply_volume(&mut self) {
        let volume = self.volume();
        if let Some(handle) = self.handle.as_mut() {
            handle.set_volume(volume, Tween::default());
        }
    }
}

impl AudioTrack for KiraTrack {
    /// Loops keep a single running instance; cues start a fresh one each time.
    fn play(&mut self) {
        if self.looping && self.is_playing() {
            return;
        }
        let data = self.data.clone().volume(self.volume());
        match self.manager.borrow_mut().play(data) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::warn!("Failed to play '{}': {e}", self.name),
        }
    }

    fn mute(&mut self) {
        self.muted = true;
        self.apply_volume();
    }

    fn unmute(&mut self) {
        self.muted = false;
        self.apply_volume();
    }

    fn is_playing(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|h| h.state() == PlaybackState::Playing)
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}

fn load_track(
    manager: &SharedManager,
    path: &Path,
    looping: bool,
) -> Option<Box<dyn AudioTrack>> {
    let settings = if looping {
        StaticSoundSettings::new().loop_region(..)
    } else {
        StaticSoundSettings::new()
    };
    match StaticSoundData::from_file(path) {
        Ok(data) => Some(Box::new(KiraTrack {
            name: path.display().to_string(),
            manager: Rc::clone(manager),
            data: data.with_settings(settings),
            looping,
            handle: None,
            muted: false,
        })),
        Err(e) => {
            log::warn!("Audio '{}' unavailable: {e}", path.display());
            None
        }
    }
}

/// Open the output device and load every configured track.
pub fn load_audio_bank(config: &AudioConfig) -> AudioBank {
    let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
        Ok(manager) => Rc::new(RefCell::new(manager)),
        Err(e) => {
            log::warn!("No audio output, continuing silently: {e}");
            return AudioBank::default();
        }
    };

    let bank = AudioBank {
        music: load_track(&manager, &config.music, true),
        egg_music: load_track(&manager, &config.egg_music, true),
        score: load_track(&manager, &config.score, false),
        egg_score: load_track(&manager, &config.egg_score, false),
    };
    let loaded = [&bank.music, &bank.egg_music, &bank.score, &bank.egg_score]
        .iter()
        .filter(|t| t.is_some())
        .count();
    log::info!("Audio ready: {loaded}/4 tracks loaded");
    bank
}
