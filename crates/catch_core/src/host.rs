//! Collaborators supplied by the host: audio playback and overlay text.
//!
//! The core only calls these; playback internals and text layout belong to
//! the host. Every audio track is cosmetic and therefore optional.

pub trait AudioTrack {
    fn play(&mut self);
    fn mute(&mut self);
    fn unmute(&mut self);
    fn is_playing(&self) -> bool;
    fn is_muted(&self) -> bool;
}

pub trait TextDisplay {
    fn set_value(&mut self, value: &str);
}

pub type Track = Option<Box<dyn AudioTrack>>;

#[derive(Default)]
pub struct AudioBank {
    pub music: Track,
    pub egg_music: Track,
    pub score: Track,
    pub egg_score: Track,
}

impl AudioBank {
    /// Start both music loops, with only the normal one audible.
    pub fn start_music(&mut self) {
        with_track(&mut self.egg_music, |t| t.mute());
        with_track(&mut self.music, |t| t.play());
        with_track(&mut self.egg_music, |t| t.play());
    }

    /// Restart any music loop that is not running, e.g. because the output
    /// device refused playback before the first user input.
    pub fn resume_music(&mut self) {
        for track in [&mut self.music, &mut self.egg_music] {
            with_track(track, |t| {
                if !t.is_playing() {
                    t.play();
                }
            });
        }
    }

    pub fn select_music(&mut self, egg: bool) {
        if egg {
            with_track(&mut self.music, |t| t.mute());
            with_track(&mut self.egg_music, |t| t.unmute());
        } else {
            with_track(&mut self.music, |t| t.unmute());
            with_track(&mut self.egg_music, |t| t.mute());
        }
    }

    pub fn play_score_cue(&mut self, egg: bool) {
        let cue = if egg {
            &mut self.egg_score
        } else {
            &mut self.score
        };
        with_track(cue, |t| t.play());
    }
}

fn with_track(track: &mut Track, f: impl FnOnce(&mut dyn AudioTrack)) {
    if let Some(track) = track.as_deref_mut() {
        f(track);
    }
}

/// Discards every value. Used by headless runs.
pub struct NullText;

impl TextDisplay for NullText {
    fn set_value(&mut self, _value: &str) {}
}

pub struct Collaborators {
    pub score_text: Box<dyn TextDisplay>,
    pub tutorial_text: Box<dyn TextDisplay>,
    pub audio: AudioBank,
}

impl Collaborators {
    /// No text and no audio.
    pub fn silent() -> Self {
        Self {
            score_text: Box::new(NullText),
            tutorial_text: Box::new(NullText),
            audio: AudioBank::default(),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording doubles shared by the core's tests.

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Default)]
    pub struct TrackState {
        pub plays: u32,
        pub playing: bool,
        pub muted: bool,
    }

    #[derive(Clone, Default)]
    pub struct RecordingTrack(pub Rc<RefCell<TrackState>>);

    impl AudioTrack for RecordingTrack {
        fn play(&mut self) {
            let mut state = self.0.borrow_mut();
            state.plays += 1;
            state.playing = true;
        }
        fn mute(&mut self) {
            self.0.borrow_mut().muted = true;
        }
        fn unmute(&mut self) {
            self.0.borrow_mut().muted = false;
        }
        fn is_playing(&self) -> bool {
            self.0.borrow().playing
        }
        fn is_muted(&self) -> bool {
            self.0.borrow().muted
        }
    }

    #[derive(Clone, Default)]
    pub struct RecordingText(pub Rc<RefCell<Vec<String>>>);

    impl RecordingText {
        pub fn last(&self) -> Option<String> {
            self.0.borrow().last().cloned()
        }
        pub fn count(&self) -> usize {
            self.0.borrow().len()
        }
    }

    impl TextDisplay for RecordingText {
        fn set_value(&mut self, value: &str) {
            self.0.borrow_mut().push(value.to_string());
        }
    }

    #[derive(Clone, Default)]
    pub struct Recorders {
        pub score_text: RecordingText,
        pub tutorial_text: RecordingText,
        pub music: RecordingTrack,
        pub egg_music: RecordingTrack,
        pub score: RecordingTrack,
        pub egg_score: RecordingTrack,
    }

    impl Recorders {
        pub fn collaborators(&self) -> Collaborators {
            Collaborators {
                score_text: Box::new(self.score_text.clone()),
                tutorial_text: Box::new(self.tutorial_text.clone()),
                audio: AudioBank {
                    music: Some(Box::new(self.music.clone())),
                    egg_music: Some(Box::new(self.egg_music.clone())),
                    score: Some(Box::new(self.score.clone())),
                    egg_score: Some(Box::new(self.egg_score.clone())),
                },
            }
        }
    }
}
