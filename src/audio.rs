//! Audio cues
//!
//! The game only ever asks for a cue by id. On the web each cue is an
//! `<audio>` element; elsewhere audio is silent.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

#[cfg(target_arch = "wasm32")]
pub use html::HtmlAudio;

/// Playable cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Music1,
    Music2,
    /// Player took damage
    Hit,
    /// Run lost
    Lose,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Music1, Cue::Music2, Cue::Hit, Cue::Lose];

    /// Resource the cue plays
    pub fn file(self) -> &'static str {
        match self {
            Cue::Music1 => "music1.mp3",
            Cue::Music2 => "music2.mp3",
            Cue::Hit => "hit.mp3",
            Cue::Lose => "lose.mp3",
        }
    }

    pub fn is_music(self) -> bool {
        matches!(self, Cue::Music1 | Cue::Music2)
    }

    /// Mix level before user volume
    pub fn base_volume(self) -> f32 {
        match self {
            Cue::Music1 | Cue::Music2 => 1.0,
            Cue::Hit => 0.3,
            Cue::Lose => 0.7,
        }
    }

    /// Final volume for this cue under the given settings
    pub fn volume(self, settings: &Settings) -> f32 {
        if settings.muted {
            return 0.0;
        }
        let user = if self.is_music() {
            settings.music_volume
        } else {
            settings.sfx_volume
        };
        (self.base_volume() * user).clamp(0.0, 1.0)
    }
}

/// Background music choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MusicTrack {
    #[default]
    One,
    Two,
}

impl MusicTrack {
    pub fn cue(self) -> Cue {
        match self {
            MusicTrack::One => Cue::Music1,
            MusicTrack::Two => Cue::Music2,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            MusicTrack::One => MusicTrack::Two,
            MusicTrack::Two => MusicTrack::One,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MusicTrack::One => "Music 1",
            MusicTrack::Two => "Music 2",
        }
    }
}

/// Audio output capability
pub trait AudioOut {
    /// Play a cue from the start. Music cues loop and stop the other track.
    fn play(&mut self, cue: Cue);
    /// Pause whatever music is playing, keeping its position
    fn pause_music(&mut self);
    /// Continue a paused track where it left off
    fn resume_music(&mut self, track: MusicTrack);
    /// Re-apply volumes after a settings change
    fn apply_settings(&mut self, settings: &Settings);
}

/// No-op output (native builds, headless runs)
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioOut for SilentAudio {
    fn play(&mut self, cue: Cue) {
        log::trace!("(silent) play {:?}", cue);
    }

    fn pause_music(&mut self) {}

    fn resume_music(&mut self, _track: MusicTrack) {}

    fn apply_settings(&mut self, _settings: &Settings) {}
}

#[cfg(target_arch = "wasm32")]
mod html {
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::HtmlAudioElement;

    use super::{AudioOut, Cue, MusicTrack};
    use crate::error::StartupError;
    use crate::settings::Settings;

    /// One `<audio>` element per cue
    pub struct HtmlAudio {
        elements: Vec<(Cue, HtmlAudioElement)>,
    }

    impl HtmlAudio {
        /// Create all cue elements. A missing element is a fatal startup error.
        pub fn new(settings: &Settings) -> Result<Self, StartupError> {
            let mut elements = Vec::with_capacity(Cue::ALL.len());
            for cue in Cue::ALL {
                let el = HtmlAudioElement::new_with_src(cue.file())
                    .map_err(|_| StartupError::Audio(cue.file()))?;
                el.set_loop(cue.is_music());
                elements.push((cue, el));
            }
            let mut audio = Self { elements };
            audio.apply_settings(settings);
            Ok(audio)
        }

        fn element(&self, cue: Cue) -> Option<&HtmlAudioElement> {
            self.elements.iter().find(|(c, _)| *c == cue).map(|(_, el)| el)
        }

        /// Start playback; autoplay rejections are expected and only logged
        fn start(cue: Cue, el: &HtmlAudioElement) {
            match el.play() {
                Ok(promise) => spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("Audio play failed for {}: {:?}", cue.file(), e);
                    }
                }),
                Err(e) => log::warn!("Audio play failed for {}: {:?}", cue.file(), e),
            }
        }
    }

    impl AudioOut for HtmlAudio {
        fn play(&mut self, cue: Cue) {
            if cue.is_music() {
                self.pause_music();
            }
            if let Some(el) = self.element(cue) {
                el.set_current_time(0.0);
                Self::start(cue, el);
            }
        }

        fn pause_music(&mut self) {
            for (cue, el) in &self.elements {
                if cue.is_music() {
                    let _ = el.pause();
                }
            }
        }

        fn resume_music(&mut self, track: MusicTrack) {
            let cue = track.cue();
            if let Some(el) = self.element(cue) {
                Self::start(cue, el);
            }
        }

        fn apply_settings(&mut self, settings: &Settings) {
            for (cue, el) in &self.elements {
                el.set_volume(cue.volume(settings) as f64);
            }
        }
    }
}
