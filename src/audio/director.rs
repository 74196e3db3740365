//! Maps game transitions and events onto sink calls
//!
//! All buffers are synthesized once at construction. If that fails, the
//! director is disabled: every method becomes a no-op and the game runs
//! silently.

use std::path::Path;

use super::sink::{AudioSink, MusicSource};
use super::synth::{SoundBank, SynthError, WaveSynthesizer};
use crate::settings::Settings;

pub struct AudioDirector {
    sink: Box<dyn AudioSink>,
    bank: Option<SoundBank>,
    /// A music file was accepted and replaces the synthesized loop
    external_music: bool,
    muted: bool,
    music_volume: f32,
    sfx_volume: f32,
}

impl AudioDirector {
    pub fn new(sink: Box<dyn AudioSink>, settings: &Settings) -> Self {
        Self::with_bank(sink, WaveSynthesizer::default().sound_bank(), settings)
    }

    /// Build from an already attempted synthesis
    pub fn with_bank(
        sink: Box<dyn AudioSink>,
        bank: Result<SoundBank, SynthError>,
        settings: &Settings,
    ) -> Self {
        let bank = match bank {
            Ok(bank) => Some(bank),
            Err(e) => {
                log::warn!("Audio generation failed, running silent: {e}");
                None
            }
        };
        Self {
            sink,
            bank,
            external_music: false,
            muted: settings.start_muted,
            music_volume: settings.effective_music_volume(),
            sfx_volume: settings.effective_sfx_volume(),
        }
    }

    /// Audio survived synthesis
    pub fn is_enabled(&self) -> bool {
        self.bank.is_some()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn uses_external_music(&self) -> bool {
        self.external_music
    }

    /// Prefer a music file over the synthesized loop when it loads
    pub fn use_music_file(&mut self, path: &Path) {
        if !self.is_enabled() {
            return;
        }
        if !path.exists() {
            log::debug!("No music file at {}", path.display());
            return;
        }
        match self.sink.load_music_file(path) {
            Ok(()) => {
                log::info!("Using music from {}", path.display());
                self.external_music = true;
            }
            Err(e) => log::warn!("Falling back to synthesized music: {e}"),
        }
    }

    fn music_level(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }

    fn start_music(&mut self) {
        let volume = self.music_level();
        let Some(bank) = &self.bank else { return };
        let source = if self.external_music {
            MusicSource::File
        } else {
            MusicSource::Synth(&bank.music)
        };
        self.sink.start_music(source, volume);
    }

    /// Fresh Playing entry (start or restart)
    pub fn on_session_start(&mut self) {
        if !self.is_enabled() || self.muted {
            return;
        }
        self.start_music();
    }

    /// Playing -> Paused
    pub fn on_pause(&mut self) {
        if self.is_enabled() {
            self.sink.pause_music();
        }
    }

    /// Paused -> Playing
    pub fn on_resume(&mut self) {
        if !self.is_enabled() || self.muted {
            return;
        }
        if self.sink.music_active() {
            self.sink.resume_music();
        } else {
            self.start_music();
        }
    }

    /// GameOver or Menu entry
    pub fn on_stop(&mut self) {
        if self.is_enabled() {
            self.sink.stop_music();
        }
    }

    pub fn play_jump(&mut self) {
        self.play_effect(|bank| &bank.jump);
    }

    pub fn play_collect(&mut self) {
        self.play_effect(|bank| &bank.collect);
    }

    fn play_effect(&mut self, pick: impl Fn(&SoundBank) -> &super::synth::PcmBuffer) {
        if self.muted || self.sfx_volume <= 0.0 {
            return;
        }
        if let Some(bank) = &self.bank {
            self.sink.play_effect(pick(bank), self.sfx_volume);
        }
    }

    /// Flip mute. `music_wanted` is true when the current mode plays music;
    /// unmuting then brings the loop back if it is paused or not running.
    pub fn toggle_mute(&mut self, music_wanted: bool) -> bool {
        self.muted = !self.muted;
        log::debug!("audio muted: {}", self.muted);
        if !self.is_enabled() {
            return self.muted;
        }
        let level = self.music_level();
        self.sink.set_music_volume(level);
        if !self.muted && music_wanted {
            if self.sink.music_paused() {
                self.sink.resume_music();
            } else if !self.sink.music_active() {
                self.start_music();
            }
        }
        self.muted
    }

    /// Forward a user gesture to the sink
    pub fn unlock(&mut self) {
        self.sink.unlock();
    }

    /// Process exit
    pub fn shutdown(&mut self) {
        self.on_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::sink::recording::{RecordingSink, SinkCall};
    use approx::assert_relative_eq;

    type Calls = std::rc::Rc<std::cell::RefCell<Vec<SinkCall>>>;

    fn director(settings: &Settings) -> (AudioDirector, Calls) {
        let (sink, calls) = RecordingSink::new();
        (AudioDirector::new(Box::new(sink), settings), calls)
    }

    #[test]
    fn test_session_lifecycle() {
        let (mut audio, calls) = director(&Settings::default());
        audio.on_session_start();
        audio.on_pause();
        audio.on_resume();
        audio.on_stop();
        let calls = calls.borrow();
        assert!(matches!(calls[0], SinkCall::StartMusic { file: false, .. }));
        assert_eq!(calls[1..], [SinkCall::Pause, SinkCall::Resume, SinkCall::Stop]);
        if let SinkCall::StartMusic { volume, .. } = calls[0] {
            assert_relative_eq!(volume, 0.8);
        }
    }

    #[test]
    fn test_effects_respect_mute() {
        let (mut audio, calls) = director(&Settings::default());
        audio.play_jump();
        audio.toggle_mute(false);
        audio.play_jump();
        audio.play_collect();
        audio.toggle_mute(false);
        audio.play_collect();

        let effects: Vec<usize> = calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                SinkCall::Effect { frames, .. } => Some(*frames),
                _ => None,
            })
            .collect();
        assert_eq!(effects, vec![13_230, 6_615]);
    }

    #[test]
    fn test_mute_keeps_music_running() {
        let (mut audio, calls) = director(&Settings::default());
        audio.on_session_start();
        assert!(audio.toggle_mute(true));
        assert!(!audio.toggle_mute(true));
        let calls = calls.borrow();
        assert_eq!(calls[1], SinkCall::Volume(0.0));
        assert!(matches!(calls[2], SinkCall::Volume(v) if (v - 0.8).abs() < 1e-6));
        // Loop was still active, so no restart
        assert_eq!(calls.len(), 3);
    }

    #[test]
    fn test_unmute_starts_music_when_wanted() {
        let settings = Settings {
            start_muted: true,
            ..Settings::default()
        };
        let (mut audio, calls) = director(&settings);
        audio.on_session_start();
        assert!(calls.borrow().is_empty(), "muted start plays nothing");

        audio.toggle_mute(true);
        assert!(matches!(calls.borrow().last(), Some(SinkCall::StartMusic { .. })));

        // Unmuting where the mode has no music only restores volume
        audio.on_stop();
        audio.toggle_mute(false);
        audio.toggle_mute(false);
        assert_eq!(calls.borrow().last(), Some(&SinkCall::Volume(0.8)));
    }

    #[test]
    fn test_resume_while_muted_then_unmute() {
        let (mut audio, calls) = director(&Settings::default());
        audio.on_session_start();
        audio.on_pause();
        audio.toggle_mute(false);
        audio.on_resume();
        assert_eq!(calls.borrow().last(), Some(&SinkCall::Volume(0.0)));

        audio.toggle_mute(true);
        assert_eq!(calls.borrow().last(), Some(&SinkCall::Resume));
    }

    #[test]
    fn test_synthesis_failure_disables_everything() {
        let (sink, calls) = RecordingSink::new();
        let mut audio = AudioDirector::with_bank(
            Box::new(sink),
            Err(SynthError::InvalidSampleRate(0)),
            &Settings::default(),
        );
        assert!(!audio.is_enabled());
        audio.use_music_file(Path::new("Cargo.toml"));
        audio.on_session_start();
        audio.play_jump();
        audio.play_collect();
        audio.on_pause();
        audio.on_resume();
        audio.toggle_mute(true);
        audio.toggle_mute(true);
        audio.shutdown();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_music_file_takes_priority() {
        let (mut sink, calls) = RecordingSink::new();
        sink.accept_music_file = true;
        let mut audio = AudioDirector::new(Box::new(sink), &Settings::default());
        // Any existing file will do for the recording sink
        audio.use_music_file(Path::new("Cargo.toml"));
        assert!(audio.uses_external_music());
        audio.on_session_start();
        assert!(matches!(
            calls.borrow().last(),
            Some(SinkCall::StartMusic { file: true, .. })
        ));
    }

    #[test]
    fn test_bad_music_file_falls_back() {
        let (sink, calls) = RecordingSink::new();
        let mut audio = AudioDirector::new(Box::new(sink), &Settings::default());
        audio.use_music_file(Path::new("Cargo.toml"));
        assert!(!audio.uses_external_music());
        audio.use_music_file(Path::new("definitely/not/here.mp3"));
        audio.on_session_start();
        let calls = calls.borrow();
        assert_eq!(calls[0], SinkCall::LoadMusicFile);
        assert!(matches!(calls[1], SinkCall::StartMusic { file: false, .. }));
    }
}
