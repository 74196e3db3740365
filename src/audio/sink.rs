//! Audio output abstraction
//!
//! The game never talks to a device directly. It hands PCM buffers and
//! transport commands to an [`AudioSink`]; the platform shell picks the
//! implementation (rodio on native, Web Audio in the browser, or the silent
//! [`NullSink`] when neither is available). Calls are fire-and-forget: a sink
//! must never block the frame loop.

use std::path::Path;

use thiserror::Error;

use super::synth::PcmBuffer;

/// Sink failures. Only surfaced while setting a sink up.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device error: {0}")]
    Device(String),
    #[error("failed to decode audio: {0}")]
    Decode(String),
    #[error("audio output unavailable on this platform")]
    Unavailable,
}

/// Which loop the music channel should play
#[derive(Debug, Clone, Copy)]
pub enum MusicSource<'a> {
    /// A synthesized buffer, looped forever
    Synth(&'a PcmBuffer),
    /// The music file previously accepted by `load_music_file`
    File,
}

/// Output mechanism for effects and one looping music channel
pub trait AudioSink {
    /// Validate and remember an external music file
    fn load_music_file(&mut self, path: &Path) -> Result<(), AudioError>;

    /// Fire-and-forget effect playback
    fn play_effect(&mut self, buffer: &PcmBuffer, volume: f32);

    /// Replace whatever the music channel is doing with a new loop
    fn start_music(&mut self, source: MusicSource<'_>, volume: f32);

    fn pause_music(&mut self);

    fn resume_music(&mut self);

    fn stop_music(&mut self);

    /// Change music volume without touching playback position
    fn set_music_volume(&mut self, volume: f32);

    /// Music is loaded on the channel (playing or paused)
    fn music_active(&self) -> bool;

    fn music_paused(&self) -> bool;

    /// User gesture seen; hosts that gate output behind one start here
    fn unlock(&mut self) {}
}

/// Silent sink. Tracks transport state so callers behave identically.
#[derive(Debug, Default)]
pub struct NullSink {
    active: bool,
    paused: bool,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for NullSink {
    fn load_music_file(&mut self, _path: &Path) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn play_effect(&mut self, _buffer: &PcmBuffer, _volume: f32) {}

    fn start_music(&mut self, _source: MusicSource<'_>, _volume: f32) {
        self.active = true;
        self.paused = false;
    }

    fn pause_music(&mut self) {
        self.paused = self.active;
    }

    fn resume_music(&mut self) {
        self.paused = false;
    }

    fn stop_music(&mut self) {
        self.active = false;
        self.paused = false;
    }

    fn set_music_volume(&mut self, _volume: f32) {}

    fn music_active(&self) -> bool {
        self.active
    }

    fn music_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SinkCall {
        LoadMusicFile,
        Effect { frames: usize, volume: f32 },
        StartMusic { file: bool, volume: f32 },
        Pause,
        Resume,
        Stop,
        Volume(f32),
    }

    /// Test double that logs every call into a shared list
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub calls: Rc<RefCell<Vec<SinkCall>>>,
        pub accept_music_file: bool,
        active: bool,
        paused: bool,
    }

    impl RecordingSink {
        pub fn new() -> (Self, Rc<RefCell<Vec<SinkCall>>>) {
            let sink = Self::default();
            let calls = Rc::clone(&sink.calls);
            (sink, calls)
        }
    }

    impl AudioSink for RecordingSink {
        fn load_music_file(&mut self, _path: &Path) -> Result<(), AudioError> {
            self.calls.borrow_mut().push(SinkCall::LoadMusicFile);
            if self.accept_music_file {
                Ok(())
            } else {
                Err(AudioError::Decode("not an mp3".into()))
            }
        }

        fn play_effect(&mut self, buffer: &PcmBuffer, volume: f32) {
            self.calls.borrow_mut().push(SinkCall::Effect {
                frames: buffer.frames(),
                volume,
            });
        }

        fn start_music(&mut self, source: MusicSource<'_>, volume: f32) {
            self.active = true;
            self.paused = false;
            self.calls.borrow_mut().push(SinkCall::StartMusic {
                file: matches!(source, MusicSource::File),
                volume,
            });
        }

        fn pause_music(&mut self) {
            self.paused = self.active;
            self.calls.borrow_mut().push(SinkCall::Pause);
        }

        fn resume_music(&mut self) {
            self.paused = false;
            self.calls.borrow_mut().push(SinkCall::Resume);
        }

        fn stop_music(&mut self) {
            self.active = false;
            self.paused = false;
            self.calls.borrow_mut().push(SinkCall::Stop);
        }

        fn set_music_volume(&mut self, volume: f32) {
            self.calls.borrow_mut().push(SinkCall::Volume(volume));
        }

        fn music_active(&self) -> bool {
            self.active
        }

        fn music_paused(&self) -> bool {
            self.paused
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_tracks_transport() {
        let buffer = PcmBuffer::from_mono(44_100, 2, &[0.0; 4]);
        let mut sink = NullSink::new();
        assert!(sink.load_music_file(Path::new("music.mp3")).is_err());
        assert!(!sink.music_active());

        sink.start_music(MusicSource::Synth(&buffer), 1.0);
        assert!(sink.music_active());
        sink.pause_music();
        assert!(sink.music_paused());
        sink.resume_music();
        assert!(!sink.music_paused());
        sink.stop_music();
        assert!(!sink.music_active());

        // Pausing with nothing loaded is not a paused state
        sink.pause_music();
        assert!(!sink.music_paused());
    }
}
