//! Native audio output through rodio

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::sink::{AudioError, AudioSink, MusicSource};
use super::synth::PcmBuffer;

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let file = File::open(path)
        .map_err(|e| AudioError::Decode(format!("{}: {e}", path.display())))?;
    Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode(e.to_string()))
}

fn samples(buffer: &PcmBuffer) -> SamplesBuffer<i16> {
    SamplesBuffer::new(buffer.channels, buffer.sample_rate, buffer.samples.clone())
}

/// Default output device. Effects get their own detached sink each; music
/// lives on one long-lived sink.
pub struct RodioSink {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Option<Sink>,
    music_file: Option<PathBuf>,
}

impl RodioSink {
    pub fn new() -> Result<Self, AudioError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| AudioError::Device(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
            music: None,
            music_file: None,
        })
    }
}

impl AudioSink for RodioSink {
    fn load_music_file(&mut self, path: &Path) -> Result<(), AudioError> {
        // Decode once up front so a bad file fails here rather than mid-game
        open_decoder(path)?;
        self.music_file = Some(path.to_path_buf());
        Ok(())
    }

    fn play_effect(&mut self, buffer: &PcmBuffer, volume: f32) {
        if volume <= 0.0 {
            return;
        }
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.set_volume(volume);
                sink.append(samples(buffer));
                sink.detach();
            }
            Err(e) => log::debug!("effect dropped: {e}"),
        }
    }

    fn start_music(&mut self, source: MusicSource<'_>, volume: f32) {
        self.stop_music();
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("Failed to open music sink: {e}");
                return;
            }
        };
        sink.set_volume(volume);
        match source {
            MusicSource::Synth(buffer) => sink.append(samples(buffer).repeat_infinite()),
            MusicSource::File => {
                let Some(path) = self.music_file.as_deref() else {
                    log::warn!("No music file loaded");
                    return;
                };
                match open_decoder(path) {
                    Ok(decoder) => sink.append(decoder.repeat_infinite()),
                    Err(e) => {
                        log::warn!("{e}");
                        return;
                    }
                }
            }
        }
        self.music = Some(sink);
    }

    fn pause_music(&mut self) {
        if let Some(sink) = &self.music {
            sink.pause();
        }
    }

    fn resume_music(&mut self) {
        if let Some(sink) = &self.music {
            sink.play();
        }
    }

    fn stop_music(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }

    fn set_music_volume(&mut self, volume: f32) {
        if let Some(sink) = &self.music {
            sink.set_volume(volume);
        }
    }

    fn music_active(&self) -> bool {
        self.music.as_ref().is_some_and(|sink| !sink.empty())
    }

    fn music_paused(&self) -> bool {
        self.music.as_ref().is_some_and(|sink| sink.is_paused())
    }
}
