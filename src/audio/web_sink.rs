//! Browser audio output using the Web Audio API
//!
//! PCM buffers are copied into `AudioBuffer`s and played through a master
//! gain node. Web Audio sources cannot pause, so pausing music stops the
//! source and remembers the loop offset to restart from.

use std::path::Path;

use web_sys::{AudioBuffer, AudioBufferSourceNode, AudioContext, AudioContextState, GainNode};

use super::sink::{AudioError, AudioSink, MusicSource};
use super::synth::PcmBuffer;

struct MusicChannel {
    buffer: AudioBuffer,
    gain: GainNode,
    source: Option<AudioBufferSourceNode>,
    /// Context time when the current source started, minus its start offset
    started_at: f64,
    /// Loop position to restart from after a pause
    offset: f64,
}

pub struct WebAudioSink {
    ctx: Option<AudioContext>,
    music: Option<MusicChannel>,
}

impl Default for WebAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudioSink {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, music: None }
    }

    /// Resume the context; browsers keep it suspended until a user gesture
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    fn to_audio_buffer(ctx: &AudioContext, pcm: &PcmBuffer) -> Option<AudioBuffer> {
        let buffer = ctx
            .create_buffer(pcm.channels as u32, pcm.frames() as u32, pcm.sample_rate as f32)
            .ok()?;
        for channel in 0..pcm.channels as usize {
            let data = pcm.channel(channel);
            buffer.copy_to_channel(&data, channel as i32).ok()?;
        }
        Some(buffer)
    }

    fn play_buffer(
        ctx: &AudioContext,
        buffer: &AudioBuffer,
        gain: &GainNode,
        looping: bool,
        offset: f64,
    ) -> Option<AudioBufferSourceNode> {
        let source = ctx.create_buffer_source().ok()?;
        source.set_buffer(Some(buffer));
        source.set_loop(looping);
        source.connect_with_audio_node(gain).ok()?;
        source.start_with_when_and_grain_offset(0.0, offset).ok()?;
        Some(source)
    }

    fn gain(ctx: &AudioContext, volume: f32) -> Option<GainNode> {
        let gain = ctx.create_gain().ok()?;
        gain.gain().set_value(volume);
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some(gain)
    }
}

impl AudioSink for WebAudioSink {
    fn load_music_file(&mut self, _path: &Path) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn play_effect(&mut self, buffer: &PcmBuffer, volume: f32) {
        if volume <= 0.0 {
            return;
        }
        self.resume();
        let Some(ctx) = &self.ctx else { return };
        let Some(audio) = Self::to_audio_buffer(ctx, buffer) else { return };
        let Some(gain) = Self::gain(ctx, volume) else { return };
        Self::play_buffer(ctx, &audio, &gain, false, 0.0);
    }

    fn start_music(&mut self, source: MusicSource<'_>, volume: f32) {
        self.stop_music();
        self.resume();
        let Some(ctx) = &self.ctx else { return };
        let MusicSource::Synth(pcm) = source else {
            log::warn!("Music files are not supported in the browser");
            return;
        };
        let Some(buffer) = Self::to_audio_buffer(ctx, pcm) else { return };
        let Some(gain) = Self::gain(ctx, volume) else { return };
        let node = Self::play_buffer(ctx, &buffer, &gain, true, 0.0);
        self.music = Some(MusicChannel {
            buffer,
            gain,
            source: node,
            started_at: ctx.current_time(),
            offset: 0.0,
        });
    }

    fn pause_music(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let Some(music) = &mut self.music else { return };
        if let Some(source) = music.source.take() {
            let _ = source.stop();
            let length = music.buffer.duration().max(f64::EPSILON);
            music.offset = (ctx.current_time() - music.started_at).rem_euclid(length);
        }
    }

    fn resume_music(&mut self) {
        self.resume();
        let Some(ctx) = &self.ctx else { return };
        let Some(music) = &mut self.music else { return };
        if music.source.is_none() {
            music.source = Self::play_buffer(ctx, &music.buffer, &music.gain, true, music.offset);
            music.started_at = ctx.current_time() - music.offset;
        }
    }

    fn stop_music(&mut self) {
        if let Some(source) = self.music.take().and_then(|music| music.source) {
            let _ = source.stop();
        }
    }

    fn set_music_volume(&mut self, volume: f32) {
        if let Some(music) = &self.music {
            music.gain.gain().set_value(volume);
        }
    }

    fn music_active(&self) -> bool {
        self.music.is_some()
    }

    fn music_paused(&self) -> bool {
        self.music.as_ref().is_some_and(|m| m.source.is_none())
    }

    fn unlock(&mut self) {
        self.resume();
    }
}
