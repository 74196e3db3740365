//! Procedural PCM synthesis
//!
//! Every sound in the game is computed here from closed-form waveforms:
//! no sample files. Output is 16-bit stereo with the mono signal duplicated
//! on both channels.

use std::f32::consts::TAU;

use thiserror::Error;

use crate::consts::{CHANNELS, SAMPLE_RATE};

/// Synthesis failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthError {
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),
    #[error("invalid duration: {0} s")]
    InvalidDuration(f32),
    #[error("synthesized buffer for {0} is empty")]
    EmptyBuffer(&'static str),
}

/// Interleaved 16-bit PCM
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples, `frames() * channels` long
    pub samples: Vec<i16>,
}

impl PcmBuffer {
    /// Duplicate a mono signal onto every channel
    pub fn from_mono(sample_rate: u32, channels: u16, mono: &[f32]) -> Self {
        let mut samples = Vec::with_capacity(mono.len() * channels as usize);
        for &x in mono {
            let value = to_i16(x);
            samples.extend(std::iter::repeat_n(value, channels as usize));
        }
        Self {
            sample_rate,
            channels,
            samples,
        }
    }

    /// Samples per channel
    #[inline]
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    /// One channel as normalized floats
    pub fn channel(&self, index: usize) -> Vec<f32> {
        self.samples
            .iter()
            .skip(index)
            .step_by(self.channels.max(1) as usize)
            .map(|&s| s as f32 / 32767.0)
            .collect()
    }
}

#[inline]
fn to_i16(x: f32) -> i16 {
    (x.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Base oscillator shapes for the generic tone generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Value at a phase measured in cycles
    pub fn sample(self, phase: f32) -> f32 {
        let p = phase.rem_euclid(1.0);
        match self {
            Waveform::Sine => (TAU * p).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
            Waveform::Sawtooth => 2.0 * p - 1.0,
        }
    }
}

/// Jump chirp: 300 -> 600 Hz over 0.3 s
pub const JUMP_DURATION: f32 = 0.3;
pub const JUMP_FREQ_START: f32 = 300.0;
pub const JUMP_FREQ_END: f32 = 600.0;
pub const JUMP_VOLUME: f32 = 0.3;

/// Collect ping: 1200 Hz over 0.15 s
pub const COLLECT_DURATION: f32 = 0.15;
pub const COLLECT_FREQ: f32 = 1200.0;
pub const COLLECT_VOLUME: f32 = 0.2;

/// Music bed
pub const MUSIC_BPM: f32 = 120.0;
pub const MUSIC_NOTES: [f32; 8] = [220.0, 261.0, 329.0, 392.0, 440.0, 392.0, 329.0, 261.0];
pub const MUSIC_NOTE_VOLUME: f32 = 0.1;
pub const MUSIC_BASS_VOLUME: f32 = 0.15;

/// Every pre-rendered buffer the game plays
#[derive(Debug, Clone)]
pub struct SoundBank {
    pub jump: PcmBuffer,
    pub collect: PcmBuffer,
    pub music: PcmBuffer,
}

/// Generates PCM buffers at a fixed sample rate
#[derive(Debug, Clone, Copy)]
pub struct WaveSynthesizer {
    sample_rate: u32,
    channels: u16,
}

impl Default for WaveSynthesizer {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: CHANNELS,
        }
    }
}

impl WaveSynthesizer {
    pub fn new(sample_rate: u32) -> Result<Self, SynthError> {
        if sample_rate == 0 {
            return Err(SynthError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            sample_rate,
            channels: CHANNELS,
        })
    }

    fn frame_count(&self, duration: f32) -> Result<usize, SynthError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(SynthError::InvalidDuration(duration));
        }
        Ok((self.sample_rate as f32 * duration).round() as usize)
    }

    fn finish(&self, what: &'static str, mono: Vec<f32>) -> Result<PcmBuffer, SynthError> {
        if mono.is_empty() {
            return Err(SynthError::EmptyBuffer(what));
        }
        Ok(PcmBuffer::from_mono(self.sample_rate, self.channels, &mono))
    }

    /// Generic tone with an e^(-3t) decay envelope
    pub fn generate_wave(
        &self,
        waveform: Waveform,
        duration: f32,
        frequency: f32,
        volume: f32,
    ) -> Result<PcmBuffer, SynthError> {
        let n = self.frame_count(duration)?;
        let sr = self.sample_rate as f32;
        let mono = (0..n)
            .map(|i| {
                let t = i as f32 / sr;
                waveform.sample(frequency * t) * volume * (-3.0 * t).exp()
            })
            .collect();
        self.finish("tone", mono)
    }

    /// Rising sine chirp played on an accepted jump.
    ///
    /// The phase is the integral of a linear frequency ramp, so the
    /// instantaneous frequency really does run from 300 Hz to 600 Hz.
    pub fn jump(&self) -> Result<PcmBuffer, SynthError> {
        let n = self.frame_count(JUMP_DURATION)?;
        let sr = self.sample_rate as f32;
        let span = (n.max(2) - 1) as f32 / sr;
        let slope = (JUMP_FREQ_END - JUMP_FREQ_START) / span;
        let mono = (0..n)
            .map(|i| {
                let t = i as f32 / sr;
                let cycles = JUMP_FREQ_START * t + 0.5 * slope * t * t;
                (TAU * cycles).sin() * JUMP_VOLUME
            })
            .collect();
        self.finish("jump", mono)
    }

    /// Short high ping with a linear fade to silence
    pub fn collect(&self) -> Result<PcmBuffer, SynthError> {
        let n = self.frame_count(COLLECT_DURATION)?;
        let sr = self.sample_rate as f32;
        let last = (n.max(2) - 1) as f32;
        let mono = (0..n)
            .map(|i| {
                let t = i as f32 / sr;
                let envelope = 1.0 - i as f32 / last;
                (TAU * COLLECT_FREQ * t).sin() * COLLECT_VOLUME * envelope
            })
            .collect();
        self.finish("collect", mono)
    }

    /// Eight-beat arpeggio loop with a bass note on beats 0 and 4
    pub fn music_loop(&self) -> Result<PcmBuffer, SynthError> {
        let beat = self.frame_count(60.0 / MUSIC_BPM)?;
        let sr = self.sample_rate as f32;
        let mut mono = vec![0.0f32; beat * MUSIC_NOTES.len()];
        let last = (beat.max(2) - 1) as f32;

        for (index, &freq) in MUSIC_NOTES.iter().enumerate() {
            let slot = &mut mono[index * beat..(index + 1) * beat];
            let with_bass = index % 4 == 0;
            for (i, sample) in slot.iter_mut().enumerate() {
                let t = i as f32 / sr;
                let envelope = 1.0 - i as f32 / last;
                *sample += (TAU * freq * t).sin() * MUSIC_NOTE_VOLUME * envelope;
                if with_bass {
                    *sample += (TAU * freq * 0.5 * t).sin() * MUSIC_BASS_VOLUME;
                }
            }
        }
        self.finish("music", mono)
    }

    /// Render everything the game needs up front
    pub fn sound_bank(&self) -> Result<SoundBank, SynthError> {
        Ok(SoundBank {
            jump: self.jump()?,
            collect: self.collect()?,
            music: self.music_loop()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Sub-sample positions of upward and downward zero crossings
    fn zero_crossings(signal: &[f32]) -> Vec<f32> {
        let mut crossings = Vec::new();
        for i in 1..signal.len() {
            let (a, b) = (signal[i - 1], signal[i]);
            if (a < 0.0) != (b < 0.0) && a != b {
                crossings.push((i - 1) as f32 + a / (a - b));
            }
        }
        crossings
    }

    /// Mean frequency over a run of half-periods
    fn frequency(crossings: &[f32], sample_rate: f32) -> f32 {
        let span = crossings[crossings.len() - 1] - crossings[0];
        let half_periods = (crossings.len() - 1) as f32;
        sample_rate * half_periods / (2.0 * span)
    }

    #[test]
    fn test_jump_length_and_sweep() {
        let synth = WaveSynthesizer::default();
        let jump = synth.jump().unwrap();
        assert_eq!(jump.frames(), 13_230);
        assert_eq!(jump.channels, 2);
        assert_eq!(jump.samples.len(), 26_460);

        let left = jump.channel(0);
        let crossings = zero_crossings(&left);
        let head = frequency(&crossings[1..6], 44_100.0);
        let tail = frequency(&crossings[crossings.len() - 6..], 44_100.0);
        assert!((head - 300.0).abs() < 10.0, "start {head} Hz");
        assert!((tail - 600.0).abs() < 10.0, "end {tail} Hz");
    }

    #[test]
    fn test_jump_channels_identical() {
        let jump = WaveSynthesizer::default().jump().unwrap();
        assert_eq!(jump.channel(0), jump.channel(1));
        let peak = jump.samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak <= (0.3 * 32767.0) as u16 + 1);
        assert!(peak > (0.29 * 32767.0) as u16);
    }

    #[test]
    fn test_collect_fades_out() {
        let collect = WaveSynthesizer::default().collect().unwrap();
        assert_eq!(collect.frames(), 6_615);
        let left = collect.channel(0);
        assert_eq!(left[0], 0.0);
        assert_eq!(*left.last().unwrap(), 0.0);

        let head_peak = left[..200].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let tail_peak = left[left.len() - 200..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert_relative_eq!(head_peak, 0.2, epsilon = 0.01);
        assert!(tail_peak < 0.01);

        let crossings = zero_crossings(&left[..2000]);
        let freq = frequency(&crossings, 44_100.0);
        assert_relative_eq!(freq, 1200.0, epsilon = 15.0);
    }

    #[test]
    fn test_music_loop_layout() {
        let music = WaveSynthesizer::default().music_loop().unwrap();
        assert_eq!(music.frames(), 8 * 22_050);
        let left = music.channel(0);

        // Beat 1 (261 Hz, no bass) starts loud and fades to silence
        let beat1 = &left[22_050..44_100];
        let start_peak = beat1[..400].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let end_peak = beat1[beat1.len() - 400..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert_relative_eq!(start_peak, 0.1, epsilon = 0.005);
        assert!(end_peak < 0.003);

        // Beat 4 carries the 220 Hz bass until its last sample
        let beat4 = &left[4 * 22_050..5 * 22_050];
        let tail_peak = beat4[beat4.len() - 400..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(tail_peak > 0.12, "bass missing: {tail_peak}");
    }

    #[test]
    fn test_generic_wave_decays() {
        let synth = WaveSynthesizer::default();
        let tone = synth.generate_wave(Waveform::Square, 1.0, 100.0, 0.5).unwrap();
        assert_eq!(tone.frames(), 44_100);
        let left = tone.channel(0);
        assert_relative_eq!(left[1], 0.5, epsilon = 0.001);
        // e^-3 at t = 1 s
        let tail = left[44_000].abs();
        assert_relative_eq!(tail, 0.5 * (-3.0f32 * 44_000.0 / 44_100.0).exp(), epsilon = 0.001);
    }

    #[test]
    fn test_waveform_shapes() {
        assert_relative_eq!(Waveform::Sine.sample(0.25), 1.0, epsilon = 1e-6);
        assert_eq!(Waveform::Square.sample(0.75), -1.0);
        assert_relative_eq!(Waveform::Triangle.sample(0.5), 1.0);
        assert_relative_eq!(Waveform::Triangle.sample(0.0), -1.0);
        assert_relative_eq!(Waveform::Sawtooth.sample(1.5), 0.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            WaveSynthesizer::new(0).unwrap_err(),
            SynthError::InvalidSampleRate(0)
        );
        let synth = WaveSynthesizer::default();
        assert!(matches!(
            synth.generate_wave(Waveform::Sine, -1.0, 440.0, 0.5),
            Err(SynthError::InvalidDuration(_))
        ));
        assert!(matches!(
            synth.generate_wave(Waveform::Sine, f32::NAN, 440.0, 0.5),
            Err(SynthError::InvalidDuration(_))
        ));
        // Too short to yield a single frame
        assert_eq!(
            synth.generate_wave(Waveform::Sine, 1e-6, 440.0, 0.5).unwrap_err(),
            SynthError::EmptyBuffer("tone")
        );
    }

    #[test]
    fn test_sound_bank() {
        let bank = WaveSynthesizer::new(22_050).unwrap().sound_bank().unwrap();
        assert_eq!(bank.jump.sample_rate, 22_050);
        assert_eq!(bank.jump.frames(), 6_615);
        assert_eq!(bank.music.frames(), 8 * 11_025);
    }
}
