//! Audio: procedural synthesis plus pluggable output
//!
//! - `synth`: PCM buffers computed from waveform math
//! - `sink`: the output trait and the silent fallback
//! - `director`: game events -> sink calls, mute handling
//! - `rodio_sink` (native, `native-audio` feature) / `web_sink` (wasm32)

pub mod director;
pub mod sink;
pub mod synth;

#[cfg(all(feature = "native-audio", not(target_arch = "wasm32")))]
pub mod rodio_sink;
#[cfg(target_arch = "wasm32")]
pub mod web_sink;

pub use director::AudioDirector;
pub use sink::{AudioError, AudioSink, MusicSource, NullSink};
pub use synth::{PcmBuffer, SoundBank, SynthError, WaveSynthesizer, Waveform};

#[cfg(all(feature = "native-audio", not(target_arch = "wasm32")))]
pub use rodio_sink::RodioSink;
#[cfg(target_arch = "wasm32")]
pub use web_sink::WebAudioSink;
