//! A real-time audio composition and mixing engine
//!
//! Audio is described as a tree of composable streams: file regions,
//! silence, loops, sequences with crossfades, mixes, effect transforms
//! and live input. Trees are scheduled on a frame-accurate timeline with
//! symbolic dates, or loaded onto mixer channels with per-channel volume,
//! stereo pan and anti-click envelopes.
//!
//! [`open_engine`] returns the two halves of an engine: a [`Player`] for
//! the control thread and an [`AudioProcess`] for whatever drives the
//! audio cycles, a realtime callback or the [`OfflineRenderer`].
//!
//! ```no_run
//! use audiostream::*;
//!
//! # fn main() -> Result<(), EngineError> {
//! let (player, process) = open_engine(EngineConfig::default())?;
//!
//! let sound = MemorySound::new(OwnedAudioBuffer::sine(44_100, 1, 44_100, 440.0, 0.5));
//! let stream = Box::new(StereoStream::new(Box::new(ReadStream::new(sound))));
//!
//! player.load_channel(0, stream)?;
//! player.start();
//! player.start_channel(0)?;
//! # Ok(())
//! # }
//! ```

mod buffer;
mod channel;
mod effect;
mod engine;
mod error;
mod pan_table;
mod scheduler;
mod stream;

pub use buffer::{AudioBuffer, OwnedAudioBuffer, SampleLocation};

pub use channel::{ChannelInfo, ChannelStatus, CHANNEL_FADE_FRAMES};

pub use effect::{
    share_effect, AudioEffect, ControlInfo, EffectChain, MonoPanEffect, SharedEffect,
    StereoPanEffect, VolumeEffect,
};

pub use engine::{
    open_engine, AudioProcess, AudioRenderer, DeviceInfo, EngineConfig, OfflineRenderer, Player,
    Processor, MAXIMUM_CHANNEL_COUNT,
};

pub use error::{EngineError, ScheduleError};

pub use pan_table::PanTable;

pub use scheduler::{CommandId, ControlAction, ControlCommand, Mixer, StreamCommand, SymbolicDate};

pub use stream::{
    AudioStream, CutStream, FadeStream, InputFeed, InputStream, LoopStream, MemorySink,
    MemorySound, MixStream, NullStream, PitchTimeStream, ReadStream, RendererStream,
    SequenceStream, SoundSink, SoundSource, StereoStream, StreamLength, TransformStream,
    WriteStream,
};

/// The largest number of frames a single cycle will process
pub const MAXIMUM_FRAME_COUNT: usize = 4096;
