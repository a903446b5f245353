mod cut;
mod fade;
mod input;
mod looped;
mod mix;
mod null;
mod pitch;
mod read;
mod renderer;
mod sequence;
mod sound;
mod stereo;
mod transform;
mod write;

pub use cut::CutStream;
pub use fade::FadeStream;
pub use input::{InputFeed, InputStream};
pub use looped::LoopStream;
pub use mix::MixStream;
pub use null::NullStream;
pub use pitch::PitchTimeStream;
pub use read::ReadStream;
pub use renderer::RendererStream;
pub use sequence::SequenceStream;
pub use sound::{MemorySink, MemorySound, SoundSink, SoundSource};
pub use stereo::StereoStream;
pub use transform::TransformStream;
pub use write::WriteStream;

use crate::AudioBuffer;

/// The length of a stream in frames
///
/// Realtime capture streams and infinite loops have no meaningful frame
/// count, so length is an explicit two-state value rather than a zero
/// sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamLength {
    /// A known length in frames
    Frames(u64),

    /// The stream never ends on its own
    Unbounded,
}

impl StreamLength {
    /// The frame count, if the stream is bounded
    pub fn frames(self) -> Option<u64> {
        match self {
            Self::Frames(frames) => Some(frames),
            Self::Unbounded => None,
        }
    }

    /// Whether the stream never ends on its own
    pub fn is_unbounded(self) -> bool {
        self == Self::Unbounded
    }

    /// The longer of two lengths
    pub fn longest(self, other: Self) -> Self {
        match (self, other) {
            (Self::Frames(a), Self::Frames(b)) => Self::Frames(a.max(b)),
            _ => Self::Unbounded,
        }
    }

    /// The sum of two lengths
    pub fn plus(self, other: Self) -> Self {
        match (self, other) {
            (Self::Frames(a), Self::Frames(b)) => Self::Frames(a + b),
            _ => Self::Unbounded,
        }
    }

    /// The length after removing a number of frames from the start
    pub fn minus(self, frames: u64) -> Self {
        match self {
            Self::Frames(length) => Self::Frames(length.saturating_sub(frames)),
            Self::Unbounded => Self::Unbounded,
        }
    }
}

/// A composable source or transform of audio frames
///
/// Streams form a single-owner tree: a node owns its children exclusively
/// and the whole subtree is dropped with it. Composition factories take
/// their children by value.
///
/// `read` and `stop` are not synchronized against each other; a caller
/// that stops a stream from another thread must serialize the two calls
/// itself.
pub trait AudioStream: Send {
    /// Mix up to `frame_count` frames into `buffer` starting at
    /// `frame_offset`
    ///
    /// Samples are added to the buffer contents, so callers clear the
    /// destination region first. Returns the number of frames produced;
    /// fewer than requested signals end of stream. Never blocks: sources
    /// backed by slow media return whatever is available, down to zero
    /// frames.
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize;

    /// Symmetric contract for writer nodes; a no-op for pure sources
    fn write(
        &mut self,
        _buffer: &dyn AudioBuffer,
        _frame_count: usize,
        _frame_offset: usize,
    ) -> usize {
        0
    }

    /// Rewind the stream and all of its children to the start
    fn reset(&mut self);

    /// Request a clean halt without deallocation; propagates to children
    fn stop(&mut self) {}

    /// A new stream equivalent to this one with the first `frames` frames
    /// dropped
    ///
    /// The result is an independent tree recomposed from the children; it
    /// never aliases `self`.
    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream>;

    /// The stream length
    fn length(&self) -> StreamLength;

    /// The number of channels produced
    fn channel_count(&self) -> usize;

    /// A structurally independent deep clone with its cursor rewound
    fn duplicate(&self) -> Box<dyn AudioStream>;
}
