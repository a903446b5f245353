use crate::{AudioBuffer, OwnedAudioBuffer, MAXIMUM_FRAME_COUNT};

use super::{AudioStream, StreamLength};

/// A pull-based driver for a stream tree
///
/// Wraps a stream so a host without a non-interleaved buffer of its own
/// can pull interleaved frames from it, cycle by cycle. The wrapped tree
/// is otherwise a plain stream and can be composed further.
pub struct RendererStream {
    child: Box<dyn AudioStream>,
    scratch: OwnedAudioBuffer,
}

impl RendererStream {
    pub fn new(child: Box<dyn AudioStream>) -> Self {
        let channel_count = child.channel_count();

        Self {
            child,
            scratch: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
        }
    }

    /// Pull frames from the tree into an interleaved slice
    ///
    /// `interleaved` must hold a whole number of frames of `channel_count`
    /// samples each. Returns the number of frames produced; the rest of
    /// the slice is zeroed.
    pub fn read_interleaved(&mut self, interleaved: &mut [f32], channel_count: usize) -> usize {
        if channel_count == 0 {
            return 0;
        }

        interleaved.fill(0.0);

        let frame_count = (interleaved.len() / channel_count).min(MAXIMUM_FRAME_COUNT);

        self.scratch.clear();
        let produced = self.child.read(&mut self.scratch, frame_count, 0);

        self.scratch.copy_to_interleaved(
            &mut interleaved[..produced * channel_count],
            channel_count,
            produced,
        );

        produced
    }
}

impl AudioStream for RendererStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        self.child.read(buffer, frame_count, frame_offset)
    }

    fn reset(&mut self) {
        self.child.reset();
    }

    fn stop(&mut self) {
        self.child.stop();
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        Box::new(Self::new(self.child.cut_begin(frames)))
    }

    fn length(&self) -> StreamLength {
        self.child.length()
    }

    fn channel_count(&self) -> usize {
        self.child.channel_count()
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::new(self.child.duplicate()))
    }
}
