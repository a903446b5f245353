use crate::AudioBuffer;

use super::{AudioStream, StreamLength};

/// A stream that sums two children sample for sample
///
/// The mix runs for as long as the longer child; an exhausted child
/// contributes silence.
pub struct MixStream {
    first: Box<dyn AudioStream>,
    second: Box<dyn AudioStream>,
}

impl MixStream {
    /// Mix two streams
    pub fn new(first: Box<dyn AudioStream>, second: Box<dyn AudioStream>) -> Self {
        Self { first, second }
    }
}

impl AudioStream for MixStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        // Reads are additive, so both children can target the same region
        let read_first = self.first.read(buffer, frame_count, frame_offset);
        let read_second = self.second.read(buffer, frame_count, frame_offset);
        read_first.max(read_second)
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn stop(&mut self) {
        self.first.stop();
        self.second.stop();
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        Box::new(Self::new(
            self.first.cut_begin(frames),
            self.second.cut_begin(frames),
        ))
    }

    fn length(&self) -> StreamLength {
        self.first.length().longest(self.second.length())
    }

    fn channel_count(&self) -> usize {
        self.first.channel_count().max(self.second.channel_count())
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::new(self.first.duplicate(), self.second.duplicate()))
    }
}
