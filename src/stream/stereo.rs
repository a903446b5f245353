use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT};

use super::{AudioStream, StreamLength};

/// A stream that duplicates a mono child across two output channels
pub struct StereoStream {
    child: Box<dyn AudioStream>,
    scratch: OwnedAudioBuffer,
}

impl StereoStream {
    /// Wrap a mono stream, producing it on two channels
    pub fn new(child: Box<dyn AudioStream>) -> Self {
        debug_assert_eq!(child.channel_count(), 1);

        Self {
            child,
            scratch: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, 1),
        }
    }
}

impl AudioStream for StereoStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let frame_count = frame_count.min(MAXIMUM_FRAME_COUNT);

        self.scratch.clear();
        let produced = self.child.read(&mut self.scratch, frame_count, 0);

        for channel in 0..buffer.channel_count().min(2) {
            buffer.add_from(
                &self.scratch,
                SampleLocation::origin(),
                SampleLocation::new(channel, frame_offset),
                1,
                produced,
            );
        }

        produced
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
        2
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::new(self.child.duplicate()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{MemorySound, ReadStream};

    #[test]
    fn duplicates_mono_onto_both_channels() {
        let mut mono = OwnedAudioBuffer::new(8, 1);
        for frame in 0..8 {
            mono.set_sample(SampleLocation::frame(frame), frame as f32);
        }

        let mut stream = StereoStream::new(Box::new(ReadStream::new(MemorySound::new(mono))));
        assert_eq!(stream.channel_count(), 2);

        let mut buffer = OwnedAudioBuffer::new(8, 2);
        assert_eq!(stream.read(&mut buffer, 8, 0), 8);

        for frame in 0..8 {
            assert_eq!(
                buffer.get_sample(SampleLocation::new(0, frame)),
                buffer.get_sample(SampleLocation::new(1, frame))
            );
            assert_eq!(buffer.get_sample(SampleLocation::new(0, frame)), frame as f32);
        }
    }
}
