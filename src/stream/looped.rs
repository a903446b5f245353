use crate::AudioBuffer;

use super::{AudioStream, SequenceStream, StreamLength};

/// A stream that replays its child a number of times
///
/// A count of `0` means unbounded repetition; a zero-iteration stream is
/// expressible as a zero-length [`super::NullStream`] instead.
pub struct LoopStream {
    child: Box<dyn AudioStream>,
    count: u64,
    iteration: u64,
}

impl LoopStream {
    /// Loop a stream `count` times, or forever when `count` is `0`
    pub fn new(child: Box<dyn AudioStream>, count: u64) -> Self {
        Self {
            child,
            count,
            iteration: 0,
        }
    }

    fn unbounded(&self) -> bool {
        self.count == 0
    }
}

impl AudioStream for LoopStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let mut produced = 0;
        let mut last_read_was_empty = false;

        while produced < frame_count {
            let wanted = frame_count - produced;
            let read = self
                .child
                .read(buffer, wanted, frame_offset + produced);
            produced += read;

            if read == wanted {
                break;
            }

            if read == 0 && last_read_was_empty {
                // A child that keeps producing nothing would never advance
                break;
            }
            last_read_was_empty = read == 0;

            // Child exhausted; rewind for the next iteration
            self.iteration += 1;
            if !self.unbounded() && self.iteration >= self.count {
                break;
            }

            self.child.reset();
        }

        produced
    }

    fn reset(&mut self) {
        self.iteration = 0;
        self.child.reset();
    }

    fn stop(&mut self) {
        self.child.stop();
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        let child_length = match self.child.length() {
            StreamLength::Frames(length) => length,
            StreamLength::Unbounded => return self.child.cut_begin(frames),
        };

        if child_length == 0 {
            return self.duplicate();
        }

        let skipped_iterations = frames / child_length;
        let remainder = frames % child_length;

        if !self.unbounded() && skipped_iterations >= self.count {
            return Box::new(super::NullStream::new(0, self.channel_count()));
        }

        let remaining_count = if self.unbounded() {
            0
        } else {
            self.count - skipped_iterations - 1
        };

        let head = self.child.cut_begin(remainder);

        if remaining_count == 0 && !self.unbounded() {
            return head;
        }

        Box::new(SequenceStream::new(
            head,
            Box::new(Self::new(self.child.duplicate(), remaining_count)),
            0,
        ))
    }

    fn length(&self) -> StreamLength {
        if self.unbounded() {
            return StreamLength::Unbounded;
        }

        match self.child.length() {
            StreamLength::Frames(length) => StreamLength::Frames(length * self.count),
            StreamLength::Unbounded => StreamLength::Unbounded,
        }
    }

    fn channel_count(&self) -> usize {
        self.child.channel_count()
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::new(self.child.duplicate(), self.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        stream::{MemorySound, NullStream, ReadStream},
        OwnedAudioBuffer, SampleLocation,
    };

    fn short_ramp() -> Box<dyn AudioStream> {
        let mut buffer = OwnedAudioBuffer::new(4, 1);
        for frame in 0..4 {
            buffer.set_sample(SampleLocation::frame(frame), frame as f32);
        }
        Box::new(ReadStream::new(MemorySound::new(buffer)))
    }

    #[test]
    fn repeats_the_child() {
        let mut stream = LoopStream::new(short_ramp(), 3);
        assert_eq!(stream.length(), StreamLength::Frames(12));

        let mut buffer = OwnedAudioBuffer::new(16, 1);
        assert_eq!(stream.read(&mut buffer, 16, 0), 12);

        for frame in 0..12 {
            assert_eq!(
                buffer.get_sample(SampleLocation::frame(frame)),
                (frame % 4) as f32
            );
        }
    }

    #[test]
    fn zero_count_is_unbounded() {
        let mut stream = LoopStream::new(short_ramp(), 0);
        assert_eq!(stream.length(), StreamLength::Unbounded);

        let mut buffer = OwnedAudioBuffer::new(64, 1);
        assert_eq!(stream.read(&mut buffer, 64, 0), 64);
        assert_eq!(stream.read(&mut buffer, 64, 0), 64);
    }

    #[test]
    fn zero_length_child_does_not_spin() {
        let mut stream = LoopStream::new(Box::new(NullStream::new(0, 1)), 0);
        let mut buffer = OwnedAudioBuffer::new(16, 1);
        assert_eq!(stream.read(&mut buffer, 16, 0), 0);
    }

    #[test]
    fn cut_begin_lands_mid_iteration() {
        let stream = LoopStream::new(short_ramp(), 3);
        let cut = stream.cut_begin(6);
        assert_eq!(cut.length(), StreamLength::Frames(6));
    }
}
