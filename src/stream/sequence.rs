use itertools::izip;

use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT};

use super::{AudioStream, StreamLength};

/// A stream that concatenates two children, optionally overlapping the
/// tail of the first with the head of the second over a crossfade region
///
/// The crossfade is truncated so it never exceeds either child's length.
/// With a crossfade of `c`, the total length is `len1 + len2 - c`.
pub struct SequenceStream {
    first: Box<dyn AudioStream>,
    second: Box<dyn AudioStream>,
    crossfade: u64,
    position: u64,
    first_exhausted: bool,
    scratch_first: OwnedAudioBuffer,
    scratch_second: OwnedAudioBuffer,
}

impl SequenceStream {
    /// Sequence two streams with a crossfade length in frames
    pub fn new(first: Box<dyn AudioStream>, second: Box<dyn AudioStream>, crossfade: u64) -> Self {
        let mut crossfade = crossfade;

        if let Some(length) = first.length().frames() {
            crossfade = crossfade.min(length);
        } else {
            // An unbounded first child never reaches its tail
            crossfade = 0;
        }

        if let Some(length) = second.length().frames() {
            crossfade = crossfade.min(length);
        }

        let channel_count = first.channel_count().max(second.channel_count());

        Self {
            first,
            second,
            crossfade,
            position: 0,
            first_exhausted: false,
            scratch_first: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
            scratch_second: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
        }
    }

    fn read_crossfade(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
        fade_start: u64,
    ) -> usize {
        self.scratch_first.clear();
        self.scratch_second.clear();

        let read_first = self.first.read(&mut self.scratch_first, frame_count, 0);
        let read_second = self.second.read(&mut self.scratch_second, frame_count, 0);
        let produced = read_first.max(read_second);

        let channel_count = self.channel_count().min(buffer.channel_count());

        for channel in 0..channel_count {
            let tail =
                &self.scratch_first.get_channel_data(SampleLocation::channel(channel))[..produced];
            let head =
                &self.scratch_second.get_channel_data(SampleLocation::channel(channel))[..produced];
            let destination =
                buffer.get_channel_data_mut(SampleLocation::new(channel, frame_offset));

            for (frame, (destination_value, tail_value, head_value)) in
                izip!(destination.iter_mut(), tail, head).enumerate()
            {
                let t = (self.position + frame as u64 - fade_start) as f32 / self.crossfade as f32;
                *destination_value += tail_value * (1.0 - t) + head_value * t;
            }
        }

        produced
    }
}

impl AudioStream for SequenceStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let frame_count = frame_count.min(MAXIMUM_FRAME_COUNT);
        let mut produced = 0;

        while produced < frame_count {
            let wanted = frame_count - produced;

            if self.first_exhausted {
                let read = self.second.read(buffer, wanted, frame_offset + produced);
                produced += read;
                self.position += read as u64;

                if read < wanted {
                    break;
                }
                continue;
            }

            let first_length = match self.first.length().frames() {
                Some(length) => length,
                None => {
                    let read = self.first.read(buffer, wanted, frame_offset + produced);
                    produced += read;
                    self.position += read as u64;

                    if read < wanted {
                        self.first_exhausted = true;
                    }
                    continue;
                }
            };

            let fade_start = first_length - self.crossfade;

            if self.position < fade_start {
                let segment = wanted.min((fade_start - self.position) as usize);
                let read = self.first.read(buffer, segment, frame_offset + produced);
                produced += read;
                self.position += read as u64;

                if read < segment {
                    self.first_exhausted = true;
                }
            } else if self.position < first_length && self.crossfade > 0 {
                let segment = wanted.min((first_length - self.position) as usize);
                let read =
                    self.read_crossfade(buffer, segment, frame_offset + produced, fade_start);
                produced += read;
                self.position += read as u64;

                if self.position >= first_length || read < segment {
                    self.first_exhausted = true;
                }
            } else {
                self.first_exhausted = true;
            }
        }

        produced
    }

    fn reset(&mut self) {
        self.position = 0;
        self.first_exhausted = false;
        self.first.reset();
        self.second.reset();
    }

    fn stop(&mut self) {
        self.first.stop();
        self.second.stop();
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        let first_length = match self.first.length().frames() {
            Some(length) => length,
            None => return Box::new(Self::new(self.first.cut_begin(frames), self.second.duplicate(), 0)),
        };

        let fade_start = first_length - self.crossfade;

        if frames <= fade_start {
            Box::new(Self::new(
                self.first.cut_begin(frames),
                self.second.duplicate(),
                self.crossfade,
            ))
        } else if frames < first_length {
            Box::new(Self::new(
                self.first.cut_begin(frames),
                self.second.cut_begin(frames - fade_start),
                first_length - frames,
            ))
        } else {
            self.second.cut_begin(frames - fade_start)
        }
    }

    fn length(&self) -> StreamLength {
        self.first
            .length()
            .plus(self.second.length())
            .minus(self.crossfade)
    }

    fn channel_count(&self) -> usize {
        self.first.channel_count().max(self.second.channel_count())
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::new(
            self.first.duplicate(),
            self.second.duplicate(),
            self.crossfade,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{MemorySound, NullStream, ReadStream};
    use approx::assert_relative_eq;

    fn constant_stream(frame_count: usize, value: f32) -> Box<dyn AudioStream> {
        let mut buffer = OwnedAudioBuffer::new(frame_count, 1);
        buffer.fill_with_value(value);
        Box::new(ReadStream::new(MemorySound::new(buffer)))
    }

    #[test]
    fn length_subtracts_the_crossfade() {
        let stream = SequenceStream::new(constant_stream(100, 1.0), constant_stream(50, 1.0), 10);
        assert_eq!(stream.length(), StreamLength::Frames(140));
    }

    #[test]
    fn crossfade_is_truncated_to_the_shorter_child() {
        let stream = SequenceStream::new(constant_stream(100, 1.0), constant_stream(5, 1.0), 50);
        assert_eq!(stream.length(), StreamLength::Frames(100));
    }

    #[test]
    fn concatenates_without_crossfade() {
        let mut stream =
            SequenceStream::new(constant_stream(10, 1.0), constant_stream(10, 2.0), 0);

        let mut buffer = OwnedAudioBuffer::new(32, 1);
        assert_eq!(stream.read(&mut buffer, 32, 0), 20);

        assert_eq!(buffer.get_sample(SampleLocation::frame(9)), 1.0);
        assert_eq!(buffer.get_sample(SampleLocation::frame(10)), 2.0);
        assert_eq!(buffer.get_sample(SampleLocation::frame(19)), 2.0);
        assert_eq!(buffer.get_sample(SampleLocation::frame(20)), 0.0);
    }

    #[test]
    fn crossfade_blends_the_overlap() {
        let mut stream =
            SequenceStream::new(constant_stream(20, 1.0), constant_stream(20, 1.0), 10);

        let mut buffer = OwnedAudioBuffer::new(32, 1);
        assert_eq!(stream.read(&mut buffer, 32, 0), 30);

        // Complementary linear gains sum to unity for equal inputs
        for frame in 10..20 {
            assert_relative_eq!(
                buffer.get_sample(SampleLocation::frame(frame)),
                1.0,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn silence_then_sound() {
        let mut stream =
            SequenceStream::new(Box::new(NullStream::new(8, 1)), constant_stream(8, 3.0), 0);

        let mut buffer = OwnedAudioBuffer::new(16, 1);
        assert_eq!(stream.read(&mut buffer, 16, 0), 16);
        assert_eq!(buffer.get_sample(SampleLocation::frame(7)), 0.0);
        assert_eq!(buffer.get_sample(SampleLocation::frame(8)), 3.0);
    }
}
