use crate::AudioBuffer;

use super::{AudioStream, StreamLength};

/// A stream that produces a fixed number of silent frames
pub struct NullStream {
    length: u64,
    channel_count: usize,
    position: u64,
}

impl NullStream {
    /// Create a silent stream with a length in frames
    pub fn new(length: u64, channel_count: usize) -> Self {
        Self {
            length,
            channel_count,
            position: 0,
        }
    }
}

impl AudioStream for NullStream {
    fn read(
        &mut self,
        _buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        _frame_offset: usize,
    ) -> usize {
        let remaining = self.length - self.position;
        let frame_count = (frame_count as u64).min(remaining);
        self.position += frame_count;
        frame_count as usize
    }

    fn reset(&mut self) {
        self.position = 0;
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        Box::new(Self::new(
            self.length.saturating_sub(frames),
            self.channel_count,
        ))
    }

    fn length(&self) -> StreamLength {
        StreamLength::Frames(self.length)
    }

    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::new(self.length, self.channel_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OwnedAudioBuffer;

    #[test]
    fn produces_exactly_its_length() {
        let mut stream = NullStream::new(100, 1);
        let mut buffer = OwnedAudioBuffer::new(64, 1);

        assert_eq!(stream.read(&mut buffer, 64, 0), 64);
        assert_eq!(stream.read(&mut buffer, 64, 0), 36);
        assert_eq!(stream.read(&mut buffer, 64, 0), 0);
    }

    #[test]
    fn reset_rewinds() {
        let mut stream = NullStream::new(10, 1);
        let mut buffer = OwnedAudioBuffer::new(16, 1);

        assert_eq!(stream.read(&mut buffer, 16, 0), 10);
        stream.reset();
        assert_eq!(stream.read(&mut buffer, 16, 0), 10);
    }

    #[test]
    fn cut_begin_shortens() {
        let stream = NullStream::new(10, 1);
        let cut = stream.cut_begin(4);
        assert_eq!(cut.length(), StreamLength::Frames(6));
    }
}
