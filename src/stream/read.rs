use std::sync::Arc;

use crate::{AudioBuffer, EngineError};

use super::{AudioStream, SoundSource, StreamLength};

/// A stream that reads a region of a sound source
pub struct ReadStream {
    source: Arc<dyn SoundSource>,
    begin: u64,
    end: u64,
    position: u64,
}

impl ReadStream {
    /// Create a stream over a whole sound
    pub fn new(source: Arc<dyn SoundSource>) -> Self {
        let end = source.frame_count();
        Self {
            source,
            begin: 0,
            end,
            position: 0,
        }
    }

    /// Create a stream over the region `[begin, end)` of a sound
    pub fn with_region(
        source: Arc<dyn SoundSource>,
        begin: u64,
        end: u64,
    ) -> Result<Self, EngineError> {
        if begin >= end || end > source.frame_count() {
            return Err(EngineError::InvalidRegion { begin, end });
        }

        Ok(Self {
            source,
            begin,
            end,
            position: 0,
        })
    }
}

impl AudioStream for ReadStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let remaining = (self.end - self.begin).saturating_sub(self.position);
        let frame_count = frame_count.min(remaining as usize);

        if frame_count == 0 {
            return 0;
        }

        let produced =
            self.source
                .read_region(self.begin + self.position, buffer, frame_count, frame_offset);

        self.position += produced as u64;
        produced
    }

    fn reset(&mut self) {
        self.position = 0;
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        let begin = (self.begin + frames).min(self.end);
        Box::new(Self {
            source: Arc::clone(&self.source),
            begin,
            end: self.end,
            position: 0,
        })
    }

    fn length(&self) -> StreamLength {
        StreamLength::Frames(self.end - self.begin)
    }

    fn channel_count(&self) -> usize {
        self.source.channel_count()
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self {
            source: Arc::clone(&self.source),
            begin: self.begin,
            end: self.end,
            position: 0,
        })
    }
}
