use crate::AudioBuffer;

use super::{AudioStream, StreamLength};

/// A stream that exposes only the frame range `[begin, end)` of its child
///
/// An empty or out-of-range request yields a zero-length stream rather
/// than an error.
pub struct CutStream {
    child: Box<dyn AudioStream>,
    length: u64,
    position: u64,
}

impl CutStream {
    /// Keep the region `[begin, end)` of a stream
    pub fn new(child: Box<dyn AudioStream>, begin: u64, end: u64) -> Self {
        let child_length = child.length();

        let end = match child_length {
            StreamLength::Frames(length) => end.min(length),
            StreamLength::Unbounded => end,
        };

        if begin >= end {
            return Self {
                child,
                length: 0,
                position: 0,
            };
        }

        let head = child.cut_begin(begin);

        Self {
            child: head,
            length: end - begin,
            position: 0,
        }
    }

    fn from_parts(child: Box<dyn AudioStream>, length: u64) -> Self {
        Self {
            child,
            length,
            position: 0,
        }
    }
}

impl AudioStream for CutStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let remaining = self.length - self.position;
        let frame_count = frame_count.min(remaining as usize);

        if frame_count == 0 {
            return 0;
        }

        let produced = self.child.read(buffer, frame_count, frame_offset);
        self.position += produced as u64;
        produced
    }

    fn reset(&mut self) {
        self.position = 0;
        self.child.reset();
    }

    fn stop(&mut self) {
        self.child.stop();
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        let frames = frames.min(self.length);
        Box::new(Self::from_parts(
            self.child.cut_begin(frames),
            self.length - frames,
        ))
    }

    fn length(&self) -> StreamLength {
        StreamLength::Frames(self.length)
    }

    fn channel_count(&self) -> usize {
        self.child.channel_count()
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::from_parts(self.child.duplicate(), self.length))
    }
}
