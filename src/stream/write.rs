use std::sync::{Arc, Mutex};

use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT};

use super::{AudioStream, SoundSink, StreamLength};

/// A stream that tees the frames it reads to a sound sink while passing
/// them through
pub struct WriteStream {
    child: Box<dyn AudioStream>,
    sink: Arc<Mutex<dyn SoundSink>>,
    scratch: OwnedAudioBuffer,
}

impl WriteStream {
    /// Wrap a stream so that everything read from it is also written to
    /// `sink`
    pub fn new(child: Box<dyn AudioStream>, sink: Arc<Mutex<dyn SoundSink>>) -> Self {
        let channel_count = child.channel_count();

        Self {
            child,
            sink,
            scratch: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
        }
    }
}

impl AudioStream for WriteStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let frame_count = frame_count.min(MAXIMUM_FRAME_COUNT);

        self.scratch.clear();
        let produced = self.child.read(&mut self.scratch, frame_count, 0);

        if produced > 0 {
            if let Ok(mut sink) = self.sink.lock() {
                sink.write_region(&self.scratch, produced, 0);
            }

            buffer.add_from(
                &self.scratch,
                SampleLocation::origin(),
                SampleLocation::frame(frame_offset),
                self.scratch.channel_count().min(buffer.channel_count()),
                produced,
            );
        }

        produced
    }

    fn write(
        &mut self,
        buffer: &dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        match self.sink.lock() {
            Ok(mut sink) => sink.write_region(buffer, frame_count, frame_offset),
            Err(_) => 0,
        }
    }

    fn reset(&mut self) {
        self.child.reset();
    }

    fn stop(&mut self) {
        self.child.stop();
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        Box::new(Self::new(
            self.child.cut_begin(frames),
            Arc::clone(&self.sink),
        ))
    }

    fn length(&self) -> StreamLength {
        self.child.length()
    }

    fn channel_count(&self) -> usize {
        self.child.channel_count()
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::new(self.child.duplicate(), Arc::clone(&self.sink)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{MemorySink, MemorySound, ReadStream};

    #[test]
    fn written_frames_match_read_frames() {
        let mut source = OwnedAudioBuffer::new(32, 1);
        for frame in 0..32 {
            source.set_sample(SampleLocation::frame(frame), frame as f32);
        }

        let sink = MemorySink::new(1);
        let mut stream = WriteStream::new(
            Box::new(ReadStream::new(MemorySound::new(source))),
            sink.clone(),
        );

        let mut buffer = OwnedAudioBuffer::new(32, 1);
        assert_eq!(stream.read(&mut buffer, 32, 0), 32);

        let written = sink.lock().expect("sink lock").to_buffer();
        assert_eq!(written.frame_count(), 32);

        for frame in 0..32 {
            let location = SampleLocation::frame(frame);
            assert_eq!(written.get_sample(location), buffer.get_sample(location));
        }
    }
}
