use std::sync::{Arc, Mutex};

use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation};

/// A decoded sound that regions can be read from
///
/// This is the codec collaborator consumed by [`super::ReadStream`].
/// Implementations must not block in `read_region`; sources backed by
/// slow media return only the frames already available.
pub trait SoundSource: Send + Sync {
    /// The number of channels in the sound
    fn channel_count(&self) -> usize;

    /// The total number of frames in the sound
    fn frame_count(&self) -> u64;

    /// Mix up to `frame_count` frames starting at `start` into `buffer`
    /// at `frame_offset`, returning the number of frames produced
    fn read_region(
        &self,
        start: u64,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize;
}

/// A sound destination that frames can be appended to
///
/// Consumed by [`super::WriteStream`].
pub trait SoundSink: Send {
    /// Append `frame_count` frames read from `buffer` at `frame_offset`
    fn write_region(
        &mut self,
        buffer: &dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize;
}

/// An in-memory sound source
pub struct MemorySound {
    buffer: OwnedAudioBuffer,
}

impl MemorySound {
    /// Create a sound from a buffer of samples
    pub fn new(buffer: OwnedAudioBuffer) -> Arc<Self> {
        Arc::new(Self { buffer })
    }
}

impl SoundSource for MemorySound {
    fn channel_count(&self) -> usize {
        self.buffer.channel_count()
    }

    fn frame_count(&self) -> u64 {
        self.buffer.frame_count() as u64
    }

    fn read_region(
        &self,
        start: u64,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        if start >= self.frame_count() {
            return 0;
        }

        let available = (self.frame_count() - start) as usize;
        let frame_count = frame_count.min(available);
        let channel_count = self.channel_count().min(buffer.channel_count());

        buffer.add_from(
            &self.buffer,
            SampleLocation::frame(start as usize),
            SampleLocation::frame(frame_offset),
            channel_count,
            frame_count,
        );

        frame_count
    }
}

/// An in-memory sound sink that accumulates written frames
pub struct MemorySink {
    channels: Vec<Vec<f32>>,
}

impl MemorySink {
    /// Create an empty sink with a channel count
    pub fn new(channel_count: usize) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            channels: vec![Vec::new(); channel_count],
        }))
    }

    /// The number of frames written so far
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Copy everything written so far into a buffer
    pub fn to_buffer(&self) -> OwnedAudioBuffer {
        let mut buffer = OwnedAudioBuffer::new(self.frame_count(), self.channels.len());

        for (channel, samples) in self.channels.iter().enumerate() {
            let data = buffer.get_channel_data_mut(SampleLocation::channel(channel));
            data.copy_from_slice(samples);
        }

        buffer
    }
}

impl SoundSink for MemorySink {
    fn write_region(
        &mut self,
        buffer: &dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let frame_count = frame_count.min(buffer.frame_count() - frame_offset);

        for (channel, samples) in self.channels.iter_mut().enumerate() {
            if channel >= buffer.channel_count() {
                break;
            }

            let source = buffer.get_channel_data(SampleLocation::new(channel, frame_offset));
            samples.extend_from_slice(&source[..frame_count]);
        }

        frame_count
    }
}
