use crate::{AudioBuffer, SampleLocation};
use rand::Rng;

/// An audio buffer that owns its samples
#[repr(align(64))]
#[derive(Clone)]
pub struct OwnedAudioBuffer {
    data: Vec<f32>,
    channel_count: usize,
    frame_count: usize,
}

impl OwnedAudioBuffer {
    /// Create a silent buffer
    pub fn new(frame_count: usize, channel_count: usize) -> Self {
        Self {
            data: vec![0.0; frame_count * channel_count],
            channel_count,
            frame_count,
        }
    }

    /// Create a buffer that copies the contents of another buffer
    pub fn from_buffer(buffer: &dyn AudioBuffer) -> Self {
        let mut new_buffer = Self::new(buffer.frame_count(), buffer.channel_count());

        new_buffer.copy_from(
            buffer,
            SampleLocation::origin(),
            SampleLocation::origin(),
            buffer.channel_count(),
            buffer.frame_count(),
        );

        new_buffer
    }

    /// Create a buffer filled with white noise
    pub fn white_noise(frame_count: usize, channel_count: usize) -> Self {
        let mut buffer = Self::new(frame_count, channel_count);

        let mut random_generator = rand::rng();

        for channel in 0..channel_count {
            let data = buffer.get_channel_data_mut(SampleLocation::channel(channel));
            for sample in data.iter_mut() {
                *sample = random_generator.random_range(-1.0..=1.0);
            }
        }

        buffer
    }

    /// Create a buffer containing a sine tone on every channel
    pub fn sine(
        frame_count: usize,
        channel_count: usize,
        sample_rate: usize,
        frequency: f64,
        amplitude: f64,
    ) -> Self {
        debug_assert!(channel_count > 0);

        let mut buffer = Self::new(frame_count, channel_count);

        let channel = buffer.get_channel_data_mut(SampleLocation::origin());

        for (index, sample) in channel.iter_mut().enumerate() {
            let time = index as f64 / sample_rate as f64;
            *sample = (amplitude * (std::f64::consts::TAU * frequency * time).sin()) as f32;
        }

        for channel in 1..channel_count {
            buffer.duplicate_channel(SampleLocation::channel(0), channel, frame_count);
        }

        buffer
    }

    fn get_sample_location_bounds(&self, sample_location: &SampleLocation) -> (usize, usize) {
        let start = sample_location.channel * self.frame_count + sample_location.frame;
        let end = (sample_location.channel + 1) * self.frame_count;
        (start, end)
    }
}

impl AudioBuffer for OwnedAudioBuffer {
    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn get_channel_data(&self, sample_location: SampleLocation) -> &[f32] {
        let (start, end) = self.get_sample_location_bounds(&sample_location);
        &self.data[start..end]
    }

    fn get_channel_data_mut(&mut self, sample_location: SampleLocation) -> &mut [f32] {
        let (start, end) = self.get_sample_location_bounds(&sample_location);
        &mut self.data[start..end]
    }

    fn duplicate_channel(&mut self, source: SampleLocation, to_channel: usize, frame_count: usize) {
        let (source_start, _) = self.get_sample_location_bounds(&source);
        let (destination_start, _) =
            self.get_sample_location_bounds(&source.with_channel(to_channel));

        debug_assert!(
            (source_start + frame_count <= destination_start)
                || (destination_start + frame_count <= source_start)
        );

        self.data
            .copy_within(source_start..source_start + frame_count, destination_start);
    }
}
