use crate::SampleLocation;

/// A non-interleaved buffer of `f32` samples
pub trait AudioBuffer {
    /// The number of channels
    fn channel_count(&self) -> usize;

    /// The number of frames
    fn frame_count(&self) -> usize;

    /// Borrow the samples of a channel, starting at a location
    fn get_channel_data(&self, sample_location: SampleLocation) -> &[f32];

    /// Mutably borrow the samples of a channel, starting at a location
    fn get_channel_data_mut(&mut self, sample_location: SampleLocation) -> &mut [f32];

    /// Set every sample to zero
    fn clear(&mut self) {
        self.fill_with_value(0.0_f32);
    }

    /// Set every sample to a value
    fn fill_with_value(&mut self, value: f32) {
        for channel in 0..self.channel_count() {
            let data = self.get_channel_data_mut(SampleLocation::channel(channel));
            data.fill(value);
        }
    }

    /// Set the sample at a location
    fn set_sample(&mut self, sample_location: SampleLocation, value: f32) {
        let data = self.get_channel_data_mut(sample_location);
        data[0] = value;
    }

    /// Add a value to the sample at a location
    fn add_sample(&mut self, sample_location: SampleLocation, value: f32) {
        let value_before = self.get_sample(sample_location);
        self.set_sample(sample_location, value + value_before)
    }

    /// Get the sample at a location
    fn get_sample(&self, sample_location: SampleLocation) -> f32 {
        let data = self.get_channel_data(sample_location);
        data[0]
    }

    /// Whether every sample of a channel is exactly zero
    fn channel_is_silent(&self, channel: usize) -> bool {
        let data = self.get_channel_data(SampleLocation::channel(channel));
        data.iter().all(|sample| *sample == 0.0_f32)
    }

    /// Add samples from another buffer into this one
    fn add_from(
        &mut self,
        source_buffer: &dyn AudioBuffer,
        source_location: SampleLocation,
        destination_location: SampleLocation,
        channel_count: usize,
        frame_count: usize,
    ) {
        for channel in 0..channel_count {
            let source = source_buffer.get_channel_data(source_location.offset_channels(channel));
            let source = &source[..frame_count];

            let destination =
                self.get_channel_data_mut(destination_location.offset_channels(channel));
            let destination = &mut destination[..frame_count];

            for (source_value, destination_value) in source.iter().zip(destination.iter_mut()) {
                *destination_value += *source_value;
            }
        }
    }

    /// Copy samples from another buffer into this one
    fn copy_from(
        &mut self,
        source_buffer: &dyn AudioBuffer,
        source_location: SampleLocation,
        destination_location: SampleLocation,
        channel_count: usize,
        frame_count: usize,
    ) {
        for channel in 0..channel_count {
            let source = source_buffer.get_channel_data(source_location.offset_channels(channel));
            let source = &source[..frame_count];

            let destination =
                self.get_channel_data_mut(destination_location.offset_channels(channel));
            let destination = &mut destination[..frame_count];

            destination.copy_from_slice(source);
        }
    }

    /// Fill this buffer from interleaved samples
    fn fill_from_interleaved(
        &mut self,
        interleaved_data: &[f32],
        channel_count: usize,
        frame_count: usize,
    ) {
        let frame_count = frame_count.min(self.frame_count());
        let channel_count = channel_count.min(self.channel_count());

        for channel in 0..channel_count {
            let channel_data = self.get_channel_data_mut(SampleLocation::channel(channel));

            (0..frame_count).for_each(|frame| {
                let source_offset = frame * channel_count + channel;
                channel_data[frame] = interleaved_data[source_offset];
            });
        }
    }

    /// Copy this buffer into interleaved samples
    fn copy_to_interleaved(
        &self,
        interleaved_data: &mut [f32],
        channel_count: usize,
        frame_count: usize,
    ) {
        let channel_count = channel_count.min(self.channel_count());
        let frame_count = frame_count.min(self.frame_count());

        for channel in 0..channel_count {
            let channel_data = self.get_channel_data(SampleLocation::channel(channel));

            (0..frame_count).for_each(|frame| {
                let destination_offset = frame * channel_count + channel;
                interleaved_data[destination_offset] = channel_data[frame];
            });
        }
    }

    /// Copy a channel onto another channel of the same buffer
    fn duplicate_channel(&mut self, source: SampleLocation, to_channel: usize, frame_count: usize);
}
