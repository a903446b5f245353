/// A location within an audio buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleLocation {
    /// The channel index
    pub channel: usize,
    /// The frame index
    pub frame: usize,
}

impl SampleLocation {
    /// Create a location from a channel and a frame
    pub fn new(channel: usize, frame: usize) -> Self {
        Self { channel, frame }
    }

    /// Channel 0, frame 0
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// A location at the start of a channel
    pub fn channel(channel: usize) -> Self {
        Self::new(channel, 0)
    }

    /// A location at a frame in channel 0
    pub fn frame(frame: usize) -> Self {
        Self::new(0, frame)
    }

    /// Move the location by a number of channels
    pub fn offset_channels(&self, channel_offset: usize) -> Self {
        Self::new(self.channel + channel_offset, self.frame)
    }

    /// Move the location by a number of frames
    pub fn offset_frames(&self, frame_offset: usize) -> Self {
        Self::new(self.channel, self.frame + frame_offset)
    }

    /// Replace the channel, keeping the frame
    pub fn with_channel(&self, channel: usize) -> Self {
        Self::new(channel, self.frame)
    }
}
