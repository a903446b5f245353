use std::sync::{Arc, Mutex};

use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT};

use super::{AudioStream, StreamLength};

struct Feed {
    buffer: OwnedAudioBuffer,
    frame_count: usize,
}

/// The writing side of a realtime capture stream
///
/// The engine publishes each cycle's input frames here before running the
/// scheduler, so every [`InputStream`] reading during that cycle sees the
/// same frames.
#[derive(Clone)]
pub struct InputFeed {
    inner: Arc<Mutex<Feed>>,
}

impl InputFeed {
    /// Create a feed for a channel count
    pub fn new(channel_count: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Feed {
                buffer: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
                frame_count: 0,
            })),
        }
    }

    /// Publish the current cycle's input frames
    pub fn publish(&self, input: &dyn AudioBuffer) {
        if let Ok(mut feed) = self.inner.lock() {
            let frame_count = input.frame_count().min(MAXIMUM_FRAME_COUNT);
            let channel_count = input.channel_count().min(feed.buffer.channel_count());

            feed.buffer.clear();
            feed.buffer.copy_from(
                input,
                SampleLocation::origin(),
                SampleLocation::origin(),
                channel_count,
                frame_count,
            );
            feed.frame_count = frame_count;
        }
    }

    /// Create a stream reading from this feed
    pub fn stream(&self) -> InputStream {
        let channel_count = match self.inner.lock() {
            Ok(feed) => feed.buffer.channel_count(),
            Err(_) => 1,
        };

        InputStream {
            feed: self.clone(),
            channel_count,
        }
    }
}

/// A realtime capture source
///
/// Frames are supplied externally each cycle through an [`InputFeed`].
/// Reads are aligned to the cycle: the frame offset in the destination
/// buffer selects the same offset in the published input frames.
pub struct InputStream {
    feed: InputFeed,
    channel_count: usize,
}

impl AudioStream for InputStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let feed = match self.feed.inner.lock() {
            Ok(feed) => feed,
            Err(_) => return 0,
        };

        let available = feed.frame_count.saturating_sub(frame_offset);
        let frame_count = frame_count.min(available);

        buffer.add_from(
            &feed.buffer,
            SampleLocation::frame(frame_offset),
            SampleLocation::frame(frame_offset),
            self.channel_count.min(buffer.channel_count()),
            frame_count,
        );

        frame_count
    }

    fn reset(&mut self) {}

    fn cut_begin(&self, _frames: u64) -> Box<dyn AudioStream> {
        // Capture has no past to drop
        Box::new(self.feed.stream())
    }

    fn length(&self) -> StreamLength {
        StreamLength::Unbounded
    }

    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(self.feed.stream())
    }
}
