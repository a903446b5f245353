mod envelope;

pub use envelope::{Envelope, CHANNEL_FADE_FRAMES};

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use atomic_float::AtomicF32;

use crate::pan_table::PanTable;
use crate::stream::AudioStream;
use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT};

/// The observable state of a mixer channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ChannelStatus {
    Idle = 0,
    Playing = 1,
    Stopping = 2,
}

impl ChannelStatus {
    pub(crate) fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Playing,
            2 => Self::Stopping,
            _ => Self::Idle,
        }
    }
}

/// State a channel publishes to, and receives from, the control thread
///
/// Volume and pan are written by the control thread and read once per
/// cycle by the mixer. Status and frame travel the other way.
pub struct ChannelShared {
    pub(crate) status: AtomicU8,
    pub(crate) frame: AtomicU64,
    pub(crate) volume: AtomicF32,
    pub(crate) pan_left: AtomicF32,
    pub(crate) pan_right: AtomicF32,
}

impl ChannelShared {
    pub(crate) fn new() -> Self {
        Self {
            status: AtomicU8::new(ChannelStatus::Idle as u8),
            frame: AtomicU64::new(0),
            volume: AtomicF32::new(1.0),
            pan_left: AtomicF32::new(1.0),
            pan_right: AtomicF32::new(0.0),
        }
    }

    pub fn status(&self) -> ChannelStatus {
        ChannelStatus::from_raw(self.status.load(Ordering::Acquire))
    }

    pub fn frame(&self) -> u64 {
        self.frame.load(Ordering::Acquire)
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume.store(volume.clamp(0.0, 1.0), Ordering::Release);
    }

    pub fn set_pan(&self, pan_left: f32, pan_right: f32) {
        self.pan_left
            .store(pan_left.clamp(0.0, 1.0), Ordering::Release);
        self.pan_right
            .store(pan_right.clamp(0.0, 1.0), Ordering::Release);
    }
}

/// A snapshot of a channel's state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelInfo {
    pub status: ChannelStatus,
    pub frame: u64,
    pub volume: f32,
    pub pan_left: f32,
    pub pan_right: f32,
}

/// A mixer channel
///
/// Holds the loaded stream, its anti-click envelope and the stereo output
/// routing. Lives on the audio thread; the control thread talks to it
/// through [`ChannelShared`] and engine messages.
pub struct Channel {
    stream: Option<Box<dyn AudioStream>>,
    envelope: Envelope,
    shared: Arc<ChannelShared>,
    left_out: usize,
    right_out: usize,
    scratch: OwnedAudioBuffer,
}

impl Channel {
    pub(crate) fn new(shared: Arc<ChannelShared>, left_out: usize, right_out: usize) -> Self {
        Self {
            stream: None,
            envelope: Envelope::new(),
            shared,
            left_out,
            right_out,
            scratch: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, 2),
        }
    }

    /// Install a stream, handing back the previous one so it can be
    /// dropped off the audio thread
    pub(crate) fn load(&mut self, stream: Box<dyn AudioStream>) -> Option<Box<dyn AudioStream>> {
        let previous = self.stream.replace(stream);
        self.envelope.kill();
        self.shared.frame.store(0, Ordering::Release);
        self.publish_status(ChannelStatus::Idle);
        previous
    }

    /// Rewind and begin playing from the start
    pub(crate) fn start(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            stream.reset();
            self.shared.frame.store(0, Ordering::Release);
            self.envelope.sound_on();
            self.publish_status(ChannelStatus::Playing);
        }
    }

    /// Resume playing from the current position
    pub(crate) fn continue_playing(&mut self) {
        if self.stream.is_some() {
            self.envelope.sound_on();
            self.publish_status(ChannelStatus::Playing);
        }
    }

    /// Begin the fade to silence
    pub(crate) fn stop(&mut self) {
        if !self.envelope.is_idle() {
            self.envelope.sound_off();
            self.publish_status(ChannelStatus::Stopping);
        }
    }

    /// Silence immediately, without a fade
    pub(crate) fn abort(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            stream.stop();
        }
        self.envelope.kill();
        self.publish_status(ChannelStatus::Idle);
    }

    /// Rewind the stream without changing the playing state
    pub(crate) fn reset(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            stream.reset();
        }
        self.shared.frame.store(0, Ordering::Release);
    }

    pub(crate) fn is_active(&self) -> bool {
        !self.envelope.is_idle()
    }

    /// Mix one cycle of this channel into `output`
    ///
    /// Returns false when the channel went idle during the cycle, either
    /// because its fade-out completed or because the stream ended.
    pub(crate) fn mix(&mut self, output: &mut dyn AudioBuffer, frame_count: usize) -> bool {
        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None => return false,
        };

        if self.envelope.is_idle() {
            return false;
        }

        let frame_count = frame_count.min(MAXIMUM_FRAME_COUNT);

        self.scratch.clear();
        let produced = stream.read(&mut self.scratch, frame_count, 0);

        let volume = self.shared.volume.load(Ordering::Acquire);
        let pan_left = self.shared.pan_left.load(Ordering::Acquire);
        let pan_right = self.shared.pan_right.load(Ordering::Acquire);

        let left_gain = PanTable::vol_left(volume, pan_left);
        let right_gain = PanTable::vol_right(volume, pan_right);

        let stereo_source = stream.channel_count() > 1;
        let right_source = if stereo_source { 1 } else { 0 };

        for frame in 0..produced {
            let envelope_gain = self.envelope.next_gain();

            let left = self.scratch.get_sample(SampleLocation::new(0, frame));
            let right = self
                .scratch
                .get_sample(SampleLocation::new(right_source, frame));

            output.add_sample(
                SampleLocation::new(self.left_out, frame),
                left * envelope_gain * left_gain,
            );
            output.add_sample(
                SampleLocation::new(self.right_out, frame),
                right * envelope_gain * right_gain,
            );
        }

        self.shared.frame.fetch_add(produced as u64, Ordering::AcqRel);

        if self.envelope.is_idle() || produced < frame_count {
            self.envelope.kill();
            self.publish_status(ChannelStatus::Idle);
            return false;
        }

        true
    }

    fn publish_status(&self, status: ChannelStatus) {
        self.shared.status.store(status as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::NullStream;
    use crate::stream::{MemorySound, ReadStream};

    fn constant_stream(frame_count: usize, value: f32) -> Box<dyn AudioStream> {
        let mut buffer = OwnedAudioBuffer::new(frame_count, 1);
        buffer.fill_with_value(value);
        Box::new(ReadStream::new(MemorySound::new(buffer)))
    }

    #[test]
    fn idle_channel_does_not_mix() {
        let shared = Arc::new(ChannelShared::new());
        let mut channel = Channel::new(Arc::clone(&shared), 0, 1);
        channel.load(constant_stream(1024, 1.0));

        let mut output = OwnedAudioBuffer::new(128, 2);
        assert!(!channel.mix(&mut output, 128));
        assert!(output.channel_is_silent(0));
    }

    #[test]
    fn started_channel_fades_in_and_plays() {
        let shared = Arc::new(ChannelShared::new());
        let mut channel = Channel::new(Arc::clone(&shared), 0, 1);
        channel.load(constant_stream(48_000, 1.0));
        channel.start();

        let mut output = OwnedAudioBuffer::new(1024, 2);
        assert!(channel.mix(&mut output, 1024));

        // Inside the ramp the gain is below unity; past it the left gain
        // is the full pan law value
        let early = output.get_sample(SampleLocation::new(0, 10));
        let late = output.get_sample(SampleLocation::new(0, 1000));
        assert!(early < late);
        assert_eq!(shared.status(), ChannelStatus::Playing);
        assert_eq!(shared.frame(), 1024);
    }

    #[test]
    fn stop_fades_out_and_goes_idle() {
        let shared = Arc::new(ChannelShared::new());
        let mut channel = Channel::new(Arc::clone(&shared), 0, 1);
        channel.load(Box::new(NullStream::new(1_000_000, 1)));
        channel.start();

        let mut output = OwnedAudioBuffer::new(1024, 2);
        assert!(channel.mix(&mut output, 1024));

        channel.stop();
        assert_eq!(shared.status(), ChannelStatus::Stopping);

        // The fade-out is shorter than one cycle, so the channel retires
        // within the next mix call
        assert!(!channel.mix(&mut output, 1024));
        assert_eq!(shared.status(), ChannelStatus::Idle);
    }

    #[test]
    fn stream_end_retires_the_channel() {
        let shared = Arc::new(ChannelShared::new());
        let mut channel = Channel::new(Arc::clone(&shared), 0, 1);
        channel.load(constant_stream(100, 1.0));
        channel.start();

        let mut output = OwnedAudioBuffer::new(1024, 2);
        assert!(!channel.mix(&mut output, 1024));
        assert_eq!(shared.status(), ChannelStatus::Idle);
    }
}
