use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT};

use super::{AudioStream, StreamLength};

/// A stream that fades its child in over the first frames and out over
/// the last frames
///
/// Fades are linear. The fade-out is only applied when the child's length
/// is known.
pub struct FadeStream {
    child: Box<dyn AudioStream>,
    fade_in: u64,
    fade_out: u64,
    position: u64,
    scratch: OwnedAudioBuffer,
}

impl FadeStream {
    /// Wrap a stream with fade-in and fade-out lengths in frames
    pub fn new(child: Box<dyn AudioStream>, fade_in: u64, fade_out: u64) -> Self {
        let channel_count = child.channel_count();

        Self {
            child,
            fade_in,
            fade_out,
            position: 0,
            scratch: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
        }
    }

    fn gain_at(&self, position: u64) -> f32 {
        let mut gain = 1.0_f32;

        if position < self.fade_in {
            gain = position as f32 / self.fade_in as f32;
        }

        if let Some(length) = self.child.length().frames() {
            let fade_out_start = length.saturating_sub(self.fade_out);
            if position >= fade_out_start && self.fade_out > 0 {
                let remaining = length.saturating_sub(position);
                gain *= remaining as f32 / self.fade_out as f32;
            }
        }

        gain
    }
}

impl AudioStream for FadeStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let frame_count = frame_count.min(MAXIMUM_FRAME_COUNT);

        self.scratch.clear();
        let produced = self.child.read(&mut self.scratch, frame_count, 0);

        let channel_count = self.scratch.channel_count().min(buffer.channel_count());

        for frame in 0..produced {
            let gain = self.gain_at(self.position + frame as u64);

            for channel in 0..channel_count {
                let value = self.scratch.get_sample(SampleLocation::new(channel, frame));
                buffer.add_sample(
                    SampleLocation::new(channel, frame_offset + frame),
                    value * gain,
                );
            }
        }

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
        // The cut result starts afresh, so the fade-in restarts as well
        Box::new(Self::new(
            self.child.cut_begin(frames),
            self.fade_in,
            self.fade_out,
        ))
    }

    fn length(&self) -> StreamLength {
        self.child.length()
    }

    fn channel_count(&self) -> usize {
        self.child.channel_count()
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::new(
            self.child.duplicate(),
            self.fade_in,
            self.fade_out,
        ))
    }
}
