use std::sync::Arc;

use atomic_float::AtomicF64;

use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT};

use super::{AudioStream, StreamLength};

const GRAIN_LENGTH: usize = 1024;
const GRAIN_CROSSFADE: usize = 64;

/// A stream that applies independent pitch and duration scaling to its
/// child
///
/// Both factors are shared atomics so a host can automate them while the
/// stream plays. Pitch transposes by resampling inside fixed-size grains;
/// duration scaling moves the grain origins through the source at a
/// different rate, with a short crossfade at each grain boundary.
pub struct PitchTimeStream {
    child: Box<dyn AudioStream>,
    pitch: Arc<AtomicF64>,
    stretch: Arc<AtomicF64>,

    window: Vec<Vec<f32>>,
    window_start: u64,
    child_exhausted: bool,

    read_head: f64,
    fade_from_head: f64,
    fade_frames_left: usize,
    grain_frames_left: usize,
    grain_index: u64,

    scratch: OwnedAudioBuffer,
}

impl PitchTimeStream {
    /// Wrap a stream with shared pitch and stretch factors
    ///
    /// A pitch of `2.0` transposes up an octave; a stretch of `2.0`
    /// doubles the duration.
    pub fn new(
        child: Box<dyn AudioStream>,
        pitch: Arc<AtomicF64>,
        stretch: Arc<AtomicF64>,
    ) -> Self {
        let channel_count = child.channel_count();

        Self {
            child,
            pitch,
            stretch,
            window: vec![Vec::new(); channel_count],
            window_start: 0,
            child_exhausted: false,
            read_head: 0.0,
            fade_from_head: 0.0,
            fade_frames_left: 0,
            grain_frames_left: GRAIN_LENGTH,
            grain_index: 0,
            scratch: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
        }
    }

    fn window_end(&self) -> u64 {
        self.window_start + self.window.first().map_or(0, Vec::len) as u64
    }

    /// Pull child frames until the window covers `target` or the child
    /// runs out
    fn fill_window_to(&mut self, target: u64) {
        while !self.child_exhausted && self.window_end() < target {
            let wanted = ((target - self.window_end()) as usize).min(MAXIMUM_FRAME_COUNT);

            self.scratch.clear();
            let produced = self.child.read(&mut self.scratch, wanted, 0);

            for (channel, samples) in self.window.iter_mut().enumerate() {
                let data = self.scratch.get_channel_data(SampleLocation::channel(channel));
                samples.extend_from_slice(&data[..produced]);
            }

            if produced < wanted {
                self.child_exhausted = true;
            }
        }
    }

    fn sample_at(&self, channel: usize, head: f64) -> Option<f32> {
        if head < self.window_start as f64 {
            return Some(0.0);
        }

        let offset = head - self.window_start as f64;
        let index = offset.floor() as usize;
        let fraction = (offset - index as f64) as f32;

        let samples = &self.window[channel];

        if index + 1 < samples.len() {
            Some(samples[index] * (1.0 - fraction) + samples[index + 1] * fraction)
        } else if index < samples.len() && self.child_exhausted {
            Some(samples[index])
        } else {
            None
        }
    }

    fn drop_consumed_frames(&mut self) {
        let keep_from = self
            .read_head
            .min(self.fade_from_head)
            .floor()
            .max(self.window_start as f64) as u64;

        let drop_count = (keep_from - self.window_start) as usize;
        if drop_count == 0 {
            return;
        }

        for samples in &mut self.window {
            samples.drain(..drop_count);
        }
        self.window_start = keep_from;
    }
}

impl AudioStream for PitchTimeStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let pitch = self.pitch.load(std::sync::atomic::Ordering::Acquire).max(0.01);
        let stretch = self
            .stretch
            .load(std::sync::atomic::Ordering::Acquire)
            .max(0.01);

        let channel_count = self.window.len().min(buffer.channel_count());

        // The farthest the head can travel this call, plus one frame of
        // interpolation lookahead
        let reach = (self.read_head.max(self.fade_from_head)
            + frame_count as f64 * pitch
            + (GRAIN_LENGTH as f64 * pitch) / stretch) as u64
            + 2;
        self.fill_window_to(reach);

        let mut produced = 0;

        for frame in 0..frame_count {
            if self.sample_at(0, self.read_head).is_none() {
                break;
            }

            let fading = self.fade_frames_left > 0;
            let t = 1.0 - self.fade_frames_left as f32 / GRAIN_CROSSFADE as f32;

            for channel in 0..channel_count {
                let mut value = self.sample_at(channel, self.read_head).unwrap_or(0.0);

                if fading {
                    if let Some(old) = self.sample_at(channel, self.fade_from_head) {
                        value = old * (1.0 - t) + value * t;
                    }
                }

                buffer.add_sample(SampleLocation::new(channel, frame_offset + frame), value);
            }

            if fading {
                self.fade_from_head += pitch;
                self.fade_frames_left -= 1;
            }

            self.read_head += pitch;
            produced = frame + 1;

            self.grain_frames_left -= 1;
            if self.grain_frames_left == 0 {
                self.grain_index += 1;
                self.fade_from_head = self.read_head;
                self.fade_frames_left = GRAIN_CROSSFADE;
                self.read_head = self.grain_index as f64 * GRAIN_LENGTH as f64 * pitch / stretch;
                self.grain_frames_left = GRAIN_LENGTH;
            }
        }

        self.drop_consumed_frames();
        produced
    }

    fn reset(&mut self) {
        self.child.reset();
        for samples in &mut self.window {
            samples.clear();
        }
        self.window_start = 0;
        self.child_exhausted = false;
        self.read_head = 0.0;
        self.fade_from_head = 0.0;
        self.fade_frames_left = 0;
        self.grain_frames_left = GRAIN_LENGTH;
        self.grain_index = 0;
    }

    fn stop(&mut self) {
        self.child.stop();
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        let stretch = self
            .stretch
            .load(std::sync::atomic::Ordering::Acquire)
            .max(0.01);
        let child_frames = (frames as f64 / stretch) as u64;

        Box::new(Self::new(
            self.child.cut_begin(child_frames),
            Arc::clone(&self.pitch),
            Arc::clone(&self.stretch),
        ))
    }

    fn length(&self) -> StreamLength {
        let stretch = self
            .stretch
            .load(std::sync::atomic::Ordering::Acquire)
            .max(0.01);

        match self.child.length() {
            StreamLength::Frames(frames) => {
                StreamLength::Frames((frames as f64 * stretch).round() as u64)
            }
            StreamLength::Unbounded => StreamLength::Unbounded,
        }
    }

    fn channel_count(&self) -> usize {
        self.child.channel_count()
    }

    fn duplicate(&self) -> Box<dyn AudioStream> {
        Box::new(Self::new(
            self.child.duplicate(),
            Arc::clone(&self.pitch),
            Arc::clone(&self.stretch),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{MemorySound, ReadStream};
    use std::sync::atomic::Ordering;

    fn sine_stream(frame_count: usize) -> Box<dyn AudioStream> {
        let buffer = OwnedAudioBuffer::sine(frame_count, 1, 48_000, 440.0, 1.0);
        Box::new(ReadStream::new(MemorySound::new(buffer)))
    }

    #[test]
    fn unity_factors_pass_audio_through() {
        let pitch = Arc::new(AtomicF64::new(1.0));
        let stretch = Arc::new(AtomicF64::new(1.0));
        let mut stream = PitchTimeStream::new(sine_stream(4096), pitch, stretch);

        let mut buffer = OwnedAudioBuffer::new(2048, 1);
        let produced = stream.read(&mut buffer, 2048, 0);

        assert_eq!(produced, 2048);

        let reference = OwnedAudioBuffer::sine(2048, 1, 48_000, 440.0, 1.0);
        for frame in (0..2048).step_by(97) {
            let location = SampleLocation::frame(frame);
            let difference =
                (buffer.get_sample(location) - reference.get_sample(location)).abs();
            assert!(difference < 1e-3, "frame {frame}: {difference}");
        }
    }

    #[test]
    fn stretch_scales_the_length() {
        let pitch = Arc::new(AtomicF64::new(1.0));
        let stretch = Arc::new(AtomicF64::new(2.0));
        let stream = PitchTimeStream::new(sine_stream(1000), pitch, stretch);

        assert_eq!(stream.length(), StreamLength::Frames(2000));
    }

    #[test]
    fn factors_can_change_while_playing() {
        let pitch = Arc::new(AtomicF64::new(1.0));
        let stretch = Arc::new(AtomicF64::new(1.0));
        let mut stream =
            PitchTimeStream::new(sine_stream(8192), Arc::clone(&pitch), Arc::clone(&stretch));

        let mut buffer = OwnedAudioBuffer::new(1024, 1);
        assert_eq!(stream.read(&mut buffer, 1024, 0), 1024);

        pitch.store(1.5, Ordering::Release);
        buffer.clear();
        assert_eq!(stream.read(&mut buffer, 1024, 0), 1024);
    }
}
