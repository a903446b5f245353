use std::sync::{Arc, Mutex};

use crate::{
    effect::EffectChain, AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT,
};

use super::{AudioStream, StreamLength};

/// A stream that runs its child through an effect chain
///
/// The wet signal is ramped in over the first frames and ramped out over
/// the last frames so that activating or deactivating the chain never
/// produces a discontinuity.
pub struct TransformStream {
    child: Box<dyn AudioStream>,
    chain: Arc<Mutex<EffectChain>>,
    fade_in: u64,
    fade_out: u64,
    position: u64,
    dry: OwnedAudioBuffer,
    wet: OwnedAudioBuffer,
}

impl TransformStream {
    /// Wrap a stream with an effect chain and wet-ramp lengths in frames
    pub fn new(
        child: Box<dyn AudioStream>,
        chain: Arc<Mutex<EffectChain>>,
        fade_in: u64,
        fade_out: u64,
    ) -> Self {
        let channel_count = child.channel_count();

        Self {
            child,
            chain,
            fade_in,
            fade_out,
            position: 0,
            dry: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
            wet: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
        }
    }

    fn wet_gain_at(&self, position: u64) -> f32 {
        let mut gain = 1.0_f32;

        if self.fade_in > 0 && position < self.fade_in {
            gain = position as f32 / self.fade_in as f32;
        }

        if let Some(length) = self.child.length().frames() {
            if self.fade_out > 0 {
                let ramp_start = length.saturating_sub(self.fade_out);
                if position >= ramp_start {
                    let remaining = length.saturating_sub(position);
                    gain *= remaining as f32 / self.fade_out as f32;
                }
            }
        }

        gain
    }
}

impl AudioStream for TransformStream {
    fn read(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        frame_offset: usize,
    ) -> usize {
        let frame_count = frame_count.min(MAXIMUM_FRAME_COUNT);

        self.dry.clear();
        let produced = self.child.read(&mut self.dry, frame_count, 0);

        if produced == 0 {
            return 0;
        }

        self.wet.clear();
        match self.chain.lock() {
            Ok(mut chain) => chain.process(&self.dry, &mut self.wet, produced),
            // A poisoned chain degrades to the dry signal
            Err(_) => self.wet.copy_from(
                &self.dry,
                SampleLocation::origin(),
                SampleLocation::origin(),
                self.dry.channel_count(),
                produced,
            ),
        }

        let channel_count = self.dry.channel_count().min(buffer.channel_count());

        for frame in 0..produced {
            let wet_gain = self.wet_gain_at(self.position + frame as u64);
            let dry_gain = 1.0 - wet_gain;

            for channel in 0..channel_count {
                let location = SampleLocation::new(channel, frame);
                let dry_value = self.dry.get_sample(location);
                let wet_value = self.wet.get_sample(location);

                buffer.add_sample(
                    SampleLocation::new(channel, frame_offset + frame),
                    dry_value * dry_gain + wet_value * wet_gain,
                );
            }
        }

        self.position += produced as u64;
        produced
    }

    fn reset(&mut self) {
        self.position = 0;
        self.child.reset();
        if let Ok(mut chain) = self.chain.lock() {
            chain.reset();
        }
    }

    fn stop(&mut self) {
        self.child.stop();
    }

    fn cut_begin(&self, frames: u64) -> Box<dyn AudioStream> {
        Box::new(Self::new(
            self.child.cut_begin(frames),
            Arc::clone(&self.chain),
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
            Arc::clone(&self.chain),
            self.fade_in,
            self.fade_out,
        ))
    }
}
