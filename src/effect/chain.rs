use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT};

use super::SharedEffect;

/// An ordered list of effects processed back to back
pub struct EffectChain {
    effects: Vec<SharedEffect>,
    ping: OwnedAudioBuffer,
    pong: OwnedAudioBuffer,
}

impl EffectChain {
    /// Create an empty chain for a channel count
    pub fn new(channel_count: usize) -> Self {
        Self {
            effects: Vec::new(),
            ping: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
            pong: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, channel_count),
        }
    }

    /// Append an effect to the chain
    pub fn add(&mut self, effect: SharedEffect) -> &mut Self {
        self.effects.push(effect);
        self
    }

    /// Remove an effect from the chain by handle identity
    pub fn remove(&mut self, effect: &SharedEffect) {
        self.effects
            .retain(|candidate| !std::sync::Arc::ptr_eq(candidate, effect));
    }

    /// Remove every effect
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// The number of effects in the chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Return every effect to its initial state
    pub fn reset(&mut self) {
        for effect in &self.effects {
            if let Ok(mut effect) = effect.lock() {
                effect.reset();
            }
        }
    }

    /// Process `frame_count` frames from `input` into `output` through
    /// every effect in order
    pub fn process(
        &mut self,
        input: &dyn AudioBuffer,
        output: &mut dyn AudioBuffer,
        frame_count: usize,
    ) {
        let frame_count = frame_count.min(MAXIMUM_FRAME_COUNT);
        let channel_count = input.channel_count().min(self.ping.channel_count());

        if self.effects.is_empty() {
            output.copy_from(
                input,
                SampleLocation::origin(),
                SampleLocation::origin(),
                channel_count.min(output.channel_count()),
                frame_count,
            );
            return;
        }

        self.ping.copy_from(
            input,
            SampleLocation::origin(),
            SampleLocation::origin(),
            channel_count,
            frame_count,
        );

        for effect in &self.effects {
            if let Ok(mut effect) = effect.lock() {
                effect.process(&self.ping, &mut self.pong, frame_count);
            }
            std::mem::swap(&mut self.ping, &mut self.pong);
        }

        output.copy_from(
            &self.ping,
            SampleLocation::origin(),
            SampleLocation::origin(),
            channel_count.min(output.channel_count()),
            frame_count,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{share_effect, VolumeEffect};
    use approx::assert_relative_eq;

    #[test]
    fn chained_effects_compose() {
        let mut chain = EffectChain::new(1);
        chain.add(share_effect(VolumeEffect::new(0.5)));
        chain.add(share_effect(VolumeEffect::new(0.5)));

        let mut input = OwnedAudioBuffer::new(8, 1);
        input.fill_with_value(1.0);
        let mut output = OwnedAudioBuffer::new(8, 1);

        chain.process(&input, &mut output, 8);
        assert_relative_eq!(output.get_sample(SampleLocation::frame(0)), 0.25);
    }

    #[test]
    fn removing_an_effect_by_handle() {
        let effect = share_effect(VolumeEffect::new(0.5));

        let mut chain = EffectChain::new(1);
        chain.add(effect.clone());
        assert_eq!(chain.len(), 1);

        chain.remove(&effect);
        assert!(chain.is_empty());
    }
}
