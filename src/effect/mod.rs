mod builtin;
mod chain;

pub use builtin::{MonoPanEffect, StereoPanEffect, VolumeEffect};
pub use chain::EffectChain;

use std::sync::{Arc, Mutex};

use crate::AudioBuffer;

/// A description of one effect control
#[derive(Clone, Debug)]
pub struct ControlInfo {
    /// The control name
    pub name: String,
    /// The smallest accepted value
    pub min: f32,
    /// The largest accepted value
    pub max: f32,
    /// The initial value
    pub default: f32,
}

/// An audio effect
///
/// This is the capability set the engine consumes; it does not know
/// concrete effect implementations. `process` is called on the audio
/// thread only.
pub trait AudioEffect: Send {
    /// The number of controls the effect exposes
    fn control_count(&self) -> usize;

    /// Describe a control, or `None` if the index is out of range
    fn control_info(&self, index: usize) -> Option<ControlInfo>;

    /// The current value of a control
    fn control_value(&self, index: usize) -> f32;

    /// Change the value of a control
    fn set_control_value(&mut self, index: usize, value: f32);

    /// Process `frame_count` frames from `input` into `output`
    fn process(
        &mut self,
        input: &dyn AudioBuffer,
        output: &mut dyn AudioBuffer,
        frame_count: usize,
    );

    /// Return the effect to its initial state
    fn reset(&mut self) {}

    /// Enable or disable the effect; a bypassed effect passes audio
    /// through unchanged
    fn set_bypassed(&mut self, bypassed: bool);

    /// Whether the effect is bypassed
    fn is_bypassed(&self) -> bool;
}

/// A shareable effect handle
///
/// The same effect instance is referenced by a transform stream and by
/// scheduled control commands. The lock is only taken on the audio
/// thread, where both paths run, so it is uncontended and bounded.
pub type SharedEffect = Arc<Mutex<dyn AudioEffect>>;

/// Wrap an effect in a shareable handle
pub fn share_effect(effect: impl AudioEffect + 'static) -> SharedEffect {
    Arc::new(Mutex::new(effect))
}
