use crate::AudioBuffer;

/// The audio-thread half of an engine
///
/// A host calls `process` once per hardware cycle with matching input and
/// output buffers. The implementation never blocks and never allocates on
/// the steady path.
pub trait AudioProcess: Send {
    fn process(&mut self, input: &dyn AudioBuffer, output: &mut dyn AudioBuffer);
}
