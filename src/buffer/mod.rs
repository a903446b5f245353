mod audio_buffer;
mod owned_audio_buffer;
mod sample_location;

pub use audio_buffer::AudioBuffer;
pub use owned_audio_buffer::OwnedAudioBuffer;
pub use sample_location::SampleLocation;
