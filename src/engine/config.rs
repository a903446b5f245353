use crate::{EngineError, MAXIMUM_FRAME_COUNT};

/// Maximum number of mixer channels an engine will open with
pub const MAXIMUM_CHANNEL_COUNT: usize = 256;

/// Parameters for opening an engine
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Number of capture channels fed to input streams
    pub input_channel_count: usize,

    /// Number of playback channels produced each cycle
    pub output_channel_count: usize,

    /// Number of mixer channels
    pub channel_count: usize,

    /// Sample rate in Hz
    pub sample_rate: usize,

    /// Frames per cycle the host intends to process
    pub buffer_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_channel_count: 2,
            output_channel_count: 2,
            channel_count: 8,
            sample_rate: 44_100,
            buffer_size: 512,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.output_channel_count < 2 {
            return Err(EngineError::InvalidChannelCount(self.output_channel_count));
        }

        if self.channel_count == 0 || self.channel_count > MAXIMUM_CHANNEL_COUNT {
            return Err(EngineError::InvalidChannelCount(self.channel_count));
        }

        if self.sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate(self.sample_rate));
        }

        if self.buffer_size == 0 || self.buffer_size > MAXIMUM_FRAME_COUNT {
            return Err(EngineError::InvalidBufferSize(self.buffer_size));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_mono_output() {
        let config = EngineConfig {
            output_channel_count: 1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(EngineError::InvalidChannelCount(1))
        );
    }

    #[test]
    fn rejects_oversized_buffers() {
        let config = EngineConfig {
            buffer_size: MAXIMUM_FRAME_COUNT + 1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(EngineError::InvalidBufferSize(MAXIMUM_FRAME_COUNT + 1))
        );
    }
}
