use crate::{AudioBuffer, EngineError, OwnedAudioBuffer, SampleLocation};

use super::{AudioProcess, EngineConfig};

/// A description of an audio device a renderer can drive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub input_channel_count: usize,
    pub output_channel_count: usize,
    pub sample_rate: usize,
}

/// A backend that drives an [`AudioProcess`] against real or virtual
/// devices
///
/// Concrete OS backends live outside this crate; hosts implement this
/// trait over their platform audio API and hand cycles to the process.
pub trait AudioRenderer {
    /// The devices this renderer can open
    fn devices(&self) -> Vec<DeviceInfo>;

    /// Bind a process to a device configuration
    fn open(
        &mut self,
        config: &EngineConfig,
        process: Box<dyn AudioProcess + Send>,
    ) -> Result<(), EngineError>;

    /// Begin delivering cycles to the process
    fn start(&mut self) -> Result<(), EngineError>;

    /// Stop delivering cycles; the process stays bound
    fn stop(&mut self) -> Result<(), EngineError>;

    /// Release the process and the device
    fn close(&mut self);
}

/// A renderer that runs a process as fast as possible into a buffer
///
/// Backs offline rendering and tests; there is no device and no clock.
pub struct OfflineRenderer {
    config: EngineConfig,
    process: Option<Box<dyn AudioProcess + Send>>,
    running: bool,
}

impl OfflineRenderer {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            process: None,
            running: false,
        }
    }

    /// Run the bound process for `frame_count` frames of silent input and
    /// collect the output
    pub fn render(&mut self, frame_count: usize) -> Result<OwnedAudioBuffer, EngineError> {
        let process = self.process.as_mut().ok_or(EngineError::RendererNotOpen)?;

        let buffer_size = self.config.buffer_size;
        let input = OwnedAudioBuffer::new(buffer_size, self.config.input_channel_count);
        let mut cycle = OwnedAudioBuffer::new(buffer_size, self.config.output_channel_count);
        let mut rendered = OwnedAudioBuffer::new(frame_count, self.config.output_channel_count);

        let mut position = 0;
        while position < frame_count {
            let frames = buffer_size.min(frame_count - position);

            cycle.clear();
            process.process(&input, &mut cycle);

            rendered.copy_from(
                &cycle,
                SampleLocation::origin(),
                SampleLocation::frame(position),
                self.config.output_channel_count,
                frames,
            );

            position += frames;
        }

        Ok(rendered)
    }
}

impl Default for OfflineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioRenderer for OfflineRenderer {
    fn devices(&self) -> Vec<DeviceInfo> {
        vec![DeviceInfo {
            name: "offline".to_owned(),
            input_channel_count: self.config.input_channel_count,
            output_channel_count: self.config.output_channel_count,
            sample_rate: self.config.sample_rate,
        }]
    }

    fn open(
        &mut self,
        config: &EngineConfig,
        process: Box<dyn AudioProcess + Send>,
    ) -> Result<(), EngineError> {
        config.validate()?;
        self.config = *config;
        self.process = Some(process);
        Ok(())
    }

    fn start(&mut self) -> Result<(), EngineError> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.running = false;
        Ok(())
    }

    fn close(&mut self) {
        self.running = false;
        self.process = None;
    }
}
