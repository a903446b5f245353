use thiserror::Error;

/// Errors raised when opening an engine or building streams
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(usize),

    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(usize),

    #[error("invalid buffer size: {0}")]
    InvalidBufferSize(usize),

    #[error("channel index {index} out of range for {channel_count} channels")]
    ChannelOutOfRange { index: usize, channel_count: usize },

    #[error("invalid region: begin {begin} must be before end {end}")]
    InvalidRegion { begin: u64, end: u64 },

    #[error("renderer has no process bound")]
    RendererNotOpen,
}

/// Errors raised when scheduling commands
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("start date {start} is not before stop date {stop}")]
    InvertedDates { start: u64, stop: u64 },
}
