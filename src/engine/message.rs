use crate::scheduler::{CommandId, ControlCommand, StreamCommand};
use crate::stream::AudioStream;

/// Control-thread intents carried to the audio thread
pub(crate) enum Message {
    AddStreamCommand(StreamCommand),
    RemoveStreamCommand(CommandId),
    AddControlCommand(ControlCommand),
    RemoveControlCommand(CommandId),
    ClearScheduler,

    LoadChannel {
        index: usize,
        stream: Box<dyn AudioStream>,
    },
    StartChannel(usize),
    ContinueChannel(usize),
    StopChannel(usize),
    AbortChannel(usize),
    ResetChannel(usize),

    Start,
    Stop,
}

/// Events carried back from the audio thread
pub(crate) enum Notification {
    /// A channel's fade-out completed or its stream ended
    ChannelStopped(usize),

    /// A replaced stream, sent back so it deallocates off the audio thread
    StreamDiscarded(Box<dyn AudioStream>),
}
