mod audio_process;
mod config;
mod message;
mod player;
mod processor;
mod renderer;

pub use audio_process::AudioProcess;
pub use config::{EngineConfig, MAXIMUM_CHANNEL_COUNT};
pub use player::Player;
pub use processor::Processor;
pub use renderer::{AudioRenderer, DeviceInfo, OfflineRenderer};

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use atomic_float::AtomicF32;
use crossbeam::channel;

use crate::channel::ChannelShared;
use crate::stream::InputFeed;
use crate::EngineError;

/// Open an engine, returning its two halves
///
/// The [`Player`] stays with the caller; the [`AudioProcess`] moves to
/// whatever drives the audio cycles, a realtime callback or an
/// [`OfflineRenderer`].
pub fn open_engine(
    config: EngineConfig,
) -> Result<(Player, Box<dyn AudioProcess + Send>), EngineError> {
    config.validate()?;

    let (message_tx, message_rx) = channel::unbounded();
    let (notification_tx, notification_rx) = channel::unbounded();

    let channel_shared: Vec<Arc<ChannelShared>> = (0..config.channel_count)
        .map(|_| Arc::new(ChannelShared::new()))
        .collect();

    let master_volume = Arc::new(AtomicF32::new(1.0));
    let master_pan_left = Arc::new(AtomicF32::new(1.0));
    let master_pan_right = Arc::new(AtomicF32::new(0.0));
    let playhead = Arc::new(AtomicU64::new(0));
    let input_feed = InputFeed::new(config.input_channel_count);

    let processor = Processor::new(
        &config,
        message_rx,
        notification_tx,
        &channel_shared,
        Arc::clone(&master_volume),
        Arc::clone(&master_pan_left),
        Arc::clone(&master_pan_right),
        Arc::clone(&playhead),
        input_feed.clone(),
    );

    let player = Player::new(
        message_tx,
        notification_rx,
        channel_shared,
        master_volume,
        master_pan_left,
        master_pan_right,
        playhead,
        input_feed,
        config.sample_rate,
    );

    Ok((player, Box::new(processor)))
}
