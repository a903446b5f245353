use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use atomic_float::AtomicF32;
use crossbeam::channel::{Receiver, Sender};
use log::{debug, warn};

use crate::channel::{ChannelInfo, ChannelShared, ChannelStatus};
use crate::effect::SharedEffect;
use crate::scheduler::{CommandId, ControlAction, ControlCommand, StreamCommand, SymbolicDate};
use crate::stream::{AudioStream, InputFeed, InputStream};
use crate::{EngineError, ScheduleError};

use super::message::{Message, Notification};

type StopCallback = Box<dyn FnMut(usize) + Send>;

/// The control-thread side of an engine
///
/// Builds and submits commands, drives the channels and observes their
/// state. Everything here is safe to call from any thread except the
/// audio callback; [`Player::stop_channel`] additionally blocks until the
/// fade-out completes.
pub struct Player {
    message_tx: Sender<Message>,
    notification_rx: Receiver<Notification>,

    channel_shared: Vec<Arc<ChannelShared>>,
    master_volume: Arc<AtomicF32>,
    master_pan_left: Arc<AtomicF32>,
    master_pan_right: Arc<AtomicF32>,
    playhead: Arc<AtomicU64>,
    input_feed: InputFeed,

    stop_callbacks: HashMap<usize, StopCallback>,
    sample_rate: usize,
}

impl Player {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        message_tx: Sender<Message>,
        notification_rx: Receiver<Notification>,
        channel_shared: Vec<Arc<ChannelShared>>,
        master_volume: Arc<AtomicF32>,
        master_pan_left: Arc<AtomicF32>,
        master_pan_right: Arc<AtomicF32>,
        playhead: Arc<AtomicU64>,
        input_feed: InputFeed,
        sample_rate: usize,
    ) -> Self {
        Self {
            message_tx,
            notification_rx,
            channel_shared,
            master_volume,
            master_pan_left,
            master_pan_right,
            playhead,
            input_feed,
            stop_callbacks: HashMap::new(),
            sample_rate,
        }
    }

    fn send(&self, message: Message) {
        if self.message_tx.send(message).is_err() {
            warn!("engine processor has shut down; message dropped");
        }
    }

    fn check_channel(&self, index: usize) -> Result<&Arc<ChannelShared>, EngineError> {
        self.channel_shared
            .get(index)
            .ok_or(EngineError::ChannelOutOfRange {
                index,
                channel_count: self.channel_shared.len(),
            })
    }

    /// Schedule a stream to play between two dates
    ///
    /// When both dates are already concrete frames, an inverted pair is
    /// rejected here rather than enqueued.
    pub fn play_stream(
        &self,
        stream: Box<dyn AudioStream>,
        start: SymbolicDate,
        stop: SymbolicDate,
    ) -> Result<CommandId, ScheduleError> {
        if let (Some(start_frame), Some(stop_frame)) = (start.fixed_frame(), stop.fixed_frame()) {
            if stop_frame <= start_frame {
                return Err(ScheduleError::InvertedDates {
                    start: start_frame,
                    stop: stop_frame,
                });
            }
        }

        let command = StreamCommand::new(stream, start, stop);
        let id = command.id();
        debug!("scheduling stream command {id:?}");
        self.send(Message::AddStreamCommand(command));
        Ok(id)
    }

    /// Cancel a scheduled stream before or while it plays
    pub fn cancel_stream(&self, id: CommandId) {
        self.send(Message::RemoveStreamCommand(id));
    }

    /// Schedule an effect control change at a date
    pub fn schedule_effect_control(
        &self,
        effect: SharedEffect,
        control: usize,
        value: f32,
        date: SymbolicDate,
    ) -> CommandId {
        let command = ControlCommand::new(
            date,
            ControlAction::SetEffectControl {
                effect,
                control,
                value,
            },
        );
        let id = command.id();
        self.send(Message::AddControlCommand(command));
        id
    }

    /// Schedule a callback fired with the frame its date resolved to
    pub fn schedule_callback(
        &self,
        date: SymbolicDate,
        callback: impl FnMut(u64) + Send + 'static,
    ) -> CommandId {
        let command = ControlCommand::new(date, ControlAction::Callback(Box::new(callback)));
        let id = command.id();
        self.send(Message::AddControlCommand(command));
        id
    }

    /// Cancel a scheduled control command
    pub fn cancel_control(&self, id: CommandId) {
        self.send(Message::RemoveControlCommand(id));
    }

    /// Drop every scheduled command
    pub fn clear_scheduler(&self) {
        self.send(Message::ClearScheduler);
    }

    /// Install a stream on a channel, replacing any previous one
    pub fn load_channel(
        &self,
        index: usize,
        stream: Box<dyn AudioStream>,
    ) -> Result<(), EngineError> {
        self.check_channel(index)?;
        self.send(Message::LoadChannel { index, stream });
        Ok(())
    }

    /// Rewind a channel and start it from the beginning
    pub fn start_channel(&self, index: usize) -> Result<(), EngineError> {
        self.check_channel(index)?;
        self.send(Message::StartChannel(index));
        Ok(())
    }

    /// Resume a channel from its current position
    pub fn continue_channel(&self, index: usize) -> Result<(), EngineError> {
        self.check_channel(index)?;
        self.send(Message::ContinueChannel(index));
        Ok(())
    }

    /// Fade a channel out and block until it is idle
    ///
    /// Requires the processor to be running; never call this from the
    /// audio thread.
    pub fn stop_channel(&self, index: usize) -> Result<(), EngineError> {
        let shared = self.check_channel(index)?;
        self.send(Message::StopChannel(index));

        while shared.status() != ChannelStatus::Idle {
            std::thread::sleep(Duration::from_millis(1));
        }

        Ok(())
    }

    /// Silence a channel immediately, without a fade
    pub fn abort_channel(&self, index: usize) -> Result<(), EngineError> {
        self.check_channel(index)?;
        self.send(Message::AbortChannel(index));
        Ok(())
    }

    /// Rewind a channel's stream without changing its playing state
    pub fn reset_channel(&self, index: usize) -> Result<(), EngineError> {
        self.check_channel(index)?;
        self.send(Message::ResetChannel(index));
        Ok(())
    }

    pub fn set_channel_volume(&self, index: usize, volume: f32) -> Result<(), EngineError> {
        self.check_channel(index)?.set_volume(volume);
        Ok(())
    }

    pub fn set_channel_pan(
        &self,
        index: usize,
        pan_left: f32,
        pan_right: f32,
    ) -> Result<(), EngineError> {
        self.check_channel(index)?.set_pan(pan_left, pan_right);
        Ok(())
    }

    /// A snapshot of a channel's state
    pub fn channel_info(&self, index: usize) -> Result<ChannelInfo, EngineError> {
        let shared = self.check_channel(index)?;
        Ok(ChannelInfo {
            status: shared.status(),
            frame: shared.frame(),
            volume: shared.volume.load(Ordering::Acquire),
            pan_left: shared.pan_left.load(Ordering::Acquire),
            pan_right: shared.pan_right.load(Ordering::Acquire),
        })
    }

    pub fn set_master_volume(&self, volume: f32) {
        self.master_volume
            .store(volume.clamp(0.0, 1.0), Ordering::Release);
    }

    pub fn set_master_pan(&self, pan_left: f32, pan_right: f32) {
        self.master_pan_left
            .store(pan_left.clamp(0.0, 1.0), Ordering::Release);
        self.master_pan_right
            .store(pan_right.clamp(0.0, 1.0), Ordering::Release);
    }

    /// Register a callback invoked from [`Player::process_notifications`]
    /// when a channel stops on its own
    pub fn set_stop_callback(
        &mut self,
        index: usize,
        callback: impl FnMut(usize) + Send + 'static,
    ) -> Result<(), EngineError> {
        self.check_channel(index)?;
        self.stop_callbacks.insert(index, Box::new(callback));
        Ok(())
    }

    /// Pump pending notifications from the audio thread
    ///
    /// Fires stop callbacks and deallocates streams the processor handed
    /// back. Call this periodically from the control thread.
    pub fn process_notifications(&mut self) {
        while let Ok(notification) = self.notification_rx.try_recv() {
            match notification {
                Notification::ChannelStopped(index) => {
                    debug!("channel {index} stopped");
                    if let Some(callback) = self.stop_callbacks.get_mut(&index) {
                        callback(index);
                    }
                }
                Notification::StreamDiscarded(stream) => drop(stream),
            }
        }
    }

    /// A stream that plays the engine's realtime input
    pub fn input_stream(&self) -> InputStream {
        self.input_feed.stream()
    }

    /// The frame the processor will mix next
    pub fn current_frame(&self) -> u64 {
        self.playhead.load(Ordering::Acquire)
    }

    pub fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channel_shared.len()
    }

    /// Start the transport
    pub fn start(&self) {
        self.send(Message::Start);
    }

    /// Stop the transport; scheduled state is kept
    pub fn stop(&self) {
        self.send(Message::Stop);
    }
}
