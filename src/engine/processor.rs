use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use atomic_float::AtomicF32;
use crossbeam::channel::{Receiver, Sender};

use crate::channel::{Channel, ChannelShared};
use crate::pan_table::PanTable;
use crate::scheduler::Mixer;
use crate::stream::InputFeed;
use crate::{AudioBuffer, OwnedAudioBuffer, SampleLocation, MAXIMUM_FRAME_COUNT};

use super::message::{Message, Notification};
use super::{AudioProcess, EngineConfig};

/// The audio-thread side of an engine
///
/// Owns the channels and the scheduler. Each cycle drains the pending
/// control messages, runs the scheduled commands, mixes the channels and
/// applies the master stage. Anomalies leave silence in the output; they
/// are never propagated to the host.
pub struct Processor {
    message_rx: Receiver<Message>,
    notification_tx: Sender<Notification>,

    channels: Vec<Channel>,
    mixer: Mixer,

    master_volume: Arc<AtomicF32>,
    master_pan_left: Arc<AtomicF32>,
    master_pan_right: Arc<AtomicF32>,
    playhead: Arc<AtomicU64>,
    input_feed: InputFeed,

    running: bool,
    mix_buffer: OwnedAudioBuffer,
    output_channel_count: usize,
}

impl Processor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config: &EngineConfig,
        message_rx: Receiver<Message>,
        notification_tx: Sender<Notification>,
        channel_shared: &[Arc<ChannelShared>],
        master_volume: Arc<AtomicF32>,
        master_pan_left: Arc<AtomicF32>,
        master_pan_right: Arc<AtomicF32>,
        playhead: Arc<AtomicU64>,
        input_feed: InputFeed,
    ) -> Self {
        let channels = channel_shared
            .iter()
            .map(|shared| Channel::new(Arc::clone(shared), 0, 1))
            .collect();

        Self {
            message_rx,
            notification_tx,
            channels,
            mixer: Mixer::new(),
            master_volume,
            master_pan_left,
            master_pan_right,
            playhead,
            input_feed,
            running: false,
            mix_buffer: OwnedAudioBuffer::new(MAXIMUM_FRAME_COUNT, config.output_channel_count),
            output_channel_count: config.output_channel_count,
        }
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.message_rx.try_recv() {
            match message {
                Message::AddStreamCommand(command) => self.mixer.add_stream_command(command),
                Message::RemoveStreamCommand(id) => {
                    self.mixer.remove_stream_command(id);
                }
                Message::AddControlCommand(command) => self.mixer.add_control_command(command),
                Message::RemoveControlCommand(id) => {
                    self.mixer.remove_control_command(id);
                }
                Message::ClearScheduler => self.mixer.clear(),

                Message::LoadChannel { index, stream } => {
                    if let Some(channel) = self.channels.get_mut(index) {
                        if let Some(previous) = channel.load(stream) {
                            let _ = self
                                .notification_tx
                                .send(Notification::StreamDiscarded(previous));
                        }
                    }
                }
                Message::StartChannel(index) => {
                    if let Some(channel) = self.channels.get_mut(index) {
                        channel.start();
                    }
                }
                Message::ContinueChannel(index) => {
                    if let Some(channel) = self.channels.get_mut(index) {
                        channel.continue_playing();
                    }
                }
                Message::StopChannel(index) => {
                    if let Some(channel) = self.channels.get_mut(index) {
                        channel.stop();
                    }
                }
                Message::AbortChannel(index) => {
                    if let Some(channel) = self.channels.get_mut(index) {
                        channel.abort();
                    }
                }
                Message::ResetChannel(index) => {
                    if let Some(channel) = self.channels.get_mut(index) {
                        channel.reset();
                    }
                }

                Message::Start => self.running = true,
                Message::Stop => self.running = false,
            }
        }
    }
}

impl AudioProcess for Processor {
    fn process(&mut self, input: &dyn AudioBuffer, output: &mut dyn AudioBuffer) {
        output.clear();

        self.drain_messages();

        if !self.running {
            return;
        }

        self.input_feed.publish(input);

        let frame_count = output.frame_count().min(MAXIMUM_FRAME_COUNT);
        let current_frame = self.playhead.load(Ordering::Acquire);

        self.mix_buffer.clear();
        self.mixer
            .run_cycle(&mut self.mix_buffer, frame_count, current_frame);

        for (index, channel) in self.channels.iter_mut().enumerate() {
            if channel.is_active() && !channel.mix(&mut self.mix_buffer, frame_count) {
                let _ = self
                    .notification_tx
                    .send(Notification::ChannelStopped(index));
            }
        }

        let volume = self.master_volume.load(Ordering::Acquire);
        let left_gain = PanTable::vol_left(volume, self.master_pan_left.load(Ordering::Acquire));
        let right_gain =
            PanTable::vol_right(volume, self.master_pan_right.load(Ordering::Acquire));

        let channel_count = self.output_channel_count.min(output.channel_count());
        for channel in 0..channel_count {
            let gain = match channel {
                0 => left_gain,
                1 => right_gain,
                _ => volume,
            };

            let source = self.mix_buffer.get_channel_data(SampleLocation::channel(channel));
            let destination = output.get_channel_data_mut(SampleLocation::channel(channel));

            for (destination_value, source_value) in
                destination.iter_mut().zip(source[..frame_count].iter())
            {
                *destination_value = *source_value * gain;
            }
        }

        self.playhead
            .store(current_frame + frame_count as u64, Ordering::Release);
    }
}
