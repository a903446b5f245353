use std::sync::atomic::{AtomicU64, Ordering};

use crate::effect::SharedEffect;
use crate::stream::AudioStream;
use crate::AudioBuffer;

use super::symbolic_date::{DateCache, SymbolicDate};

static NEXT_COMMAND_ID: AtomicU64 = AtomicU64::new(1);

/// A handle for cancelling a scheduled command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

impl CommandId {
    pub(crate) fn next() -> Self {
        Self(NEXT_COMMAND_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Anything the scheduler keeps in a date-ordered list
pub(crate) trait Scheduled {
    fn id(&self) -> CommandId;
    fn date(&self) -> &SymbolicDate;
}

/// A stream scheduled to play between two dates
///
/// Each cycle the command intersects its `[start, stop)` window with the
/// cycle's frame window and mixes the overlapping frames at the matching
/// offset, so playback is sample accurate regardless of where the dates
/// fall within a cycle.
pub struct StreamCommand {
    id: CommandId,
    stream: Box<dyn AudioStream>,
    start_date: SymbolicDate,
    stop_date: SymbolicDate,
}

impl StreamCommand {
    pub fn new(
        stream: Box<dyn AudioStream>,
        start_date: SymbolicDate,
        stop_date: SymbolicDate,
    ) -> Self {
        Self {
            id: CommandId::next(),
            stream,
            start_date,
            stop_date,
        }
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    /// Mix this command's share of the window `[now, now + frame_count)`
    /// into `buffer` at `buffer_offset`
    ///
    /// Returns false once the command is finished, either because its
    /// stop date passed or because the stream ended early.
    pub(crate) fn execute(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        now: u64,
        buffer_offset: usize,
        cache: &mut DateCache,
    ) -> bool {
        let start = self.start_date.resolve(now, cache);
        let stop = self.stop_date.resolve(now, cache);
        let window_end = now + frame_count as u64;

        if start >= window_end {
            return true;
        }

        let start_offset = start.saturating_sub(now) as usize;
        let stop_offset = if stop < window_end {
            stop.saturating_sub(now) as usize
        } else {
            frame_count
        };

        if stop_offset <= start_offset {
            self.stream.stop();
            return false;
        }

        let wanted = stop_offset - start_offset;
        let produced = self
            .stream
            .read(buffer, wanted, buffer_offset + start_offset);

        let finished = stop < window_end || produced < wanted;
        if finished {
            self.stream.stop();
        }

        !finished
    }
}

impl Scheduled for StreamCommand {
    fn id(&self) -> CommandId {
        self.id
    }

    fn date(&self) -> &SymbolicDate {
        &self.start_date
    }
}

/// What a control command does when its date arrives
pub enum ControlAction {
    /// Set an effect control to a value
    SetEffectControl {
        effect: SharedEffect,
        control: usize,
        value: f32,
    },

    /// Call back with the frame the command fired at
    Callback(Box<dyn FnMut(u64) + Send>),
}

/// A one-shot action fired at a date
pub struct ControlCommand {
    id: CommandId,
    date: SymbolicDate,
    action: ControlAction,
}

impl ControlCommand {
    pub fn new(date: SymbolicDate, action: ControlAction) -> Self {
        Self {
            id: CommandId::next(),
            date,
            action,
        }
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub(crate) fn execute(&mut self, now: u64) {
        match &mut self.action {
            ControlAction::SetEffectControl {
                effect,
                control,
                value,
            } => {
                if let Ok(mut effect) = effect.lock() {
                    effect.set_control_value(*control, *value);
                }
            }
            ControlAction::Callback(callback) => callback(now),
        }
    }
}

impl Scheduled for ControlCommand {
    fn id(&self) -> CommandId {
        self.id
    }

    fn date(&self) -> &SymbolicDate {
        &self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{MemorySound, ReadStream};
    use crate::{OwnedAudioBuffer, SampleLocation};

    fn constant_stream(frame_count: usize, value: f32) -> Box<dyn AudioStream> {
        let mut buffer = OwnedAudioBuffer::new(frame_count, 1);
        buffer.fill_with_value(value);
        Box::new(ReadStream::new(MemorySound::new(buffer)))
    }

    #[test]
    fn windows_are_sample_accurate() {
        let mut command = StreamCommand::new(
            constant_stream(4096, 1.0),
            SymbolicDate::absolute(100),
            SymbolicDate::absolute(180),
        );

        let mut buffer = OwnedAudioBuffer::new(128, 1);
        let mut cache = DateCache::new();

        // The window [64, 192) overlaps [100, 180): 80 frames starting at
        // offset 36, and the command retires because its stop date passed
        assert!(!command.execute(&mut buffer, 128, 64, 0, &mut cache));

        assert_eq!(buffer.get_sample(SampleLocation::frame(35)), 0.0);
        assert_eq!(buffer.get_sample(SampleLocation::frame(36)), 1.0);
        assert_eq!(buffer.get_sample(SampleLocation::frame(115)), 1.0);
        assert_eq!(buffer.get_sample(SampleLocation::frame(116)), 0.0);
    }

    #[test]
    fn waits_for_its_start_date() {
        let mut command = StreamCommand::new(
            constant_stream(4096, 1.0),
            SymbolicDate::absolute(1000),
            SymbolicDate::deferred(),
        );

        let mut buffer = OwnedAudioBuffer::new(128, 1);
        let mut cache = DateCache::new();

        assert!(command.execute(&mut buffer, 128, 0, 0, &mut cache));
        assert!(buffer.channel_is_silent(0));
    }

    #[test]
    fn short_read_retires_the_command() {
        let mut command = StreamCommand::new(
            constant_stream(50, 1.0),
            SymbolicDate::absolute(0),
            SymbolicDate::deferred(),
        );

        let mut buffer = OwnedAudioBuffer::new(128, 1);
        let mut cache = DateCache::new();

        assert!(!command.execute(&mut buffer, 128, 0, 0, &mut cache));
        assert_eq!(buffer.get_sample(SampleLocation::frame(49)), 1.0);
        assert_eq!(buffer.get_sample(SampleLocation::frame(50)), 0.0);
    }

    #[test]
    fn callbacks_receive_the_firing_frame() {
        let fired = std::sync::Arc::new(AtomicU64::new(0));
        let fired_clone = std::sync::Arc::clone(&fired);

        let mut command = ControlCommand::new(
            SymbolicDate::absolute(256),
            ControlAction::Callback(Box::new(move |frame| {
                fired_clone.store(frame, Ordering::Release);
            })),
        );

        command.execute(256);
        assert_eq!(fired.load(Ordering::Acquire), 256);
    }
}
