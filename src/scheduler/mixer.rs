use crate::AudioBuffer;

use super::command::{CommandId, ControlCommand, Scheduled, StreamCommand};
use super::queue::CommandList;
use super::symbolic_date::DateCache;

/// The date-driven part of the audio cycle
///
/// Holds every scheduled stream and control command. Each cycle is
/// partitioned at the control command dates that fall inside it, so a
/// control change lands between exactly the frames its date names.
pub struct Mixer {
    stream_commands: CommandList<StreamCommand>,
    control_commands: CommandList<ControlCommand>,
    cache: DateCache,
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            stream_commands: CommandList::new(),
            control_commands: CommandList::new(),
            cache: DateCache::new(),
        }
    }

    pub fn add_stream_command(&mut self, command: StreamCommand) {
        self.stream_commands.add(command);
    }

    pub fn remove_stream_command(&mut self, id: CommandId) -> bool {
        self.stream_commands.remove(id)
    }

    pub fn add_control_command(&mut self, command: ControlCommand) {
        self.control_commands.add(command);
    }

    pub fn remove_control_command(&mut self, id: CommandId) -> bool {
        self.control_commands.remove(id)
    }

    pub fn clear(&mut self) {
        self.stream_commands.clear();
        self.control_commands.clear();
    }

    pub fn scheduled_stream_count(&self) -> usize {
        self.stream_commands.len()
    }

    /// Run the window `[current_frame, current_frame + frame_count)`
    ///
    /// Mixes every due stream command into `buffer` and fires every due
    /// control command, slicing the window at mid-cycle control dates.
    pub fn run_cycle(
        &mut self,
        buffer: &mut dyn AudioBuffer,
        frame_count: usize,
        current_frame: u64,
    ) {
        self.cache.clear();
        self.stream_commands
            .possibly_sort(current_frame, &mut self.cache);
        self.control_commands
            .possibly_sort(current_frame, &mut self.cache);

        let cycle_end = current_frame + frame_count as u64;
        let cache = &mut self.cache;

        let mut offset = 0;
        while offset < frame_count {
            let now = current_frame + offset as u64;

            self.control_commands.retain_mut(|command| {
                let date = command.date().resolve(now, cache);
                if date <= now {
                    command.execute(now);
                    false
                } else {
                    true
                }
            });

            let mut slice_end = frame_count;
            for command in self.control_commands.iter() {
                let date = command.date().resolve(now, cache);
                if date > now && date < cycle_end {
                    slice_end = slice_end.min((date - current_frame) as usize);
                }
            }

            let slice = slice_end - offset;
            self.stream_commands
                .retain_mut(|command| command.execute(buffer, slice, now, offset, cache));

            offset = slice_end;
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}
