use super::command::{CommandId, Scheduled};
use super::symbolic_date::DateCache;

/// A list of commands kept in date order
///
/// Sorting is deferred until a cycle needs the order, and only happens
/// when the list changed since the last sort.
pub(crate) struct CommandList<C: Scheduled> {
    commands: Vec<C>,
    needs_sort: bool,
}

impl<C: Scheduled> CommandList<C> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            needs_sort: false,
        }
    }

    pub fn add(&mut self, command: C) {
        self.commands.push(command);
        self.needs_sort = true;
    }

    pub fn remove(&mut self, id: CommandId) -> bool {
        let before = self.commands.len();
        self.commands.retain(|command| command.id() != id);
        self.commands.len() != before
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.commands.iter()
    }

    pub fn retain_mut<F>(&mut self, f: F)
    where
        F: FnMut(&mut C) -> bool,
    {
        let before = self.commands.len();
        self.commands.retain_mut(f);
        if self.commands.len() != before {
            self.needs_sort = true;
        }
    }

    /// Sort by resolved date if the list changed since the last sort
    pub fn possibly_sort(&mut self, now: u64, cache: &mut DateCache) {
        if !self.needs_sort {
            return;
        }

        self.commands
            .sort_by_key(|command| command.date().resolve(now, cache));
        self.needs_sort = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::command::{ControlAction, ControlCommand};
    use crate::scheduler::symbolic_date::SymbolicDate;

    fn noop_at(frame: u64) -> ControlCommand {
        ControlCommand::new(
            SymbolicDate::absolute(frame),
            ControlAction::Callback(Box::new(|_| {})),
        )
    }

    #[test]
    fn sorts_by_resolved_date() {
        let mut list = CommandList::new();
        list.add(noop_at(300));
        list.add(noop_at(100));
        list.add(noop_at(200));

        let mut cache = DateCache::new();
        list.possibly_sort(0, &mut cache);

        let dates: Vec<u64> = list
            .iter()
            .map(|command| command.date().resolve(0, &mut cache))
            .collect();
        assert_eq!(dates, vec![100, 200, 300]);
    }

    #[test]
    fn remove_by_id() {
        let mut list = CommandList::new();
        let command = noop_at(100);
        let id = command.id();
        list.add(command);

        assert!(list.remove(id));
        assert!(list.is_empty());
        assert!(!list.remove(id));
    }
}
