mod command;
mod mixer;
mod queue;
mod symbolic_date;

pub use command::{CommandId, ControlAction, ControlCommand, StreamCommand};
pub use mixer::Mixer;
pub use symbolic_date::{DateCache, SymbolicDate, UNRESOLVED};
