pub mod probe;
pub mod resolve;

pub use probe::{
    probe, probe_system, try_probe, CommandRunner, PlatformInfo, ProbeError, SystemRunner,
};
pub use resolve::resolve_command;
