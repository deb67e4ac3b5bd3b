pub mod debug_cli;
pub mod snapshot;
