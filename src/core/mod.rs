//! Core runtime: configuration, lifecycle states, and the supervisor.

mod config;
mod handle;
mod state;
mod supervisor;

pub use config::Config;
pub use state::LinkState;
pub use supervisor::Supervisor;
