pub mod cli;
pub mod config;
pub mod observability;
pub mod snapshot;

pub use config::Config;
pub use snapshot::Snapshot;
