pub mod config;
pub mod light;
pub mod mailbox;
pub mod phase;
pub mod status;
pub mod vehicle;
