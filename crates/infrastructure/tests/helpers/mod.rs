#![allow(dead_code)]
pub mod directory_server_mock;
pub mod recording_sink;
pub mod wire;

pub use directory_server_mock::{Behavior, MockDirectoryServer};
pub use recording_sink::RecordingSink;
pub use wire::{build_response, embedded_target, fqdn, WireAnswer};
