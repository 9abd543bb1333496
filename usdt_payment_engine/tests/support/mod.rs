//! Shared fixtures for the engine integration tests: in-memory collaborator implementations and record builders.
#![allow(dead_code)]

pub mod memory;
pub mod transfers;

pub fn init_logging() {
    let _ = env_logger::try_init();
}
