//! Integration test utilities for the chat service
//!
//! This crate wires the services to a real PostgreSQL database and provides
//! fixtures that seed it independently of the code under test.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
