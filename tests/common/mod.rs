//! Common test utilities and fixtures for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: gateway payloads and mock-server helpers
//! - `logger`: structured test logging

pub mod fixtures;
pub mod logger;
