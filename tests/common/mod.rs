//! Common test utilities for Hoist integration tests.
//!
//! - `TestProject`: a workspace folder in a temp directory plus a separate
//!   directory acting as the local deploy target
//! - `run_hoist`: run the CLI binary against a project

pub mod env;

pub use env::*;
