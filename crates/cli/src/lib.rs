//! `tunelaunch-cli` library crate.
//!
//! Re-exports the resolution harness for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod harness;
