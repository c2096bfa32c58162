//! Shared runtime helpers for the store binaries.

pub mod utils;
