//! Shared setup code for the sift binaries.

pub mod common;
