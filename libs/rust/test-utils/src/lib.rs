//! Shared test utilities for the sendmail workspace.
//!
//! This crate provides:
//! - Proptest generators for credentials, addresses and file names
//! - An in-memory secret store that records every call
//! - On-disk fixtures in temporary directories

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
