//! Common utilities for building and using the WavePortal client.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

pub mod errors;
pub mod fmt;
pub mod shell;

mod macros;
