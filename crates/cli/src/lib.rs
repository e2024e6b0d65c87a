//! # waveportal-cli
//!
//! Common command line utilities of the `wave` binary: the error handler, logging setup and the
//! option groups shared by its subcommands.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod handler;
pub mod opts;
pub mod utils;
