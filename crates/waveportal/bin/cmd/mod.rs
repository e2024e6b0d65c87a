//! Subcommands of `wave`.

pub mod connect;
pub mod send;
pub mod show;
