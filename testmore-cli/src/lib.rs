//! Command-line front end for `testmore`: one assertion per invocation, for use from shell
//! test scripts.

pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod events;
mod productinfo;
