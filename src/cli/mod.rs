//! CLI module for the bgmatte library
//!
//! This module is only available when the "cli" feature is enabled.

mod config;
mod main;

pub use main::main;
