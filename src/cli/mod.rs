//! CLI module for the itermon demo driver
//!
//! Handles command-line argument parsing for the widget demos.

pub mod args;

pub use args::{Args, Commands};
