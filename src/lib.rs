//! itermon - Terminal feedback for long-running iterative computations
//!
//! Small, independent widgets for loops that take a while: a step-counted
//! progress bar, an unbounded variable monitor, a windowed convergence
//! criterion, and a keypress abort watcher, all sharing one rate-limited
//! status-line writer.
//!
//! # Components
//!
//! - [`StatusLine`]: rate-limited single-line terminal writer
//! - [`Bar`]: fixed-total progress bar with linear-extrapolation ETA
//! - [`Monitor`]: key/value variable watcher for unbounded loops
//! - [`Converge`]: windowed delta-based convergence test
//! - [`Abort`]: non-blocking raw-terminal keypress poller

pub mod abort;
pub mod bar;
pub mod cli;
pub mod config;
pub mod converge;
pub mod errors;
pub mod monitor;
pub mod status;

// Re-export commonly used types
pub use abort::Abort;
pub use bar::Bar;
pub use config::Config;
pub use converge::{Converge, ConvergeConfig, ConvergeState};
pub use errors::{FeedbackError, Result};
pub use monitor::Monitor;
pub use status::StatusLine;
