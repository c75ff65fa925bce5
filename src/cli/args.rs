//! Command-line argument parsing for the itermon demo driver
//!
//! Provides clap-based CLI with one subcommand per widget demo.

use clap::{Parser, Subcommand};

/// itermon - Terminal feedback widgets for iterative computations
#[derive(Parser, Debug)]
#[command(name = "itermon")]
#[command(version = "0.3.0")]
#[command(about = "Terminal feedback widgets for long-running iterative computations", long_about = None)]
pub struct Args {
    /// Override the refresh interval in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Disable the keypress abort watcher
    #[arg(long)]
    pub no_abort: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Progress bar over a fixed number of steps
    Bar {
        /// Number of steps to run
        #[arg(long, default_value_t = 200)]
        steps: u64,

        /// Simulated work per step in milliseconds
        #[arg(long, default_value_t = 15)]
        delay_ms: u64,
    },

    /// Variable monitor on an unbounded loop
    Monitor {
        /// Iterations to run (0 = until aborted)
        #[arg(long, default_value_t = 0)]
        iterations: u64,

        /// Simulated work per iteration in milliseconds
        #[arg(long, default_value_t = 50)]
        delay_ms: u64,
    },

    /// Iterate a noisy decaying series until it converges
    Converge {
        /// Convergence tolerance (window spread)
        #[arg(long, default_value_t = 1e-4)]
        tolerance: f64,

        /// Smoothing window size
        #[arg(long, default_value_t = 5)]
        window: usize,

        /// Simulated work per iteration in milliseconds
        #[arg(long, default_value_t = 25)]
        delay_ms: u64,
    },

    /// Display current configuration
    Config,
}
