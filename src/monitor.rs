//! Iteration monitor for unbounded loops
//!
//! Tracks named variables across iterations and renders them on a single
//! rate-limited line. Used where a `Bar` cannot: loops with no known
//! iteration count.

use crate::config::Config;
use crate::errors::Result;
use crate::status::StatusLine;
use std::fmt::Display;
use std::time::{Duration, Instant};

/// Named-variable iteration line
///
/// Renders `label 42 | loss=0.1032 lr=0.001 | 12s`: label, iteration
/// count, tracked variables in first-set order, elapsed time.
pub struct Monitor {
    status: StatusLine,
    label: String,
    iteration: u64,
    vars: Vec<(String, String)>,
    started: Instant,
    finished: bool,
}

impl Monitor {
    /// Create a monitor with the given label
    pub fn new(label: &str) -> Self {
        Self::with_status(label, StatusLine::new())
    }

    /// Create a monitor with the refresh interval from configuration
    pub fn with_config(label: &str, config: &Config) -> Self {
        let mut status = StatusLine::new();
        status.set_interval(Duration::from_millis(config.status.interval_ms));
        Self::with_status(label, status)
    }

    /// Create a monitor over an existing status line
    pub fn with_status(label: &str, status: StatusLine) -> Self {
        Monitor {
            status,
            label: label.to_string(),
            iteration: 0,
            vars: Vec::new(),
            started: Instant::now(),
            finished: false,
        }
    }

    /// Set a tracked variable
    ///
    /// Updating an existing name keeps its position; new names append.
    pub fn set(&mut self, name: &str, value: impl Display) {
        let rendered = value.to_string();
        match self.vars.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = rendered,
            None => self.vars.push((name.to_string(), rendered)),
        }
    }

    /// Advance the iteration counter and refresh the line
    pub fn tick(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.iteration += 1;
        let line = self.render_line();
        self.status.update(&line)?;
        Ok(())
    }

    /// Current iteration count
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Elapsed time since the monitor was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Persist the final line and move off it
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        let line = self.render_line();
        self.status.finish(&line)
    }

    fn render_line(&self) -> String {
        let mut line = format!("{} {}", self.label, self.iteration);

        if !self.vars.is_empty() {
            let vars = self
                .vars
                .iter()
                .map(|(n, v)| format!("{}={}", n, v))
                .collect::<Vec<_>>()
                .join(" ");
            line.push_str(&format!(" | {}", vars));
        }

        line.push_str(&format!(
            " | {}",
            crate::bar::format_duration(self.started.elapsed())
        ));
        line
    }
}
