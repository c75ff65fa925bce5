//! Fixed-total progress bar
//!
//! Step-counted progress display built on `StatusLine`: percentage, step
//! counts, and estimated time to completion by linear extrapolation.

use crate::config::{BarConfig, Config};
use crate::errors::Result;
use crate::status::StatusLine;
use colored::Colorize;
use std::time::{Duration, Instant};

/// Step-counted progress bar
///
/// Renders `label [=====>-----] 42% (420/1000) eta 12s` on a single
/// rate-limited terminal line. Reaching the total forces a refresh
/// through the rate limit so the bar never ends short of 100%.
pub struct Bar {
    status: StatusLine,
    label: String,
    total: u64,
    current: u64,
    style: BarConfig,
    started: Instant,
    finished: bool,
}

impl Bar {
    /// Create a progress bar over `total` steps with default styling
    pub fn new(total: u64) -> Self {
        Self::with_status(total, StatusLine::new())
    }

    /// Create a progress bar styled from configuration
    pub fn with_config(total: u64, config: &Config) -> Self {
        let mut status = StatusLine::new();
        status.set_interval(Duration::from_millis(config.status.interval_ms));

        let mut bar = Self::with_status(total, status);
        bar.style = config.bar.clone();
        bar
    }

    /// Create a progress bar over an existing status line
    pub fn with_status(total: u64, status: StatusLine) -> Self {
        Bar {
            status,
            label: String::new(),
            total,
            current: 0,
            style: BarConfig::default(),
            started: Instant::now(),
            finished: false,
        }
    }

    /// Set the label shown before the bar
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Advance the bar by one step
    pub fn inc(&mut self) -> Result<()> {
        self.set(self.current + 1)
    }

    /// Move the bar to an absolute step count (clamped to the total)
    pub fn set(&mut self, position: u64) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        self.current = position.min(self.total);

        let line = self.render_line();
        if self.current >= self.total {
            // The last step must land on screen regardless of the rate limit
            self.status.force(&line)?;
        } else {
            self.status.update(&line)?;
        }
        Ok(())
    }

    /// Current step count
    pub fn position(&self) -> u64 {
        self.current
    }

    /// Total step count
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Elapsed time since the bar was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Check whether the bar has been finished or abandoned
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Complete the bar: final 100% line with total elapsed time
    ///
    /// Idempotent; later calls are no-ops.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.current = self.total;

        let line = format!(
            "{} done in {}",
            self.render_line(),
            format_duration(self.started.elapsed())
        );
        self.status.finish(&line)
    }

    /// Stop early, persisting the line with a message
    pub fn abandon(&mut self, message: &str) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let line = format!("{} {}", self.render_line(), message);
        self.status.finish(&line)
    }

    /// Fraction complete, clamped to [0, 1]; an empty bar counts as done
    fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.current as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    /// Remaining time by linear extrapolation; None before the first step
    fn eta(&self) -> Option<Duration> {
        if self.current == 0 || self.current >= self.total {
            return None;
        }

        let per_step = self.started.elapsed().as_secs_f64() / self.current as f64;
        let remaining = per_step * (self.total - self.current) as f64;
        Some(Duration::from_secs_f64(remaining))
    }

    fn render_line(&self) -> String {
        let frac = self.fraction();
        let percent = (frac * 100.0).round() as u64;
        let body = self.render_body(frac);

        let mut line = String::new();
        if !self.label.is_empty() {
            line.push_str(&self.label);
            line.push(' ');
        }
        line.push_str(&format!(
            "[{}] {}% ({}/{})",
            body, percent, self.current, self.total
        ));

        if let Some(eta) = self.eta() {
            line.push_str(&format!(" eta {}", format_duration(eta)));
        }
        line
    }

    /// Bar body: fill glyphs, a head at the boundary, empties after
    fn render_body(&self, frac: f64) -> String {
        let width = self.style.width.max(1);
        let filled = ((frac * width as f64).round() as usize).min(width);

        let lead = if filled == width {
            self.style.fill.to_string().repeat(width)
        } else if filled > 0 {
            let mut s = self.style.fill.to_string().repeat(filled - 1);
            s.push(self.style.head);
            s
        } else {
            String::new()
        };
        let trail = self.style.empty.to_string().repeat(width - filled);

        if self.style.color && self.status.is_interactive() {
            format!("{}{}", lead.cyan(), trail)
        } else {
            format!("{}{}", lead, trail)
        }
    }
}

/// Format a duration as `8s`, `4m05s`, or `3h02m`
pub(crate) fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h{:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m{:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
