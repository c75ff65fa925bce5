//! Rate-limited single-line status writer
//!
//! The low-level primitive shared by `Bar` and `Monitor`: overwrites one
//! terminal line in place with carriage returns, pads over stale content,
//! and throttles refreshes so tight loops don't spend their time in write(2).
//! Performance target: 10 FPS refresh (100ms interval).

use crate::config::DEFAULT_INTERVAL_MS;
use crate::errors::Result;
use crossterm::terminal;
use crossterm::tty::IsTty;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Fallback column count when the terminal size cannot be queried
const FALLBACK_COLUMNS: usize = 80;

/// Rate-limited single-line terminal writer
///
/// Features:
/// - Carriage-return overwrite with padding over stale content
/// - Display-width aware truncation (wide glyphs never wrap the line)
/// - Refresh throttling with a configurable minimum interval
/// - Silent on non-interactive sinks (no `\r` garbage in redirected logs)
pub struct StatusLine {
    sink: Box<dyn Write + Send>,
    interactive: bool,
    columns: Option<usize>,
    min_interval: Duration,
    last_emit: Option<Instant>,
    last_width: usize,
}

impl StatusLine {
    /// Create a status line writing to stderr
    ///
    /// Interactive only when stderr is a tty; otherwise rate-limited
    /// updates are suppressed and only `finish` produces output.
    pub fn new() -> Self {
        let stderr = io::stderr();
        let interactive = stderr.is_tty();

        StatusLine {
            sink: Box::new(stderr),
            interactive,
            columns: None,
            min_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            last_emit: None,
            last_width: 0,
        }
    }

    /// Create a status line with a custom sink and fixed column count
    ///
    /// The sink is always treated as interactive. Used by tests and by
    /// callers that render into something other than a real terminal.
    pub fn with_sink(sink: Box<dyn Write + Send>, columns: usize) -> Self {
        StatusLine {
            sink,
            interactive: true,
            columns: Some(columns),
            min_interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            last_emit: None,
            last_width: 0,
        }
    }

    /// Set the minimum interval between refreshes
    pub fn set_interval(&mut self, interval: Duration) {
        self.min_interval = interval;
    }

    /// Get the configured refresh interval
    pub fn interval(&self) -> Duration {
        self.min_interval
    }

    /// Check whether the sink accepts in-place updates
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Render a line if the refresh interval has elapsed
    ///
    /// Returns whether the line was actually emitted. The first update
    /// always emits; non-interactive sinks never emit.
    pub fn update(&mut self, text: &str) -> Result<bool> {
        if !self.interactive {
            return Ok(false);
        }

        let due = match self.last_emit {
            None => true,
            Some(at) => at.elapsed() >= self.min_interval,
        };

        if !due {
            return Ok(false);
        }

        self.emit(text)?;
        Ok(true)
    }

    /// Render a line ignoring the refresh interval
    pub fn force(&mut self, text: &str) -> Result<()> {
        if !self.interactive {
            return Ok(());
        }
        self.emit(text)
    }

    /// Blank the current line
    pub fn clear(&mut self) -> Result<()> {
        if !self.interactive || self.last_width == 0 {
            return Ok(());
        }

        write!(self.sink, "\r{}\r", " ".repeat(self.last_width))?;
        self.sink.flush()?;
        self.last_width = 0;
        self.last_emit = None;
        Ok(())
    }

    /// Render a final line and move to the next one
    ///
    /// The `\r\n` ending keeps the output correct while a raw-mode abort
    /// watcher holds the terminal. On non-interactive sinks this writes a
    /// plain line, the only output such sinks ever see.
    pub fn finish(&mut self, text: &str) -> Result<()> {
        if !self.interactive {
            writeln!(self.sink, "{}", text)?;
            self.sink.flush()?;
            return Ok(());
        }

        self.emit(text)?;
        write!(self.sink, "\r\n")?;
        self.sink.flush()?;
        self.last_width = 0;
        self.last_emit = None;
        Ok(())
    }

    /// Write the line: `\r`, clipped text, padding over stale content
    fn emit(&mut self, text: &str) -> Result<()> {
        let max = self.columns().saturating_sub(1);
        // Lines carrying color escapes are measured but not clipped;
        // cutting inside a styled span would leave the terminal colored.
        let (clipped, width) = if text.contains('\x1b') {
            (text, visible_width(text))
        } else {
            clip_to_width(text, max)
        };

        write!(self.sink, "\r{}", clipped)?;
        if width < self.last_width {
            write!(self.sink, "{}", " ".repeat(self.last_width - width))?;
            // Park the cursor at the end of the visible text
            write!(self.sink, "\r{}", clipped)?;
        }
        self.sink.flush()?;

        self.last_width = width;
        self.last_emit = Some(Instant::now());
        Ok(())
    }

    fn columns(&self) -> usize {
        if let Some(cols) = self.columns {
            return cols;
        }
        terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(FALLBACK_COLUMNS)
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Display width of text after stripping ANSI escape sequences
pub(crate) fn visible_width(text: &str) -> usize {
    use unicode_width::UnicodeWidthStr;

    let stripped = strip_ansi_escapes::strip(text);
    String::from_utf8_lossy(&stripped).width()
}

/// Clip text to a maximum display width
///
/// Returns the clipped prefix and its display width. Width accounting
/// uses unicode display width, not byte or char counts.
fn clip_to_width(text: &str, max: usize) -> (&str, usize) {
    use unicode_width::UnicodeWidthChar;

    let mut width = 0;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if width + w > max {
            return (&text[..idx], width);
        }
        width += w;
    }
    (text, width)
}
