//! Cooperative abort watcher
//!
//! Polls the terminal for an abort keypress without blocking the
//! computation loop. Raw mode is held while the watcher is armed and
//! restored exactly once, on `disarm` or drop.

use crate::errors::{FeedbackError, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::tty::IsTty;
use std::io;
use std::time::Duration;

/// Non-blocking keypress abort watcher
///
/// On a tty the terminal is switched to raw mode so keypresses arrive
/// without a newline; on anything else (pipes, CI) the watcher is inert
/// and never triggers. The trigger latches: once seen, `triggered`
/// stays true.
pub struct Abort {
    raw: bool,
    triggered: bool,
    keys: Vec<KeyCode>,
}

impl Abort {
    /// Arm the watcher with the default trigger keys: `q`, Esc, Ctrl-C
    pub fn new() -> Result<Self> {
        Self::with_keys(vec![KeyCode::Char('q'), KeyCode::Esc])
    }

    /// Arm the watcher with custom trigger keys (Ctrl-C always triggers)
    pub fn with_keys(keys: Vec<KeyCode>) -> Result<Self> {
        let raw = if io::stdin().is_tty() {
            enable_raw_mode()
                .map_err(|e| FeedbackError::Terminal(format!("raw mode: {}", e)))?;
            true
        } else {
            false
        };

        Ok(Abort {
            raw,
            triggered: false,
            keys,
        })
    }

    /// Check whether the watcher holds the terminal in raw mode
    pub fn is_armed(&self) -> bool {
        self.raw
    }

    /// Poll pending key events; returns whether an abort was requested
    ///
    /// Never blocks: drains whatever is queued with a zero-duration poll
    /// and discards everything that is not a trigger key.
    pub fn triggered(&mut self) -> Result<bool> {
        if self.triggered {
            return Ok(true);
        }
        if !self.raw {
            return Ok(false);
        }

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && self.matches(&key) {
                    self.triggered = true;
                }
            }
        }
        Ok(self.triggered)
    }

    /// Restore the terminal early; idempotent
    pub fn disarm(&mut self) {
        if self.raw {
            let _ = disable_raw_mode();
            self.raw = false;
        }
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        self.keys.contains(&key.code)
    }
}

impl Drop for Abort {
    fn drop(&mut self) {
        self.disarm();
    }
}
