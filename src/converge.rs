//! Windowed convergence criterion
//!
//! Decides when an iterative computation has settled: the spread of the
//! last `window` recorded values must fall within a tolerance. Smoothing
//! over a window keeps a single noisy sample from declaring convergence.

use std::collections::VecDeque;

/// Convergence criterion configuration
#[derive(Debug, Clone)]
pub struct ConvergeConfig {
    /// Maximum spread (max - min) tolerated over a full window
    pub tolerance: f64,

    /// Number of recent values the spread is measured over
    pub window: usize,

    /// Scale the tolerance by the largest magnitude in the window
    pub relative: bool,

    /// Maximum value history retained
    pub max_history: usize,
}

impl Default for ConvergeConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            window: 5,
            relative: false,
            max_history: 256,
        }
    }
}

/// Where the criterion currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum ConvergeState {
    /// Not enough samples for a full window yet
    Gathering { needed: usize },

    /// Full window, spread still above tolerance
    Settling { spread: f64 },

    /// Criterion satisfied
    Converged { spread: f64 },
}

impl ConvergeState {
    /// Check if converged
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergeState::Converged { .. })
    }
}

/// Windowed delta-based convergence test
///
/// Values are recorded once per iteration; the criterion holds when the
/// spread of the last `window` values is within tolerance. Once reached,
/// convergence is latched until `reset()`.
pub struct Converge {
    config: ConvergeConfig,
    history: VecDeque<f64>,
    converged: bool,
}

impl Converge {
    /// Create a criterion with default configuration
    pub fn new() -> Self {
        Self::with_config(ConvergeConfig::default())
    }

    /// Create a criterion with custom configuration
    ///
    /// A window below 2 is clamped to 2; a negative or non-finite
    /// tolerance falls back to the default.
    pub fn with_config(mut config: ConvergeConfig) -> Self {
        config.window = config.window.max(2);
        config.max_history = config.max_history.max(config.window);
        if !config.tolerance.is_finite() || config.tolerance < 0.0 {
            config.tolerance = ConvergeConfig::default().tolerance;
        }

        Self {
            config,
            history: VecDeque::new(),
            converged: false,
        }
    }

    /// Create a criterion from a tolerance and window size
    pub fn with_tolerance(tolerance: f64, window: usize) -> Self {
        Self::with_config(ConvergeConfig {
            tolerance,
            window,
            ..ConvergeConfig::default()
        })
    }

    /// Record a value and evaluate the criterion
    ///
    /// Returns whether the criterion now holds. A non-finite value
    /// invalidates the smoothing window and restarts gathering.
    pub fn record(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            self.history.clear();
            return self.converged;
        }

        self.history.push_back(value);
        if self.history.len() > self.config.max_history {
            self.history.pop_front();
        }

        if let Some(spread) = self.window_spread() {
            if spread <= self.threshold() {
                self.converged = true;
            }
        }
        self.converged
    }

    /// Check whether the criterion has been satisfied
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Current state of the criterion
    pub fn state(&self) -> ConvergeState {
        if self.converged {
            return ConvergeState::Converged {
                spread: self.window_spread().unwrap_or(0.0),
            };
        }

        match self.window_spread() {
            Some(spread) => ConvergeState::Settling { spread },
            None => ConvergeState::Gathering {
                needed: self.config.window - self.history.len(),
            },
        }
    }

    /// Spread over the current window; None until the window is full
    pub fn spread(&self) -> Option<f64> {
        self.window_spread()
    }

    /// Most recently recorded value
    pub fn latest(&self) -> Option<f64> {
        self.history.back().copied()
    }

    /// Change between the last two recorded values
    pub fn delta(&self) -> Option<f64> {
        if self.history.len() < 2 {
            return None;
        }
        let last = self.history[self.history.len() - 1];
        let prev = self.history[self.history.len() - 2];
        Some(last - prev)
    }

    /// Number of values recorded (bounded by max_history)
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if no values have been recorded
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Clear history and unlatch the criterion
    pub fn reset(&mut self) {
        self.history.clear();
        self.converged = false;
    }

    /// Get configuration
    pub fn config(&self) -> &ConvergeConfig {
        &self.config
    }

    /// max - min of the last `window` values; None until the window fills
    fn window_spread(&self) -> Option<f64> {
        if self.history.len() < self.config.window {
            return None;
        }

        let start = self.history.len() - self.config.window;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in self.history.iter().skip(start) {
            min = min.min(v);
            max = max.max(v);
        }
        Some(max - min)
    }

    /// Effective tolerance for the current window
    fn threshold(&self) -> f64 {
        if !self.config.relative {
            return self.config.tolerance;
        }

        let start = self.history.len().saturating_sub(self.config.window);
        let scale = self
            .history
            .iter()
            .skip(start)
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        self.config.tolerance * scale
    }
}

impl Default for Converge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_criterion_creation() {
        let conv = Converge::new();
        assert_eq!(conv.config().window, 5);
        assert!(!conv.converged());
        assert!(conv.is_empty());
    }

    #[test]
    fn test_gathering_before_window_full() {
        let mut conv = Converge::with_tolerance(0.01, 3);
        conv.record(1.0);
        assert_eq!(conv.state(), ConvergeState::Gathering { needed: 2 });
        assert!(conv.spread().is_none());
    }

    #[test]
    fn test_constant_sequence_converges() {
        let mut conv = Converge::with_tolerance(1e-9, 4);
        for _ in 0..3 {
            assert!(!conv.record(2.5));
        }
        assert!(conv.record(2.5));
        assert!(conv.state().is_converged());
    }

    #[test]
    fn test_decaying_sequence_converges_late() {
        let mut conv = Converge::with_tolerance(0.05, 3);

        assert!(!conv.record(1.0));
        assert!(!conv.record(0.5));
        assert!(!conv.record(0.25));

        // Window spread now 0.75: still settling
        assert!(matches!(conv.state(), ConvergeState::Settling { .. }));

        conv.record(0.24);
        conv.record(0.23);
        assert!(conv.record(0.22));
    }

    #[test]
    fn test_spread_value() {
        let mut conv = Converge::with_tolerance(0.001, 3);
        conv.record(1.0);
        conv.record(3.0);
        conv.record(2.0);
        assert_eq!(conv.spread(), Some(2.0));
    }

    #[test]
    fn test_convergence_is_latched() {
        let mut conv = Converge::with_tolerance(0.1, 2);
        conv.record(1.0);
        assert!(conv.record(1.05));

        // A noisy sample must not unlatch the flag
        assert!(conv.record(5.0));
        assert!(conv.converged());
    }

    #[test]
    fn test_reset_unlatches() {
        let mut conv = Converge::with_tolerance(0.1, 2);
        conv.record(1.0);
        conv.record(1.0);
        assert!(conv.converged());

        conv.reset();
        assert!(!conv.converged());
        assert!(conv.is_empty());
    }

    #[test]
    fn test_nan_resets_window() {
        let mut conv = Converge::with_tolerance(0.1, 3);
        conv.record(1.0);
        conv.record(1.0);
        conv.record(f64::NAN);
        assert_eq!(conv.len(), 0);

        // Gathering restarts from scratch
        conv.record(1.0);
        conv.record(1.0);
        assert!(!conv.converged());
        assert!(conv.record(1.0));
    }

    #[test]
    fn test_infinity_resets_window() {
        let mut conv = Converge::with_tolerance(0.1, 2);
        conv.record(f64::INFINITY);
        assert!(conv.is_empty());
    }

    #[test]
    fn test_relative_tolerance() {
        let mut conv = Converge::with_config(ConvergeConfig {
            tolerance: 0.01,
            window: 2,
            relative: true,
            ..ConvergeConfig::default()
        });

        // Spread 5.0 against scale 1000: 5.0 <= 0.01 * 1000
        conv.record(1000.0);
        assert!(conv.record(995.0));
    }

    #[test]
    fn test_absolute_tolerance_rejects_same_spread() {
        let mut conv = Converge::with_tolerance(0.01, 2);
        conv.record(1000.0);
        assert!(!conv.record(995.0));
    }

    #[test]
    fn test_delta_and_latest() {
        let mut conv = Converge::new();
        assert!(conv.delta().is_none());
        conv.record(1.0);
        assert_eq!(conv.latest(), Some(1.0));
        conv.record(0.4);
        assert_eq!(conv.delta(), Some(0.4 - 1.0));
    }

    #[test]
    fn test_window_clamped_to_two() {
        let conv = Converge::with_tolerance(0.1, 0);
        assert_eq!(conv.config().window, 2);
    }

    #[test]
    fn test_bad_tolerance_falls_back() {
        let conv = Converge::with_tolerance(-1.0, 3);
        assert_eq!(conv.config().tolerance, 1e-6);

        let conv = Converge::with_tolerance(f64::NAN, 3);
        assert_eq!(conv.config().tolerance, 1e-6);
    }

    #[test]
    fn test_bounded_history() {
        let mut conv = Converge::with_config(ConvergeConfig {
            tolerance: 1e-12,
            window: 2,
            max_history: 8,
            ..ConvergeConfig::default()
        });

        for i in 0..50 {
            conv.record(i as f64);
        }
        assert_eq!(conv.len(), 8);
    }

    #[quickcheck]
    fn prop_constant_sequences_converge(value: f64, window: u8) -> quickcheck::TestResult {
        if !value.is_finite() {
            return quickcheck::TestResult::discard();
        }
        let window = (window as usize).clamp(2, 32);

        let mut conv = Converge::with_tolerance(1e-12, window);
        for _ in 0..window {
            conv.record(value);
        }
        quickcheck::TestResult::from_bool(conv.converged())
    }

    #[quickcheck]
    fn prop_never_converges_before_window_fills(values: Vec<f64>) -> bool {
        let mut conv = Converge::with_tolerance(f64::MAX, 64);
        for &v in values.iter().take(63) {
            conv.record(v);
        }
        !conv.converged()
    }
}
