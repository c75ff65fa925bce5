//! Convergence criterion integration tests
//!
//! Runs the criterion inside realistic iteration loops: decaying series,
//! noisy plateaus, and divergent sequences.

use itermon::{Converge, ConvergeConfig, ConvergeState};

#[test]
fn test_geometric_decay_converges() {
    let mut conv = Converge::with_tolerance(1e-3, 4);

    let mut value = 1.0f64;
    let mut iterations = 0;
    while !conv.record(value) {
        value *= 0.5;
        iterations += 1;
        assert!(iterations < 100, "geometric decay must converge");
    }

    // Spread of the final window is within tolerance
    assert!(conv.spread().unwrap() <= 1e-3);
    assert!(conv.state().is_converged());
}

#[test]
fn test_noisy_plateau_converges_within_tolerance() {
    let mut conv = Converge::with_tolerance(0.05, 5);

    // Plateau at 0.2 with deterministic +-0.01 jitter
    let mut converged_at = None;
    for i in 0..20 {
        let jitter = if i % 2 == 0 { 0.01 } else { -0.01 };
        if conv.record(0.2 + jitter) {
            converged_at = Some(i);
            break;
        }
    }

    // Window fills at the 5th sample; jitter stays inside tolerance
    assert_eq!(converged_at, Some(4));
}

#[test]
fn test_oscillation_beyond_tolerance_never_converges() {
    let mut conv = Converge::with_tolerance(0.05, 5);

    for i in 0..200 {
        let value = if i % 2 == 0 { 1.0 } else { 0.0 };
        assert!(!conv.record(value));
    }
    assert!(matches!(conv.state(), ConvergeState::Settling { .. }));
}

#[test]
fn test_divergent_sequence_never_converges() {
    let mut conv = Converge::with_tolerance(0.1, 3);

    let mut value = 1.0f64;
    for _ in 0..50 {
        value *= 1.5;
        assert!(!conv.record(value));
    }
}

#[test]
fn test_relative_mode_tracks_scale() {
    let mut conv = Converge::with_config(ConvergeConfig {
        tolerance: 1e-3,
        window: 3,
        relative: true,
        ..ConvergeConfig::default()
    });

    // Settles near 1e6; absolute spread ~100 but relative spread ~1e-4
    conv.record(1_000_100.0);
    conv.record(1_000_050.0);
    assert!(conv.record(1_000_000.0));
}

#[test]
fn test_restart_after_reset() {
    let mut conv = Converge::with_tolerance(0.01, 3);

    for _ in 0..3 {
        conv.record(1.0);
    }
    assert!(conv.converged());

    conv.reset();
    assert_eq!(conv.state(), ConvergeState::Gathering { needed: 3 });

    conv.record(2.0);
    conv.record(2.0);
    assert!(conv.record(2.0));
}

#[test]
fn test_nan_sample_delays_convergence() {
    let mut conv = Converge::with_tolerance(0.01, 3);

    conv.record(1.0);
    conv.record(1.0);
    conv.record(f64::NAN);

    // The window restarts; two more samples are not enough
    conv.record(1.0);
    assert!(!conv.record(1.0));
    assert!(conv.record(1.0));
}
