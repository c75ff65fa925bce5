//! itermon demo driver
//!
//! Runs each widget against a simulated iterative computation so the
//! rendering, rate limiting, convergence, and abort paths can be
//! exercised on a real terminal.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use itermon::cli::{Args, Commands};
use itermon::{Abort, Bar, Config, Converge, ConvergeConfig, Monitor};
use rand::Rng;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(interval) = args.interval_ms {
        config.status.interval_ms = interval;
    }
    if args.no_color {
        config.bar.color = false;
        colored::control::set_override(false);
    }

    match args.command {
        Commands::Bar { steps, delay_ms } => run_bar(&args, &config, steps, delay_ms),
        Commands::Monitor {
            iterations,
            delay_ms,
        } => run_monitor(&args, &config, iterations, delay_ms),
        Commands::Converge {
            tolerance,
            window,
            delay_ms,
        } => run_converge(&args, &config, tolerance, window, delay_ms),
        Commands::Config => show_config(&config),
    }
}

/// Arm the abort watcher unless disabled on the command line
fn watcher(args: &Args) -> Result<Option<Abort>> {
    if args.no_abort {
        return Ok(None);
    }
    Ok(Some(Abort::new()?))
}

fn aborted(watcher: &mut Option<Abort>) -> Result<bool> {
    match watcher {
        Some(abort) => Ok(abort.triggered()?),
        None => Ok(false),
    }
}

fn disarm(watcher: &mut Option<Abort>) {
    if let Some(abort) = watcher {
        abort.disarm();
    }
}

/// Fixed-step progress bar over simulated work
fn run_bar(args: &Args, config: &Config, steps: u64, delay_ms: u64) -> Result<()> {
    let mut abort = watcher(args)?;
    let mut bar = Bar::with_config(steps, config).with_label("working");

    for _ in 0..steps {
        thread::sleep(Duration::from_millis(delay_ms));
        bar.inc()?;

        if aborted(&mut abort)? {
            bar.abandon("aborted")?;
            disarm(&mut abort);
            println!("{} aborted at {}/{}", "✗".red(), bar.position(), bar.total());
            return Ok(());
        }
    }

    bar.finish()?;
    disarm(&mut abort);
    println!("{} {} steps in {}", "✓".green(), steps, format_elapsed(&bar));
    Ok(())
}

/// Unbounded loop with tracked variables
fn run_monitor(args: &Args, config: &Config, iterations: u64, delay_ms: u64) -> Result<()> {
    let mut abort = watcher(args)?;
    let mut monitor = Monitor::with_config("iter", config);
    let mut rng = rand::thread_rng();

    let limit = if iterations == 0 { u64::MAX } else { iterations };
    let mut loss = 1.0f64;

    while monitor.iteration() < limit {
        thread::sleep(Duration::from_millis(delay_ms));

        loss = loss * 0.995 + rng.gen_range(-0.002..0.002);
        monitor.set("loss", format!("{:.4}", loss));
        monitor.set("lr", "0.001");
        monitor.tick()?;

        if aborted(&mut abort)? {
            break;
        }
    }

    monitor.finish()?;
    disarm(&mut abort);
    println!("{} {} iterations", "✓".green(), monitor.iteration());
    Ok(())
}

/// Noisy decaying series driven until the convergence criterion holds
fn run_converge(
    args: &Args,
    config: &Config,
    tolerance: f64,
    window: usize,
    delay_ms: u64,
) -> Result<()> {
    let mut abort = watcher(args)?;
    let mut monitor = Monitor::with_config("iter", config);
    let mut conv = Converge::with_config(ConvergeConfig {
        tolerance,
        window,
        ..ConvergeConfig::default()
    });
    let mut rng = rand::thread_rng();

    let mut value = 1.0f64;
    let done = loop {
        thread::sleep(Duration::from_millis(delay_ms));

        value = value * 0.9 + rng.gen_range(-0.1..0.1) * tolerance;
        monitor.set("value", format!("{:.3e}", value));
        if let Some(spread) = conv.spread() {
            monitor.set("spread", format!("{:.3e}", spread));
        }
        monitor.tick()?;

        if conv.record(value) {
            break true;
        }
        if aborted(&mut abort)? {
            break false;
        }
    };

    monitor.finish()?;
    disarm(&mut abort);

    if done {
        println!(
            "{} converged after {} iterations (spread {:.3e})",
            "✓".green(),
            monitor.iteration(),
            conv.spread().unwrap_or(0.0)
        );
    } else {
        println!("{} aborted after {} iterations", "✗".red(), monitor.iteration());
    }
    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) -> Result<()> {
    let path = Config::config_path()?;

    println!("{}", "Configuration".bold().cyan());
    println!("{}", "-".repeat(40).cyan());
    println!("  file:        {}", path.display());
    println!("  interval_ms: {}", config.status.interval_ms);
    println!(
        "  bar:         width={} glyphs=\"{}{}{}\" color={}",
        config.bar.width, config.bar.fill, config.bar.head, config.bar.empty, config.bar.color
    );
    Ok(())
}

fn format_elapsed(bar: &Bar) -> String {
    format!("{:.1}s", bar.elapsed().as_secs_f64())
}
