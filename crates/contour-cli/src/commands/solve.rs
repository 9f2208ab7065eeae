//! Curve inspection command.
//!
//! Solves one segment the way the envelope does at a transition and runs
//! the recurrence until it crosses its boundary.

#![allow(clippy::print_literal)] // Table rows use literal labels

use clap::Args;
use contour_core::{CurveCoefficients, segment_samples, solve_curve, voltage_to_time};
use serde::Serialize;

#[derive(Args)]
pub struct SolveArgs {
    /// Level the segment starts from
    #[arg(long, default_value = "0.0")]
    level: f64,

    /// Level the segment should arrive at
    #[arg(long, default_value = "1.0")]
    target: f64,

    /// Rate control (1.0 = 10 V)
    #[arg(long, default_value = "0.3")]
    rate: f64,

    /// Curve amount (-1 inverted .. 1 normal)
    #[arg(long, default_value = "0.5", allow_hyphen_values = true)]
    curve: f64,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: f64,

    /// Print intermediate levels every N samples
    #[arg(long)]
    every: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

/// Ceiling on simulated samples; about 87 s at 48 kHz.
const MAX_SIMULATED_SAMPLES: usize = 1 << 22;

/// Ceiling on printed trace rows.
const MAX_TRACE_POINTS: usize = 10_000;

#[derive(Serialize)]
struct Solution {
    level: f64,
    target: f64,
    rate: f64,
    curve: f64,
    sample_rate: f64,
    full_swing_secs: f64,
    nominal_samples: f64,
    coefficient: f64,
    asymptote: f64,
    legal_low: f64,
    samples_to_boundary: Option<usize>,
    simulated_samples: usize,
    simulation_capped: bool,
    trace: Vec<(usize, f64)>,
}

/// Samples to simulate for a segment of `nominal` samples: four times the
/// nominal length plus slack, never more than [`MAX_SIMULATED_SAMPLES`].
fn simulation_limit(nominal: f64) -> usize {
    (nominal.ceil() as usize)
        .saturating_mul(4)
        .saturating_add(16)
        .min(MAX_SIMULATED_SAMPLES)
}

/// Run the recurrence until the level leaves the legal window. Keeps at
/// most [`MAX_TRACE_POINTS`] trace rows.
fn run_to_boundary(
    c: &CurveCoefficients,
    start: f64,
    limit: usize,
    every: Option<usize>,
) -> (Option<usize>, Vec<(usize, f64)>) {
    let mut level = start;
    let mut trace = Vec::new();
    for n in 1..=limit {
        level = c.step(level);
        if trace.len() < MAX_TRACE_POINTS && every.is_some_and(|e| e > 0 && n % e == 0) {
            trace.push((n, level));
        }
        if !c.contains(level) {
            return (Some(n), trace);
        }
    }
    (None, trace)
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    if !(args.sample_rate > 0.0) {
        anyhow::bail!("sample rate must be positive, got {}", args.sample_rate);
    }

    let c = solve_curve(args.level, args.sample_rate, args.rate, args.target, args.curve);
    let nominal = segment_samples((args.target - args.level).abs(), args.sample_rate, args.rate);
    let limit = simulation_limit(nominal);
    let capped = limit == MAX_SIMULATED_SAMPLES;
    if capped {
        tracing::warn!(nominal, limit, "segment longer than the simulation ceiling");
    }
    let (samples, trace) = run_to_boundary(&c, args.level, limit, args.every);

    let solution = Solution {
        level: args.level,
        target: args.target,
        rate: args.rate,
        curve: args.curve,
        sample_rate: args.sample_rate,
        full_swing_secs: voltage_to_time(args.rate.min(contour_core::MAX_RATE) * 10.0),
        nominal_samples: nominal,
        coefficient: c.rate,
        asymptote: c.target,
        legal_low: c.legal_low,
        samples_to_boundary: samples,
        simulated_samples: samples.unwrap_or(limit),
        simulation_capped: capped,
        trace,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
        return Ok(());
    }

    println!("Segment {:.6} -> {:.6}", solution.level, solution.target);
    println!("{}", "=".repeat(32));
    println!();
    println!("  {:22} {:.6} s", "Full-swing time", solution.full_swing_secs);
    println!("  {:22} {:.2}", "Nominal samples", solution.nominal_samples);
    println!("  {:22} {:.9}", "Coefficient", solution.coefficient);
    println!("  {:22} {:.9}", "Asymptote", solution.asymptote);
    println!("  {:22} {:.9}", "Lower boundary", solution.legal_low);
    if c.is_steady() {
        println!("  {:22} {}", "Shape", "degenerate (ends next sample)");
    } else if c.rate > 0.0 {
        println!("  {:22} {}", "Shape", "normal");
    } else {
        println!("  {:22} {}", "Shape", "inverted");
    }
    match solution.samples_to_boundary {
        Some(n) => println!("  {:22} {}", "Boundary crossed at", n),
        None if capped => println!(
            "  {:22} not simulated beyond {} samples",
            "Boundary crossed at", limit
        ),
        None => println!("  {:22} not within {} samples", "Boundary crossed at", limit),
    }

    if !solution.trace.is_empty() {
        println!();
        println!("  {:>8}  {}", "Sample", "Level");
        for (n, level) in &solution.trace {
            println!("  {:>8}  {:.6}", n, level);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_to_boundary_attack() {
        let c = solve_curve(0.0, 48000.0, 0.0, 1.0, 0.5);
        let (n, trace) = run_to_boundary(&c, 0.0, 1000, Some(10));
        let n = n.unwrap();
        assert!((47..=50).contains(&n), "took {n}");
        assert_eq!(trace.len(), n / 10);
        assert!(trace.windows(2).all(|w| w[1].1 > w[0].1));
    }

    #[test]
    fn test_simulation_limit_follows_nominal() {
        assert_eq!(simulation_limit(48.0), 48 * 4 + 16);
        assert_eq!(simulation_limit(1.0), 20);
    }

    #[test]
    fn test_slowest_segment_stops_at_ceiling() {
        // 20 V full swing: 10^5 s, billions of samples
        let nominal = segment_samples(1.0, 48000.0, 2.0);
        assert!(nominal > 1e9);
        let limit = simulation_limit(nominal);
        assert_eq!(limit, MAX_SIMULATED_SAMPLES);

        let c = solve_curve(0.0, 48000.0, 2.0, 1.0, 0.5);
        let (n, trace) = run_to_boundary(&c, 0.0, limit, Some(1));
        assert_eq!(n, None);
        assert_eq!(trace.len(), MAX_TRACE_POINTS);
        assert!(trace.iter().all(|&(_, level)| (0.0..1.0).contains(&level)));
    }

    #[test]
    fn test_run_to_boundary_steady_never_ends() {
        let c = contour_core::solve_steady_state(0.5);
        let (n, trace) = run_to_boundary(&c, 0.5, 100, None);
        assert_eq!(n, None);
        assert!(trace.is_empty());
    }
}
