//! Scenario rendering command.

use anyhow::{Context, bail};
use clap::Args;
use contour_config::{Rendering, Scenario, ScenarioRenderer, get_factory_scenario};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct RenderArgs {
    /// Scenario TOML file or factory scenario name
    #[arg(value_name = "SCENARIO")]
    scenario: String,

    /// Output WAV file (32-bit float, mono)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Also write the envelope as CSV (sample,time,value)
    #[arg(long, value_name = "CSV")]
    csv: Option<PathBuf>,

    /// Write a JSON summary with streaming-state changes
    #[arg(long, value_name = "JSON")]
    report: Option<PathBuf>,

    /// Override the scenario's block size
    #[arg(long)]
    block_size: Option<usize>,
}

#[derive(Serialize)]
struct StreamingChangeReport {
    position: u64,
    time: f64,
    streaming: bool,
}

#[derive(Serialize)]
struct RenderReport<'a> {
    scenario: &'a str,
    module: &'a str,
    sample_rate: u32,
    samples: usize,
    duration: f64,
    peak: f32,
    streaming_samples: u64,
    streaming_changes: Vec<StreamingChangeReport>,
}

/// Load a scenario from a file, falling back to the factory set.
pub fn resolve_scenario(name: &str) -> anyhow::Result<Scenario> {
    let path = Path::new(name);
    if path.exists() {
        return Scenario::load(path)
            .with_context(|| format!("failed to load scenario '{}'", path.display()));
    }
    match get_factory_scenario(name) {
        Some(scenario) => Ok(scenario),
        None => bail!(
            "no scenario file or factory scenario named '{}' (see 'contour scenarios')",
            name
        ),
    }
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let scenario = resolve_scenario(&args.scenario)?;

    let mut renderer = ScenarioRenderer::new();
    if let Some(block_size) = args.block_size {
        renderer = renderer.with_block_size(block_size);
    }
    let rendering = renderer
        .render(&scenario)
        .with_context(|| format!("failed to render '{}'", scenario.name))?;

    write_wav(&args.output, &rendering)
        .with_context(|| format!("failed to write '{}'", args.output.display()))?;
    tracing::info!(path = %args.output.display(), "wrote WAV");

    if let Some(csv) = &args.csv {
        write_csv(csv, &rendering).with_context(|| format!("failed to write '{}'", csv.display()))?;
        tracing::info!(path = %csv.display(), "wrote CSV");
    }

    if let Some(path) = &args.report {
        let report = build_report(&scenario, &rendering);
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }

    println!(
        "Rendered '{}': {} samples ({:.3}s at {} Hz), peak {:.4}",
        scenario.name,
        rendering.samples.len(),
        rendering.duration_secs(),
        rendering.sample_rate,
        rendering.peak()
    );
    Ok(())
}

fn write_wav(path: &Path, rendering: &Rendering) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: rendering.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in &rendering.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

fn write_csv(path: &Path, rendering: &Rendering) -> anyhow::Result<()> {
    let sr = f64::from(rendering.sample_rate);
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "sample,time,value")?;
    for (i, value) in rendering.samples.iter().enumerate() {
        writeln!(out, "{},{:.6},{}", i, i as f64 / sr, value)?;
    }
    out.flush()?;
    Ok(())
}

fn build_report<'a>(scenario: &'a Scenario, rendering: &Rendering) -> RenderReport<'a> {
    let sr = f64::from(rendering.sample_rate);
    RenderReport {
        scenario: &scenario.name,
        module: &scenario.module,
        sample_rate: rendering.sample_rate,
        samples: rendering.samples.len(),
        duration: rendering.duration_secs(),
        peak: rendering.peak(),
        streaming_samples: rendering.streaming_samples(),
        streaming_changes: rendering
            .streaming_changes
            .iter()
            .map(|c| StreamingChangeReport {
                position: c.position,
                time: c.position as f64 / sr,
                streaming: c.streaming,
            })
            .collect(),
    }
}
