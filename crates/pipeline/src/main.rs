//! EEG Feature Pipeline - Demonstration Entry Point
//!
//! Generates a synthetic band-mixture recording, runs the full batch
//! pipeline over it, and emits the report as JSON.

use anyhow::Result;
use pipeline::{init_logging, synth, Pipeline, PipelineConfig};
use tracing::info;

const CHANNELS: [&str; 6] = ["Fp1", "Fp2", "F3", "F4", "C3", "C4"];
const DURATION_S: f64 = 60.0;
const SAMPLING_RATE: f64 = 128.0;
const SEED: u64 = 42;

fn main() -> Result<()> {
    init_logging();

    info!("=== EEG Feature Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let recording = synth::synthetic_recording(&CHANNELS, DURATION_S, SAMPLING_RATE, SEED);
    info!(
        channels = CHANNELS.len(),
        duration_s = DURATION_S,
        sampling_rate = SAMPLING_RATE,
        "generated synthetic recording"
    );

    let config = PipelineConfig {
        epoch_length_s: 10.0,
        ..PipelineConfig::default()
    };
    let labels: Vec<String> = CHANNELS.iter().map(|s| s.to_string()).collect();
    let pipeline = Pipeline::new(config, labels)?;

    let report = pipeline.process(&recording);
    info!(
        run_id = %report.run_id,
        n_epochs = report.n_epochs,
        n_passed = report.n_passed,
        n_rejected = report.n_rejected(),
        "batch complete"
    );

    for record in &report.records {
        if let Some(fmm) = &record.fmm {
            if let Some(total_variance) = fmm.values.last() {
                info!(
                    epoch_id = %record.epoch_id,
                    quality = record.quality.overall_quality,
                    total_variance,
                    "epoch features"
                );
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
