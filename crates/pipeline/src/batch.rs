//! Batch Orchestration
//!
//! Slices a recording, gates epochs on quality, fans decomposition work
//! out per (epoch, channel), and merges results back keyed by
//! (epoch id, channel index) so record assembly is deterministic no
//! matter which worker finishes first.

use crate::config::{ExtractorKind, PipelineConfig};
use crate::error::PipelineError;
use crate::report::{BatchReport, EpochRecord};
use chrono::Utc;
use classical_features::ClassicalFeatureExtractor;
use eeg_core::{
    CancellationToken, Epoch, EpochId, EpochSlicer, FeatureExtractor, FeatureVector, FilterConfig,
    Recording, SignalFilter,
};
use fmm_engine::{ComponentSet, FmmFeatureExtractor};
use quality_gate::QualityAssessor;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{info, warn};
use uuid::Uuid;

/// Orchestrates one recording through slicing, gating, and extraction
pub struct Pipeline {
    channel_labels: Vec<String>,
    filter: Option<FilterConfig>,
    slicer: EpochSlicer,
    assessor: QualityAssessor,
    fmm: Option<FmmFeatureExtractor>,
    classical: Option<ClassicalFeatureExtractor>,
    pool: rayon::ThreadPool,
}

impl Pipeline {
    /// Build a pipeline for one montage, validating every option
    pub fn new(
        config: PipelineConfig,
        channel_labels: Vec<String>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let slicer = EpochSlicer::new(config.epoch_length_s, config.overlap)?;
        let assessor = QualityAssessor::new(config.quality.clone())?;

        let fmm = if config.extractors.contains(&ExtractorKind::Fmm) {
            Some(FmmFeatureExtractor::new(
                config.fmm.clone(),
                channel_labels.clone(),
            )?)
        } else {
            None
        };
        let classical = if config.extractors.contains(&ExtractorKind::Classical) {
            Some(ClassicalFeatureExtractor::new(
                config.classical.clone(),
                channel_labels.clone(),
            )?)
        } else {
            None
        };

        // an owned pool per pipeline; zero threads keeps rayon's default
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .build()?;

        Ok(Self {
            channel_labels,
            filter: config.filter,
            slicer,
            assessor,
            fmm,
            classical,
            pool,
        })
    }

    /// Position labels of the decomposition vectors, when enabled
    pub fn fmm_feature_names(&self) -> Option<Vec<String>> {
        self.fmm.as_ref().map(|e| e.feature_names())
    }

    /// Position labels of the classical vectors, when enabled
    pub fn classical_feature_names(&self) -> Option<Vec<String>> {
        self.classical.as_ref().map(|e| e.feature_names())
    }

    /// Run one recording end to end
    pub fn process(&self, recording: &Recording) -> BatchReport {
        self.process_with_cancel(recording, &CancellationToken::new())
    }

    /// Run one recording, honoring a cooperative cancellation token
    ///
    /// The token is checked before each work item and before each
    /// component fit inside the decomposition; work already in flight
    /// runs to its natural stopping condition. A cancelled run keeps
    /// the quality records and whatever feature vectors completed.
    pub fn process_with_cancel(
        &self,
        recording: &Recording,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        // preprocessing runs on the continuous signal, ahead of slicing,
        // so epoch boundaries see no filter edge transients
        let filtered;
        let recording = match &self.filter {
            Some(options) => match SignalFilter::new(options, recording.sampling_rate) {
                Ok(filter) => {
                    filtered = filter.apply(recording);
                    &filtered
                }
                Err(err) => {
                    warn!(%err, "filter invalid for this recording, proceeding unfiltered");
                    recording
                }
            },
            None => recording,
        };

        let epochs = self.slicer.slice(recording);
        info!(%run_id, n_epochs = epochs.len(), "starting batch run");

        // gate first so rejected epochs never reach the workers
        let mut records: Vec<EpochRecord> = Vec::with_capacity(epochs.len());
        let mut included: Vec<&Epoch> = Vec::new();
        for epoch in &epochs {
            let quality = self.assessor.assess(epoch);
            if !quality.passes {
                warn!(
                    epoch_id = %epoch.id,
                    overall = quality.overall_quality,
                    "epoch rejected by quality gate"
                );
            } else if epoch.n_channels() != self.channel_labels.len() {
                warn!(
                    epoch_id = %epoch.id,
                    expected = self.channel_labels.len(),
                    actual = epoch.n_channels(),
                    "epoch does not match the configured montage, skipping extraction"
                );
            } else {
                included.push(epoch);
            }
            records.push(EpochRecord {
                epoch_id: epoch.id,
                start_time: epoch.start_time,
                quality,
                fmm: None,
                classical: None,
            });
        }

        if let Some(fmm) = &self.fmm {
            self.run_fmm(fmm, &included, cancel, &mut records);
        }
        if let Some(classical) = &self.classical {
            self.pool
                .install(|| run_classical(classical, &included, cancel, &mut records));
        }

        let n_passed = records.iter().filter(|r| r.quality.passes).count();
        let cancelled = cancel.is_cancelled();
        info!(
            %run_id,
            n_epochs = records.len(),
            n_passed,
            cancelled,
            "batch run finished"
        );

        BatchReport {
            run_id,
            started_at,
            n_epochs: records.len(),
            n_passed,
            cancelled,
            records,
        }
    }

    /// Decompose every (epoch, channel) item on the worker pool and
    /// aggregate per epoch
    fn run_fmm(
        &self,
        fmm: &FmmFeatureExtractor,
        included: &[&Epoch],
        cancel: &CancellationToken,
        records: &mut [EpochRecord],
    ) {
        let items: Vec<(&Epoch, usize)> = included
            .iter()
            .flat_map(|e| (0..e.n_channels()).map(move |c| (*e, c)))
            .collect();

        // workers drop out on cancellation; partial epochs are discarded
        // at the merge below
        let fitted: Vec<((EpochId, usize), ComponentSet)> = self.pool.install(|| {
            items
                .par_iter()
                .filter_map(|&(epoch, channel)| {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    let samples = epoch.channel(channel).to_vec();
                    let set = fmm
                        .engine()
                        .decompose_with_cancel(&samples, channel, Some(cancel));
                    Some(((epoch.id, channel), set))
                })
                .collect()
        });

        let mut by_epoch: BTreeMap<EpochId, BTreeMap<usize, ComponentSet>> = BTreeMap::new();
        for ((id, channel), set) in fitted {
            by_epoch.entry(id).or_default().insert(channel, set);
        }

        let expected = self.channel_labels.len();
        for record in records.iter_mut() {
            let Some(channels) = by_epoch.remove(&record.epoch_id) else {
                continue;
            };
            if channels.len() != expected {
                warn!(
                    epoch_id = %record.epoch_id,
                    fitted = channels.len(),
                    expected,
                    "incomplete channel set, dropping decomposition output"
                );
                continue;
            }
            let sets: Vec<ComponentSet> = channels.into_values().collect();
            record.fmm = Some(fmm.aggregator().aggregate(record.epoch_id, &sets));
        }
    }
}

/// Run the classical extractor over whole epochs on the worker pool
fn run_classical(
    classical: &ClassicalFeatureExtractor,
    included: &[&Epoch],
    cancel: &CancellationToken,
    records: &mut [EpochRecord],
) {
    let outputs: Vec<(EpochId, FeatureVector)> = included
        .par_iter()
        .filter_map(|&epoch| {
            if cancel.is_cancelled() {
                return None;
            }
            match classical.extract(epoch) {
                Ok(vector) => Some((epoch.id, vector)),
                Err(err) => {
                    warn!(epoch_id = %epoch.id, %err, "classical extraction failed");
                    None
                }
            }
        })
        .collect();

    let mut by_epoch: BTreeMap<EpochId, FeatureVector> = outputs.into_iter().collect();
    for record in records.iter_mut() {
        if let Some(vector) = by_epoch.remove(&record.epoch_id) {
            record.classical = Some(vector);
        }
    }
}
