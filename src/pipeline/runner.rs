use std::path::{Path, PathBuf};

use chrono::Utc;
use rayon::prelude::*;

use crate::classifier::{ClassifyError, Classifier, TrajectorySummary};
use crate::config::{ClassifierConfig, Config, DispatchConfig, InputConfig};
use crate::dispatch::Dispatcher;
use crate::pipeline::{discover_inputs, PipelineError, RunReport, TrackFailure};
use crate::tracks::{Aggregation, Aggregator, RowError, TrackGroup, TrackKey};

/// Reads every input file into one aggregation. Only returns once all rows of
/// all files have been seen.
pub fn load_tracks(inputs: &[PathBuf], order_by_frame: bool) -> Result<Aggregation, PipelineError> {
    let mut aggregator = Aggregator::new(order_by_frame);
    for path in inputs {
        read_file(path, &mut aggregator)?;
    }
    Ok(aggregator.finish())
}

fn read_file(path: &Path, aggregator: &mut Aggregator) -> Result<(), PipelineError> {
    let fatal = |source| PipelineError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(fatal)?;

    log::info!("Reading {}", path.display());

    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                aggregator.push_record(line, record);
            }
            Err(e) if e.is_io_error() => return Err(fatal(e)),
            Err(e) => aggregator.reject(RowError::Malformed {
                line: e.position().map(|p| p.line()).unwrap_or_default(),
                message: e.to_string(),
            }),
        }
    }

    Ok(())
}

/// Classifies groups in parallel. Output order follows `groups`.
pub fn classify_groups(
    classifier: &Classifier,
    groups: &[TrackGroup],
) -> Vec<(TrackKey, Result<TrajectorySummary, ClassifyError>)> {
    groups
        .par_iter()
        .map(|group| (group.key().clone(), classifier.classify(group)))
        .collect()
}

pub struct Runner {
    pub input: InputConfig,
    pub classifier: ClassifierConfig,
}

impl Runner {
    pub fn from_config(config: &Config) -> Self {
        Self {
            input: config.input.clone(),
            classifier: config.classifier.clone(),
        }
    }

    /// Reads, groups and classifies without dispatching anything.
    pub fn analyze(&self) -> Result<(RunReport, Vec<TrajectorySummary>), PipelineError> {
        let mut report = RunReport::new(Utc::now());

        let inputs = discover_inputs(&self.input.path, &self.input.suffix)?;
        let aggregation = load_tracks(&inputs, self.classifier.order_by_frame)?;

        report.inputs = inputs;
        report.rows_read = aggregation.rows;
        report.dropped_rows = aggregation.dropped.iter().map(|e| e.to_string()).collect();
        report.tracks = aggregation.groups.len();

        let classifier = Classifier::new(self.classifier.linear_tolerance);
        let mut summaries = Vec::with_capacity(aggregation.groups.len());

        for (key, result) in classify_groups(&classifier, &aggregation.groups) {
            match result {
                Ok(summary) => {
                    report.count_label(summary.trajectory);
                    summaries.push(summary);
                }
                Err(e) => {
                    log::warn!("Skipping track {}: {}", key, e);
                    report.failed_tracks.push(TrackFailure {
                        track: key.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "{} rows, {} dropped, {} tracks, {} classified, {} failed",
            report.rows_read,
            report.dropped_rows.len(),
            report.tracks,
            summaries.len(),
            report.failed_tracks.len()
        );

        Ok((report, summaries))
    }

    /// Full run: analyze, hand every summary to the sinks, optionally persist
    /// the report.
    pub fn run(
        &self,
        dispatch: &DispatchConfig,
        report_dir: Option<&Path>,
    ) -> Result<RunReport, PipelineError> {
        let (mut report, summaries) = self.analyze()?;
        let mut dispatcher = Dispatcher::from_config(dispatch)?;

        for summary in &summaries {
            dispatcher.dispatch(summary);
        }
        report.dispatch = Some(dispatcher.finish());
        report.finish();

        if let Some(dir) = report_dir {
            match report.save(dir) {
                Ok(path) => log::info!("Run report written to {}", path.display()),
                Err(e) => log::error!("Failed to write run report: {}", e),
            }
        }

        Ok(report)
    }
}
