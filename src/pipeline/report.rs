use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classifier::TrajectoryLabel;
use crate::dispatch::DispatchStats;

#[derive(Debug, Clone, Serialize)]
pub struct TrackFailure {
    pub track: String,
    pub error: String,
}

/// What one run read, classified, and handed to the sinks.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub inputs: Vec<PathBuf>,
    pub rows_read: u64,
    pub dropped_rows: Vec<String>,
    pub tracks: usize,
    pub labels: BTreeMap<String, usize>,
    pub failed_tracks: Vec<TrackFailure>,
    pub dispatch: Option<DispatchStats>,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: generate_run_id(started_at),
            started_at,
            completed_at: None,
            inputs: Vec::new(),
            rows_read: 0,
            dropped_rows: Vec::new(),
            tracks: 0,
            labels: BTreeMap::new(),
            failed_tracks: Vec::new(),
            dispatch: None,
        }
    }

    pub fn count_label(&mut self, label: TrajectoryLabel) {
        *self.labels.entry(label.to_string()).or_default() += 1;
    }

    pub fn classified(&self) -> usize {
        self.labels.values().sum()
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Writes the report as `<dir>/<run_id>.yaml`.
    pub fn save(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.yaml", self.run_id));
        fs::write(
            &path,
            serde_yaml::to_string(self)
                .map_err(|e| io::Error::other(format!("Failed to serialize report: {}", e)))?,
        )?;
        Ok(path)
    }
}

fn generate_run_id(start: DateTime<Utc>) -> String {
    let uuid = uuid::Uuid::new_v4();
    let timestamp = start.format("%Y%m%dT%H%M%SZ");
    format!("{}_{}", timestamp, uuid)
}
