use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
};

use crate::classifier::TrajectorySummary;
use crate::dispatch::{DispatchError, SummarySink};

/// Append-only CSV table of summaries. The header row is written once, when
/// the table is created.
pub struct TableWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl TableWriter {
    pub fn open(path: &Path) -> Result<Self, DispatchError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let is_new = file.metadata()?.len() == 0;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer.write_record(TrajectorySummary::FIELDS)?;
        }

        log::debug!(
            "Opened summary table {} ({})",
            path.display(),
            if is_new { "new" } else { "appending" }
        );

        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }
}

impl SummarySink for TableWriter {
    fn name(&self) -> &str {
        "table"
    }

    fn accept(&mut self, summary: &TrajectorySummary) -> Result<(), DispatchError> {
        self.writer.serialize(summary)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DispatchError> {
        self.writer.flush()?;
        log::debug!("Flushed summary table {}", self.path.display());
        Ok(())
    }
}
