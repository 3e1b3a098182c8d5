use std::collections::BTreeMap;

use serde::Serialize;

use crate::classifier::TrajectorySummary;
use crate::config::DispatchConfig;
use crate::dispatch::{ChannelPublisher, DispatchError, TableWriter};

/// A destination for finished summaries. A successful `accept` means the
/// summary was handed over, not that anyone received it.
pub trait SummarySink {
    fn name(&self) -> &str;
    fn accept(&mut self, summary: &TrajectorySummary) -> Result<(), DispatchError>;
    fn flush(&mut self) -> Result<(), DispatchError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchStats {
    /// Summaries handed over, by channel.
    pub channels: BTreeMap<String, u64>,
    pub failures: Vec<String>,
}

/// Fans every summary out to all sinks. Sink errors are logged and counted.
pub struct Dispatcher {
    sinks: Vec<Box<dyn SummarySink>>,
    stats: DispatchStats,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Box<dyn SummarySink>>) -> Self {
        Self {
            sinks,
            stats: DispatchStats::default(),
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Result<Self, DispatchError> {
        let mut sinks: Vec<Box<dyn SummarySink>> =
            vec![Box::new(ChannelPublisher::new(config.clone())?)];
        if let Some(table) = &config.table {
            sinks.push(Box::new(TableWriter::open(table)?));
        }
        Ok(Self::new(sinks))
    }

    pub fn dispatch(&mut self, summary: &TrajectorySummary) {
        let mut handed_over = false;
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.accept(summary) {
                log::error!(
                    "{} rejected {}/{}: {}",
                    sink.name(),
                    summary.recording_id,
                    summary.track_id,
                    e
                );
                self.stats.failures.push(format!(
                    "{} {}/{}: {}",
                    sink.name(),
                    summary.recording_id,
                    summary.track_id,
                    e
                ));
            } else {
                handed_over = true;
            }
        }

        // Counted only when at least one sink took it
        if handed_over {
            *self
                .stats
                .channels
                .entry(summary.channel().to_string())
                .or_default() += 1;
        }
    }

    pub fn finish(mut self) -> DispatchStats {
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.flush() {
                log::error!("Failed to flush {}: {}", sink.name(), e);
                self.stats
                    .failures
                    .push(format!("{} flush: {}", sink.name(), e));
            }
        }
        self.stats
    }
}
