use std::collections::BTreeMap;

use csv::StringRecord;

use crate::tracks::{parse_row, RawFrame, RowError, TrackGroup, TrackKey};

/// Buffers rows per (recordingId, trackId). Groups only become visible through
/// [`Aggregator::finish`], after the whole input has been pushed.
#[derive(Debug, Default)]
pub struct Aggregator {
    order_by_frame: bool,
    groups: BTreeMap<TrackKey, TrackGroup>,
    dropped: Vec<RowError>,
    rows: u64,
}

#[derive(Debug, Default)]
pub struct Aggregation {
    pub groups: Vec<TrackGroup>,
    pub dropped: Vec<RowError>,
    pub rows: u64,
}

impl Aggregator {
    pub fn new(order_by_frame: bool) -> Self {
        Self {
            order_by_frame,
            ..Default::default()
        }
    }

    /// Adds one CSV row. Rows without a usable key are logged and dropped.
    pub fn push_record(&mut self, line: u64, record: StringRecord) {
        match parse_row(line, record) {
            Ok(frame) => {
                self.rows += 1;
                self.insert(frame);
            }
            Err(e) => self.reject(e),
        }
    }

    /// Counts a row that could not be used at all.
    pub fn reject(&mut self, error: RowError) {
        log::warn!("Dropping row: {}", error);
        self.rows += 1;
        self.dropped.push(error);
    }

    fn insert(&mut self, frame: RawFrame) {
        match self.groups.get_mut(&frame.key) {
            Some(group) => group.push(frame),
            None => {
                self.groups.insert(frame.key.clone(), TrackGroup::new(frame));
            }
        }
    }

    /// Ends the input. Groups come out in key order.
    pub fn finish(self) -> Aggregation {
        let order_by_frame = self.order_by_frame;
        let groups = self
            .groups
            .into_values()
            .map(|mut group| {
                if order_by_frame {
                    group.sort_by_frame();
                }
                group
            })
            .collect();

        Aggregation {
            groups,
            dropped: self.dropped,
            rows: self.rows,
        }
    }
}
