mod aggregator;
mod error;
mod parsing;
mod types;

pub use aggregator::{Aggregation, Aggregator};
pub use error::{FieldParseError, RowError};
pub use parsing::{parse_frame, parse_row};
pub use types::{FrameRecord, Kinematics, RawFrame, TrackGroup, TrackKey, COLUMNS};
