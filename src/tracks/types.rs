use std::fmt;

use csv::StringRecord;

/// Column names of a `tracks.csv` row, by position.
pub const COLUMNS: [&str; 17] = [
    "recordingId",
    "trackId",
    "frame",
    "trackLifetime",
    "xCenter",
    "yCenter",
    "heading",
    "width",
    "height",
    "xVelocity",
    "yVelocity",
    "xAcceleration",
    "yAcceleration",
    "lonVelocity",
    "latVelocity",
    "lonAcceleration",
    "latAcceleration",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackKey {
    pub recording_id: String,
    pub track_id: String,
}

impl TrackKey {
    pub fn new(recording_id: impl Into<String>, track_id: impl Into<String>) -> Self {
        Self {
            recording_id: recording_id.into(),
            track_id: track_id.into(),
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.recording_id, self.track_id)
    }
}

/// A row that carries a usable key but whose numeric columns are still text.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub line: u64,
    pub key: TrackKey,
    pub frame: Option<u64>,
    pub fields: StringRecord,
}

/// Velocity and acceleration magnitudes of one frame (or their means).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kinematics {
    pub x_velocity: f64,
    pub y_velocity: f64,
    pub x_acceleration: f64,
    pub y_acceleration: f64,
    pub lon_velocity: f64,
    pub lat_velocity: f64,
    pub lon_acceleration: f64,
    pub lat_acceleration: f64,
}

impl Kinematics {
    /// Component-wise arithmetic mean. `None` for an empty input.
    pub fn mean<'a>(samples: impl IntoIterator<Item = &'a Kinematics>) -> Option<Self> {
        let mut sum = Kinematics::default();
        let mut count = 0usize;

        for k in samples {
            sum.x_velocity += k.x_velocity;
            sum.y_velocity += k.y_velocity;
            sum.x_acceleration += k.x_acceleration;
            sum.y_acceleration += k.y_acceleration;
            sum.lon_velocity += k.lon_velocity;
            sum.lat_velocity += k.lat_velocity;
            sum.lon_acceleration += k.lon_acceleration;
            sum.lat_acceleration += k.lat_acceleration;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Kinematics {
            x_velocity: sum.x_velocity / n,
            y_velocity: sum.y_velocity / n,
            x_acceleration: sum.x_acceleration / n,
            y_acceleration: sum.y_acceleration / n,
            lon_velocity: sum.lon_velocity / n,
            lat_velocity: sum.lat_velocity / n,
            lon_acceleration: sum.lon_acceleration / n,
            lat_acceleration: sum.lat_acceleration / n,
        })
    }
}

/// One parsed timestep of one track. Kinematic fields hold absolute values.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub recording_id: String,
    pub track_id: i64,
    pub frame: Option<u64>,
    pub x_center: f64,
    pub y_center: f64,
    pub heading: f64,
    pub width: f64,
    pub height: f64,
    pub kinematics: Kinematics,
}

/// All rows of one (recordingId, trackId). Never empty.
#[derive(Debug, Clone)]
pub struct TrackGroup {
    key: TrackKey,
    frames: Vec<RawFrame>,
}

impl TrackGroup {
    pub fn new(first: RawFrame) -> Self {
        Self {
            key: first.key.clone(),
            frames: vec![first],
        }
    }

    pub fn push(&mut self, frame: RawFrame) {
        debug_assert_eq!(frame.key, self.key);
        self.frames.push(frame);
    }

    pub fn key(&self) -> &TrackKey {
        &self.key
    }

    pub fn frames(&self) -> &[RawFrame] {
        &self.frames
    }

    /// Stable sort by frame number; rows without one keep arrival order up front.
    pub fn sort_by_frame(&mut self) {
        self.frames.sort_by_key(|f| f.frame);
    }
}
