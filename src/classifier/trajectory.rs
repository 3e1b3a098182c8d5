use crate::classifier::{ClassifyError, TrajectoryLabel, TrajectorySummary};
use crate::tracks::{parse_frame, FrameRecord, Kinematics, TrackGroup};

pub const DEFAULT_LINEAR_TOLERANCE: f64 = 0.4;

#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    linear_tolerance: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_LINEAR_TOLERANCE)
    }
}

impl Classifier {
    pub fn new(linear_tolerance: f64) -> Self {
        Self { linear_tolerance }
    }

    /// Parses every frame of the group and summarizes it. Any unparseable
    /// field fails the whole track.
    pub fn classify(&self, group: &TrackGroup) -> Result<TrajectorySummary, ClassifyError> {
        let frames = group
            .frames()
            .iter()
            .map(parse_frame)
            .collect::<Result<Vec<_>, _>>()?;

        self.summarize(&frames)
    }

    pub fn summarize(&self, frames: &[FrameRecord]) -> Result<TrajectorySummary, ClassifyError> {
        // Identity and size come from the first frame only
        let first = frames.first().ok_or(ClassifyError::EmptyGroup)?;

        let x_centers: Vec<f64> = frames.iter().map(|f| f.x_center).collect();
        let headings: Vec<f64> = frames.iter().map(|f| f.heading).collect();

        let trajectory = match mean(&differences(&headings)) {
            Some(avg_heading_diff) => self.label(avg_heading_diff, &x_centers),
            None => TrajectoryLabel::Unknown,
        };

        let avg = Kinematics::mean(frames.iter().map(|f| &f.kinematics))
            .ok_or(ClassifyError::EmptyGroup)?;

        Ok(TrajectorySummary {
            recording_id: first.recording_id.clone(),
            track_id: first.track_id,
            width: first.width,
            height: first.height,
            trajectory,
            avg_x_vel: avg.x_velocity,
            avg_y_vel: avg.y_velocity,
            avg_x_acc: avg.x_acceleration,
            avg_y_acc: avg.y_acceleration,
            avg_lon_vel: avg.lon_velocity,
            avg_lat_vel: avg.lat_velocity,
            avg_lon_acc: avg.lon_acceleration,
            avg_lat_acc: avg.lat_acceleration,
        })
    }

    fn label(&self, avg_heading_diff: f64, x_centers: &[f64]) -> TrajectoryLabel {
        if avg_heading_diff == 0.0 {
            return TrajectoryLabel::Parked;
        }
        if is_linear(x_centers, self.linear_tolerance) {
            return TrajectoryLabel::Straight;
        }
        if avg_heading_diff < 0.0 {
            match (x_centers.first(), x_centers.last()) {
                (Some(first), Some(last)) if last - first > 0.0 => TrajectoryLabel::LeftTurn,
                _ => TrajectoryLabel::RightTurn,
            }
        } else {
            TrajectoryLabel::Straight
        }
    }
}

/// True unless two consecutive values are closer than `tolerance`.
/// A sequence with fewer than two values is linear.
pub fn is_linear(values: &[f64], tolerance: f64) -> bool {
    !values.windows(2).any(|w| (w[1] - w[0]).abs() < tolerance)
}

fn differences(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
