use serde::{Deserialize, Serialize};

use crate::classifier::TrajectoryLabel;

/// Per-track output record. Field names on the wire are the summary table's
/// column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectorySummary {
    pub recording_id: String,
    pub track_id: i64,
    pub width: f64,
    pub height: f64,
    pub trajectory: TrajectoryLabel,
    pub avg_x_vel: f64,
    pub avg_y_vel: f64,
    pub avg_x_acc: f64,
    pub avg_y_acc: f64,
    pub avg_lon_vel: f64,
    pub avg_lat_vel: f64,
    pub avg_lon_acc: f64,
    pub avg_lat_acc: f64,
}

impl TrajectorySummary {
    pub const FIELDS: [&'static str; 13] = [
        "recordingId",
        "trackId",
        "width",
        "height",
        "trajectory",
        "avgXVel",
        "avgYVel",
        "avgXAcc",
        "avgYAcc",
        "avgLonVel",
        "avgLatVel",
        "avgLonAcc",
        "avgLatAcc",
    ];

    pub fn channel(&self) -> &'static str {
        self.trajectory.channel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_schema_names() {
        let summary = TrajectorySummary {
            recording_id: "07".into(),
            track_id: 3,
            width: 1.8,
            height: 4.5,
            trajectory: TrajectoryLabel::LeftTurn,
            avg_x_vel: 1.0,
            avg_y_vel: 0.0,
            avg_x_acc: 0.0,
            avg_y_acc: 0.0,
            avg_lon_vel: 0.0,
            avg_lat_vel: 0.0,
            avg_lon_acc: 0.0,
            avg_lat_acc: 0.0,
        };

        let value = serde_json::to_value(&summary).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), TrajectorySummary::FIELDS.len());
        for field in TrajectorySummary::FIELDS {
            assert!(object.contains_key(field), "missing {field}");
        }
        assert_eq!(object["trajectory"], "Left Turn");
        assert_eq!(summary.channel(), "left");
    }
}
