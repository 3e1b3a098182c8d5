use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    IntoStaticStr,
)]
pub enum TrajectoryLabel {
    Parked,
    Straight,
    #[serde(rename = "Left Turn")]
    #[strum(serialize = "Left Turn")]
    LeftTurn,
    #[serde(rename = "Right Turn")]
    #[strum(serialize = "Right Turn")]
    RightTurn,
    /// Too few frames to tell.
    Unknown,
}

impl TrajectoryLabel {
    pub const ALL: [TrajectoryLabel; 5] = [
        TrajectoryLabel::Parked,
        TrajectoryLabel::Straight,
        TrajectoryLabel::LeftTurn,
        TrajectoryLabel::RightTurn,
        TrajectoryLabel::Unknown,
    ];

    /// Name of the channel summaries with this label are published to.
    pub fn channel(&self) -> &'static str {
        match self {
            TrajectoryLabel::Parked => "parked",
            TrajectoryLabel::Straight => "straight",
            TrajectoryLabel::LeftTurn => "left",
            TrajectoryLabel::RightTurn => "right",
            TrajectoryLabel::Unknown => "unknown",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| <&'static str>::from(*l) == label)
    }

    /// Channel for a label as it appears on the wire; anything unrecognised is "unknown".
    pub fn route(label: &str) -> &'static str {
        Self::from_label(label)
            .unwrap_or(TrajectoryLabel::Unknown)
            .channel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_table() {
        assert_eq!(TrajectoryLabel::route("Parked"), "parked");
        assert_eq!(TrajectoryLabel::route("Straight"), "straight");
        assert_eq!(TrajectoryLabel::route("Left Turn"), "left");
        assert_eq!(TrajectoryLabel::route("Right Turn"), "right");
        assert_eq!(TrajectoryLabel::route("Unknown"), "unknown");
        assert_eq!(TrajectoryLabel::route("U-Turn"), "unknown");
        assert_eq!(TrajectoryLabel::route("left turn"), "unknown");
    }

    #[test]
    fn display_matches_wire_name() {
        for label in TrajectoryLabel::ALL {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label));
            assert_eq!(TrajectoryLabel::from_label(&label.to_string()), Some(label));
        }
    }
}
