use std::{
    fs::{self, OpenOptions},
    io::Write,
};

use crate::classifier::TrajectorySummary;
use crate::config::DispatchConfig;
use crate::dispatch::{DispatchError, SummarySink};

/// Publishes summaries as JSON lines, one file per channel under
/// `<channels_dir>/<project_id>/`.
pub struct ChannelPublisher {
    config: DispatchConfig,
}

impl ChannelPublisher {
    pub fn new(config: DispatchConfig) -> Result<Self, DispatchError> {
        if let Some(credentials) = &config.credentials {
            if !credentials.is_file() {
                return Err(DispatchError::MissingCredentials(credentials.clone()));
            }
        }

        fs::create_dir_all(config.channels_dir.join(&config.project_id))?;
        Ok(Self { config })
    }

    pub fn publish(
        &self,
        channel: &str,
        summary: &TrajectorySummary,
    ) -> Result<(), DispatchError> {
        let mut line = serde_json::to_string(summary)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config.channel_path(channel))?;
        file.write_all(line.as_bytes())?;

        log::info!(
            "Published {}/{} to {} channel",
            summary.recording_id,
            summary.track_id,
            channel
        );
        Ok(())
    }
}

impl SummarySink for ChannelPublisher {
    fn name(&self) -> &str {
        "channels"
    }

    fn accept(&mut self, summary: &TrajectorySummary) -> Result<(), DispatchError> {
        self.publish(summary.channel(), summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TrajectoryLabel;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> DispatchConfig {
        DispatchConfig {
            project_id: "ind".into(),
            channels_dir: dir.join("channels"),
            table: None,
            credentials: None,
        }
    }

    fn summary(trajectory: TrajectoryLabel) -> TrajectorySummary {
        TrajectorySummary {
            recording_id: "18".into(),
            track_id: 7,
            width: 1.9,
            height: 4.6,
            trajectory,
            avg_x_vel: 3.5,
            avg_y_vel: 0.25,
            avg_x_acc: 0.0,
            avg_y_acc: 0.0,
            avg_lon_vel: 3.5,
            avg_lat_vel: 0.0,
            avg_lon_acc: 0.0,
            avg_lat_acc: 0.0,
        }
    }

    #[test]
    fn routes_by_label() {
        let tmp = tempdir().unwrap();
        let cfg = config(tmp.path());
        let mut publisher = ChannelPublisher::new(cfg.clone()).unwrap();

        publisher.accept(&summary(TrajectoryLabel::RightTurn)).unwrap();
        publisher.accept(&summary(TrajectoryLabel::RightTurn)).unwrap();
        publisher.accept(&summary(TrajectoryLabel::Unknown)).unwrap();

        let right = fs::read_to_string(cfg.channel_path("right")).unwrap();
        assert_eq!(right.lines().count(), 2);
        let message: TrajectorySummary =
            serde_json::from_str(right.lines().next().unwrap()).unwrap();
        assert_eq!(message, summary(TrajectoryLabel::RightTurn));

        let unknown = fs::read_to_string(cfg.channel_path("unknown")).unwrap();
        assert_eq!(unknown.lines().count(), 1);
        assert!(!cfg.channel_path("left").exists());
    }

    #[test]
    fn missing_credentials_file_is_rejected() {
        let tmp = tempdir().unwrap();
        let mut cfg = config(tmp.path());
        cfg.credentials = Some(tmp.path().join("credentials.json"));

        assert!(matches!(
            ChannelPublisher::new(cfg.clone()),
            Err(DispatchError::MissingCredentials(_))
        ));

        fs::write(tmp.path().join("credentials.json"), "{}").unwrap();
        assert!(ChannelPublisher::new(cfg).is_ok());
    }
}
