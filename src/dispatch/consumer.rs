use std::{
    fs::{self, File},
    io::{BufRead, BufReader, Seek, SeekFrom},
    path::PathBuf,
};

use crate::classifier::TrajectorySummary;
use crate::config::DispatchConfig;
use crate::dispatch::DispatchError;

/// Reads one channel from its last acknowledged offset. The offset lives next
/// to the channel file as `<channel>.offset`.
pub struct ChannelConsumer {
    channel: String,
    path: PathBuf,
    offset_path: PathBuf,
}

impl ChannelConsumer {
    pub fn new(config: &DispatchConfig, channel: &str) -> Self {
        let path = config.channel_path(channel);
        let offset_path = path.with_extension("offset");
        Self {
            channel: channel.to_string(),
            path,
            offset_path,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn offset(&self) -> Result<u64, DispatchError> {
        match fs::read_to_string(&self.offset_path) {
            Ok(content) => Ok(content.trim().parse().unwrap_or_else(|_| {
                log::warn!(
                    "Unreadable offset in {}, starting over",
                    self.offset_path.display()
                );
                0
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn ack(&self, offset: u64) -> Result<(), DispatchError> {
        fs::write(&self.offset_path, offset.to_string())?;
        Ok(())
    }

    /// Hands every complete, unacknowledged message to `callback` and
    /// acknowledges it. Lines that are not summaries are skipped.
    pub fn poll<F>(&self, mut callback: F) -> Result<usize, DispatchError>
    where
        F: FnMut(&TrajectorySummary),
    {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut position = self.offset()?;
        if position > file.metadata()?.len() {
            log::warn!(
                "Offset {} is past the end of {}, starting over",
                position,
                self.path.display()
            );
            position = 0;
        }
        file.seek(SeekFrom::Start(position))?;

        let mut reader = BufReader::new(file);
        let mut line = String::new();
        let mut received = 0;

        loop {
            line.clear();
            let read = reader.read_line(&mut line)?;
            // Stop at EOF or at a line still being written
            if read == 0 || !line.ends_with('\n') {
                break;
            }

            let text = line.trim();
            if !text.is_empty() {
                match serde_json::from_str::<TrajectorySummary>(text) {
                    Ok(summary) => {
                        callback(&summary);
                        received += 1;
                    }
                    Err(e) => log::warn!(
                        "Skipping malformed message on {} at offset {}: {}",
                        self.channel,
                        position,
                        e
                    ),
                }
            }

            position += read as u64;
            self.ack(position)?;
        }

        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TrajectoryLabel;
    use crate::dispatch::{ChannelPublisher, SummarySink};
    use std::io::Write;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> DispatchConfig {
        DispatchConfig {
            project_id: "ind".into(),
            channels_dir: dir.to_path_buf(),
            table: None,
            credentials: None,
        }
    }

    fn summary(track_id: i64) -> TrajectorySummary {
        TrajectorySummary {
            recording_id: "02".into(),
            track_id,
            width: 1.0,
            height: 1.0,
            trajectory: TrajectoryLabel::Parked,
            avg_x_vel: 0.0,
            avg_y_vel: 0.0,
            avg_x_acc: 0.0,
            avg_y_acc: 0.0,
            avg_lon_vel: 0.0,
            avg_lat_vel: 0.0,
            avg_lon_acc: 0.0,
            avg_lat_acc: 0.0,
        }
    }

    #[test]
    fn receives_each_message_once() {
        let tmp = tempdir().unwrap();
        let cfg = config(tmp.path());
        let mut publisher = ChannelPublisher::new(cfg.clone()).unwrap();
        let consumer = ChannelConsumer::new(&cfg, "parked");

        assert_eq!(consumer.poll(|_| {}).unwrap(), 0);

        publisher.accept(&summary(1)).unwrap();
        publisher.accept(&summary(2)).unwrap();

        let mut seen = Vec::new();
        assert_eq!(consumer.poll(|s| seen.push(s.track_id)).unwrap(), 2);
        assert_eq!(seen, vec![1, 2]);

        assert_eq!(consumer.poll(|_| {}).unwrap(), 0);

        publisher.accept(&summary(3)).unwrap();
        let mut seen = Vec::new();
        assert_eq!(consumer.poll(|s| seen.push(s.track_id)).unwrap(), 1);
        assert_eq!(seen, vec![3]);
    }

    #[test]
    fn skips_garbage_and_waits_for_partial_lines() {
        let tmp = tempdir().unwrap();
        let cfg = config(tmp.path());
        ChannelPublisher::new(cfg.clone()).unwrap();
        let path = cfg.channel_path("parked");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, "{}", serde_json::to_string(&summary(5)).unwrap()).unwrap();
        write!(file, "{{\"recordingId\":").unwrap();
        file.flush().unwrap();

        let consumer = ChannelConsumer::new(&cfg, "parked");
        let mut seen = Vec::new();
        assert_eq!(consumer.poll(|s| seen.push(s.track_id)).unwrap(), 1);
        assert_eq!(seen, vec![5]);

        let expected = fs::read_to_string(&path).unwrap().rfind('\n').unwrap() as u64 + 1;
        assert_eq!(consumer.offset().unwrap(), expected);
    }
}
