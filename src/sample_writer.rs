use crate::prelude::*;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::poller::{ChannelData, DeviceSample};

/// Consumes samples from the poller, logging each one and, when configured,
/// appending it to a file as a line of JSON.
#[derive(Debug, Clone)]
pub struct SampleWriter {
    file: Option<Arc<Mutex<std::fs::File>>>,
    path: Option<String>,
    samples_written: Arc<Mutex<u64>>,
}

impl SampleWriter {
    pub fn new(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(Arc::new(Mutex::new(Self::open(path)?))),
            None => None,
        };

        Ok(Self {
            file,
            path: path.map(str::to_string),
            samples_written: Arc::new(Mutex::new(0)),
        })
    }

    fn open(path: &str) -> Result<std::fs::File> {
        info!("Opening sample file at {}", path);

        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| file_error!("failed to open sample file {}: {}", path, err))
    }

    /// Writes samples until shutdown. The caller subscribes `receiver`
    /// before the poller starts so no early sample is missed.
    pub async fn run(&self, mut receiver: broadcast::Receiver<ChannelData>) -> Result<()> {
        debug!("sample writer starting");

        loop {
            match receiver.recv().await {
                Ok(ChannelData::Sample(sample)) => {
                    if let Err(err) = self.write(&sample) {
                        error!("{}: failed to write sample: {:#}", sample.device, err);
                    }
                }
                Ok(ChannelData::Shutdown) | Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("sample writer lagging, skipped {} samples", skipped);
                }
            }
        }

        debug!("sample writer exiting");
        Ok(())
    }

    pub fn write(&self, sample: &DeviceSample) -> Result<()> {
        let json = serde_json::to_string(sample)?;
        debug!("{}: {}", sample.device, json);

        let (Some(file), Some(path)) = (&self.file, &self.path) else {
            return Ok(());
        };

        let mut file = file
            .lock()
            .map_err(|_| anyhow!("Failed to lock sample file"))?;
        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|err| file_error!("failed to write to sample file {}: {}", path, err))?;

        let mut samples_written = self
            .samples_written
            .lock()
            .map_err(|_| anyhow!("Failed to lock samples counter"))?;
        *samples_written += 1;
        trace!("Total samples stored in {}: {}", path, *samples_written);

        Ok(())
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written.lock().map(|n| *n).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::{MeterSample, SampleData};
    use crate::sunspec::metrics::meter_metrics;
    use crate::sunspec::models::{CommonModel, MeterModel, MeterModelInt};
    use crate::sunspec::SunSpecModel;
    use tempfile::NamedTempFile;

    fn meter_sample() -> Result<DeviceSample> {
        let mut words = vec![0u16; 107];
        words[0] = 203;
        words[1] = 105;
        words[18] = 1500;
        let meter = MeterModel::from(MeterModelInt::decode(&words)?);

        let mut common_words = vec![0u16; 67];
        common_words[0] = 1;
        common_words[1] = 65;
        let common = CommonModel::decode(&common_words)?;

        let metrics = meter_metrics(&meter)?;

        Ok(DeviceSample {
            device: "meter".to_string(),
            timestamp: chrono::Utc::now(),
            data: SampleData::Meter(Box::new(MeterSample {
                common,
                meter,
                metrics,
            })),
        })
    }

    #[test]
    fn test_write_samples() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| anyhow!("non utf-8 temp path"))?;
        let writer = SampleWriter::new(Some(path))?;

        writer.write(&meter_sample()?)?;
        writer.write(&meter_sample()?)?;

        let contents = std::fs::read_to_string(temp_file.path())?;
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let json: serde_json::Value = serde_json::from_str(lines[0])?;
        assert_eq!(json["device"], "meter");
        assert_eq!(json["role"], "meter");
        assert_eq!(json["meter"]["id"], 203);
        assert_eq!(json["metrics"]["w"], 1500.0);
        assert_eq!(json["metrics"]["phases"], "threePhase");
        assert_eq!(writer.samples_written(), 2);

        Ok(())
    }

    #[test]
    fn test_write_without_file() -> Result<()> {
        let writer = SampleWriter::new(None)?;

        writer.write(&meter_sample()?)?;
        assert_eq!(writer.samples_written(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_run_until_shutdown() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| anyhow!("non utf-8 temp path"))?;
        let channels = Channels::new();
        let writer = SampleWriter::new(Some(path))?;
        let receiver = channels.from_poller.subscribe();

        channels
            .from_poller
            .send(ChannelData::Sample(Box::new(meter_sample()?)))?;
        channels.from_poller.send(ChannelData::Shutdown)?;

        writer.run(receiver).await?;
        assert_eq!(writer.samples_written(), 1);
        assert_eq!(std::fs::read_to_string(temp_file.path())?.lines().count(), 1);

        Ok(())
    }
}
