//! Training Logger
//!
//! Writes one CSV row per reported epoch so a run can be plotted or compared
//! afterwards. The progress line itself goes through the `log` facade; this
//! file is the durable record.
//!
//! ## CSV Format
//!
//! - `epoch`: 1-based epoch number
//! - `elapsed_seconds`: Time since the logger was created
//! - `learning_rate`: Step size used for the update
//! - `loss`: Mean cross-entropy of the epoch
//! - `perplexity`: exp(loss); a uniform guess over `V` characters scores `V`
//! - `grad_norm`: L2 norm of the averaged gradient
//!
//! ## Example
//!
//! ```rust,no_run
//! use tinylm::{CharLM, ModelConfig, TrainingConfig, TrainingLogger};
//!
//! let mut model = CharLM::new("hello tiny model.", ModelConfig::default())?;
//! let mut logger = TrainingLogger::new("training_log.csv")?;
//! model.train_with_logger(&TrainingConfig::default(), &mut logger)?;
//! # Ok::<(), tinylm::ModelError>(())
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::model::perplexity;
use crate::train::EpochRecord;

/// CSV header written at the top of every log
pub const CSV_HEADER: &str = "epoch,elapsed_seconds,learning_rate,loss,perplexity,grad_norm";

/// Appends training metrics to a CSV file
pub struct TrainingLogger {
    log_file: File,
    start_time: Instant,
}

impl TrainingLogger {
    /// Create the log file (truncating any existing one) and write the header
    pub fn new(log_path: impl AsRef<Path>) -> std::io::Result<Self> {
        let mut log_file = File::create(log_path)?;
        writeln!(log_file, "{CSV_HEADER}")?;

        Ok(Self {
            log_file,
            start_time: Instant::now(),
        })
    }

    /// Append one epoch's metrics and flush
    pub fn log(&mut self, record: &EpochRecord, learning_rate: f64) -> std::io::Result<()> {
        let elapsed = self.start_time.elapsed().as_secs_f64();

        writeln!(
            self.log_file,
            "{},{:.3},{:.6},{:.6},{:.4},{:.6}",
            record.epoch,
            elapsed,
            learning_rate,
            record.loss,
            perplexity(record.loss),
            record.grad_norm
        )?;

        // Keep the file complete even if training is interrupted
        self.log_file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CharLM, ModelConfig, TrainingConfig};
    use std::path::PathBuf;

    fn temp_log_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tinylm_{}_{}.csv", name, std::process::id()))
    }

    #[test]
    fn test_temp_log_paths_are_per_process() {
        let path = temp_log_path("rows");
        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.contains(&std::process::id().to_string()));
        assert_ne!(path, temp_log_path("train"));
    }

    #[test]
    fn test_log_writes_header_and_rows() {
        let path = temp_log_path("training_logger_rows");
        let mut logger = TrainingLogger::new(&path).unwrap();
        let record = EpochRecord {
            epoch: 7,
            loss: 0.0,
            grad_norm: 0.125,
        };
        logger.log(&record, 0.2).unwrap();
        drop(logger);

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], "7");
        assert_eq!(fields[2], "0.200000");
        assert_eq!(fields[3], "0.000000");
        assert_eq!(fields[4], "1.0000");
        assert_eq!(fields[5], "0.125000");
    }

    #[test]
    fn test_train_with_logger_writes_reported_epochs() {
        let path = temp_log_path("training_logger_train");
        let mut logger = TrainingLogger::new(&path).unwrap();
        let mut model = CharLM::new("abcabcabc", ModelConfig::new(2, 3, 6, 0.3, Some(2))).unwrap();

        let config = TrainingConfig {
            epochs: 12,
            report_every: 4,
        };
        let history = model.train_with_logger(&config, &mut logger).unwrap();
        drop(logger);

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(history.records.len(), 3);
        let epochs: Vec<&str> = contents
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(epochs, vec!["4", "8", "12"]);
    }

    #[test]
    fn test_new_fails_for_missing_directory() {
        let path = Path::new("/nonexistent/tinylm/never_exists.csv");
        assert!(TrainingLogger::new(path).is_err());
    }
}
