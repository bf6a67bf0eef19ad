//! Per-epoch cost history for external plotting.

use crate::error::{GaError, GaResult};
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    pub epoch: usize,
    pub best_distance: f64,
    pub average_distance: f64,
}

/// Append-only, epoch-ordered run history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunHistory {
    records: Vec<EpochRecord>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the record for `epoch`, which must be the next epoch in sequence.
    pub fn record(&mut self, epoch: usize, best_distance: f64, average_distance: f64) -> GaResult<()> {
        let expected = self.records.len();
        if epoch != expected {
            return Err(GaError::HistoryOutOfOrder {
                expected,
                found: epoch,
            });
        }

        self.records.push(EpochRecord {
            epoch,
            best_distance,
            average_distance,
        });
        Ok(())
    }

    pub fn history(&self) -> &[EpochRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Shortest per-epoch best distance seen so far.
    pub fn best_distance(&self) -> Option<f64> {
        self.records
            .iter()
            .map(|record| record.best_distance)
            .min_by(f64::total_cmp)
    }

    /// Writes `epoch,best_distance,average_distance` rows with a header.
    pub fn write_csv<W: Write>(&self, writer: W) -> GaResult<()> {
        let mut writer = Writer::from_writer(writer);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
