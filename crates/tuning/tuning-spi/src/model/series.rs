//! Time series dataset for a single entity.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TuningError};

/// A single timestamped observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Period start, as an opaque integer instant (e.g. epoch seconds)
    pub timestamp: i64,
    /// Observed value
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Chronologically sorted observations with unique timestamps.
///
/// Gaps between periods are allowed. The series is read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Build a series, rejecting unsorted or duplicate timestamps and
    /// non-finite values.
    pub fn new(points: Vec<TimeSeriesPoint>) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(TuningError::InvalidData(format!(
                    "timestamps must be strictly increasing: {} followed by {}",
                    pair[0].timestamp, pair[1].timestamp
                )));
            }
        }
        if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(TuningError::InvalidData(format!(
                "non-finite value at timestamp {}",
                bad.timestamp
            )));
        }
        Ok(Self { points })
    }

    /// Build from `(period start, count)` pairs as delivered by ingestion.
    pub fn from_counts(counts: &[(i64, u64)]) -> Result<Self> {
        Self::new(
            counts
                .iter()
                .map(|&(ts, count)| TimeSeriesPoint::new(ts, count as f64))
                .collect(),
        )
    }

    /// Build from values at evenly spaced timestamps `start + i * step`.
    pub fn regular(start: i64, step: i64, values: &[f64]) -> Result<Self> {
        if step <= 0 {
            return Err(TuningError::InvalidData("step must be positive".into()));
        }
        Self::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| TimeSeriesPoint::new(start + i as i64 * step, v))
                .collect(),
        )
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn first_timestamp(&self) -> Option<i64> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.points.last().map(|p| p.timestamp)
    }

    /// All points strictly before `cutoff`.
    pub fn before(&self, cutoff: i64) -> TimeSeries {
        let end = self.points.partition_point(|p| p.timestamp < cutoff);
        TimeSeries {
            points: self.points[..end].to_vec(),
        }
    }

    /// Observation at exactly `timestamp`, if present.
    pub fn value_at(&self, timestamp: i64) -> Option<f64> {
        self.points
            .binary_search_by_key(&timestamp, |p| p.timestamp)
            .ok()
            .map(|i| self.points[i].value)
    }

    /// Smallest positive spacing between consecutive timestamps.
    ///
    /// Gapped series still report the base period as long as at least one
    /// pair of adjacent periods is present. Spacings that overflow `i64` are
    /// ignored.
    pub fn period(&self) -> Option<i64> {
        self.points
            .windows(2)
            .filter_map(|w| w[1].timestamp.checked_sub(w[0].timestamp))
            .min()
    }
}
