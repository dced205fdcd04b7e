//! Rolling-origin fold schedule and per-fold outcomes.

use serde::{Deserialize, Serialize};

use crate::error::{FoldError, Result, TuningError};
use crate::model::TimeSeries;

/// Fixed, chronologically ordered fold cutoffs.
///
/// For a cutoff `c`, training uses every observation strictly before `c`
/// and the test point is the observation at `c`, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldSchedule {
    cutoffs: Vec<i64>,
}

impl FoldSchedule {
    /// Build from explicit cutoffs, which must be strictly increasing.
    pub fn new(cutoffs: Vec<i64>) -> Result<Self> {
        if cutoffs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(TuningError::InvalidConfig(
                "fold cutoffs must be strictly increasing".into(),
            ));
        }
        Ok(Self { cutoffs })
    }

    /// `n_folds` cutoffs ending at the series' last timestamp, spaced by
    /// `step` (the series period when `None`).
    pub fn trailing(series: &TimeSeries, n_folds: usize, step: Option<i64>) -> Result<Self> {
        let last = series.last_timestamp().ok_or_else(|| {
            TuningError::InvalidData("cannot build folds over an empty series".into())
        })?;
        let step = match step.or_else(|| series.period()) {
            Some(s) if s > 0 => s,
            _ => {
                return Err(TuningError::InvalidConfig(
                    "fold step must be positive and the series needs two points to infer it"
                        .into(),
                ))
            }
        };
        let cutoffs = (0..n_folds)
            .rev()
            .map(|k| {
                i64::try_from(k)
                    .ok()
                    .and_then(|k| k.checked_mul(step))
                    .and_then(|offset| last.checked_sub(offset))
                    .ok_or_else(|| {
                        TuningError::InvalidConfig(format!(
                            "{} folds spaced by {} overflow the timestamp range",
                            n_folds, step
                        ))
                    })
            })
            .collect::<Result<Vec<i64>>>()?;
        Self::new(cutoffs)
    }

    pub fn cutoffs(&self) -> &[i64] {
        &self.cutoffs
    }

    pub fn len(&self) -> usize {
        self.cutoffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cutoffs.is_empty()
    }
}

/// What happened to one fold during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum FoldOutcome {
    Scored {
        cutoff: i64,
        actual: f64,
        predicted: f64,
        /// `|actual - predicted| / |actual|`
        ape: f64,
    },
    Skipped { cutoff: i64, reason: FoldError },
}

impl FoldOutcome {
    pub fn cutoff(&self) -> i64 {
        match self {
            FoldOutcome::Scored { cutoff, .. } | FoldOutcome::Skipped { cutoff, .. } => *cutoff,
        }
    }

    pub fn ape(&self) -> Option<f64> {
        match self {
            FoldOutcome::Scored { ape, .. } => Some(*ape),
            FoldOutcome::Skipped { .. } => None,
        }
    }
}
