//! Evaluated candidates and the append-only table that accumulates them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Hyperparameters;

/// Sentinel value of an unscorable candidate: strictly below every
/// finite negative-MAPE score.
pub const UNSCORABLE_SENTINEL: f64 = f64::NEG_INFINITY;

/// Aggregate cross-validation score of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Score {
    /// Negative mean absolute percentage error (higher is better, always <= 0)
    Scored(f64),
    /// Every fold was skipped
    Unscorable,
}

impl Score {
    /// Numeric value used for ranking.
    pub fn value(&self) -> f64 {
        match self {
            Score::Scored(v) => *v,
            Score::Unscorable => UNSCORABLE_SENTINEL,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Score::Scored(_))
    }

    /// Mean absolute percentage error, when scored.
    pub fn mape(&self) -> Option<f64> {
        match self {
            Score::Scored(v) => Some(-v),
            Score::Unscorable => None,
        }
    }

    fn rank(&self, other: &Score) -> Ordering {
        self.value()
            .partial_cmp(&other.value())
            .unwrap_or(Ordering::Equal)
    }
}

/// Which phase produced a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Seed,
    Optimization,
}

/// One evaluated candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub params: Hyperparameters,
    pub score: Score,
    pub phase: Phase,
}

/// Append-only, insertion-ordered table of evaluated candidates.
///
/// Rows are only ever added once their score is known and are never
/// modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    rows: Vec<CandidateRow>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: CandidateRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[CandidateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Best row; ties keep the earliest.
    pub fn best(&self) -> Option<&CandidateRow> {
        best_of(self.rows.iter())
    }

    pub fn best_in_phase(&self, phase: Phase) -> Option<&CandidateRow> {
        best_of(self.rows.iter().filter(|r| r.phase == phase))
    }

    /// Dimension names of the first row, in order.
    pub fn dimension_names(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|r| r.params.names().map(String::from).collect())
            .unwrap_or_default()
    }

    /// Tabular view: header is dimension names followed by `score`.
    ///
    /// Unscorable rows carry `None` in the score column.
    pub fn to_table(&self) -> (Vec<String>, Vec<(Vec<f64>, Option<f64>)>) {
        let mut header = self.dimension_names();
        header.push("score".to_string());
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let score = match r.score {
                    Score::Scored(v) => Some(v),
                    Score::Unscorable => None,
                };
                (r.params.values(), score)
            })
            .collect();
        (header, rows)
    }
}

fn best_of<'a>(rows: impl Iterator<Item = &'a CandidateRow>) -> Option<&'a CandidateRow> {
    rows.fold(None, |best: Option<&CandidateRow>, row| match best {
        Some(b) if row.score.rank(&b.score) != Ordering::Greater => Some(b),
        _ => Some(row),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(alpha: f64, score: Score, phase: Phase) -> CandidateRow {
        CandidateRow {
            params: Hyperparameters::new().with_param("alpha", alpha),
            score,
            phase,
        }
    }

    #[test]
    fn test_best_prefers_higher_score() {
        let mut set = CandidateSet::new();
        set.push(row(0.1, Score::Scored(-0.3), Phase::Seed));
        set.push(row(0.2, Score::Scored(-0.1), Phase::Seed));
        set.push(row(0.3, Score::Unscorable, Phase::Optimization));
        assert_eq!(set.best().unwrap().params.get("alpha"), Some(0.2));
    }

    #[test]
    fn test_best_tie_keeps_first() {
        let mut set = CandidateSet::new();
        set.push(row(0.1, Score::Scored(-0.2), Phase::Seed));
        set.push(row(0.2, Score::Scored(-0.2), Phase::Seed));
        assert_eq!(set.best().unwrap().params.get("alpha"), Some(0.1));
    }

    #[test]
    fn test_best_in_phase() {
        let mut set = CandidateSet::new();
        set.push(row(0.1, Score::Scored(-0.3), Phase::Seed));
        set.push(row(0.2, Score::Scored(-0.1), Phase::Optimization));
        assert_eq!(
            set.best_in_phase(Phase::Seed).unwrap().params.get("alpha"),
            Some(0.1)
        );
        assert!(CandidateSet::new().best().is_none());
    }

    #[test]
    fn test_unscorable_ranks_below_everything() {
        assert!(Score::Unscorable.value() < Score::Scored(-1e300).value());
        assert_eq!(Score::Scored(-0.25).mape(), Some(0.25));
        assert_eq!(Score::Unscorable.mape(), None);
    }

    #[test]
    fn test_to_table() {
        let mut set = CandidateSet::new();
        set.push(row(0.1, Score::Scored(-0.3), Phase::Seed));
        set.push(row(0.2, Score::Unscorable, Phase::Seed));
        let (header, rows) = set.to_table();
        assert_eq!(header, vec!["alpha".to_string(), "score".to_string()]);
        assert_eq!(rows[0], (vec![0.1], Some(-0.3)));
        assert_eq!(rows[1], (vec![0.2], None));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut set = CandidateSet::new();
        set.push(row(0.1, Score::Scored(-0.3), Phase::Seed));
        set.push(row(0.2, Score::Unscorable, Phase::Optimization));
        let json = serde_json::to_string(&set).unwrap();
        let back: CandidateSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
