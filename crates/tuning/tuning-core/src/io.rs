//! Dataset and candidate-set persistence.
//!
//! Datasets are read from CSV files with a timestamp column and a numeric
//! value column. Candidate sets are written as CSV (one column per
//! dimension, then `score` and `phase`; an unscorable row leaves `score`
//! empty) or as JSON for lossless reload.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;
use tuning_spi::{
    CandidateRow, CandidateSet, Hyperparameters, Phase, Result, Score, TimeSeries,
    TimeSeriesPoint, TuningError,
};

const SCORE_COLUMN: &str = "score";
const PHASE_COLUMN: &str = "phase";

/// Load a series from CSV.
///
/// The first column holds integer timestamps. `value_column` selects the
/// value column by header name; when `None` the second column is used.
/// Rows must already be in strictly increasing timestamp order.
pub fn load_series_csv(path: impl AsRef<Path>, value_column: Option<&str>) -> Result<TimeSeries> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader.headers().map_err(csv_error)?.clone();
    let col_idx = match value_column {
        Some(name) => headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TuningError::Csv(format!("Column '{}' not found", name)))?,
        None if headers.len() >= 2 => 1,
        None => {
            return Err(TuningError::Csv(
                "expected a timestamp column and a value column".into(),
            ))
        }
    };

    let mut points = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(csv_error)?;
        let timestamp = parse_field::<i64>(&record, 0, line)?;
        let value = parse_field::<f64>(&record, col_idx, line)?;
        points.push(TimeSeriesPoint::new(timestamp, value));
    }

    debug!(path = %path.display(), points = points.len(), "series loaded");
    TimeSeries::new(points)
}

/// Write the candidate table as CSV.
pub fn write_candidates_csv(candidates: &CandidateSet, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    let names = candidates.dimension_names();
    let mut header: Vec<&str> = names.iter().map(String::as_str).collect();
    header.push(SCORE_COLUMN);
    header.push(PHASE_COLUMN);
    writer.write_record(&header).map_err(csv_error)?;

    for row in candidates.rows() {
        let mut record: Vec<String> = names
            .iter()
            .map(|name| {
                row.params
                    .get(name)
                    .map(|v| v.to_string())
                    .ok_or_else(|| TuningError::InvalidData(format!("row is missing '{}'", name)))
            })
            .collect::<Result<_>>()?;
        record.push(match row.score {
            Score::Scored(v) => v.to_string(),
            Score::Unscorable => String::new(),
        });
        record.push(phase_label(row.phase).to_string());
        writer.write_record(&record).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

/// Read a candidate table written by [`write_candidates_csv`].
pub fn read_candidates_csv(path: impl AsRef<Path>) -> Result<CandidateSet> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader.headers().map_err(csv_error)?.clone();
    let score_idx = headers
        .iter()
        .position(|h| h == SCORE_COLUMN)
        .ok_or_else(|| TuningError::Csv("missing 'score' column".into()))?;
    let phase_idx = headers.iter().position(|h| h == PHASE_COLUMN);

    let mut set = CandidateSet::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(csv_error)?;

        let mut params = Hyperparameters::new();
        for (idx, name) in headers.iter().enumerate().take(score_idx) {
            params = params.with_param(name, parse_field::<f64>(&record, idx, line)?);
        }

        let score = match record.get(score_idx).map(str::trim) {
            None | Some("") => Score::Unscorable,
            Some(_) => Score::Scored(parse_field::<f64>(&record, score_idx, line)?),
        };
        let phase = match phase_idx.and_then(|i| record.get(i)) {
            Some(label) => parse_phase(label)?,
            None => Phase::Seed,
        };

        set.push(CandidateRow {
            params,
            score,
            phase,
        });
    }
    Ok(set)
}

pub fn save_candidates_json(candidates: &CandidateSet, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, candidates)
        .map_err(|e| TuningError::Json(e.to_string()))?;
    writer.flush()?;
    Ok(())
}

pub fn load_candidates_json(path: impl AsRef<Path>) -> Result<CandidateSet> {
    let file = File::open(path.as_ref())?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| TuningError::Json(e.to_string()))
}

fn parse_field<T: std::str::FromStr>(record: &csv::StringRecord, idx: usize, line: usize) -> Result<T> {
    let field = record
        .get(idx)
        .ok_or_else(|| TuningError::Csv(format!("row {}: missing column {}", line + 1, idx)))?;
    field
        .trim()
        .parse::<T>()
        .map_err(|_| TuningError::Csv(format!("row {}: cannot parse '{}'", line + 1, field)))
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Seed => "seed",
        Phase::Optimization => "optimization",
    }
}

fn parse_phase(label: &str) -> Result<Phase> {
    match label.trim() {
        "seed" => Ok(Phase::Seed),
        "optimization" => Ok(Phase::Optimization),
        other => Err(TuningError::Csv(format!("unknown phase '{}'", other))),
    }
}

fn csv_error(e: csv::Error) -> TuningError {
    TuningError::Csv(e.to_string())
}
