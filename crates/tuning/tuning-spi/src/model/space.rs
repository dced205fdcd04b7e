//! Hyperparameter dimensions, sampling distributions and the bounded search
//! space derived from them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TuningError};

/// Numeric type of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    #[default]
    Continuous,
    /// Treated as real-valued by the surrogate, rounded when materialized
    Integer,
}

/// How the random sampler draws values for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SamplingDistribution {
    /// Single uniform range `[lo, hi]`.
    Uniform { lo: f64, hi: f64 },
    /// Mixture of two uniform sub-ranges, `low_share` of the draws coming
    /// from `low` and the rest from `high`.
    Stratified {
        low: (f64, f64),
        high: (f64, f64),
        low_share: f64,
    },
}

impl SamplingDistribution {
    /// Overall `(min, max)` covered by the distribution.
    pub fn range(&self) -> (f64, f64) {
        match self {
            SamplingDistribution::Uniform { lo, hi } => (*lo, *hi),
            SamplingDistribution::Stratified { low, high, .. } => {
                (low.0.min(high.0), low.1.max(high.1))
            }
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        let check = |lo: f64, hi: f64| -> Result<()> {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(TuningError::InvalidConfig(format!(
                    "dimension '{}': invalid range [{}, {}]",
                    name, lo, hi
                )));
            }
            Ok(())
        };
        match self {
            SamplingDistribution::Uniform { lo, hi } => check(*lo, *hi),
            SamplingDistribution::Stratified {
                low,
                high,
                low_share,
            } => {
                check(low.0, low.1)?;
                check(high.0, high.1)?;
                if !(0.0..=1.0).contains(low_share) {
                    return Err(TuningError::InvalidConfig(format!(
                        "dimension '{}': low_share must be within [0, 1], got {}",
                        name, low_share
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Sampling specification for one named dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub name: String,
    #[serde(default)]
    pub kind: ParamKind,
    pub distribution: SamplingDistribution,
    /// Domain-mandated minimum applied after bound expansion
    #[serde(default)]
    pub floor: Option<f64>,
    /// Domain-mandated maximum applied after bound expansion
    #[serde(default)]
    pub ceiling: Option<f64>,
}

impl DimensionSpec {
    pub fn continuous(name: &str, lo: f64, hi: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Continuous,
            distribution: SamplingDistribution::Uniform { lo, hi },
            floor: None,
            ceiling: None,
        }
    }

    pub fn integer(name: &str, lo: i64, hi: i64) -> Self {
        Self {
            kind: ParamKind::Integer,
            ..Self::continuous(name, lo as f64, hi as f64)
        }
    }

    pub fn stratified(name: &str, low: (f64, f64), high: (f64, f64), low_share: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Continuous,
            distribution: SamplingDistribution::Stratified {
                low,
                high,
                low_share,
            },
            floor: None,
            ceiling: None,
        }
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn with_ceiling(mut self, ceiling: f64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(TuningError::InvalidConfig(
                "dimension name must not be empty".into(),
            ));
        }
        self.distribution.validate(&self.name)?;
        if let (Some(floor), Some(ceiling)) = (self.floor, self.ceiling) {
            if floor > ceiling {
                return Err(TuningError::InvalidConfig(format!(
                    "dimension '{}': floor {} above ceiling {}",
                    self.name, floor, ceiling
                )));
            }
        }

        let (min, max) = self.distribution.range();
        if let Some(floor) = self.floor {
            if !floor.is_finite() || floor > max {
                return Err(TuningError::InvalidConfig(format!(
                    "dimension '{}': floor {} excludes the sampling range [{}, {}]",
                    self.name, floor, min, max
                )));
            }
        }
        if let Some(ceiling) = self.ceiling {
            if !ceiling.is_finite() || ceiling < min {
                return Err(TuningError::InvalidConfig(format!(
                    "dimension '{}': ceiling {} excludes the sampling range [{}, {}]",
                    self.name, ceiling, min, max
                )));
            }
        }
        Ok(())
    }
}

/// Named hyperparameter values in dimension order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    params: Vec<(String, f64)>,
}

impl Hyperparameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.params.push((name.to_string(), value));
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.params.iter().map(|(_, v)| *v).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.params.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

/// One bounded dimension of the search space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub kind: ParamKind,
    pub lo: f64,
    pub hi: f64,
}

impl Dimension {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Clamp into bounds and, for integer dimensions, round to the nearest
    /// feasible integer.
    pub fn materialize(&self, value: f64) -> f64 {
        match self.kind {
            ParamKind::Continuous => value.clamp(self.lo, self.hi),
            ParamKind::Integer => value.round().clamp(self.lo.ceil(), self.hi.floor()),
        }
    }
}

/// Bounded search space over named dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterSpace {
    dimensions: Vec<Dimension>,
}

impl HyperparameterSpace {
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        for dim in &dimensions {
            if !dim.lo.is_finite() || !dim.hi.is_finite() || dim.lo > dim.hi {
                return Err(TuningError::InvalidConfig(format!(
                    "dimension '{}': invalid bounds [{}, {}]",
                    dim.name, dim.lo, dim.hi
                )));
            }
            if dim.kind == ParamKind::Integer && dim.lo.ceil() > dim.hi.floor() {
                return Err(TuningError::InvalidConfig(format!(
                    "integer dimension '{}' has no integer within [{}, {}]",
                    dim.name, dim.lo, dim.hi
                )));
            }
        }
        Ok(Self { dimensions })
    }

    /// Derive bounds from the empirical range of sampled candidates.
    ///
    /// Each dimension spans `[min - margin * (max - min), max + margin * (max - min)]`
    /// of its samples, clipped to the dimension's floor/ceiling. Integer dimensions
    /// widen outward to integral bounds. When no samples exist the
    /// distribution's own range is used.
    pub fn from_samples(
        specs: &[DimensionSpec],
        samples: &[Hyperparameters],
        margin: f64,
    ) -> Result<Self> {
        if !(margin >= 0.0 && margin.is_finite()) {
            return Err(TuningError::InvalidConfig(format!(
                "margin must be a non-negative finite number, got {}",
                margin
            )));
        }

        let mut dimensions = Vec::with_capacity(specs.len());
        for spec in specs {
            let observed: Vec<f64> = samples.iter().filter_map(|s| s.get(&spec.name)).collect();
            let (min, max) = if observed.is_empty() {
                spec.distribution.range()
            } else {
                observed
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                        (lo.min(v), hi.max(v))
                    })
            };

            let spread = max - min;
            let pad = if spread > 0.0 {
                margin * spread
            } else {
                margin * max.abs().max(1.0)
            };

            let mut lo = min - pad;
            let mut hi = max + pad;

            match spec.kind {
                ParamKind::Continuous => {
                    if let Some(floor) = spec.floor {
                        lo = lo.max(floor);
                    }
                    if let Some(ceiling) = spec.ceiling {
                        hi = hi.min(ceiling);
                    }
                }
                ParamKind::Integer => {
                    lo = lo.floor();
                    hi = hi.ceil();
                    if let Some(floor) = spec.floor {
                        lo = lo.max(floor.ceil());
                    }
                    if let Some(ceiling) = spec.ceiling {
                        hi = hi.min(ceiling.floor());
                    }
                }
            }

            dimensions.push(Dimension {
                name: spec.name.clone(),
                kind: spec.kind,
                lo,
                hi,
            });
        }

        Self::new(dimensions)
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name.clone()).collect()
    }

    /// Whether every value lies within its dimension's inclusive bounds.
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.dimensions.len()
            && self
                .dimensions
                .iter()
                .zip(values)
                .all(|(d, &v)| d.contains(v))
    }

    /// Consistency check for a candidate about to be evaluated.
    pub fn check(&self, params: &Hyperparameters) -> Result<()> {
        for dim in &self.dimensions {
            let value = params.get(&dim.name).ok_or_else(|| {
                TuningError::InvalidData(format!("candidate is missing '{}'", dim.name))
            })?;
            if !dim.contains(value) {
                return Err(TuningError::OutOfBounds {
                    dimension: dim.name.clone(),
                    value,
                    lo: dim.lo,
                    hi: dim.hi,
                });
            }
        }
        Ok(())
    }

    /// Clamp each value into bounds without rounding.
    pub fn clamp(&self, values: &[f64]) -> Vec<f64> {
        self.dimensions
            .iter()
            .zip(values)
            .map(|(d, &v)| v.clamp(d.lo, d.hi))
            .collect()
    }

    /// Turn a raw point into a feasible named candidate.
    pub fn materialize(&self, values: &[f64]) -> Hyperparameters {
        self.dimensions
            .iter()
            .zip(values)
            .fold(Hyperparameters::new(), |p, (d, &v)| {
                p.with_param(&d.name, d.materialize(v))
            })
    }

    /// Map a point into the unit cube of this space.
    pub fn normalize(&self, values: &[f64]) -> Vec<f64> {
        self.dimensions
            .iter()
            .zip(values)
            .map(|(d, &v)| {
                let width = d.width();
                if width > 0.0 {
                    (v - d.lo) / width
                } else {
                    0.5
                }
            })
            .collect()
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, unit: &[f64]) -> Vec<f64> {
        self.dimensions
            .iter()
            .zip(unit)
            .map(|(d, &u)| d.lo + u * d.width())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(name: &str, values: &[f64]) -> Vec<Hyperparameters> {
        values
            .iter()
            .map(|&v| Hyperparameters::new().with_param(name, v))
            .collect()
    }

    #[test]
    fn test_bounds_expand_by_margin() {
        let specs = vec![DimensionSpec::continuous("cps", 0.001, 0.1)];
        let space =
            HyperparameterSpace::from_samples(&specs, &samples("cps", &[0.01, 0.05, 0.08]), 0.2)
                .unwrap();
        let dim = &space.dimensions()[0];
        assert!((dim.lo - (-0.004)).abs() < 1e-12);
        assert!((dim.hi - 0.094).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_clip_to_floor() {
        let specs = vec![DimensionSpec::continuous("cps", 0.001, 0.1).with_floor(0.0)];
        let space =
            HyperparameterSpace::from_samples(&specs, &samples("cps", &[0.01, 0.08]), 0.2).unwrap();
        let dim = &space.dimensions()[0];
        assert_eq!(dim.lo, 0.0);
        assert!((dim.hi - 0.094).abs() < 1e-12);
    }

    #[test]
    fn test_integer_bounds_widen_outward() {
        let specs = vec![DimensionSpec::integer("window", 2, 12).with_floor(1.0)];
        let space =
            HyperparameterSpace::from_samples(&specs, &samples("window", &[3.0, 8.0]), 0.2).unwrap();
        let dim = &space.dimensions()[0];
        assert_eq!(dim.lo, 2.0);
        assert_eq!(dim.hi, 9.0);
    }

    #[test]
    fn test_zero_spread_does_not_collapse() {
        let specs = vec![DimensionSpec::continuous("x", 0.0, 1.0)];
        let space =
            HyperparameterSpace::from_samples(&specs, &samples("x", &[0.5, 0.5]), 0.2).unwrap();
        let dim = &space.dimensions()[0];
        assert!(dim.lo < 0.5 && dim.hi > 0.5);
    }

    #[test]
    fn test_empty_samples_use_distribution_range() {
        let specs = vec![DimensionSpec::stratified("x", (0.001, 0.01), (0.1, 0.5), 0.5)];
        let space = HyperparameterSpace::from_samples(&specs, &[], 0.0).unwrap();
        let dim = &space.dimensions()[0];
        assert_eq!((dim.lo, dim.hi), (0.001, 0.5));
    }

    #[test]
    fn test_check_reports_out_of_bounds() {
        let space = HyperparameterSpace::new(vec![Dimension {
            name: "alpha".into(),
            kind: ParamKind::Continuous,
            lo: 0.0,
            hi: 1.0,
        }])
        .unwrap();
        let inside = Hyperparameters::new().with_param("alpha", 1.0);
        let outside = Hyperparameters::new().with_param("alpha", 1.01);
        assert!(space.check(&inside).is_ok());
        assert!(matches!(
            space.check(&outside),
            Err(TuningError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_materialize_rounds_integers_within_bounds() {
        let space = HyperparameterSpace::new(vec![
            Dimension {
                name: "window".into(),
                kind: ParamKind::Integer,
                lo: 1.5,
                hi: 6.2,
            },
            Dimension {
                name: "alpha".into(),
                kind: ParamKind::Continuous,
                lo: 0.0,
                hi: 1.0,
            },
        ])
        .unwrap();
        let params = space.materialize(&[1.6, 0.25]);
        assert_eq!(params.get("window"), Some(2.0));
        let params = space.materialize(&[6.4, 2.0]);
        assert_eq!(params.get("window"), Some(6.0));
        assert_eq!(params.get("alpha"), Some(1.0));
        assert!(space.check(&params).is_ok());
    }

    #[test]
    fn test_integer_dimension_without_integer_rejected() {
        let result = HyperparameterSpace::new(vec![Dimension {
            name: "k".into(),
            kind: ParamKind::Integer,
            lo: 2.2,
            hi: 2.8,
        }]);
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_roundtrip() {
        let space = HyperparameterSpace::new(vec![Dimension {
            name: "x".into(),
            kind: ParamKind::Continuous,
            lo: -2.0,
            hi: 2.0,
        }])
        .unwrap();
        assert_eq!(space.normalize(&[1.0]), vec![0.75]);
        assert_eq!(space.denormalize(&[0.75]), vec![1.0]);
    }

    #[test]
    fn test_spec_validation() {
        assert!(DimensionSpec::continuous("x", 1.0, 0.0).validate().is_err());
        assert!(DimensionSpec::stratified("x", (0.0, 1.0), (1.0, 2.0), 1.5)
            .validate()
            .is_err());
        assert!(DimensionSpec::continuous("", 0.0, 1.0).validate().is_err());
        assert!(DimensionSpec::integer("n", 1, 5).validate().is_ok());
    }

    #[test]
    fn test_floor_and_ceiling_must_meet_sampling_range() {
        let alpha = DimensionSpec::continuous("alpha", 0.1, 0.3);
        assert!(alpha.clone().with_floor(0.5).validate().is_err());
        assert!(alpha.clone().with_ceiling(0.05).validate().is_err());
        assert!(alpha.clone().with_floor(f64::NAN).validate().is_err());
        assert!(alpha.clone().with_floor(0.3).with_ceiling(0.1).validate().is_err());
        assert!(alpha.with_floor(0.2).with_ceiling(0.3).validate().is_ok());

        let beta = DimensionSpec::stratified("beta", (0.001, 0.05), (0.05, 0.5), 0.5);
        assert!(beta.clone().with_floor(0.4).validate().is_ok());
        assert!(beta.with_floor(0.6).validate().is_err());
    }
}
