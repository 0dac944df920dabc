//! Distribution Schema
//!
//! The closed set of distribution shapes a parameter can take and the
//! named numeric fields each shape requires.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParamError;

/// Statistical shape of one input parameter.
///
/// On the wire the skew-normal kind is `skew-normal` and the constant field
/// is `value`; the valuation service must accept these names (older
/// backends spell them `skewnorm` and `constant`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistributionKind {
    Constant,
    Normal,
    Uniform,
    Triangular,
    #[serde(alias = "skewnorm")]
    SkewNormal,
}

impl DistributionKind {
    pub const ALL: [DistributionKind; 5] = [
        DistributionKind::Constant,
        DistributionKind::Normal,
        DistributionKind::Uniform,
        DistributionKind::Triangular,
        DistributionKind::SkewNormal,
    ];

    /// Required fields, in rendering order
    pub fn fields(&self) -> &'static [Field] {
        match self {
            DistributionKind::Constant => &[Field::Value],
            DistributionKind::Normal => &[Field::Mean, Field::Std],
            DistributionKind::Uniform => &[Field::Low, Field::High],
            DistributionKind::Triangular => &[Field::Min, Field::Mode, Field::Max],
            DistributionKind::SkewNormal => &[Field::Skewness, Field::Loc, Field::Scale],
        }
    }

    pub fn requires(&self, field: Field) -> bool {
        self.fields().contains(&field)
    }

    /// Seed used when a fresh item of this kind is created.
    ///
    /// Returns `None` for a field the kind does not carry.
    pub fn seed(&self, field: Field) -> Option<f64> {
        let value = match (self, field) {
            (DistributionKind::Constant, Field::Value) => 0.0,
            (DistributionKind::Normal, Field::Mean) => 0.0,
            (DistributionKind::Normal, Field::Std) => 1.0,
            (DistributionKind::Uniform, Field::Low) => 0.0,
            (DistributionKind::Uniform, Field::High) => 1.0,
            (DistributionKind::Triangular, Field::Min) => 0.0,
            (DistributionKind::Triangular, Field::Mode) => 0.5,
            (DistributionKind::Triangular, Field::Max) => 1.0,
            (DistributionKind::SkewNormal, Field::Skewness) => 0.0,
            (DistributionKind::SkewNormal, Field::Loc) => 0.0,
            (DistributionKind::SkewNormal, Field::Scale) => 1.0,
            _ => return None,
        };
        Some(value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionKind::Constant => "constant",
            DistributionKind::Normal => "normal",
            DistributionKind::Uniform => "uniform",
            DistributionKind::Triangular => "triangular",
            DistributionKind::SkewNormal => "skew-normal",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every numeric field name any distribution can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Value,
    Mean,
    Std,
    Low,
    High,
    Min,
    Mode,
    Max,
    Skewness,
    Loc,
    Scale,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Value => "value",
            Field::Mean => "mean",
            Field::Std => "std",
            Field::Low => "low",
            Field::High => "high",
            Field::Min => "min",
            Field::Mode => "mode",
            Field::Max => "max",
            Field::Skewness => "skewness",
            Field::Loc => "loc",
            Field::Scale => "scale",
        }
    }

    /// Input placeholder shown next to the field
    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Value => "Value",
            Field::Mean => "Mean",
            Field::Std => "Std",
            Field::Low => "Low",
            Field::High => "High",
            Field::Min => "Min",
            Field::Mode => "Mode",
            Field::Max => "Max",
            Field::Skewness => "Skewness",
            Field::Loc => "Loc",
            Field::Scale => "Scale",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "value" => Field::Value,
            "mean" => Field::Mean,
            "std" => Field::Std,
            "low" => Field::Low,
            "high" => Field::High,
            "min" => Field::Min,
            "mode" => Field::Mode,
            "max" => Field::Max,
            "skewness" => Field::Skewness,
            "loc" => Field::Loc,
            "scale" => Field::Scale,
            other => return Err(ParamError::UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

/// The user's literal input for one field.
///
/// Kept unvalidated; normalisation to a number happens only when a
/// request payload is built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl RawValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty) || matches!(self, RawValue::Text(s) if s.is_empty())
    }

    /// Text as it would appear in an input box
    pub fn display(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
            RawValue::Empty => String::new(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(value.to_string())
        }
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(value)
        }
    }
}

/// A distribution together with its raw field values.
///
/// One variant per kind, so an item can never carry a field its kind
/// does not mandate, nor miss one it does.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Constant { value: RawValue },
    Normal { mean: RawValue, std: RawValue },
    Uniform { low: RawValue, high: RawValue },
    Triangular { min: RawValue, mode: RawValue, max: RawValue },
    SkewNormal { skewness: RawValue, loc: RawValue, scale: RawValue },
}

impl Distribution {
    pub fn constant(value: f64) -> Self {
        Distribution::Constant { value: value.into() }
    }

    pub fn normal(mean: f64, std: f64) -> Self {
        Distribution::Normal { mean: mean.into(), std: std.into() }
    }

    pub fn uniform(low: f64, high: f64) -> Self {
        Distribution::Uniform { low: low.into(), high: high.into() }
    }

    pub fn triangular(min: f64, mode: f64, max: f64) -> Self {
        Distribution::Triangular { min: min.into(), mode: mode.into(), max: max.into() }
    }

    pub fn skew_normal(skewness: f64, loc: f64, scale: f64) -> Self {
        Distribution::SkewNormal {
            skewness: skewness.into(),
            loc: loc.into(),
            scale: scale.into(),
        }
    }

    /// Fresh distribution of `kind` populated from the schema seeds
    pub fn seeded(kind: DistributionKind) -> Self {
        let seed = |field| RawValue::Number(kind.seed(field).unwrap_or_default());
        match kind {
            DistributionKind::Constant => Distribution::Constant { value: seed(Field::Value) },
            DistributionKind::Normal => Distribution::Normal {
                mean: seed(Field::Mean),
                std: seed(Field::Std),
            },
            DistributionKind::Uniform => Distribution::Uniform {
                low: seed(Field::Low),
                high: seed(Field::High),
            },
            DistributionKind::Triangular => Distribution::Triangular {
                min: seed(Field::Min),
                mode: seed(Field::Mode),
                max: seed(Field::Max),
            },
            DistributionKind::SkewNormal => Distribution::SkewNormal {
                skewness: seed(Field::Skewness),
                loc: seed(Field::Loc),
                scale: seed(Field::Scale),
            },
        }
    }

    pub fn kind(&self) -> DistributionKind {
        match self {
            Distribution::Constant { .. } => DistributionKind::Constant,
            Distribution::Normal { .. } => DistributionKind::Normal,
            Distribution::Uniform { .. } => DistributionKind::Uniform,
            Distribution::Triangular { .. } => DistributionKind::Triangular,
            Distribution::SkewNormal { .. } => DistributionKind::SkewNormal,
        }
    }

    pub fn get(&self, field: Field) -> Option<&RawValue> {
        match (self, field) {
            (Distribution::Constant { value }, Field::Value) => Some(value),
            (Distribution::Normal { mean, .. }, Field::Mean) => Some(mean),
            (Distribution::Normal { std, .. }, Field::Std) => Some(std),
            (Distribution::Uniform { low, .. }, Field::Low) => Some(low),
            (Distribution::Uniform { high, .. }, Field::High) => Some(high),
            (Distribution::Triangular { min, .. }, Field::Min) => Some(min),
            (Distribution::Triangular { mode, .. }, Field::Mode) => Some(mode),
            (Distribution::Triangular { max, .. }, Field::Max) => Some(max),
            (Distribution::SkewNormal { skewness, .. }, Field::Skewness) => Some(skewness),
            (Distribution::SkewNormal { loc, .. }, Field::Loc) => Some(loc),
            (Distribution::SkewNormal { scale, .. }, Field::Scale) => Some(scale),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> Option<&mut RawValue> {
        match (self, field) {
            (Distribution::Constant { value }, Field::Value) => Some(value),
            (Distribution::Normal { mean, .. }, Field::Mean) => Some(mean),
            (Distribution::Normal { std, .. }, Field::Std) => Some(std),
            (Distribution::Uniform { low, .. }, Field::Low) => Some(low),
            (Distribution::Uniform { high, .. }, Field::High) => Some(high),
            (Distribution::Triangular { min, .. }, Field::Min) => Some(min),
            (Distribution::Triangular { mode, .. }, Field::Mode) => Some(mode),
            (Distribution::Triangular { max, .. }, Field::Max) => Some(max),
            (Distribution::SkewNormal { skewness, .. }, Field::Skewness) => Some(skewness),
            (Distribution::SkewNormal { loc, .. }, Field::Loc) => Some(loc),
            (Distribution::SkewNormal { scale, .. }, Field::Scale) => Some(scale),
            _ => None,
        }
    }

    /// (field, raw value) pairs in schema order
    pub fn entries(&self) -> Vec<(Field, &RawValue)> {
        self.kind()
            .fields()
            .iter()
            .filter_map(|&field| self.get(field).map(|raw| (field, raw)))
            .collect()
    }
}
