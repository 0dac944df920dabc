//! Request Payload Builder
//!
//! Flattens a store [`Snapshot`] into the `POST /dcf` body.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::params::{DistributionKind, Field, RawValue, Snapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationRequest {
    pub input_list: Vec<InputEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputEntry {
    pub id: String,
    pub distribution: DistributionKind,
    pub values: FieldValues,
}

/// Field name → number or `null`, serialised in schema order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldValues(pub Vec<(Field, Option<f64>)>);

impl FieldValues {
    pub fn get(&self, field: Field) -> Option<Option<f64>> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, v)| *v)
    }
}

impl Serialize for FieldValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, value) in &self.0 {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}

/// Numeric reading of a raw field, or `None` when it is empty or not a
/// finite decimal number.
pub fn normalize(raw: &RawValue) -> Option<f64> {
    let value = match raw {
        RawValue::Empty => return None,
        RawValue::Number(n) => *n,
        RawValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            text.parse::<f64>().ok()?
        }
    };
    value.is_finite().then_some(value)
}

pub fn build(snapshot: &Snapshot) -> ValuationRequest {
    let input_list = snapshot
        .items
        .iter()
        .map(|item| InputEntry {
            id: item.key.clone(),
            distribution: item.kind,
            values: FieldValues(
                item.values
                    .iter()
                    .map(|(field, raw)| (*field, normalize(raw)))
                    .collect(),
            ),
        })
        .collect();

    ValuationRequest { input_list }
}
