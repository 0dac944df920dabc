//! Parameter Store
//!
//! Owns the [`ParameterSet`]. Mutation is copy-on-write over an `Arc`, so a
//! [`Snapshot`] taken for a request never observes a half-applied edit.

use std::sync::Arc;
use tracing::{debug, trace};

use super::{default_catalogue, DistributionKind, Field, ParamError, ParameterSet, RawValue, Section};

/// Result of a field edit addressed by key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Applied,
    /// Section or item key not found; nothing changed.
    Ignored,
}

/// One item as seen by the payload builder
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotItem {
    pub key: String,
    pub kind: DistributionKind,
    pub values: Vec<(Field, RawValue)>,
}

/// Immutable, ordered view over every item of every section
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub items: Vec<SnapshotItem>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SnapshotItem> {
        self.items.iter().find(|item| item.key == key)
    }
}

pub struct ParameterStore {
    sections: Arc<ParameterSet>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            sections: Arc::new(default_catalogue()),
        }
    }

    /// Start from an arbitrary set instead of the default catalogue
    pub fn with_sections(sections: ParameterSet) -> Self {
        Self {
            sections: Arc::new(sections),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key() == key)
    }

    pub fn item(&self, section_key: &str, item_key: &str) -> Option<&super::ParameterItem> {
        self.section(section_key)?.item(item_key)
    }

    /// Replace everything with the default catalogue
    pub fn reset(&mut self) {
        self.sections = Arc::new(default_catalogue());
        debug!("Parameter store reset to default catalogue");
    }

    /// Overwrite one field's raw value.
    ///
    /// Unknown section or item keys are ignored. Addressing a field the
    /// item's kind does not carry is a caller bug and is reported as
    /// [`ParamError::FieldNotInKind`] without touching the store.
    pub fn set_field(
        &mut self,
        section_key: &str,
        item_key: &str,
        field: Field,
        raw: impl Into<RawValue>,
    ) -> Result<SetOutcome, ParamError> {
        let kind = match self.item(section_key, item_key) {
            Some(item) => item.kind(),
            None => {
                trace!(section_key, item_key, "set_field addressed an unknown item");
                return Ok(SetOutcome::Ignored);
            }
        };

        if !kind.requires(field) {
            return Err(ParamError::FieldNotInKind {
                item: item_key.to_string(),
                kind,
                field,
            });
        }

        let sections = Arc::make_mut(&mut self.sections);
        let slot = sections
            .iter_mut()
            .find(|s| s.key() == section_key)
            .and_then(|s| s.item_mut(item_key))
            .and_then(|item| item.distribution_mut().get_mut(field));

        match slot {
            Some(slot) => {
                *slot = raw.into();
                Ok(SetOutcome::Applied)
            }
            None => Ok(SetOutcome::Ignored),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let items = self
            .sections
            .iter()
            .flat_map(|section| section.items())
            .map(|item| SnapshotItem {
                key: item.key().to_string(),
                kind: item.kind(),
                values: item
                    .distribution()
                    .entries()
                    .into_iter()
                    .map(|(field, raw)| (field, raw.clone()))
                    .collect(),
            })
            .collect();

        Snapshot { items }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
