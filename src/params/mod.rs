//! Parameter Module
//!
//! Schema-driven model of the valuation inputs: sections of parameter
//! items, each carrying a typed distribution.

mod catalogue;
mod schema;
mod store;

pub use catalogue::default_catalogue;
pub use schema::{Distribution, DistributionKind, Field, RawValue};
pub use store::{ParameterStore, SetOutcome, Snapshot, SnapshotItem};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("unknown field name `{0}`")]
    UnknownField(String),
    #[error("field `{field}` is not defined for {kind} item `{item}`")]
    FieldNotInKind {
        item: String,
        kind: DistributionKind,
        field: Field,
    },
}

/// One configurable input of the valuation
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterItem {
    key: String,
    label: String,
    distribution: Distribution,
}

impl ParameterItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>, distribution: Distribution) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            distribution,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Kind is fixed at construction; only field values change.
    pub fn kind(&self) -> DistributionKind {
        self.distribution.kind()
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub(crate) fn distribution_mut(&mut self) -> &mut Distribution {
        &mut self.distribution
    }
}

/// A titled, ordered group of parameter items
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    key: String,
    title: String,
    items: Vec<ParameterItem>,
}

impl Section {
    pub fn new(key: impl Into<String>, title: impl Into<String>, items: Vec<ParameterItem>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            items,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[ParameterItem] {
        &self.items
    }

    pub fn item(&self, key: &str) -> Option<&ParameterItem> {
        self.items.iter().find(|item| item.key == key)
    }

    pub(crate) fn item_mut(&mut self, key: &str) -> Option<&mut ParameterItem> {
        self.items.iter_mut().find(|item| item.key == key)
    }
}

/// Every section, in rendering order
pub type ParameterSet = Vec<Section>;
