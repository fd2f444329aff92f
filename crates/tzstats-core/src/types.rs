//! Shared types used across tzstats-exporter crates.

use std::collections::HashMap;

use serde_json::Value;

/// Prefix applied to every metric name on the wire.
pub const METRIC_PREFIX: &str = "tzstats_";

/// Numeric fields returned by one upstream call.
///
/// Built fresh for every collection pass and dropped at its end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    fields: HashMap<String, f64>,
}

/// Per-account fields (balances, deposits, baking statistics, ...).
pub type AccountSnapshot = Snapshot;

/// Chain head fields (height, cycle, ...).
pub type TipSnapshot = Snapshot;

impl Snapshot {
    /// Keep the numeric members of a JSON object.
    ///
    /// Strings, booleans, nulls and nested values are dropped. Returns `None`
    /// if `value` is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let fields = object
            .iter()
            .filter_map(|(k, v)| v.as_f64().map(|n| (k.clone(), n)))
            .collect();
        Some(Self { fields })
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
