//! Server-side filters for `GET /networks`.

use std::collections::BTreeMap;

use dockhand_common::{DockhandError, DockhandResult};
use serde::{Deserialize, Serialize};

/// Filter key to accepted values, encoded as `{"key":{"value":true}}`.
///
/// Keys and values are kept sorted so the encoded query is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkFilters(BTreeMap<String, BTreeMap<String, bool>>);

impl NetworkFilters {
    /// An empty filter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `value` for `key`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Accept `value` for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0
            .entry(key.into())
            .or_default()
            .insert(value.into(), true);
    }

    /// Parse a `key=value` expression (as given to `--filter`) and add it.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::Config`] if the expression has no `=` or an
    /// empty key.
    pub fn insert_expression(&mut self, expr: &str) -> DockhandResult<()> {
        match expr.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                self.insert(key.trim(), value.trim());
                Ok(())
            }
            _ => Err(DockhandError::Config {
                message: format!("invalid filter '{expr}', expected key=value"),
            }),
        }
    }

    /// Returns true if no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Accepted values for `key`.
    pub fn values(&self, key: &str) -> impl Iterator<Item = &str> {
        self.0
            .get(key)
            .into_iter()
            .flat_map(|values| values.keys().map(String::as_str))
    }

    /// JSON encoding used for the `filters` query parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DockhandResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NetworkFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Self::new();
        for (key, value) in iter {
            filters.insert(key, value);
        }
        filters
    }
}
