//! Backend-specific payloads carried alongside the canonical model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single raw attribute as reported by a resource manager: either plain
/// text or a group of sub-attributes (e.g. `resources_used.walltime`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Group(BTreeMap<String, String>),
}

/// Raw job attributes, passed through untouched for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), AttrValue::Text(value.into()));
    }

    /// Insert `value` as `group.name`. A text attribute already stored under
    /// `group` is replaced by the group.
    pub fn insert_grouped(
        &mut self,
        group: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        let entry = self
            .0
            .entry(group.into())
            .or_insert_with(|| AttrValue::Group(BTreeMap::new()));
        if let AttrValue::Text(_) = *entry {
            *entry = AttrValue::Group(BTreeMap::new());
        }
        if let AttrValue::Group(map) = entry {
            map.insert(name.into(), value.into());
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// Text value of a top-level attribute.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name)? {
            AttrValue::Text(value) => Some(value),
            AttrValue::Group(_) => None,
        }
    }

    /// Value of `name` inside the group `group`.
    pub fn grouped(&self, group: &str, name: &str) -> Option<&str> {
        match self.0.get(group)? {
            AttrValue::Group(map) => map.get(name).map(String::as_str),
            AttrValue::Text(_) => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.0.iter()
    }

    /// Keep only the named top-level attributes.
    pub fn retain_names(&mut self, names: &[&str]) {
        self.0.retain(|key, _| names.contains(&key.as_str()));
    }
}

impl FromIterator<(String, AttrValue)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, AttrValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Backend-specific submission overrides. Each map is merged on top of the
/// parameters an adapter computes from the script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeSpec {
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub resources: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub envvars: Option<BTreeMap<String, String>>,
}
