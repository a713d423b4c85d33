//! Storage formats and the per-array format table.
//!
//! Only dimension 0 is consulted by lowering: statements carry a single free
//! index. The table still stores one tag per dimension so that it can be shared
//! with a multi-dimensional frontend unchanged.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{LowerError, LowerResult};

/// Storage format of one array dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Every coordinate is stored; addressable by coordinate
    Dense,
    /// Only non-zero coordinates are stored; walked with a position cursor
    Compressed,
}

impl Format {
    pub fn is_compressed(self) -> bool {
        matches!(self, Format::Compressed)
    }

    pub fn is_dense(self) -> bool {
        matches!(self, Format::Dense)
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dense" | "d" => Ok(Format::Dense),
            "compressed" | "c" | "sparse" => Ok(Format::Compressed),
            other => Err(format!("unknown format '{}' (expected dense or compressed)", other)),
        }
    }
}

/// Mapping from array name to the formats of its dimensions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatMap {
    formats: HashMap<String, Vec<Format>>,
}

impl FormatMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, dims: impl IntoIterator<Item = Format>) -> Self {
        self.insert(name, dims);
        self
    }

    /// Set the formats of an array, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, dims: impl IntoIterator<Item = Format>) {
        self.formats.insert(name.into(), dims.into_iter().collect());
    }

    /// All dimension formats recorded for an array.
    pub fn get(&self, name: &str) -> Option<&[Format]> {
        self.formats.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Format])> {
        self.formats.iter().map(|(n, d)| (n.as_str(), d.as_slice()))
    }

    /// Take every entry of `other`, replacing entries with the same name.
    pub fn merge(&mut self, other: FormatMap) {
        self.formats.extend(other.formats);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Format of the dimension indexed by the free index.
    pub fn level_format(&self, name: &str) -> LowerResult<Format> {
        let dims = self
            .formats
            .get(name)
            .ok_or_else(|| LowerError::UnknownArray(name.to_string()))?;
        dims.first()
            .copied()
            .ok_or_else(|| LowerError::NoDimensions(name.to_string()))
    }

    /// Parse a table such as `{"A": ["compressed"], "B": ["dense"]}`.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn from_json_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn to_json_string(&self) -> String {
        // A map of strings to unit enums always serializes
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl<S: Into<String>> FromIterator<(S, Format)> for FormatMap {
    fn from_iter<I: IntoIterator<Item = (S, Format)>>(iter: I) -> Self {
        let mut map = FormatMap::new();
        for (name, format) in iter {
            map.insert(name, [format]);
        }
        map
    }
}
