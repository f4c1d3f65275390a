//! Term dictionary applied to source text before it reaches the model

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Source term → target term substitutions.
///
/// Terms are kept sorted longest first (by character count, ties by key), so
/// a short key never mangles a longer key's occurrence and the result does not
/// depend on the order the file listed them in.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    terms: Vec<(String, String)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a flat JSON object of `"source": "target"` pairs.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let map: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|source| Error::FileParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_pairs(map))
    }

    /// Builds a dictionary from pairs; a repeated key keeps its last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut unique = BTreeMap::new();
        for (source, target) in pairs {
            if source.is_empty() {
                tracing::warn!("Ignoring empty dictionary key (mapped to {:?})", target);
                continue;
            }
            unique.insert(source, target);
        }

        // Stable sort over key-ordered entries keeps ties in key order.
        let mut terms: Vec<(String, String)> = unique.into_iter().collect();
        terms.sort_by_cached_key(|(source, _)| Reverse(source.chars().count()));
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (source, target) in &self.terms {
            if result.contains(source.as_str()) {
                result = result.replace(source.as_str(), target);
            }
        }
        result
    }
}
