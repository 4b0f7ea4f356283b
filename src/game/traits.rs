//! Cosmetic trait lookup
//!
//! Maps a client-supplied token id to a background color used as the
//! player's cosmetic tag. Injected into the world so tests can supply
//! synthetic tables instead of the on-disk collection file.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::constants::DEFAULT_COLOR;

#[derive(Debug, Deserialize)]
struct TraitRecord {
    #[serde(default)]
    attributes: Vec<TraitAttribute>,
}

#[derive(Debug, Deserialize)]
struct TraitAttribute {
    trait_type: String,
    value: String,
}

/// Read-only token id -> background color table
#[derive(Debug, Default)]
pub struct TraitTable {
    colors: HashMap<String, String>,
}

impl TraitTable {
    /// Load from a JSON collection file of
    /// `{ "<token_id>": { "attributes": [{ "trait_type", "value" }, ...] } }`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let records: HashMap<String, TraitRecord> = serde_json::from_str(&raw)?;

        let colors = records
            .into_iter()
            .filter_map(|(token_id, record)| {
                record
                    .attributes
                    .into_iter()
                    .find(|a| a.trait_type == "background")
                    .map(|a| (token_id, a.value))
            })
            .collect();

        Ok(Self { colors })
    }

    /// Build from explicit entries (tests)
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            colors: entries.into_iter().collect(),
        }
    }

    /// Background color for a token id, falling back to the default tag.
    /// Missing token or unknown id is not an error.
    pub fn background_color(&self, token_id: Option<&str>) -> String {
        token_id
            .and_then(|id| self.colors.get(id))
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string())
    }
}
