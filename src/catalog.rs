//! In-memory catalog index.
//!
//! Loaded once at startup and never mutated afterwards, so it is shared
//! behind an `Arc` without any locking.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::CatalogError;
use crate::random::RandomSource;
use crate::types::{CatalogEntry, EntryId, EntrySummary};

#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<EntryId, usize>,
}

impl Catalog {
    /// Read and decode a JSON array of entries from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), entries = catalog.size(), "Catalog loaded");
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(raw)?;
        Ok(Self::from_entries(entries))
    }

    /// Build the index. Later entries reusing an id are dropped.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut by_id = HashMap::with_capacity(entries.len());

        for entry in entries {
            if by_id.contains_key(&entry.id) {
                tracing::warn!(id = entry.id, name = %entry.name, "Duplicate catalog id, skipping");
                continue;
            }
            by_id.insert(entry.id, kept.len());
            kept.push(entry);
        }

        Self {
            entries: kept,
            by_id,
        }
    }

    pub fn by_id(&self, id: EntryId) -> Option<&CatalogEntry> {
        self.by_id.get(&id).map(|&pos| &self.entries[pos])
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Pick one entry uniformly at random
    pub fn random_entry(&self, rng: &dyn RandomSource) -> Option<&CatalogEntry> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.get(rng.index(self.entries.len()))
    }

    /// Case-insensitive substring search over names, in catalog order.
    /// An empty query returns the first `limit` names.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim().to_lowercase();

        self.entries
            .iter()
            .map(|e| e.name.trim())
            .filter(|name| !name.is_empty())
            .filter(|name| query.is_empty() || name.to_lowercase().contains(&query))
            .take(limit)
            .map(str::to_string)
            .collect()
    }

    /// Shuffled sample of named entries for front-end animations
    pub fn ticker(&self, rng: &dyn RandomSource, limit: usize) -> Vec<EntrySummary> {
        let mut positions: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.name.trim().is_empty())
            .map(|(pos, _)| pos)
            .collect();
        rng.shuffle(&mut positions);

        positions
            .into_iter()
            .take(limit)
            .map(|pos| EntrySummary::from(&self.entries[pos]))
            .collect()
    }

    pub fn group_by_year(&self) -> BTreeMap<i64, Vec<EntrySummary>> {
        let mut out: BTreeMap<i64, Vec<EntrySummary>> = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| e.year > 0) {
            out.entry(entry.year).or_default().push(entry.into());
        }
        out
    }

    pub fn group_by_platform(&self) -> BTreeMap<String, Vec<EntrySummary>> {
        self.group_by_labels(|e| e.platforms.iter().map(String::as_str).collect())
    }

    /// Primary genre and sub-genres both count
    pub fn group_by_genre(&self) -> BTreeMap<String, Vec<EntrySummary>> {
        self.group_by_labels(|e| {
            std::iter::once(e.primary_genre.as_str())
                .chain(e.sub_genres.iter().map(String::as_str))
                .collect()
        })
    }

    fn group_by_labels<'a>(
        &'a self,
        labels: impl Fn(&'a CatalogEntry) -> Vec<&'a str>,
    ) -> BTreeMap<String, Vec<EntrySummary>> {
        let mut out: BTreeMap<String, Vec<EntrySummary>> = BTreeMap::new();
        for entry in &self.entries {
            let mut seen: Vec<&str> = Vec::new();
            for label in labels(entry) {
                let label = label.trim();
                if label.is_empty() || seen.contains(&label) {
                    continue;
                }
                seen.push(label);
                out.entry(label.to_string()).or_default().push(entry.into());
            }
        }
        out
    }
}
