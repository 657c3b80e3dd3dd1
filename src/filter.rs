use crate::catalog::{Catalog, ToolRecord};
use rapidfuzz::fuzz;
use std::collections::BTreeSet;

/// Sentinel tag meaning "no tag filter".
pub const ALL_TAG: &str = "all";

const SUGGESTION_THRESHOLD: f64 = 0.6;

/// UI state for one catalog widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    pub active_tag: String,
    pub search_query: String,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            active_tag: ALL_TAG.to_string(),
            search_query: String::new(),
        }
    }
}

impl CatalogState {
    pub fn new(active_tag: impl Into<String>, search_query: impl Into<String>) -> Self {
        Self {
            active_tag: active_tag.into(),
            search_query: search_query.into(),
        }
    }

    pub fn matches(&self, record: &ToolRecord) -> bool {
        self.tag_matches(record) && self.search_matches(record)
    }

    fn tag_matches(&self, record: &ToolRecord) -> bool {
        self.active_tag == ALL_TAG || record.has_tag(&self.active_tag)
    }

    fn search_matches(&self, record: &ToolRecord) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let needle = self.search_query.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
        contains(&record.name)
            || contains(&record.tagline)
            || contains(&record.description)
            || record.tags.iter().any(|tag| contains(tag))
    }
}

/// Records visible under `state`, in catalog order.
pub fn compute_visible<'a>(state: &CatalogState, catalog: &'a Catalog) -> Vec<&'a ToolRecord> {
    catalog.iter().filter(|record| state.matches(record)).collect()
}

/// Sorted unique tags offered as filter buttons, `"all"` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIndex {
    tags: Vec<String>,
}

impl TagIndex {
    pub fn build<S: AsRef<str>>(catalog: &Catalog, excluded: &[S]) -> Self {
        let unique: BTreeSet<&str> = catalog
            .iter()
            .flat_map(|record| record.tags.iter())
            .map(String::as_str)
            .filter(|tag| !excluded.iter().any(|ex| ex.as_ref() == *tag))
            .collect();
        let mut tags = Vec::with_capacity(unique.len() + 1);
        tags.push(ALL_TAG.to_string());
        tags.extend(unique.into_iter().map(str::to_string));
        Self { tags }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Closest known tag for a mistyped one, if any is similar enough.
    pub fn suggest(&self, tag: &str) -> Option<&str> {
        let query = tag.to_lowercase();
        self.tags
            .iter()
            .skip(1)
            .map(|candidate| {
                let score = fuzz::ratio(query.chars(), candidate.to_lowercase().chars());
                (candidate.as_str(), score)
            })
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate)
    }
}

impl<'a> IntoIterator for &'a TagIndex {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
