//! Tag-invalidated response cache

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::endpoints::Tag;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    tags: Vec<Tag>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Bumped on every invalidation of the tag
    generations: HashMap<Tag, u64>,
}

impl CacheState {
    fn generation(&self, tags: &[Tag]) -> Generation {
        Generation(
            tags.iter()
                .map(|tag| self.generations.get(tag).copied().unwrap_or(0))
                .collect(),
        )
    }
}

/// Snapshot of the invalidation counters for a set of tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation(Vec<u64>);

/// Cached query results keyed by endpoint and arguments
#[derive(Debug, Default)]
pub struct TagCache {
    state: Mutex<CacheState>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.state().entries.get(key).map(|entry| entry.value.clone())
    }

    /// Current invalidation counters for `tags`; take this before fetching
    pub fn generation(&self, tags: &[Tag]) -> Generation {
        self.state().generation(tags)
    }

    /// Store `value` unless one of `tags` was invalidated since `generation`
    /// was taken. Returns whether the entry was stored.
    pub fn insert(
        &self,
        key: String,
        tags: &[Tag],
        value: Value,
        generation: &Generation,
    ) -> bool {
        let mut state = self.state();
        if state.generation(tags) != *generation {
            return false;
        }
        state.entries.insert(
            key,
            CacheEntry {
                value,
                tags: tags.to_vec(),
            },
        );
        true
    }

    /// Drop every entry carrying any of `tags`; returns how many were dropped
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        let mut state = self.state();
        for tag in tags {
            *state.generations.entry(*tag).or_insert(0) += 1;
        }
        let before = state.entries.len();
        state
            .entries
            .retain(|_, entry| !entry.tags.iter().any(|tag| tags.contains(tag)));
        before - state.entries.len()
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
