// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Bounded per-query result store with insertion-order eviction.
//!
//! The limit counts result records, not queries. Every lookup outcome passes
//! through the cache, including local matches with a limit of zero, because
//! rendering always reads the results for the live query back out of it.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::query::Query;
use crate::suggestion::Suggestion;

#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    entries: HashMap<Query, Vec<Suggestion>>,
    order: VecDeque<Query>,
    size: usize,
    limit: usize,
}

impl ResultCache {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            size: 0,
            limit,
        }
    }

    pub fn get(&self, query: &str) -> Option<&[Suggestion]> {
        self.entries.get(query).map(Vec::as_slice)
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    /// Store `results` for `query` and evict older entries until the aggregate
    /// result count fits the limit.
    ///
    /// The entry being stored is never evicted by its own `put`: a single list
    /// larger than the limit stays until the next store pushes it out.
    pub fn put(&mut self, query: Query, results: Vec<Suggestion>) {
        if let Some(previous) = self.entries.remove(&query) {
            self.size -= previous.len();
            self.order.retain(|key| key != &query);
        }

        self.size += results.len();
        while self.size > self.limit {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if let Some(evicted) = self.entries.remove(&oldest) {
                self.size -= evicted.len();
                debug!(query = %oldest, results = evicted.len(), "evicted cached results");
            }
        }

        self.order.push_back(query.clone());
        self.entries.insert(query, results);
    }

    /// Aggregate number of cached result records.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of cached queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached queries from oldest to newest.
    pub fn queries(&self) -> impl Iterator<Item = &Query> {
        self.order.iter()
    }
}
