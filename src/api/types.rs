// src/api/types.rs
//! Type definitions for the Notion API module.

use crate::constants::NOTION_MAX_FETCH_DEPTH;
use crate::types::BlockId;
use std::collections::HashSet;

// --- Fetch Context Types ---

/// Context for recursive block-tree fetching.
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// Blocks already expanded, so synced or cyclic references are fetched once
    visited: HashSet<BlockId>,
    /// Remaining recursion depth
    pub depth_remaining: u8,
}

impl FetchContext {
    /// Creates a new fetch context with the given depth limit.
    pub fn new(max_depth: u8) -> Self {
        let safe_depth = max_depth.min(NOTION_MAX_FETCH_DEPTH);
        if max_depth > safe_depth {
            log::warn!(
                "Requested recursion depth {} exceeds maximum safe depth {}. Clamping to safe value.",
                max_depth,
                safe_depth
            );
        }

        Self {
            visited: HashSet::new(),
            depth_remaining: safe_depth,
        }
    }

    /// Marks a block as visited.
    pub fn visit(&mut self, id: &BlockId) {
        self.visited.insert(id.clone());
    }

    /// Returns a context one level deeper, sharing what has been visited so far.
    pub fn descend(&self) -> Self {
        Self {
            visited: self.visited.clone(),
            depth_remaining: self.depth_remaining.saturating_sub(1),
        }
    }

    /// Checks if the children of `id` should be fetched.
    pub fn should_fetch(&self, id: &BlockId) -> bool {
        !self.visited.contains(id) && self.depth_remaining > 0
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new(NOTION_MAX_FETCH_DEPTH)
    }
}

// --- API Response Types ---

/// One page of a paginated Notion listing, converted to domain types.
#[derive(Debug, Clone)]
pub struct PaginatedResponse<T> {
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

// --- Pagination Types ---

/// Result of a pagination operation.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub total_fetched: usize,
    pub pages_fetched: u32,
}
