// src/api/mod.rs
//! Notion API interaction: reading rows and their content
//! from a database.
//!
//! I/O, parsing and conversion to the domain model are kept separate.

mod client;
mod notion_client_adapter;
mod pagination;
pub mod parser;
pub mod responses;
mod types;

use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{BlockId, DatabaseId};

/// The ability to retrieve content from a Notion workspace.
///
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Every row of a database, across all result pages.
    async fn query_database(&self, database: &DatabaseId) -> Result<Vec<Page>, AppError>;

    /// The direct children of a block or page, across all result pages.
    async fn retrieve_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError>;
}

pub use client::{extract_response_text, ApiResponse, NotionHttpClient};
pub use pagination::fetch_all_pages;
pub use types::{FetchContext, PaginatedResponse, PaginationResult};
