// src/api/responses.rs
//! API response types backed by the notion-client serde definitions.

use serde::Deserialize;

pub use notion_client::objects::{
    block::Block as NotionBlock, error::Error as NotionError, page::Page as NotionPage,
};

/// Paginated listing as Notion sends it
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Database query response using notion-client types
pub type QueryDatabaseResponse = ListResponse<NotionPage>;

/// Block children response using notion-client types
pub type RetrieveBlockChildrenResponse = ListResponse<NotionBlock>;

/// Trait for converting notion-client types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, crate::error::AppError>;
}

impl ToDomain<crate::model::Page> for NotionPage {
    fn to_domain(self) -> Result<crate::model::Page, crate::error::AppError> {
        super::notion_client_adapter::convert_page(self)
    }
}

impl ToDomain<crate::model::Block> for NotionBlock {
    fn to_domain(self) -> Result<crate::model::Block, crate::error::AppError> {
        super::notion_client_adapter::convert_block(self)
    }
}

impl<T> ListResponse<T> {
    /// Converts every result to its domain type, keeping the cursor metadata.
    pub fn into_domain<U>(self) -> Result<super::types::PaginatedResponse<U>, crate::error::AppError>
    where
        T: ToDomain<U>,
    {
        Ok(super::types::PaginatedResponse {
            object: self.object,
            results: self
                .results
                .into_iter()
                .map(ToDomain::to_domain)
                .collect::<Result<Vec<_>, _>>()?,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        })
    }
}
