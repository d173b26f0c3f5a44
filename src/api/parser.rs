// src/api/parser.rs
//! Response parsing using notion-client types.
//!
//! Success bodies are deserialized into notion-client objects and then
//! converted to the domain model; error bodies become typed errors.

use super::client::ApiResponse;
use super::responses::{NotionError, QueryDatabaseResponse, RetrieveBlockChildrenResponse};
use super::types::PaginatedResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionClientError, NotionErrorCode};
use crate::model::{Block, Page};
use reqwest::StatusCode;

/// Parse any Notion API response using notion-client types
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        parse_error(&result.data, result.status, &result.url)
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);

        let preview = if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
            let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
            format!("{}...", head)
        } else {
            body.to_string()
        };

        NotionClientError::Deserialization {
            source: e,
            body: preview,
        }
        .into()
    })
}

fn parse_error<T>(body: &str, status: StatusCode, url: &str) -> Result<T, AppError> {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        return Err(NotionClientError::NotionApi {
            status: notion_error.status,
            code: notion_error.code,
            message: notion_error.message,
            request_id: notion_error.request_id,
        }
        .into());
    }

    Err(AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}", status, url),
        status,
    })
}

/// Parses one page of a database query.
pub fn parse_pages_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Page>, AppError> {
    let response: QueryDatabaseResponse = parse_api_response(result)?;
    response.into_domain()
}

/// Parses one page of a block-children listing.
pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let response: RetrieveBlockChildrenResponse = parse_api_response(result)?;
    response.into_domain()
}
