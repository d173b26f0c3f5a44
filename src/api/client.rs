// src/api/client.rs
//! Thin HTTP client wrapper for the Notion API.
//!
//! Handles authentication and request plumbing; parsing lives in
//! [`super::parser`].

use super::pagination::fetch_all_pages;
use super::parser::{parse_blocks_pagination, parse_pages_pagination};
use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{BlockId, DatabaseId, NotionToken};
use reqwest::{header, Client, Response};
use serde::Serialize;

const NOTION_VERSION: &str = "2022-06-28";
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(token: NotionToken) -> Result<Self, AppError> {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Same as [`NotionHttpClient::new`], against another API root
    /// (for example a local stand-in server).
    pub fn with_base_url(token: NotionToken, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(&token)?)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn create_headers(token: &NotionToken) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|e| AppError::InternalError {
                message: "Notion token is not a valid header value".to_string(),
                source: Some(Box::new(e)),
            })?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to `endpoint` (relative to the API base) with query parameters.
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);
        Ok(self.client.get(url).query(query).send().await?)
    }

    /// Makes a POST request with a JSON body.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        log::debug!("{} -> {}", endpoint, response.status());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn query_database(&self, database: &DatabaseId) -> Result<Vec<Page>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_hyphenated());
        log::info!("Querying Notion database {}", database);

        let result = fetch_all_pages(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let body = query_body(page_size, cursor);
                    let response = self.post(&endpoint, &body).await?;
                    parse_pages_pagination(extract_response_text(response).await?)
                }
            },
            None,
        )
        .await?;

        log::debug!(
            "Database query returned {} row(s) over {} page(s)",
            result.total_fetched,
            result.pages_fetched
        );
        Ok(result.items)
    }

    async fn retrieve_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());

        let result = fetch_all_pages(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let mut query = vec![("page_size", page_size.to_string())];
                    if let Some(cursor) = cursor {
                        query.push(("start_cursor", cursor));
                    }
                    let response = self.get(&endpoint, &query).await?;
                    parse_blocks_pagination(extract_response_text(response).await?)
                }
            },
            None,
        )
        .await?;

        Ok(result.items)
    }
}

/// Body of a database query request.
fn query_body(page_size: u32, cursor: Option<String>) -> serde_json::Value {
    let mut body = serde_json::json!({ "page_size": page_size });
    if let Some(cursor) = cursor {
        body["start_cursor"] = serde_json::json!(cursor);
    }
    body
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NotionRepository;
    use axum::extract::{Path, Query, State};
    use axum::http::HeaderMap;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// What a stand-in Notion server saw for one request.
    #[derive(Debug, Clone)]
    struct Seen {
        path_id: String,
        authorization: String,
        notion_version: String,
        body: Option<serde_json::Value>,
        query: HashMap<String, String>,
    }

    type Requests = Arc<Mutex<Vec<Seen>>>;

    fn header_text(headers: &HeaderMap, name: &str) -> String {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    /// First call answers with a cursor, every later call ends the listing.
    fn listing(seen_before: usize) -> serde_json::Value {
        let (next_cursor, has_more) = if seen_before == 0 {
            (Some("c1"), true)
        } else {
            (None, false)
        };
        serde_json::json!({
            "object": "list",
            "results": [],
            "next_cursor": next_cursor,
            "has_more": has_more,
        })
    }

    async fn query_handler(
        State(requests): State<Requests>,
        Path(id): Path<String>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> Json<serde_json::Value> {
        let mut requests = requests.lock().unwrap();
        let reply = listing(requests.len());
        requests.push(Seen {
            path_id: id,
            authorization: header_text(&headers, "authorization"),
            notion_version: header_text(&headers, "notion-version"),
            body: Some(body),
            query: HashMap::new(),
        });
        Json(reply)
    }

    async fn children_handler(
        State(requests): State<Requests>,
        Path(id): Path<String>,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        let mut requests = requests.lock().unwrap();
        let reply = listing(requests.len());
        requests.push(Seen {
            path_id: id,
            authorization: header_text(&headers, "authorization"),
            notion_version: header_text(&headers, "notion-version"),
            body: None,
            query,
        });
        Json(reply)
    }

    /// Serves a stand-in Notion API on an ephemeral local port.
    async fn spawn_notion() -> (String, Requests) {
        let requests = Requests::default();
        let router = Router::new()
            .route("/databases/{id}/query", post(query_handler))
            .route("/blocks/{id}/children", get(children_handler))
            .with_state(requests.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{}/", addr), requests)
    }

    fn client(base_url: &str) -> NotionHttpClient {
        let token = NotionToken::new("secret_abcdefghijklmnopqrstuvwxyz").unwrap();
        NotionHttpClient::with_base_url(token, base_url).unwrap()
    }

    #[tokio::test]
    async fn test_database_query_follows_cursor_over_http() {
        let (base_url, requests) = spawn_notion().await;
        let database = DatabaseId::parse("d9824bdc84454327be8b5b47500af6ce").unwrap();

        let pages = client(&base_url).query_database(&database).await.unwrap();

        assert!(pages.is_empty());
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        for seen in requests.iter() {
            assert_eq!(seen.path_id, "d9824bdc-8445-4327-be8b-5b47500af6ce");
            assert_eq!(
                seen.authorization,
                "Bearer secret_abcdefghijklmnopqrstuvwxyz"
            );
            assert_eq!(seen.notion_version, NOTION_VERSION);
        }
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({ "page_size": 100 }))
        );
        assert_eq!(
            requests[1].body,
            Some(serde_json::json!({ "page_size": 100, "start_cursor": "c1" }))
        );
    }

    #[tokio::test]
    async fn test_children_listing_sends_cursor_as_query() {
        let (base_url, requests) = spawn_notion().await;
        let parent = BlockId::parse("59833787-2cf9-4fdf-8782-e53db20768a5").unwrap();

        let blocks = client(&base_url).retrieve_children(&parent).await.unwrap();

        assert!(blocks.is_empty());
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path_id, "59833787-2cf9-4fdf-8782-e53db20768a5");
        assert_eq!(requests[0].query.get("page_size").map(String::as_str), Some("100"));
        assert_eq!(requests[0].query.get("start_cursor"), None);
        assert_eq!(
            requests[1].query.get("start_cursor").map(String::as_str),
            Some("c1")
        );
    }

    #[test]
    fn test_query_body_carries_cursor() {
        assert_eq!(query_body(100, None), serde_json::json!({ "page_size": 100 }));
        assert_eq!(
            query_body(100, Some("abc".to_string())),
            serde_json::json!({ "page_size": 100, "start_cursor": "abc" })
        );
    }

    #[test]
    fn test_headers_mark_token_sensitive() {
        let token = NotionToken::new("secret_abcdefghijklmnopqrstuvwxyz").unwrap();
        let headers = NotionHttpClient::create_headers(&token).unwrap();

        let auth = headers.get(header::AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(
            auth.to_str().unwrap(),
            "Bearer secret_abcdefghijklmnopqrstuvwxyz"
        );
        assert_eq!(headers.get("Notion-Version").unwrap(), NOTION_VERSION);
    }
}
