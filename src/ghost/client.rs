//! HTTP client for the Ghost Admin API posts endpoint.

use super::token::issue_token_now;
use crate::config::GhostSettings;
use crate::constants::{ERROR_BODY_PREVIEW_LENGTH, GHOST_POSTS_ENDPOINT};
use crate::error::AppError;
use crate::post::PostDraft;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Creates posts on one Ghost site, authenticating every request with a fresh token.
#[derive(Clone)]
pub struct GhostAdminClient {
    client: Client,
    settings: GhostSettings,
}

/// The post Ghost reports back after creation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedPost {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub url: Option<String>,
    pub status: String,
}

#[derive(Debug, Serialize)]
struct CreatePostRequest<'a> {
    posts: [NewPost<'a>; 1],
}

#[derive(Debug, Serialize)]
struct NewPost<'a> {
    title: &'a str,
    slug: &'a str,
    html: &'a str,
    status: &'static str,
}

#[derive(Debug, Deserialize)]
struct PostsEnvelope {
    posts: Vec<CreatedPost>,
}

#[derive(Debug, Deserialize)]
struct GhostErrorEnvelope {
    errors: Vec<GhostApiError>,
}

#[derive(Debug, Deserialize)]
struct GhostApiError {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    context: Option<String>,
}

impl GhostAdminClient {
    pub fn new(settings: GhostSettings) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self { client, settings })
    }

    /// The full posts endpoint for this site.
    pub fn posts_url(&self) -> String {
        self.settings.url.join_path(GHOST_POSTS_ENDPOINT)
    }

    /// Creates one post from a draft.
    ///
    /// The markdown body is sent in the `html` field with `source=html`;
    /// Ghost stores it as-is without a markdown conversion step.
    pub async fn create_post(&self, draft: &PostDraft) -> Result<CreatedPost, AppError> {
        let token = issue_token_now(&self.settings.admin_key)?;
        let body = build_request(draft);
        let url = self.posts_url();

        log::debug!("POST {} (slug '{}')", url, draft.slug);

        let response = self
            .client
            .post(&url)
            .query(&[("source", "html")])
            .header(header::AUTHORIZATION, format!("Ghost {}", token))
            .header("Accept-Version", self.settings.api_version.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        parse_create_response(status, &text)
    }
}

fn build_request(draft: &PostDraft) -> CreatePostRequest<'_> {
    CreatePostRequest {
        posts: [NewPost {
            title: &draft.title,
            slug: draft.slug.as_str(),
            html: &draft.markdown,
            status: draft.status.as_str(),
        }],
    }
}

/// Interprets the posts endpoint's response.
fn parse_create_response(status: StatusCode, body: &str) -> Result<CreatedPost, AppError> {
    if !status.is_success() {
        return Err(AppError::GhostService {
            status: status.as_u16(),
            message: describe_error_body(body),
        });
    }

    let envelope: PostsEnvelope = serde_json::from_str(body).map_err(|e| {
        AppError::MalformedResponse(format!("Ghost posts response: {}", e))
    })?;

    envelope.posts.into_iter().next().ok_or_else(|| {
        AppError::MalformedResponse("Ghost posts response contained no post".to_string())
    })
}

/// Extracts a readable message from Ghost's `{"errors": [...]}` envelope,
/// falling back to a preview of the raw body.
fn describe_error_body(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<GhostErrorEnvelope>(body) {
        let messages: Vec<String> = envelope
            .errors
            .into_iter()
            .map(|error| {
                let mut message = match error.kind {
                    Some(kind) => format!("{}: {}", kind, error.message),
                    None => error.message,
                };
                if let Some(context) = error.context {
                    message.push_str(&format!(" ({})", context));
                }
                message
            })
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", preview)
    } else if body.is_empty() {
        "empty response body".to_string()
    } else {
        body.to_string()
    }
}
