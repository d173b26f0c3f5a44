// src/lib.rs
//! notion2ghost library: publishes rows of a Notion database as Ghost posts.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `PublisherConfig`, `Environment`
//! - **Domain model**: `Page`, `Block`, `PropertyValue`, `PostDraft`, `Slug`
//! - **API clients**: `NotionHttpClient`, `NotionRepository`, `GhostAdminClient`
//! - **Formatting**: `render_markdown`
//! - **Pipeline**: `DraftSource`, `PostPublisher`, `publish_all`, `run_once`
//! - **HTTP trigger**: `build_router`, `serve`

mod api;
pub mod config;
mod constants;
mod error;
mod formatting;
mod ghost;
mod model;
mod pipeline;
mod post;
pub mod server;
mod source;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{
    CommandLineInput, Command, Environment, GhostSettings, NotionSettings, ProcessEnvironment,
    PublisherConfig,
};

// --- Domain Model ---
pub use crate::model::{Block, BlockKind, Page, Parent, PropertyValue};
pub use crate::post::{PostDraft, PublicationState, Slug};

// --- Domain Types ---
pub use crate::types::{
    Annotations, BlockId, DatabaseId, Link, MentionKind, NotionToken, PageId, RichTextItem,
    RichTextType, SelectOption, ValidatedUrl,
};

// --- API Clients ---
pub use crate::api::{
    parser::{parse_api_response, parse_blocks_pagination, parse_pages_pagination},
    ApiResponse, NotionHttpClient, NotionRepository,
};
pub use crate::ghost::{issue_token, CreatedPost, GhostAdminClient, GhostAdminKey};

// --- Formatting ---
pub use crate::formatting::{render_fragments, render_markdown, rich_text_to_markdown};

// --- Pipeline ---
pub use crate::constants::NOTHING_TO_PUBLISH_MESSAGE;
pub use crate::pipeline::{
    publish_all, publish_all_reporting, publish_from_env, run_once, DraftSource, NotionToGhost,
    PostPublisher, PublishOutcome, PublishProgress, PublishRunner, SilentProgress,
};
pub use crate::source::{extract_slug, extract_title, NotionSource};

// --- HTTP Trigger ---
pub use crate::server::{build_router, serve, AppState};
