// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Reading these tells the story of a publish run: which Notion
//! properties are read, how deep block trees are followed, what a derived
//! slug may look like, and how long a Ghost admin token lives.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Maximum nesting depth when fetching a page's block tree.
pub const NOTION_MAX_FETCH_DEPTH: u8 = 50;

/// Database property holding the post title.
pub const TITLE_PROPERTY_NAME: &str = "Name";

/// Database property holding an explicit slug.
pub const SLUG_PROPERTY_NAME: &str = "Slug";

/// Database property compared against the configured ready status.
pub const STATUS_PROPERTY_NAME: &str = "Status";

/// Title used when a row has no title text.
pub const UNTITLED_PLACEHOLDER: &str = "Untitled";

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Longest slug derived from a title.
pub const SLUG_MAX_LENGTH: usize = 80;

/// Slug used when a title normalizes to nothing.
pub const SLUG_FALLBACK: &str = "post";

// ---------------------------------------------------------------------------
// Ghost Admin API
// ---------------------------------------------------------------------------

/// Admin API version sent when `GHOST_API_VERSION` is not set.
pub const DEFAULT_GHOST_API_VERSION: &str = "v5.0";

/// Lifetime of a self-issued admin token. Ghost rejects anything over 5 minutes.
pub const GHOST_TOKEN_TTL_SECS: i64 = 300;

/// Audience claim Ghost expects on admin tokens.
pub const GHOST_TOKEN_AUDIENCE: &str = "/admin/";

/// Post creation endpoint, relative to the site URL.
pub const GHOST_POSTS_ENDPOINT: &str = "ghost/api/admin/posts/";

// ---------------------------------------------------------------------------
// Run reporting
// ---------------------------------------------------------------------------

/// Shown by both the CLI and the HTTP trigger when a run finds no drafts.
pub const NOTHING_TO_PUBLISH_MESSAGE: &str =
    "No posts with Status = \"Ready to Publish\" found in Notion.";

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
