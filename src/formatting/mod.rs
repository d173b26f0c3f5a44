// src/formatting/mod.rs
//! Renders Notion blocks into the markdown body of a post.

mod block_renderer;
mod markdown;
mod rich_text;
mod state;

pub use block_renderer::{render_fragments, render_markdown};
pub use rich_text::rich_text_to_markdown;
