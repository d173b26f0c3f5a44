// src/formatting/block_renderer.rs
//! Block rendering engine: turns a page's block tree into markdown.
//!
//! A page renders to a list of fragments, one per top-level block, with
//! each run of consecutive list items kept together in a single fragment
//! so numbering and spacing survive the join.

use super::markdown::{
    continues_list_run, enter_list_for, starts_list_run, BlockRenderer, MarkdownBlockRenderer,
};
use super::state::FormatContext;
use crate::constants::CHARS_PER_BLOCK_ESTIMATE;
use crate::error::AppError;
use crate::model::Block;

/// Renders top-level blocks into markdown fragments.
///
/// Blocks that render to nothing (unsupported types) produce no fragment.
pub fn render_fragments(blocks: &[Block]) -> Result<Vec<String>, AppError> {
    let renderer = MarkdownBlockRenderer;
    let mut fragments = Vec::with_capacity(blocks.len());
    let mut list_run = String::new();
    let mut context = FormatContext::new();

    log::debug!("Rendering {} top-level blocks", blocks.len());

    for (i, block) in blocks.iter().enumerate() {
        let previous = i.checked_sub(1).map(|p| &blocks[p]);
        if starts_list_run(block, previous) {
            context = enter_list_for(block, &FormatContext::new());
        }

        let result = renderer.render_block(block, context)?;
        context = result.context;

        if block.is_list_item() {
            list_run.push_str(&result.content);
            let next = blocks.get(i + 1);
            if !next.is_some_and(|next| continues_list_run(block, next)) {
                fragments.push(std::mem::take(&mut list_run));
                context = FormatContext::new();
            }
        } else if !result.content.is_empty() {
            fragments.push(result.content);
        }
    }

    Ok(fragments)
}

/// Renders blocks into one markdown document: fragments joined by a newline.
pub fn render_markdown(blocks: &[Block]) -> Result<String, AppError> {
    let fragments = render_fragments(blocks)?;

    let mut output = String::with_capacity(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(fragment);
    }
    Ok(output)
}
