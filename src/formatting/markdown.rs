// src/formatting/markdown.rs
//! Block visitor that renders Notion blocks as markdown.

use super::rich_text::rich_text_to_markdown;
use super::state::FormatContext;
use crate::error::AppError;
use crate::model::{Block, BlockKind};
use crate::types::RichTextItem;

/// The result of rendering a single block: content plus updated context.
#[derive(Debug, Clone)]
pub struct BlockRenderResult {
    pub content: String,
    pub context: FormatContext,
}

/// Trait for formatting blocks into output strings.
pub trait BlockRenderer {
    fn render_block(
        &self,
        block: &Block,
        context: FormatContext,
    ) -> Result<BlockRenderResult, AppError>;
}

/// Formats Notion blocks as markdown.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownBlockRenderer;

impl BlockRenderer for MarkdownBlockRenderer {
    fn render_block(
        &self,
        block: &Block,
        context: FormatContext,
    ) -> Result<BlockRenderResult, AppError> {
        let children = block.children.as_slice();

        let content = match &block.kind {
            BlockKind::Paragraph { rich_text } => {
                self.format_text_with_children(rich_text, "", children, &context)?
            }
            BlockKind::Heading { level, rich_text } => {
                let prefix = format!("{} ", "#".repeat(*level as usize));
                self.format_text_with_children(rich_text, &prefix, children, &context)?
            }
            BlockKind::BulletedListItem { rich_text } => {
                let text = format_text_content(rich_text, "- ");
                let nested = self.format_indented_children(
                    children,
                    context.clone(),
                    "   ",
                )?;
                format!("{}{}", text, nested)
            }
            BlockKind::NumberedListItem { rich_text } => {
                let number = format!("{}. ", context.current_list_number());
                let text = format_text_content(rich_text, &number);
                let nested = self.format_indented_children(
                    children,
                    context.clone(),
                    "   ",
                )?;
                format!("{}{}", text, nested)
            }
            BlockKind::ToDo { rich_text, checked } => {
                let checkbox = if *checked { "[x]" } else { "[ ]" };
                let text = format_text_content(rich_text, &format!("- {} ", checkbox));
                let nested = self.format_indented_children(
                    children,
                    context.clone(),
                    "  ",
                )?;
                format!("{}{}", text, nested)
            }
            BlockKind::Toggle { rich_text } => {
                let summary = rich_text_to_markdown(rich_text);
                let nested = self.format_children(children, FormatContext::new())?;
                format_details(&summary, &nested)
            }
            BlockKind::Quote { rich_text } => {
                let text = format_text_content(rich_text, "");
                let nested = self.format_children(children, FormatContext::new())?;
                quote_lines(&format!("{}{}", text, nested), "> ")
            }
            BlockKind::Callout { emoji, rich_text } => {
                let prefix = match emoji {
                    Some(emoji) => format!("{} ", emoji),
                    None => String::new(),
                };
                let text = format_text_content(rich_text, &prefix);
                let nested = self.format_children(children, FormatContext::new())?;
                quote_lines(&format!("{}{}", text, nested), "> ")
            }
            BlockKind::Code {
                language,
                rich_text,
                caption,
            } => format_code_block(language, rich_text, caption),
            BlockKind::Equation { expression } => format!("$$\n{}\n$$\n", expression),
            BlockKind::Divider => "---\n".to_string(),
            BlockKind::Image { url } => format!("![]({})\n", url),
            BlockKind::Video { url } => format!("[Video]({})\n", url),
            BlockKind::Pdf { url } => format!("[PDF]({})\n", url),
            BlockKind::File { url, caption } => {
                format!("[{}]({})\n", caption_or(caption, "File"), url)
            }
            BlockKind::Bookmark { url, caption } => {
                format!("[{}]({})\n", caption_or(caption, url), url)
            }
            BlockKind::Embed { url } | BlockKind::LinkPreview { url } => {
                format!("[{}]({})\n", url, url)
            }
            BlockKind::ChildPage { title } => format!("📄 {}\n", title),
            BlockKind::ChildDatabase { title } => format!("🗄️ {}\n", title),
            BlockKind::Table { .. } => self.format_children(children, context.enter_table())?,
            BlockKind::TableRow { cells } => format_table_row(cells, &context),
            BlockKind::ColumnList | BlockKind::Column | BlockKind::Synced => {
                self.format_children(children, context.clone())?
            }
            BlockKind::Unsupported { block_type } => {
                log::debug!("Skipping unsupported block type: {}", block_type);
                String::new()
            }
        };

        let final_context = match &block.kind {
            BlockKind::NumberedListItem { .. } => context.increment_list_number(),
            BlockKind::TableRow { .. } => context.process_table_row(),
            _ => context,
        };

        Ok(BlockRenderResult {
            content,
            context: final_context,
        })
    }
}

impl MarkdownBlockRenderer {
    /// Format text content followed by its children (paragraphs and headings).
    fn format_text_with_children(
        &self,
        rich_text: &[RichTextItem],
        prefix: &str,
        children: &[Block],
        context: &FormatContext,
    ) -> Result<String, AppError> {
        let text = format_text_content(rich_text, prefix);
        let child_md = self.format_children(children, context.clone())?;
        Ok(format!("{}{}", text, child_md))
    }

    /// Format children blocks and indent the result.
    fn format_indented_children(
        &self,
        children: &[Block],
        context: FormatContext,
        indent: &str,
    ) -> Result<String, AppError> {
        if children.is_empty() {
            return Ok(String::new());
        }
        let formatted = self.format_children(children, context)?;
        Ok(indent_block_content(&formatted, indent))
    }

    /// Format children blocks, opening list contexts for runs of list items.
    fn format_children(
        &self,
        children: &[Block],
        context: FormatContext,
    ) -> Result<String, AppError> {
        if children.is_empty() {
            return Ok(String::new());
        }

        let mut output = String::new();
        let mut current = context.clone();

        for (i, block) in children.iter().enumerate() {
            let previous = i.checked_sub(1).map(|p| &children[p]);
            if starts_list_run(block, previous) {
                current = enter_list_for(block, &context);
            }

            let result = self.render_block(block, current)?;
            output.push_str(&result.content);
            current = result.context;

            let next = children.get(i + 1);
            if block.is_list_item() && !next.is_some_and(|next| continues_list_run(block, next)) {
                current = context.clone();
            }
        }

        Ok(output)
    }
}

/// Whether `block` opens a new run of list items.
pub(super) fn starts_list_run(block: &Block, previous: Option<&Block>) -> bool {
    block.is_list_item() && !previous.is_some_and(|previous| continues_list_run(previous, block))
}

/// Whether `next` belongs to the same list as `block`.
///
/// A switch between numbered and unnumbered items starts a new list, so
/// numbering restarts at 1.
pub(super) fn continues_list_run(block: &Block, next: &Block) -> bool {
    let numbered = |b: &Block| matches!(b.kind, BlockKind::NumberedListItem { .. });
    block.is_list_item() && next.is_list_item() && numbered(block) == numbered(next)
}

pub(super) fn enter_list_for(block: &Block, context: &FormatContext) -> FormatContext {
    match block.kind {
        BlockKind::NumberedListItem { .. } => context.enter_numbered_list(),
        _ => context.enter_bulleted_list(),
    }
}

/// Format text content with prefix.
fn format_text_content(rich_text: &[RichTextItem], prefix: &str) -> String {
    let text = rich_text_to_markdown(rich_text);
    if text.trim().is_empty() {
        format!("{}\n", prefix.trim_end())
    } else {
        format!("{}{}\n", prefix, text)
    }
}

/// Collapsible section: the summary line, then the body after a blank line.
fn format_details(summary: &str, body: &str) -> String {
    if body.is_empty() {
        format!("<details>\n<summary>{}</summary>\n</details>\n", summary)
    } else {
        format!(
            "<details>\n<summary>{}</summary>\n\n{}</details>\n",
            summary, body
        )
    }
}

fn format_code_block(language: &str, rich_text: &[RichTextItem], caption: &[RichTextItem]) -> String {
    let mut result = format!("```{}\n", language);
    for item in rich_text {
        result.push_str(&item.plain_text);
    }
    result.push_str("\n```\n");

    let caption = rich_text_to_markdown(caption);
    if !caption.is_empty() {
        result.push_str(&format!("*{}*\n", caption));
    }
    result
}

/// Format a table row, adding a header separator after the first row.
fn format_table_row(cells: &[Vec<RichTextItem>], context: &FormatContext) -> String {
    let mut row = String::from("|");
    for cell in cells {
        let content = rich_text_to_markdown(cell).replace('|', "\\|");
        row.push_str(&format!(" {} |", content));
    }
    row.push('\n');

    if context.is_first_table_row() {
        row.push('|');
        row.push_str(&" --- |".repeat(cells.len()));
        row.push('\n');
    }
    row
}

fn caption_or<'a>(caption: &[RichTextItem], fallback: &'a str) -> std::borrow::Cow<'a, str> {
    let text = rich_text_to_markdown(caption);
    if text.is_empty() {
        std::borrow::Cow::Borrowed(fallback)
    } else {
        std::borrow::Cow::Owned(text)
    }
}

/// Indents each non-empty line of `text` by `indent`, preserving blank lines.
fn indent_block_content(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

/// Prefixes every line of `text` with `marker`; blank lines get the bare marker.
fn quote_lines(text: &str, marker: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                marker.trim_end().to_string()
            } else {
                format!("{}{}", marker, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}
