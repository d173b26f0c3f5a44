// src/formatting/rich_text.rs
//! Formats Notion rich text arrays as inline markdown.

use crate::types::{Annotations, Link, MentionKind, RichTextItem, RichTextType};

/// Inline style of one rich text segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl TextStyle {
    fn from_annotations(annotations: &Annotations) -> Self {
        Self {
            bold: annotations.bold,
            italic: annotations.italic,
            strikethrough: annotations.strikethrough,
            underline: annotations.underline,
            code: annotations.code,
            link: None,
        }
    }
}

/// Renderer for text styles to Markdown.
pub struct MarkdownStyleRenderer;

impl MarkdownStyleRenderer {
    /// Wraps `content` in markdown for each style, innermost first:
    /// code, strikethrough, bold, italic, underline, then the link.
    pub fn apply_styles(content: &str, style: &TextStyle) -> String {
        let mut result = content.to_string();

        if style.code {
            result = format!("`{}`", result);
        }
        if style.strikethrough {
            result = format!("~~{}~~", result);
        }
        if style.bold {
            result = format!("**{}**", result);
        }
        if style.italic {
            result = format!("*{}*", result);
        }
        // Underline requires HTML
        if style.underline {
            result = format!("<u>{}</u>", result);
        }
        if let Some(url) = &style.link {
            result = format!("[{}]({})", result, url);
        }

        result
    }
}

/// Formats an array of rich text items as markdown.
pub fn rich_text_to_markdown(items: &[RichTextItem]) -> String {
    items.iter().map(render_item).collect()
}

fn render_item(item: &RichTextItem) -> String {
    let mut style = TextStyle::from_annotations(&item.annotations);

    match &item.text_type {
        RichTextType::Equation { expression } => format!("${}$", expression),

        RichTextType::Text { content, link } => {
            style.link = link
                .as_ref()
                .map(|Link { url }| url.clone())
                .or_else(|| item.href.clone());
            if content.is_empty() {
                return String::new();
            }
            MarkdownStyleRenderer::apply_styles(content, &style)
        }

        RichTextType::Mention(mention) => {
            style.link = match mention {
                MentionKind::Page { id } => Some(
                    item.href
                        .clone()
                        .unwrap_or_else(|| format!("https://www.notion.so/{}", id.as_str())),
                ),
                MentionKind::LinkPreview { url } => Some(url.clone()),
                MentionKind::Other => item.href.clone(),
            };
            if item.plain_text.is_empty() {
                return String::new();
            }
            MarkdownStyleRenderer::apply_styles(&item.plain_text, &style)
        }
    }
}
