use super::PageId;

/// The kind of rich text content.
///
/// Each variant carries its specific data, so a mention always has a
/// mention target and an equation always has an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum RichTextType {
    Text { content: String, link: Option<Link> },
    Mention(MentionKind),
    Equation { expression: String },
}

/// What a mention points at. Only the variants that change rendering are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum MentionKind {
    Page { id: PageId },
    LinkPreview { url: String },
    /// Users, dates, databases and anything newer: rendered from `plain_text`.
    Other,
}

/// Rich text item with formatting annotations.
///
/// `plain_text` is the fallback rendering for every variant.
#[derive(Debug, Clone, PartialEq)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item with no annotations or link.
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: None,
        }
    }
}

/// Concatenates the plain text of a rich text array.
pub fn plain_text_of(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.plain_text.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub url: String,
}

/// Markdown-relevant annotations. Notion colors have no markdown form and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// Select or status option
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub name: String,
}
