use crate::types::{BlockId, RichTextItem};

/// A Notion block together with its (already fetched) children.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    /// What Notion reported; `children` stays empty until the fetch stage fills it.
    pub has_children: bool,
    pub children: Vec<Block>,
    pub kind: BlockKind,
}

/// The block types that carry meaning in a published post.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Paragraph {
        rich_text: Vec<RichTextItem>,
    },
    Heading {
        level: u8,
        rich_text: Vec<RichTextItem>,
    },
    BulletedListItem {
        rich_text: Vec<RichTextItem>,
    },
    NumberedListItem {
        rich_text: Vec<RichTextItem>,
    },
    ToDo {
        rich_text: Vec<RichTextItem>,
        checked: bool,
    },
    Toggle {
        rich_text: Vec<RichTextItem>,
    },
    Quote {
        rich_text: Vec<RichTextItem>,
    },
    Callout {
        emoji: Option<String>,
        rich_text: Vec<RichTextItem>,
    },
    Code {
        language: String,
        rich_text: Vec<RichTextItem>,
        caption: Vec<RichTextItem>,
    },
    Equation {
        expression: String,
    },
    Divider,
    Image {
        url: String,
    },
    Video {
        url: String,
    },
    File {
        url: String,
        caption: Vec<RichTextItem>,
    },
    Pdf {
        url: String,
    },
    Bookmark {
        url: String,
        caption: Vec<RichTextItem>,
    },
    Embed {
        url: String,
    },
    LinkPreview {
        url: String,
    },
    ChildPage {
        title: String,
    },
    ChildDatabase {
        title: String,
    },
    Table {
        has_column_header: bool,
    },
    TableRow {
        cells: Vec<Vec<RichTextItem>>,
    },
    ColumnList,
    Column,
    Synced,
    Unsupported {
        block_type: String,
    },
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            has_children: false,
            children: Vec::new(),
            kind,
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = !children.is_empty();
        self.children = children;
        self
    }

    pub fn is_list_item(&self) -> bool {
        matches!(
            self.kind,
            BlockKind::BulletedListItem { .. }
                | BlockKind::NumberedListItem { .. }
                | BlockKind::ToDo { .. }
        )
    }

    /// Whether this block's children belong to the current document.
    ///
    /// Child pages and child databases are separate documents; their
    /// content is never pulled into the parent post.
    pub fn has_inline_children(&self) -> bool {
        self.has_children
            && !matches!(
                self.kind,
                BlockKind::ChildPage { .. } | BlockKind::ChildDatabase { .. }
            )
    }

    /// Notion API type name
    pub fn block_type(&self) -> &str {
        match &self.kind {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading { level: 1, .. } => "heading_1",
            BlockKind::Heading { level: 2, .. } => "heading_2",
            BlockKind::Heading { .. } => "heading_3",
            BlockKind::BulletedListItem { .. } => "bulleted_list_item",
            BlockKind::NumberedListItem { .. } => "numbered_list_item",
            BlockKind::ToDo { .. } => "to_do",
            BlockKind::Toggle { .. } => "toggle",
            BlockKind::Quote { .. } => "quote",
            BlockKind::Callout { .. } => "callout",
            BlockKind::Code { .. } => "code",
            BlockKind::Equation { .. } => "equation",
            BlockKind::Divider => "divider",
            BlockKind::Image { .. } => "image",
            BlockKind::Video { .. } => "video",
            BlockKind::File { .. } => "file",
            BlockKind::Pdf { .. } => "pdf",
            BlockKind::Bookmark { .. } => "bookmark",
            BlockKind::Embed { .. } => "embed",
            BlockKind::LinkPreview { .. } => "link_preview",
            BlockKind::ChildPage { .. } => "child_page",
            BlockKind::ChildDatabase { .. } => "child_database",
            BlockKind::Table { .. } => "table",
            BlockKind::TableRow { .. } => "table_row",
            BlockKind::ColumnList => "column_list",
            BlockKind::Column => "column",
            BlockKind::Synced => "synced_block",
            BlockKind::Unsupported { block_type } => block_type,
        }
    }
}
