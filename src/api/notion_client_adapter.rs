// src/api/notion_client_adapter.rs
//! Adapter layer for converting notion-client types to our domain model.
//!
//! Only what a published post needs survives the conversion: text,
//! annotations, links, media URLs and the handful of page properties the
//! source reader looks at.

use crate::error::{AppError, NotionClientError};
use crate::model::{Block, BlockKind, Page, Parent, PropertyValue};
use crate::types::{
    Annotations, BlockId, DatabaseId, Link, MentionKind, PageId, RichTextItem, RichTextType,
    SelectOption,
};
use std::collections::HashMap;

/// Convert notion-client Page to our domain Page
pub fn convert_page(notion_page: notion_client::objects::page::Page) -> Result<Page, AppError> {
    let id = PageId::parse(&notion_page.id)?;

    Ok(Page {
        id,
        url: notion_page.url,
        properties: convert_page_properties(notion_page.properties),
        parent: convert_parent(notion_page.parent),
        archived: notion_page.archived,
    })
}

/// Convert notion-client Block to our domain Block
pub fn convert_block(
    notion_block: notion_client::objects::block::Block,
) -> Result<Block, AppError> {
    use notion_client::objects::block::BlockType;

    let id = BlockId::parse(&notion_block.id.clone().ok_or_else(|| {
        NotionClientError::ConversionError {
            message: "Block missing required ID field".to_string(),
        }
    })?)?;
    let has_children = notion_block.has_children.unwrap_or(false);

    let kind = match notion_block.block_type {
        BlockType::Paragraph { paragraph } => BlockKind::Paragraph {
            rich_text: convert_rich_text_array(paragraph.rich_text),
        },
        BlockType::Heading1 { heading_1 } => BlockKind::Heading {
            level: 1,
            rich_text: convert_rich_text_array(heading_1.rich_text),
        },
        BlockType::Heading2 { heading_2 } => BlockKind::Heading {
            level: 2,
            rich_text: convert_rich_text_array(heading_2.rich_text),
        },
        BlockType::Heading3 { heading_3 } => BlockKind::Heading {
            level: 3,
            rich_text: convert_rich_text_array(heading_3.rich_text),
        },
        BlockType::BulletedListItem { bulleted_list_item } => BlockKind::BulletedListItem {
            rich_text: convert_rich_text_array(bulleted_list_item.rich_text),
        },
        BlockType::NumberedListItem { numbered_list_item } => BlockKind::NumberedListItem {
            rich_text: convert_rich_text_array(numbered_list_item.rich_text),
        },
        BlockType::ToDo { to_do } => BlockKind::ToDo {
            rich_text: convert_rich_text_array(to_do.rich_text),
            checked: to_do.checked.unwrap_or(false),
        },
        BlockType::Toggle { toggle } => BlockKind::Toggle {
            rich_text: convert_rich_text_array(toggle.rich_text),
        },
        BlockType::Quote { quote } => BlockKind::Quote {
            rich_text: convert_rich_text_array(quote.rich_text),
        },
        BlockType::Callout { callout } => BlockKind::Callout {
            emoji: callout.icon.and_then(icon_emoji),
            rich_text: convert_rich_text_array(callout.rich_text),
        },
        BlockType::Code { code } => BlockKind::Code {
            language: code_language(&code.language),
            rich_text: convert_rich_text_array(code.rich_text),
            caption: convert_rich_text_array(code.caption),
        },
        BlockType::Equation { equation } => BlockKind::Equation {
            expression: equation.expression,
        },
        BlockType::Divider { .. } => BlockKind::Divider,
        BlockType::Image { image } => BlockKind::Image {
            url: file_url(image.file_type),
        },
        BlockType::Video { video } => BlockKind::Video {
            url: file_url(video.file_type),
        },
        BlockType::File { file } => BlockKind::File {
            url: file_url(file.file_type),
            caption: convert_rich_text_array(file.caption),
        },
        BlockType::Pdf { pdf } => BlockKind::Pdf {
            url: file_url(pdf.file_type),
        },
        BlockType::Bookmark { bookmark } => BlockKind::Bookmark {
            url: bookmark.url,
            caption: convert_rich_text_array(bookmark.caption),
        },
        BlockType::Embed { embed } => BlockKind::Embed { url: embed.url },
        BlockType::LinkPreview { link_preview } => BlockKind::LinkPreview {
            url: link_preview.url,
        },
        BlockType::ChildPage { child_page } => BlockKind::ChildPage {
            title: child_page.title,
        },
        BlockType::ChildDatabase { child_database } => BlockKind::ChildDatabase {
            title: child_database.title,
        },
        BlockType::Table { table } => BlockKind::Table {
            has_column_header: table.has_column_header,
        },
        BlockType::TableRow { table_row } => BlockKind::TableRow {
            cells: table_row
                .cells
                .into_iter()
                .map(convert_rich_text_array)
                .collect(),
        },
        BlockType::ColumnList { .. } => BlockKind::ColumnList,
        BlockType::Column { .. } => BlockKind::Column,
        BlockType::SyncedBlock { .. } => BlockKind::Synced,
        other => BlockKind::Unsupported {
            block_type: unsupported_type_name(&other),
        },
    };

    Ok(Block {
        id,
        has_children,
        children: Vec::new(),
        kind,
    })
}

/// Convert notion-client Parent to our domain Parent.
///
/// Parent ids Notion sends in an unexpected shape are logged and dropped
/// rather than failing the whole page.
fn convert_parent(notion_parent: notion_client::objects::parent::Parent) -> Option<Parent> {
    use notion_client::objects::parent::Parent as NcParent;

    let converted = match notion_parent {
        NcParent::PageId { page_id } => PageId::parse(&page_id).map(|page_id| Parent::Page { page_id }),
        NcParent::DatabaseId { database_id } => {
            DatabaseId::parse(&database_id).map(|database_id| Parent::Database { database_id })
        }
        NcParent::BlockId { block_id } => {
            BlockId::parse(&block_id).map(|block_id| Parent::Block { block_id })
        }
        NcParent::Workspace { .. } => Ok(Parent::Workspace),
        _ => return None,
    };

    converted
        .map_err(|e| log::warn!("Ignoring unparseable parent reference: {}", e))
        .ok()
}

/// Convert array of rich text items
fn convert_rich_text_array(
    rich_texts: Vec<notion_client::objects::rich_text::RichText>,
) -> Vec<RichTextItem> {
    rich_texts.into_iter().filter_map(convert_rich_text).collect()
}

/// Convert single rich text item
fn convert_rich_text(
    rich_text: notion_client::objects::rich_text::RichText,
) -> Option<RichTextItem> {
    use notion_client::objects::rich_text::RichText as NcRichText;

    match rich_text {
        NcRichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => {
            let plain_text = plain_text.unwrap_or_else(|| text.content.clone());
            Some(RichTextItem {
                text_type: RichTextType::Text {
                    content: text.content,
                    link: text.link.map(|link| Link { url: link.url }),
                },
                annotations: annotations.map(convert_annotations).unwrap_or_default(),
                plain_text,
                href,
            })
        }

        NcRichText::Mention {
            mention,
            annotations,
            plain_text,
            href,
        } => Some(RichTextItem {
            text_type: RichTextType::Mention(convert_mention(mention)),
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        }),

        NcRichText::Equation {
            equation,
            annotations,
            plain_text,
            href,
        } => Some(RichTextItem {
            text_type: RichTextType::Equation {
                expression: equation.expression,
            },
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        }),

        _ => {
            log::debug!("Skipping unsupported rich text item");
            None
        }
    }
}

fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
    }
}

fn convert_mention(mention: notion_client::objects::rich_text::Mention) -> MentionKind {
    use notion_client::objects::rich_text::Mention as NcMention;

    match mention {
        NcMention::Page { page } => match PageId::parse(&page.id) {
            Ok(id) => MentionKind::Page { id },
            Err(_) => MentionKind::Other,
        },
        NcMention::LinkPreview { link_preview } => MentionKind::LinkPreview {
            url: link_preview.url,
        },
        _ => MentionKind::Other,
    }
}

/// Hosted and external files both reduce to a URL.
fn file_url(file: notion_client::objects::file::File) -> String {
    use notion_client::objects::file::File as NcFile;

    match file {
        NcFile::External { external } => external.url,
        NcFile::File { file } => file.url,
    }
}

fn icon_emoji(icon: notion_client::objects::block::Icon) -> Option<String> {
    use notion_client::objects::block::Icon as NcIcon;

    match icon {
        NcIcon::Emoji(notion_client::objects::emoji::Emoji::Emoji { emoji }) => Some(emoji),
        NcIcon::File(_) => None,
    }
}

/// The fence language for a code block, as Notion names it.
///
/// `plain text` has no fence language and maps to an empty string.
fn code_language<L>(language: &L) -> String
where
    L: serde::Serialize + std::fmt::Debug,
{
    let name = serde_json::to_value(language)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", language).to_lowercase());

    if name == "plain text" {
        String::new()
    } else {
        name
    }
}

fn unsupported_type_name(block_type: &notion_client::objects::block::BlockType) -> String {
    let debug = format!("{:?}", block_type);
    debug
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("unknown")
        .to_lowercase()
}

/// Convert page properties. Properties the publisher never reads are kept
/// as `Other` so their names remain visible in logs.
fn convert_page_properties(
    properties: HashMap<String, notion_client::objects::page::PageProperty>,
) -> HashMap<String, PropertyValue> {
    properties
        .into_iter()
        .map(|(name, property)| (name, convert_page_property(property)))
        .collect()
}

fn convert_select_option(
    option: notion_client::objects::page::SelectPropertyValue,
) -> Option<SelectOption> {
    option.name.map(|name| SelectOption { name })
}

/// Convert individual page property
fn convert_page_property(property: notion_client::objects::page::PageProperty) -> PropertyValue {
    use notion_client::objects::page::PageProperty;

    let type_name = match property {
        PageProperty::Title { title, .. } => {
            return PropertyValue::Title(convert_rich_text_array(title))
        }
        PageProperty::RichText { rich_text, .. } => {
            return PropertyValue::RichText(convert_rich_text_array(rich_text))
        }
        PageProperty::Select { select, .. } => {
            return PropertyValue::Select(select.and_then(convert_select_option))
        }
        PageProperty::Status { status, .. } => {
            return PropertyValue::Status(status.and_then(convert_select_option))
        }
        PageProperty::Checkbox { .. } => "checkbox",
        PageProperty::Url { .. } => "url",
        PageProperty::Number { .. } => "number",
        PageProperty::Email { .. } => "email",
        PageProperty::PhoneNumber { .. } => "phone_number",
        PageProperty::MultiSelect { .. } => "multi_select",
        PageProperty::Date { .. } => "date",
        PageProperty::People { .. } => "people",
        PageProperty::Files { .. } => "files",
        PageProperty::CreatedTime { .. } => "created_time",
        PageProperty::CreatedBy { .. } => "created_by",
        PageProperty::LastEditedTime { .. } => "last_edited_time",
        PageProperty::LastEditedBy { .. } => "last_edited_by",
        PageProperty::Relation { .. } => "relation",
        PageProperty::Formula { .. } => "formula",
        PageProperty::Rollup { .. } => "rollup",
        PageProperty::UniqueID { .. } => "unique_id",
        PageProperty::Verification { .. } => "verification",
        PageProperty::Button { .. } => "button",
    };

    PropertyValue::Other {
        type_name: type_name.to_string(),
    }
}
