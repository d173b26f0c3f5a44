// src/source.rs
//! Source reader: turns rows of the Notion database into post drafts.

use crate::api::{FetchContext, NotionRepository};
use crate::config::NotionSettings;
use crate::constants::{
    SLUG_PROPERTY_NAME, STATUS_PROPERTY_NAME, TITLE_PROPERTY_NAME, UNTITLED_PLACEHOLDER,
};
use crate::error::AppError;
use crate::formatting::render_markdown;
use crate::model::{Block, Page, PropertyValue};
use crate::pipeline::DraftSource;
use crate::post::{PostDraft, PublicationState, Slug};
use crate::types::{BlockId, DatabaseId};
use std::future::Future;
use std::pin::Pin;

/// Reads drafts from one Notion database.
pub struct NotionSource<R> {
    repository: R,
    settings: NotionSettings,
}

impl<R: NotionRepository> NotionSource<R> {
    pub fn new(repository: R, settings: NotionSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Converts one row into a draft, fetching and rendering its content.
    pub async fn draft_from_page(&self, page: &Page) -> Result<PostDraft, AppError> {
        let title = extract_title(page);
        let slug = extract_slug(page).unwrap_or_else(|| Slug::derive(&title));

        let root = BlockId::parse(page.id.as_str())?;
        let blocks = load_block_tree(&self.repository, root, FetchContext::default()).await?;
        let markdown = render_markdown(&blocks)?;

        log::debug!(
            "Converted '{}' ({} top-level blocks, {} bytes of markdown)",
            title,
            blocks.len(),
            markdown.len()
        );

        Ok(PostDraft {
            page_id: page.id.clone(),
            title,
            slug,
            markdown,
            status: PublicationState::Draft,
        })
    }
}

#[async_trait::async_trait]
impl<R: NotionRepository> DraftSource for NotionSource<R> {
    async fn fetch_drafts(&self) -> Result<Vec<PostDraft>, AppError> {
        let database = &self.settings.database_id;
        let rows = self.repository.query_database(database).await?;
        let total = rows.len();

        let mut drafts = Vec::new();
        for page in rows
            .iter()
            .filter(|page| belongs_to_database(page, database))
            .filter(|page| is_ready(page, self.settings.ready_status.as_deref()))
        {
            drafts.push(self.draft_from_page(page).await?);
        }

        log::info!(
            "{} of {} row(s) in database {} selected for publishing",
            drafts.len(),
            total,
            database
        );
        Ok(drafts)
    }
}

/// Whether a row belongs to `database`. Rows without database parent metadata are kept.
pub fn belongs_to_database(page: &Page, database: &DatabaseId) -> bool {
    match page.parent_database() {
        Some(parent) => parent == database,
        None => true,
    }
}

/// Whether a row's Status matches the configured ready value.
///
/// Without a configured value every row is ready.
pub fn is_ready(page: &Page, ready_status: Option<&str>) -> bool {
    let Some(wanted) = ready_status else {
        return true;
    };

    match page.property(STATUS_PROPERTY_NAME) {
        Some(PropertyValue::Other { type_name }) => {
            log::debug!(
                "Page {} has a {} '{}' property; expected status or select",
                page.id,
                type_name,
                STATUS_PROPERTY_NAME
            );
            false
        }
        Some(value) => value.option_name().is_some_and(|status| status == wanted),
        None => false,
    }
}

/// Plain-text title from the `Name` property, or the first title-typed property.
pub fn extract_title(page: &Page) -> String {
    let title = page
        .property(TITLE_PROPERTY_NAME)
        .and_then(PropertyValue::as_plain_text)
        .or_else(|| page.title_property().and_then(PropertyValue::as_plain_text))
        .unwrap_or_default();

    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Slug from the `Slug` property, if non-blank, normalized like a derived one.
pub fn extract_slug(page: &Page) -> Option<Slug> {
    page.property(SLUG_PROPERTY_NAME)
        .and_then(PropertyValue::as_plain_text)
        .and_then(|raw| Slug::explicit(&raw))
}

type BlockTreeFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Block>, AppError>> + Send + 'a>>;

/// Fetches the children of `parent` and, recursively, their children.
fn load_block_tree<R: NotionRepository>(
    repository: &R,
    parent: BlockId,
    mut context: FetchContext,
) -> BlockTreeFuture<'_> {
    Box::pin(async move {
        context.visit(&parent);
        let mut blocks = repository.retrieve_children(&parent).await?;

        for block in &mut blocks {
            if !block.has_inline_children() {
                continue;
            }
            let child_context = context.descend();
            if !child_context.should_fetch(&block.id) {
                log::warn!(
                    "Not expanding children of {} block {}: depth limit or cycle",
                    block.block_type(),
                    block.id
                );
                continue;
            }
            block.children = load_block_tree(repository, block.id.clone(), child_context).await?;
        }

        Ok(blocks)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockKind, Parent};
    use crate::types::{NotionToken, PageId, RichTextItem, SelectOption};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const DATABASE: &str = "d9824bdc84454327be8b5b47500af6ce";
    const OTHER_DATABASE: &str = "a1b2c3d4e5f67890abcdef1234567890";

    fn page_id(n: u32) -> PageId {
        PageId::parse(&format!("{:032x}", n)).unwrap()
    }

    fn block_id(n: u32) -> BlockId {
        BlockId::parse(&format!("{:032x}", n)).unwrap()
    }

    fn row(n: u32, properties: Vec<(&str, PropertyValue)>, parent: Option<&str>) -> Page {
        Page {
            id: page_id(n),
            url: format!("https://www.notion.so/{:032x}", n),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            parent: parent.map(|db| Parent::Database {
                database_id: DatabaseId::parse(db).unwrap(),
            }),
            archived: false,
        }
    }

    fn title(s: &str) -> PropertyValue {
        PropertyValue::Title(vec![RichTextItem::plain_text(s)])
    }

    fn rich_text(s: &str) -> PropertyValue {
        PropertyValue::RichText(vec![RichTextItem::plain_text(s)])
    }

    fn status(s: &str) -> PropertyValue {
        PropertyValue::Status(Some(SelectOption {
            name: s.to_string(),
        }))
    }

    fn paragraph(n: u32, s: &str) -> Block {
        Block::new(
            block_id(n),
            BlockKind::Paragraph {
                rich_text: vec![RichTextItem::plain_text(s)],
            },
        )
    }

    /// In-memory repository keyed by parent id.
    #[derive(Default)]
    struct FakeRepository {
        rows: Vec<Page>,
        children: HashMap<String, Vec<Block>>,
        children_requests: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl NotionRepository for FakeRepository {
        async fn query_database(&self, _database: &DatabaseId) -> Result<Vec<Page>, AppError> {
            Ok(self.rows.clone())
        }

        async fn retrieve_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError> {
            self.children_requests
                .lock()
                .unwrap()
                .push(parent.as_str().to_string());
            Ok(self
                .children
                .get(parent.as_str())
                .cloned()
                .unwrap_or_default())
        }
    }

    fn settings(ready_status: Option<&str>) -> NotionSettings {
        NotionSettings {
            token: NotionToken::new("secret_abcdefghijklmnopqrstuvwxyz").unwrap(),
            database_id: DatabaseId::parse(DATABASE).unwrap(),
            ready_status: ready_status.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_title_is_untitled() {
        assert_eq!(extract_title(&row(1, vec![], None)), "Untitled");
        assert_eq!(extract_title(&row(1, vec![("Name", title("  "))], None)), "Untitled");
    }

    #[test]
    fn test_title_falls_back_to_any_title_property() {
        let page = row(1, vec![("Post", title("Renamed title column"))], None);
        assert_eq!(extract_title(&page), "Renamed title column");
    }

    #[test]
    fn test_slug_prefers_explicit_property() {
        let page = row(
            1,
            vec![("Name", title("Hello, World!")), ("Slug", rich_text(" custom-slug "))],
            None,
        );
        assert_eq!(extract_slug(&page).unwrap().as_str(), "custom-slug");

        let spaced = row(1, vec![("Slug", rich_text("My First Post!"))], None);
        assert_eq!(extract_slug(&spaced).unwrap().as_str(), "my-first-post");

        let blank = row(1, vec![("Slug", rich_text("   "))], None);
        assert_eq!(extract_slug(&blank), None);
    }

    #[test]
    fn test_parent_filter() {
        let database = DatabaseId::parse(DATABASE).unwrap();
        assert!(belongs_to_database(&row(1, vec![], Some(DATABASE)), &database));
        assert!(!belongs_to_database(&row(2, vec![], Some(OTHER_DATABASE)), &database));
        assert!(belongs_to_database(&row(3, vec![], None), &database));

        let hyphenated = "d9824bdc-8445-4327-be8b-5b47500af6ce";
        assert!(belongs_to_database(&row(4, vec![], Some(hyphenated)), &database));
    }

    #[test]
    fn test_ready_filter() {
        let ready = row(1, vec![("Status", status("Ready to Publish"))], None);
        let draft = row(2, vec![("Status", status("Draft"))], None);
        let select = row(
            3,
            vec![(
                "Status",
                PropertyValue::Select(Some(SelectOption {
                    name: "Ready to Publish".to_string(),
                })),
            )],
            None,
        );
        let missing = row(4, vec![], None);
        let wrong_type = row(
            5,
            vec![(
                "Status",
                PropertyValue::Other {
                    type_name: "checkbox".to_string(),
                },
            )],
            None,
        );

        assert!(is_ready(&draft, None));
        assert!(is_ready(&ready, Some("Ready to Publish")));
        assert!(is_ready(&select, Some("Ready to Publish")));
        assert!(!is_ready(&draft, Some("Ready to Publish")));
        assert!(!is_ready(&missing, Some("Ready to Publish")));
        assert!(!is_ready(&wrong_type, Some("Ready to Publish")));
    }

    #[tokio::test]
    async fn test_fetch_drafts_end_to_end() {
        let mut repository = FakeRepository {
            rows: vec![
                row(1, vec![("Name", title("Hello, World!"))], Some(DATABASE)),
                row(2, vec![("Name", title("Elsewhere"))], Some(OTHER_DATABASE)),
                row(
                    3,
                    vec![("Name", title("Second")), ("Slug", rich_text("second-post"))],
                    Some(DATABASE),
                ),
            ],
            ..Default::default()
        };
        repository.children.insert(
            format!("{:032x}", 1),
            vec![paragraph(10, "Body of the first post")],
        );

        let source = NotionSource::new(repository, settings(None));
        let drafts = source.fetch_drafts().await.unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "Hello, World!");
        assert_eq!(drafts[0].slug.as_str(), "hello-world");
        assert_eq!(drafts[0].markdown, "Body of the first post\n");
        assert_eq!(drafts[0].status, PublicationState::Draft);
        assert_eq!(drafts[1].slug.as_str(), "second-post");
        assert_eq!(drafts[1].markdown, "");
    }

    #[tokio::test]
    async fn test_nested_children_are_fetched() {
        let mut toggle = Block::new(
            block_id(10),
            BlockKind::Toggle {
                rich_text: vec![RichTextItem::plain_text("Details")],
            },
        );
        toggle.has_children = true;

        let mut child_page = Block::new(
            block_id(11),
            BlockKind::ChildPage {
                title: "Appendix".to_string(),
            },
        );
        child_page.has_children = true;

        let mut repository = FakeRepository {
            rows: vec![row(1, vec![("Name", title("Nested"))], Some(DATABASE))],
            ..Default::default()
        };
        repository
            .children
            .insert(format!("{:032x}", 1), vec![toggle, child_page]);
        repository
            .children
            .insert(format!("{:032x}", 10), vec![paragraph(20, "Hidden text")]);

        let source = NotionSource::new(repository, settings(None));
        let drafts = source.fetch_drafts().await.unwrap();

        assert_eq!(drafts[0].markdown, "<details>\n<summary>Details</summary>\n\nHidden text\n</details>\n\n📄 Appendix\n");

        let requests = source.repository.children_requests.lock().unwrap().clone();
        assert_eq!(requests, vec![format!("{:032x}", 1), format!("{:032x}", 10)]);
    }

    #[tokio::test]
    async fn test_depth_limit_stops_recursion() {
        let mut repository = FakeRepository::default();
        // Every block at level n has a single toggle child at level n + 1.
        for level in 0..10u32 {
            let mut toggle = Block::new(
                block_id(100 + level + 1),
                BlockKind::Toggle {
                    rich_text: vec![RichTextItem::plain_text(&format!("level {}", level))],
                },
            );
            toggle.has_children = true;
            repository
                .children
                .insert(format!("{:032x}", 100 + level), vec![toggle]);
        }

        let blocks = load_block_tree(&repository, block_id(100), FetchContext::new(3))
            .await
            .unwrap();

        fn depth(blocks: &[Block]) -> usize {
            blocks
                .iter()
                .map(|b| 1 + depth(&b.children))
                .max()
                .unwrap_or(0)
        }
        assert_eq!(depth(&blocks), 3);
        assert_eq!(repository.children_requests.lock().unwrap().len(), 3);
    }
}
