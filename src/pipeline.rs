// src/pipeline.rs
//! Pipeline capability traits: the two stages of a publish run.
//!
//! Each trait describes a single capability, so each stage can be tested
//! in isolation and the entry points can run against in-memory fakes.

use crate::api::NotionHttpClient;
use crate::config::{Environment, PublisherConfig};
use crate::error::AppError;
use crate::ghost::GhostAdminClient;
use crate::post::PostDraft;
use crate::source::NotionSource;

/// Produces the drafts to publish in this run.
#[async_trait::async_trait]
pub trait DraftSource: Send + Sync {
    async fn fetch_drafts(&self) -> Result<Vec<PostDraft>, AppError>;
}

/// Creates one post on the target platform.
#[async_trait::async_trait]
pub trait PostPublisher: Send + Sync {
    async fn publish(&self, draft: &PostDraft) -> Result<(), AppError>;
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    NothingToPublish,
    Published { count: usize },
}

/// Observer for the stages of a run, so a caller can report progress.
///
/// Every hook defaults to doing nothing.
pub trait PublishProgress: Send + Sync {
    /// Drafts are about to be fetched.
    fn fetching(&self) {}

    /// Drafts were fetched; `count` may be zero.
    fn found(&self, _count: usize) {}

    /// Every draft was published, or there was nothing to publish.
    fn finished(&self, _outcome: PublishOutcome) {}
}

/// Reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl PublishProgress for SilentProgress {}

/// Fetches drafts and publishes them one at a time, in source order.
///
/// Stops at the first failed publish; posts created before it stay created.
pub async fn publish_all<S, P>(source: &S, publisher: &P) -> Result<PublishOutcome, AppError>
where
    S: DraftSource + ?Sized,
    P: PostPublisher + ?Sized,
{
    publish_all_reporting(source, publisher, &SilentProgress).await
}

/// [`publish_all`] with progress notifications between the stages.
pub async fn publish_all_reporting<S, P>(
    source: &S,
    publisher: &P,
    progress: &dyn PublishProgress,
) -> Result<PublishOutcome, AppError>
where
    S: DraftSource + ?Sized,
    P: PostPublisher + ?Sized,
{
    progress.fetching();
    let drafts = source.fetch_drafts().await?;
    progress.found(drafts.len());

    if drafts.is_empty() {
        log::info!("No drafts to publish");
        progress.finished(PublishOutcome::NothingToPublish);
        return Ok(PublishOutcome::NothingToPublish);
    }

    log::info!("Publishing {} draft(s)", drafts.len());
    for (index, draft) in drafts.iter().enumerate() {
        log::debug!(
            "[{}/{}] Publishing '{}' as '{}'",
            index + 1,
            drafts.len(),
            draft.title,
            draft.slug
        );
        publisher.publish(draft).await?;
    }

    let outcome = PublishOutcome::Published {
        count: drafts.len(),
    };
    progress.finished(outcome);
    Ok(outcome)
}

/// Builds the Notion and Ghost clients for `config` and runs one publish.
pub async fn run_once(
    config: PublisherConfig,
    progress: &dyn PublishProgress,
) -> Result<PublishOutcome, AppError> {
    let repository = NotionHttpClient::new(config.notion.token.clone())?;
    let source = NotionSource::new(repository, config.notion);
    let publisher = GhostAdminClient::new(config.ghost)?;
    publish_all_reporting(&source, &publisher, progress).await
}

/// Resolves configuration from `env`, then runs one publish.
///
/// A missing variable is reported before any client is built.
pub async fn publish_from_env(
    env: &dyn Environment,
    progress: &dyn PublishProgress,
) -> Result<PublishOutcome, AppError> {
    let config = PublisherConfig::resolve(env)?;
    run_once(config, progress).await
}

/// Runs one full publish from resolved configuration.
#[async_trait::async_trait]
pub trait PublishRunner: Send + Sync {
    async fn run(&self, config: PublisherConfig) -> Result<PublishOutcome, AppError>;
}

/// The production runner: Notion database in, Ghost posts out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotionToGhost;

#[async_trait::async_trait]
impl PublishRunner for NotionToGhost {
    async fn run(&self, config: PublisherConfig) -> Result<PublishOutcome, AppError> {
        run_once(config, &SilentProgress).await
    }
}
