//! Ghost Admin API publishing: creating posts on a Ghost site.

mod client;
mod token;

pub use client::{CreatedPost, GhostAdminClient};
pub use token::{issue_token, issue_token_now, GhostAdminKey};

use crate::error::AppError;
use crate::pipeline::PostPublisher;
use crate::post::{PostDraft, PublicationState};

#[async_trait::async_trait]
impl PostPublisher for GhostAdminClient {
    async fn publish(&self, draft: &PostDraft) -> Result<(), AppError> {
        let created = self.create_post(draft).await?;
        log::info!(
            "Created Ghost post '{}' ({}, {}){}",
            draft.title,
            created.slug,
            created.status,
            created
                .url
                .map(|url| format!(" at {}", url))
                .unwrap_or_default()
        );

        let state = PublicationState::from_label(&created.status);
        if state != draft.status {
            log::warn!(
                "Ghost stored '{}' as {} although {} was requested",
                created.slug,
                state,
                draft.status
            );
        }
        Ok(())
    }
}
