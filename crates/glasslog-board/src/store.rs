//! The board store contract.
//!
//! A board never owns its data. Cards, keys and uploaded media live in a
//! store; the board reads them and asks the store to apply a small, closed
//! set of changes. Votes in particular go through [`BoardStore::cast_vote`],
//! which applies the card increment and the key decrement as one unit.

use crate::error::Result;
use async_trait::async_trait;
use glasslog_core::{Card, CardDraft, VoteReceipt, VotingKey};

/// File extensions accepted as card attachments.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Whether this is an image the board accepts.
    pub fn is_image(&self) -> bool {
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        self.content_type.starts_with("image/")
            && ext.is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Where a board's cards, keys and media live.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// All cards, in creation order.
    async fn list_cards(&self) -> Result<Vec<Card>>;

    /// Create an unestimated card with no votes from a draft.
    async fn create_card(&self, draft: &CardDraft) -> Result<Card>;

    /// Record a story-point estimate for a card.
    async fn set_story_points(&self, card_id: &str, storypoints: u32) -> Result<Card>;

    /// All provisioned keys.
    async fn list_keys(&self) -> Result<Vec<VotingKey>>;

    /// Spend one vote from a key on a card, atomically.
    ///
    /// Both effects are applied or neither is. The balance is checked by the
    /// store at the time of the call, not from any caller-side copy.
    async fn cast_vote(&self, card_id: &str, key_id: &str) -> Result<VoteReceipt>;

    /// URLs of every uploaded file, oldest first.
    async fn list_media(&self) -> Result<Vec<String>>;

    /// Upload one file, returning its URL.
    async fn upload_attachment(&self, attachment: Attachment) -> Result<String>;

    /// Upload several files, returning URLs in the same order.
    async fn upload_attachments(&self, attachments: Vec<Attachment>) -> Result<Vec<String>> {
        futures::future::try_join_all(
            attachments
                .into_iter()
                .map(|attachment| self.upload_attachment(attachment)),
        )
        .await
    }
}
