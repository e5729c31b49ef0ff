//! In-process board store.
//!
//! Holds every card, key and upload behind one lock. Because `cast_vote`
//! checks and spends the balance while holding that lock, two votes on the
//! same key can never both pass the check on a stale balance, however many
//! sessions share the store.

use crate::error::{Error, Result};
use crate::store::{Attachment, BoardStore};
use async_trait::async_trait;
use glasslog_core::{try_upvote, Card, CardDraft, VoteReceipt, VotingKey};
use tokio::sync::Mutex;

#[derive(Default)]
struct Inner {
    cards: Vec<Card>,
    keys: Vec<VotingKey>,
    uploads: Vec<(String, Attachment)>,
    seq: u64,
}

impl Inner {
    /// Fresh identifier; the sequence makes ids unique even for equal payloads.
    fn next_id(&mut self, kind: &str, payload: &str) -> String {
        self.seq += 1;
        let hash = blake3::hash(format!("{kind}:{}:{payload}", self.seq).as_bytes());
        hex::encode(&hash.as_bytes()[..12])
    }

    fn card_mut(&mut self, id: &str) -> Result<&mut Card> {
        self.cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("card {id}")))
    }

    fn key_index(&self, id: &str) -> Result<usize> {
        self.keys
            .iter()
            .position(|k| k.id == id)
            .ok_or_else(|| Error::NotFound(format!("key {id}")))
    }
}

/// Board store kept in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision keys, rejecting any whose balance exceeds its quota.
    pub fn with_keys(mut self, keys: impl IntoIterator<Item = VotingKey>) -> Result<Self> {
        let inner = self.inner.get_mut();
        for key in keys {
            key.check_invariant()?;
            inner.keys.push(key);
        }
        Ok(self)
    }

    /// Seed existing cards, kept in the given order.
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.inner.get_mut().cards.extend(cards);
        self
    }

    pub async fn card(&self, id: &str) -> Option<Card> {
        let inner = self.inner.lock().await;
        inner.cards.iter().find(|c| c.id == id).cloned()
    }

    pub async fn key(&self, id: &str) -> Option<VotingKey> {
        let inner = self.inner.lock().await;
        inner.keys.iter().find(|k| k.id == id).cloned()
    }

    /// The stored upload behind a URL returned by `upload_attachment`.
    pub async fn attachment(&self, url: &str) -> Option<Attachment> {
        let inner = self.inner.lock().await;
        inner
            .uploads
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, a)| a.clone())
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn list_cards(&self) -> Result<Vec<Card>> {
        Ok(self.inner.lock().await.cards.clone())
    }

    async fn create_card(&self, draft: &CardDraft) -> Result<Card> {
        draft.validate()?;
        let mut inner = self.inner.lock().await;
        let id = inner.next_id("card", &draft.name);
        let card = Card::from_draft(id, draft);
        inner.cards.push(card.clone());
        tracing::debug!(card = %card.id, name = %card.name, "card created");
        Ok(card)
    }

    async fn set_story_points(&self, card_id: &str, storypoints: u32) -> Result<Card> {
        let mut inner = self.inner.lock().await;
        let card = inner.card_mut(card_id)?;
        card.storypoints = storypoints;
        Ok(card.clone())
    }

    async fn list_keys(&self) -> Result<Vec<VotingKey>> {
        Ok(self.inner.lock().await.keys.clone())
    }

    async fn cast_vote(&self, card_id: &str, key_id: &str) -> Result<VoteReceipt> {
        let mut inner = self.inner.lock().await;
        let key_idx = inner.key_index(key_id)?;
        let card = inner.card_mut(card_id)?.clone();

        let receipt = try_upvote(&card, &inner.keys[key_idx])?;

        // Both halves are written under the same lock.
        *inner.card_mut(card_id)? = receipt.card.clone();
        inner.keys[key_idx] = receipt.key.clone();
        Ok(receipt)
    }

    async fn list_media(&self) -> Result<Vec<String>> {
        let inner = self.inner.lock().await;
        Ok(inner.uploads.iter().map(|(url, _)| url.clone()).collect())
    }

    async fn upload_attachment(&self, attachment: Attachment) -> Result<String> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id("upload", &attachment.file_name);
        let url = format!("/uploads/{id}-{}", attachment.file_name);
        inner.uploads.push((url.clone(), attachment));
        Ok(url)
    }
}
