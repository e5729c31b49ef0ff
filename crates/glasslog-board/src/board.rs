//! Board session - what a browser tab holds while someone uses the board.
//!
//! A session starts in viewer mode: cards and the leaderboard are visible
//! but nothing can be changed. Signing in with a member key unlocks voting
//! and card submission.
//!
//! Votes are checked against the local balance before any store call, but
//! the view only changes once the store confirms: the card and key are taken
//! from the store's receipt, never from local arithmetic. A vote that fails
//! or is dropped mid-flight leaves the view exactly as it was.

use crate::config::BoardConfig;
use crate::countdown::{spawn_countdown, CountdownHandle};
use crate::error::{Error, Result};
use crate::store::{Attachment, BoardStore};
use glasslog_core::{
    leaderboard, try_upvote, Allocation, Card, CardDraft, Clock, SystemClock, VotingKey,
    VoteWindow,
};
use std::sync::Arc;
use std::time::Duration;

/// A board session over a store.
pub struct Board<S> {
    store: Arc<S>,
    config: BoardConfig,
    clock: Arc<dyn Clock>,
    window: VoteWindow,
    cards: Vec<Card>,
    member: Option<VotingKey>,
}

impl<S: BoardStore> Board<S> {
    /// Load the cards and open the voting window on the system clock.
    pub async fn load(store: Arc<S>, config: BoardConfig) -> Result<Self> {
        Self::load_with_clock(store, config, Arc::new(SystemClock)).await
    }

    pub async fn load_with_clock(
        store: Arc<S>,
        config: BoardConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let cards = store.list_cards().await?;
        let window = VoteWindow::start(clock.as_ref(), config.vote_window)?;

        tracing::info!(cards = cards.len(), "board loaded");

        Ok(Self {
            store,
            config,
            clock,
            window,
            cards,
            member: None,
        })
    }

    // --- Membership ---

    /// Sign in with an access code.
    ///
    /// The code is checked against the keys the store provisioned.
    pub async fn sign_in(&mut self, code: &str) -> Result<&VotingKey> {
        let code = code.trim();
        if code.is_empty() {
            return Err(Error::Validation("member key is required".into()));
        }

        let key = self
            .store
            .list_keys()
            .await?
            .into_iter()
            .find(|k| k.code == code)
            .ok_or_else(|| {
                tracing::warn!("sign-in with unknown member key");
                Error::UnknownKey
            })?;
        key.check_invariant()?;

        tracing::info!(key = %key.id, owner = %key.owner, "member signed in");
        Ok(&*self.member.insert(key))
    }

    /// Return to viewer mode.
    pub fn sign_out(&mut self) {
        if let Some(key) = self.member.take() {
            tracing::info!(key = %key.id, "member signed out");
        }
    }

    /// The signed-in key, if any.
    pub fn member(&self) -> Option<&VotingKey> {
        self.member.as_ref()
    }

    pub fn is_member(&self) -> bool {
        self.member.is_some()
    }

    /// Whether the session can vote right now.
    pub fn can_vote(&self) -> bool {
        self.member.as_ref().is_some_and(VotingKey::has_votes)
    }

    /// `(balance, quota)` of the signed-in key.
    pub fn votes(&self) -> Option<(u32, u32)> {
        self.member.as_ref().map(|k| (k.balance, k.quota))
    }

    // --- Cards ---

    /// Cards in creation order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    fn card_index(&self, card_id: &str) -> Result<usize> {
        self.cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or_else(|| Error::NotFound(format!("card {card_id}")))
    }

    /// Spend one of the member's votes on a card.
    ///
    /// Rejected locally, without contacting the store, when the key has no
    /// votes left. The card and key only change once the store accepts the
    /// vote, so a failed or cancelled call leaves them untouched.
    pub async fn upvote(&mut self, card_id: &str) -> Result<()> {
        let key = self.member.as_ref().ok_or(Error::NotSignedIn)?;
        let idx = self.card_index(card_id)?;
        try_upvote(&self.cards[idx], key)?;
        let key_id = key.id.clone();

        let outcome = self.store.cast_vote(card_id, &key_id).await;
        match outcome {
            Ok(receipt) => {
                tracing::info!(
                    card = %receipt.card.id,
                    upvotes = receipt.card.upvotes,
                    balance = receipt.key.balance,
                    "vote cast"
                );
                self.cards[idx] = receipt.card;
                self.member = Some(receipt.key);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(card = %card_id, error = %e, "vote not recorded");
                if let (Error::InsufficientVotes { .. }, Some(key)) = (&e, self.member.as_mut()) {
                    // The store spoke for the balance; another session spent it.
                    key.balance = 0;
                }
                Err(e)
            }
        }
    }

    /// Upload images for a card draft, returning their URLs in order.
    ///
    /// Every file must be an accepted image; otherwise nothing is uploaded.
    pub async fn upload_media(&self, files: Vec<Attachment>) -> Result<Vec<String>> {
        self.member.as_ref().ok_or(Error::NotSignedIn)?;
        if let Some(bad) = files.iter().find(|f| !f.is_image()) {
            return Err(Error::Validation(format!(
                "{} is not an accepted image",
                bad.file_name
            )));
        }
        if files.is_empty() {
            return Ok(Vec::new());
        }
        self.store.upload_attachments(files).await
    }

    /// Submit a new card.
    ///
    /// The draft is validated first; an invalid draft never reaches the store.
    pub async fn submit_card(&mut self, draft: CardDraft) -> Result<&Card> {
        self.member.as_ref().ok_or(Error::NotSignedIn)?;
        if let Err(e) = draft.validate() {
            tracing::warn!(error = %e, "card submission blocked");
            return Err(e.into());
        }

        let card = self.store.create_card(&draft).await?;
        tracing::info!(card = %card.id, name = %card.name, "card submitted");
        self.cards.push(card);
        self.cards
            .last()
            .ok_or_else(|| Error::NotFound("submitted card".into()))
    }

    /// Record a story-point estimate. Only admin keys may estimate.
    pub async fn estimate(&mut self, card_id: &str, storypoints: u32) -> Result<&Card> {
        let key = self.member.as_ref().ok_or(Error::NotSignedIn)?;
        if !key.is_admin() {
            return Err(Error::Forbidden("only admin keys can estimate cards".into()));
        }
        let idx = self.card_index(card_id)?;

        let card = self.store.set_story_points(card_id, storypoints).await?;
        tracing::info!(card = %card.id, storypoints, "card estimated");
        self.cards[idx] = card;
        Ok(&self.cards[idx])
    }

    /// Reload cards and the signed-in key from the store.
    pub async fn refresh(&mut self) -> Result<()> {
        let (cards, keys) = tokio::try_join!(self.store.list_cards(), self.store.list_keys())?;
        self.cards = cards;

        if let Some(current) = self.member.take() {
            match keys.iter().find(|k| k.id == current.id) {
                Some(key) => self.member = Some(key.clone()),
                None => tracing::warn!(key = %current.id, "member key no longer provisioned"),
            }
        }
        Ok(())
    }

    // --- Leaderboard ---

    /// Ranked cards with their funding outcome for the team capacity.
    pub fn leaderboard(&self) -> Allocation {
        leaderboard(&self.cards, self.config.total_capacity)
    }

    pub fn total_capacity(&self) -> u32 {
        self.config.total_capacity
    }

    // --- Voting window ---

    pub fn window(&self) -> VoteWindow {
        self.window
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Time left in the voting window.
    pub fn remaining(&self) -> Duration {
        self.window.remaining(self.clock.now())
    }

    /// Start ticking the voting window at the configured interval.
    pub fn start_countdown(&self) -> CountdownHandle {
        spawn_countdown(self.window, self.clock(), self.config.tick)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }
}
