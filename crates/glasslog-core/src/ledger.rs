//! Vote ledger: spending one vote from a key on a card.
//!
//! An upvote is a pair of effects that belong together:
//! - the card gains one vote
//! - the key loses one vote from its balance
//!
//! [`try_upvote`] computes both or neither. Whoever persists the result must
//! write the pair as one unit (see `cast_vote` on the board store).

use crate::error::{Error, Result};
use crate::models::{Card, VotingKey};
use serde::{Deserialize, Serialize};

/// The card and key as they stand after one vote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteReceipt {
    pub card: Card,
    pub key: VotingKey,
}

/// Spend one vote from `key` on `card`.
///
/// Fails with [`Error::InsufficientVotes`] when the balance is zero. The
/// inputs are never modified; on success the updated copies are returned.
pub fn try_upvote(card: &Card, key: &VotingKey) -> Result<VoteReceipt> {
    key.check_invariant()?;

    if !key.has_votes() {
        tracing::debug!(key = %key.id, card = %card.id, "upvote rejected: balance exhausted");
        return Err(Error::InsufficientVotes {
            key_id: key.id.clone(),
        });
    }

    let upvotes = card.upvotes.checked_add(1).ok_or_else(|| {
        Error::InvariantViolation(format!("card {} upvote count overflow", card.id))
    })?;

    let mut card = card.clone();
    card.upvotes = upvotes;
    let mut key = key.clone();
    key.balance -= 1;

    tracing::debug!(
        key = %key.id,
        card = %card.id,
        upvotes = card.upvotes,
        balance = key.balance,
        "upvote accepted"
    );

    Ok(VoteReceipt { card, key })
}
