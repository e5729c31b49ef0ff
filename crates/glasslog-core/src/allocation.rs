//! Capacity allocation over the ranked board.
//!
//! The team has a fixed capacity (in story points) per voting round. Walking
//! the leaderboard from the top, each estimated card that still fits in the
//! remaining capacity is funded. A card that does not fit is skipped and the
//! walk continues, so a cheaper card further down can still be funded.
//!
//! Unestimated cards (0 story points) are never funded; they are reported as
//! [`Funding::PendingEstimate`] rather than as rejected.

use crate::models::Card;
use crate::ranking::rank;
use serde::{Deserialize, Serialize};

/// Outcome for one card on the leaderboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Funding {
    /// Fits within the capacity left when it was considered
    Funded,
    /// Estimated, but costs more than the capacity left
    Unfunded,
    /// Not estimated yet
    PendingEstimate,
}

impl Funding {
    pub fn is_funded(self) -> bool {
        self == Funding::Funded
    }
}

/// A ranked card and its funding outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocatedCard {
    pub card: Card,
    pub funding: Funding,
}

/// The leaderboard partition for one capacity budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Allocation {
    entries: Vec<AllocatedCard>,
    total_capacity: u32,
    remaining_capacity: u32,
}

impl Allocation {
    /// Entries in rank order.
    pub fn entries(&self) -> &[AllocatedCard] {
        &self.entries
    }

    pub fn total_capacity(&self) -> u32 {
        self.total_capacity
    }

    /// Capacity left after funding.
    pub fn remaining_capacity(&self) -> u32 {
        self.remaining_capacity
    }

    pub fn used_capacity(&self) -> u32 {
        self.total_capacity.saturating_sub(self.remaining_capacity)
    }

    /// Funded cards in rank order.
    pub fn funded(&self) -> impl Iterator<Item = &Card> {
        self.entries
            .iter()
            .filter(|entry| entry.funding.is_funded())
            .map(|entry| &entry.card)
    }

    /// Funding outcome for a card, if it is on the board.
    pub fn funding_of(&self, card_id: &str) -> Option<Funding> {
        self.entries
            .iter()
            .find(|entry| entry.card.id == card_id)
            .map(|entry| entry.funding)
    }

    pub fn is_funded(&self, card_id: &str) -> bool {
        self.funding_of(card_id).is_some_and(Funding::is_funded)
    }
}

/// Fund a ranked list of cards greedily within `total_capacity`.
pub fn allocate(ranked: &[Card], total_capacity: u32) -> Allocation {
    let mut remaining = total_capacity;

    let entries = ranked
        .iter()
        .map(|card| {
            let funding = if !card.is_estimated() {
                Funding::PendingEstimate
            } else if card.storypoints <= remaining {
                remaining -= card.storypoints;
                Funding::Funded
            } else {
                Funding::Unfunded
            };
            AllocatedCard {
                card: card.clone(),
                funding,
            }
        })
        .collect();

    Allocation {
        entries,
        total_capacity,
        remaining_capacity: remaining,
    }
}

/// Rank `cards` and allocate `total_capacity` over the result.
pub fn leaderboard(cards: &[Card], total_capacity: u32) -> Allocation {
    allocate(&rank(cards), total_capacity)
}
