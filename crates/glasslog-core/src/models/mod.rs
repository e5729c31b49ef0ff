//! Board models.
//!
//! # Core Types
//!
//! - [`Card`] - An initiative members vote on
//! - [`CardDraft`] - Member input for a new card, validated before submission
//! - [`VotingKey`] - An access key with a fixed vote quota and a balance
//!
//! Field names on the wire follow the board backend (`_id`, `client`,
//! `votes`), so the models deserialize straight from its JSON.

mod card;
mod voting_key;

pub use card::{Card, CardDraft};
pub use voting_key::VotingKey;
