//! Leaderboard ordering.

use crate::models::Card;

/// Order cards by descending upvotes.
///
/// Cards with equal votes keep their input (creation) order, so ranking an
/// already ranked list changes nothing.
pub fn rank(cards: &[Card]) -> Vec<Card> {
    let mut ranked = cards.to_vec();
    // sort_by is stable
    ranked.sort_by(|a, b| b.upvotes.cmp(&a.upvotes));
    ranked
}
