//! GlassLog Core - vote and capacity allocation model
//!
//! The pure, synchronous rules behind a GlassLog idea board. Members spend
//! votes from a per-key quota on initiative cards; the leaderboard ranks the
//! cards by votes and funds as many of them as the team capacity allows.
//!
//! # Architecture
//!
//! - **Models**: [`Card`], [`CardDraft`], [`VotingKey`]
//! - **Ledger**: [`try_upvote`] spends one vote from a key on a card
//! - **Ranking**: [`rank`] orders cards by descending votes, ties stable
//! - **Allocation**: [`allocate`] greedily funds ranked cards within capacity
//! - **Window**: [`VoteWindow`] countdown over an injectable [`Clock`]
//!
//! Everything here is recomputable from scratch; nothing keeps hidden state.
//!
//! # Example
//!
//! ```
//! use glasslog_core::{leaderboard, Card, Funding};
//!
//! let mut cheap = Card::new("a".into(), "Dark mode".into(), String::new());
//! cheap.storypoints = 3;
//! cheap.upvotes = 2;
//! let mut pricey = Card::new("b".into(), "Rewrite".into(), String::new());
//! pricey.storypoints = 8;
//! pricey.upvotes = 5;
//!
//! let board = leaderboard(&[cheap, pricey], 5);
//! assert_eq!(board.entries()[0].funding, Funding::Unfunded);
//! assert_eq!(board.entries()[1].funding, Funding::Funded);
//! assert_eq!(board.remaining_capacity(), 2);
//! ```

pub mod allocation;
pub mod error;
pub mod ledger;
pub mod models;
pub mod ranking;
pub mod window;

pub use allocation::{allocate, leaderboard, AllocatedCard, Allocation, Funding};
pub use error::{Error, Result};
pub use ledger::{try_upvote, VoteReceipt};
pub use models::{Card, CardDraft, VotingKey};
pub use ranking::rank;
pub use window::{format_remaining, remaining, Clock, ManualClock, SystemClock, VoteWindow};
