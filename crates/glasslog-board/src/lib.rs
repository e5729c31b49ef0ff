//! GlassLog Board - idea voting sessions
//!
//! Drives the [`glasslog_core`] allocation model against a board store:
//! members sign in with an access key, spend their vote quota on initiative
//! cards, submit new cards with image attachments, and watch the leaderboard
//! fund the top cards within the team capacity.
//!
//! # Architecture
//!
//! - **Store**: [`BoardStore`] contract, one atomic `cast_vote` per upvote
//! - **Memory**: [`MemoryStore`], in-process store serializing votes per key
//! - **Http**: [`HttpStore`], client for the REST board backend
//! - **Board**: [`Board`] session; votes land only once the store confirms
//! - **Countdown**: ticker publishing the time left in the voting window
//!
//! # Example
//!
//! ```no_run
//! use glasslog_board::{Board, BoardConfig, HttpStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     glasslog_board::logging::init(glasslog_board::logging::DEFAULT_FILTER);
//!
//!     let config = BoardConfig::from_env()?;
//!     let store = Arc::new(HttpStore::from_config(&config)?);
//!     let mut board = Board::load(store, config).await?;
//!
//!     board.sign_in("member123").await?;
//!     let first = board.cards()[0].id.clone();
//!     board.upvote(&first).await?;
//!
//!     for entry in board.leaderboard().entries() {
//!         println!("{} {:?}", entry.card.name, entry.funding);
//!     }
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod config;
pub mod countdown;
pub mod error;
pub mod http;
pub mod logging;
pub mod memory;
pub mod store;

pub use board::Board;
pub use config::BoardConfig;
pub use countdown::{spawn_countdown, CountdownHandle};
pub use error::{Error, Result};
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use store::{Attachment, BoardStore};
