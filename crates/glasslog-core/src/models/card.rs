//! Card model - initiatives on the board.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// An initiative card.
///
/// Created empty (no votes, not estimated) by a member, then changed only by
/// upvotes and administrative estimation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    /// Store-assigned identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Short label
    pub name: String,

    /// Rich-text (HTML) body, kept verbatim
    pub description: String,

    /// Attachment URLs in display order
    #[serde(default)]
    pub media: Vec<String>,

    /// Estimated cost; 0 means not yet estimated
    #[serde(default)]
    pub storypoints: u32,

    /// Votes received
    #[serde(default)]
    pub upvotes: u32,
}

impl Card {
    /// Create an unestimated card with no votes and no media.
    pub fn new(id: String, name: String, description: String) -> Self {
        Self {
            id,
            name,
            description,
            media: Vec::new(),
            storypoints: 0,
            upvotes: 0,
        }
    }

    /// Build the stored card for a validated draft.
    pub fn from_draft(id: String, draft: &CardDraft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            media: draft.media.clone(),
            storypoints: 0,
            upvotes: 0,
        }
    }

    /// Whether the card has been given a story-point estimate.
    pub fn is_estimated(&self) -> bool {
        self.storypoints > 0
    }
}

/// A card as entered by a member, before the store assigns an id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardDraft {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub media: Vec<String>,
}

impl CardDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            media: Vec::new(),
        }
    }

    /// Attach uploaded media URLs, keeping their order.
    pub fn with_media(mut self, media: impl IntoIterator<Item = String>) -> Self {
        self.media.extend(media);
        self
    }

    /// Check that both the name and the description carry visible text.
    ///
    /// An editor body such as `<p><br></p>` has markup but no text and is
    /// treated as empty.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("card name is required".into()));
        }
        if visible_text(&self.description).is_empty() {
            return Err(Error::Validation("card description is required".into()));
        }
        Ok(())
    }
}

/// Strip tags and non-breaking spaces from an HTML fragment.
fn visible_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&nbsp;", " ").trim().to_string()
}
