//! HTTP client for the board backend.
//!
//! Endpoints (relative to the configured base URL):
//!
//! - `GET   /api/cards`            list cards
//! - `POST  /api/cards`            create a card
//! - `PATCH /api/cards/{id}`       record a story-point estimate
//! - `GET   /api/keys`             list keys
//! - `POST  /api/votes`            cast one vote (card and key together)
//! - `GET   /api/media`            list uploaded file URLs
//! - `POST  /api/media/upload`     upload one file (multipart field `file`)

use crate::config::BoardConfig;
use crate::error::{Error, Result};
use crate::store::{Attachment, BoardStore};
use async_trait::async_trait;
use glasslog_core::{Card, CardDraft, VoteReceipt, VotingKey};
use reqwest::{multipart, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct CreateCardRequest<'a> {
    name: &'a str,
    description: &'a str,
    storypoints: u32,
    media: &'a [String],
}

#[derive(Debug, Serialize)]
struct EstimateRequest {
    storypoints: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CastVoteRequest<'a> {
    card_id: &'a str,
    key_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_path: String,
}

/// Board store backed by the REST backend.
pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    /// Create a store for `base_url` with a request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        Self::new(config.backend_url.clone(), config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::warn!(%status, %message, "board backend returned an error");
        Err(match status {
            StatusCode::NOT_FOUND => Error::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Error::Validation(message)
            }
            _ => Error::Transport(format!("{status}: {message}")),
        })
    }
}

#[async_trait]
impl BoardStore for HttpStore {
    async fn list_cards(&self) -> Result<Vec<Card>> {
        let response = self.client.get(self.url("/api/cards")).send().await?;
        self.handle_response(response).await
    }

    async fn create_card(&self, draft: &CardDraft) -> Result<Card> {
        let body = CreateCardRequest {
            name: draft.name.trim(),
            description: &draft.description,
            storypoints: 0,
            media: &draft.media,
        };
        let response = self
            .client
            .post(self.url("/api/cards"))
            .json(&body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn set_story_points(&self, card_id: &str, storypoints: u32) -> Result<Card> {
        let response = self
            .client
            .patch(self.url(&format!("/api/cards/{card_id}")))
            .json(&EstimateRequest { storypoints })
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn list_keys(&self) -> Result<Vec<VotingKey>> {
        let response = self.client.get(self.url("/api/keys")).send().await?;
        self.handle_response(response).await
    }

    async fn cast_vote(&self, card_id: &str, key_id: &str) -> Result<VoteReceipt> {
        let response = self
            .client
            .post(self.url("/api/votes"))
            .json(&CastVoteRequest { card_id, key_id })
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(Error::InsufficientVotes {
                key_id: key_id.to_string(),
            });
        }
        self.handle_response(response).await
    }

    async fn list_media(&self) -> Result<Vec<String>> {
        let response = self.client.get(self.url("/api/media")).send().await?;
        self.handle_response(response).await
    }

    async fn upload_attachment(&self, attachment: Attachment) -> Result<String> {
        let part = multipart::Part::bytes(attachment.bytes)
            .file_name(attachment.file_name)
            .mime_str(&attachment.content_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/api/media/upload"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = self.handle_response(response).await?;
        Ok(uploaded.file_path)
    }
}
