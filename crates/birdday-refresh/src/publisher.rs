//! Pushes the chosen bird to a card.

use async_trait::async_trait;
use birdday_core::Location;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::bird::BirdDescriptor;
use crate::error::CollaboratorError;
use crate::http;

#[async_trait]
pub trait ContentPublisher: Send + Sync {
    /// Replace the card's content with `bird`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the publish did not go through.
    async fn publish_refresh(
        &self,
        card_id: &str,
        bird: &BirdDescriptor,
        intro_reference: Option<&str>,
        location: &Location,
    ) -> Result<(), CollaboratorError>;
}

#[derive(Serialize)]
struct PublishBody<'a> {
    bird: &'a BirdDescriptor,
    intro_reference: Option<&'a str>,
    location: &'a Location,
}

/// `POST {base}/v1/cards/{card_id}/refresh`, optionally with a bearer token.
pub struct HttpContentPublisher {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpContentPublisher {
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`CollaboratorError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: http::build_client(timeout_secs, user_agent)?,
            base_url: http::normalise_base_url(base_url)?,
            token,
        })
    }
}

#[async_trait]
impl ContentPublisher for HttpContentPublisher {
    async fn publish_refresh(
        &self,
        card_id: &str,
        bird: &BirdDescriptor,
        intro_reference: Option<&str>,
        location: &Location,
    ) -> Result<(), CollaboratorError> {
        let url = http::endpoint(&self.base_url, &["v1", "cards", card_id, "refresh"])?;
        let body = PublishBody {
            bird,
            intro_reference,
            location,
        };

        let mut request = self.client.post(url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        http::check_status("content publisher", response).await?;

        tracing::debug!(card_id, bird = %bird.name, "publisher: card refreshed");
        Ok(())
    }
}
