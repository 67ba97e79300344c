//! The bird-of-the-day selector service.

use async_trait::async_trait;
use birdday_core::Location;
use reqwest::{Client, Url};

use crate::bird::BirdDescriptor;
use crate::error::CollaboratorError;
use crate::http;

#[async_trait]
pub trait BirdSelector: Send + Sync {
    /// Pick the bird for `location`'s day.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the selector cannot be reached or
    /// declines to answer.
    async fn select_bird_of_day(&self, location: &Location)
        -> Result<BirdDescriptor, CollaboratorError>;
}

/// `POST {base}/v1/bird-of-the-day` with the location as the JSON body.
pub struct HttpBirdSelector {
    client: Client,
    base_url: Url,
}

impl HttpBirdSelector {
    /// # Errors
    ///
    /// Returns [`CollaboratorError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`CollaboratorError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: http::build_client(timeout_secs, user_agent)?,
            base_url: http::normalise_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl BirdSelector for HttpBirdSelector {
    async fn select_bird_of_day(
        &self,
        location: &Location,
    ) -> Result<BirdDescriptor, CollaboratorError> {
        let url = http::endpoint(&self.base_url, &["v1", "bird-of-the-day"])?;
        let response = self.client.post(url.clone()).json(location).send().await?;
        let response = http::check_status("bird selector", response).await?;
        let bird: BirdDescriptor = http::decode_json(response, &url).await?;
        tracing::debug!(bird = %bird.name, city = %location.city, "selector: bird chosen");
        Ok(bird)
    }
}
