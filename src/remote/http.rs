use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::engine::store::ProgressStore;

use super::{ProgressDocument, ProgressStorage};

/// Document store backed by a remote endpoint exposing one JSON document per
/// user under `/users/{id}`. Only whole-document reads and writes are used.
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn document_url(&self, user: &str) -> String {
        format!("{}/users/{user}", self.base_url)
    }
}

#[async_trait]
impl ProgressStorage for HttpDocumentStore {
    async fn load(&self, user: &str) -> Result<Option<ProgressStore>> {
        let url = self.document_url(user);
        debug!("Loading progress document from {url}");
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let document: ProgressDocument = response.error_for_status()?.json().await?;
        Ok(Some(document.progress_data))
    }

    async fn save(&self, user: &str, store: ProgressStore) -> Result<()> {
        let url = self.document_url(user);
        debug!("Saving progress document to {url}");
        self.client
            .put(&url)
            .json(&ProgressDocument {
                progress_data: store,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
