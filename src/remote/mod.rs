//! Persistence of the progress store as a single per-user document. One
//! read at session start, one full-overwrite write per mutation, nothing
//! fancier than that.

pub mod http;
pub mod local;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::engine::store::ProgressStore;

/// Layout of the stored document. The store lives under a `progressData`
/// field rather than at the top level, matching the historical documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressDocument {
    #[serde(rename = "progressData", default)]
    pub progress_data: ProgressStore,
}

/// Interface for abstracting storage of the progress document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressStorage: Send + Sync + 'static {
    /// Reads the user's document. `Ok(None)` means the user has no document
    /// yet, which callers treat as an empty store.
    async fn load(&self, user: &str) -> Result<Option<ProgressStore>>;

    /// Overwrites the user's document with the given snapshot.
    async fn save(&self, user: &str, store: ProgressStore) -> Result<()>;
}
