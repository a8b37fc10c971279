use std::{io::ErrorKind, path::PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::engine::store::ProgressStore;

use super::{ProgressDocument, ProgressStorage};

/// Document store writing one JSON file per user. Used when no remote
/// endpoint is configured so the tracker keeps working offline.
pub struct LocalDocumentStore {
    document_dir: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(document_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&document_dir)?;

        Ok(Self { document_dir })
    }

    fn document_path(&self, user: &str) -> PathBuf {
        self.document_dir.join(format!("{user}.json"))
    }
}

#[async_trait]
impl ProgressStorage for LocalDocumentStore {
    async fn load(&self, user: &str) -> Result<Option<ProgressStore>> {
        let path = self.document_path(user);
        debug!("Loading progress document from {path:?}");
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let document: ProgressDocument = serde_json::from_slice(&bytes)?;
                Ok(Some(document.progress_data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)?,
        }
    }

    async fn save(&self, user: &str, store: ProgressStore) -> Result<()> {
        let path = self.document_path(user);
        debug!("Saving progress document to {path:?}");
        let bytes = serde_json::to_vec(&ProgressDocument {
            progress_data: store,
        })?;
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{catalog::catalog, engine::logger::ActivityLogger};

    use super::*;

    #[tokio::test]
    async fn missing_document_loads_as_none() -> Result<()> {
        let dir = tempdir()?;
        let storage = LocalDocumentStore::new(dir.path().to_owned())?;
        assert_eq!(storage.load("test@user.com").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn saved_document_loads_back() -> Result<()> {
        let dir = tempdir()?;
        let storage = LocalDocumentStore::new(dir.path().to_owned())?;

        let logger = ActivityLogger::new(catalog());
        let mut store = ProgressStore::default();
        let key = "2024-03-05".parse().unwrap();
        logger.add_walking_minutes(&mut store, &key, 20).unwrap();
        logger.set_diet_completed(&mut store, &key);

        storage.save("test@user.com", store.clone()).await?;
        let loaded = storage.load("test@user.com").await?;
        assert_eq!(loaded, Some(store));
        Ok(())
    }

    #[tokio::test]
    async fn corrupted_document_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let storage = LocalDocumentStore::new(dir.path().to_owned())?;
        std::fs::write(dir.path().join("test@user.com.json"), b"not json")?;
        assert!(storage.load("test@user.com").await.is_err());
        Ok(())
    }
}
