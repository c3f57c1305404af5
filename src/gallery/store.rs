use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    foundation::error::{MemeError, MemeResult},
    gallery::model::{MemePatch, MemeRecord, NewMeme},
};

/// Persistence collaborator for meme records.
#[async_trait::async_trait]
pub trait MemeRepository: Send + Sync {
    /// Insert a record, assigning its id and creation time.
    async fn create(&self, meme: NewMeme) -> MemeResult<MemeRecord>;
    /// Fetch one record; [`MemeError::NotFound`] when absent.
    async fn get_by_id(&self, id: &str) -> MemeResult<MemeRecord>;
    /// Apply a partial update and return the new record.
    async fn update(&self, id: &str, patch: MemePatch) -> MemeResult<MemeRecord>;
    async fn delete(&self, id: &str) -> MemeResult<()>;
    /// All records, newest first.
    async fn list(&self) -> MemeResult<Vec<MemeRecord>>;
    async fn count(&self) -> MemeResult<u64>;
}

/// Blob storage collaborator for image files.
#[async_trait::async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `bytes` under `name` and return its public URL.
    async fn upload(&self, bytes: Arc<[u8]>, name: &str, mime: &str) -> MemeResult<String>;
    /// Remove the object behind `public_url`.
    async fn delete(&self, public_url: &str) -> MemeResult<()>;
}

/// Process-local [`MemeRepository`].
#[derive(Debug, Default)]
pub struct InMemoryMemeRepository {
    records: RwLock<Vec<MemeRecord>>,
}

impl InMemoryMemeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: &str) -> MemeError {
    MemeError::not_found(format!("meme '{id}'"))
}

#[async_trait::async_trait]
impl MemeRepository for InMemoryMemeRepository {
    async fn create(&self, meme: NewMeme) -> MemeResult<MemeRecord> {
        let record = MemeRecord {
            id: uuid::Uuid::new_v4().to_string(),
            image_url: meme.image_url,
            top_text: meme.top_text,
            bottom_text: meme.bottom_text,
            created_at: chrono::Utc::now(),
        };
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: &str) -> MemeResult<MemeRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn update(&self, id: &str, patch: MemePatch) -> MemeResult<MemeRecord> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;
        patch.apply_to(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> MemeResult<()> {
        let mut records = self.records.write().await;
        let idx = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| not_found(id))?;
        records.remove(idx);
        Ok(())
    }

    async fn list(&self) -> MemeResult<Vec<MemeRecord>> {
        // Reverse insertion order first so equal timestamps still list newest first.
        let mut all: Vec<_> = self.records.read().await.iter().rev().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn count(&self) -> MemeResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}

/// Process-local [`ImageStorage`] serving URLs under a fixed base.
#[derive(Debug)]
pub struct InMemoryImageStorage {
    base_url: String,
    objects: RwLock<HashMap<String, (String, Arc<[u8]>)>>,
}

impl Default for InMemoryImageStorage {
    fn default() -> Self {
        Self::new("memory://meme-images")
    }
}

impl InMemoryImageStorage {
    /// Storage whose public URLs are `<base_url>/<name>`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Stored bytes and MIME type for `name`.
    pub async fn get(&self, name: &str) -> Option<(String, Arc<[u8]>)> {
        self.objects.read().await.get(name).cloned()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ImageStorage for InMemoryImageStorage {
    async fn upload(&self, bytes: Arc<[u8]>, name: &str, mime: &str) -> MemeResult<String> {
        if name.is_empty() || name.contains('/') {
            return Err(MemeError::storage(format!("invalid object name '{name}'")));
        }
        let mut objects = self.objects.write().await;
        if objects.contains_key(name) {
            return Err(MemeError::storage(format!("Upload failed: '{name}' already exists")));
        }
        objects.insert(name.to_string(), (mime.to_string(), bytes));
        Ok(format!("{}/{name}", self.base_url))
    }

    async fn delete(&self, public_url: &str) -> MemeResult<()> {
        let name = public_url.rsplit('/').next().unwrap_or(public_url);
        self.objects
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| MemeError::storage(format!("no stored object '{name}'")))
    }
}
