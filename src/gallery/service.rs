use std::{path::Path, sync::Arc};

use chrono::Utc;

use crate::{
    encode::{export::export, format::OutputFormat},
    foundation::error::MemeResult,
    gallery::{
        model::{MemePatch, MemeRecord, NewMeme},
        store::{ImageStorage, MemeRepository},
    },
    optimize::{
        optimizer::{ImageOptimizer, OptimizedImage},
        policy::{unique_filename, validate_meme_file},
        upload::UploadFile,
    },
    render::raster::RenderedRaster,
};

/// Result of [`MemeGallery::upload_optimized`].
#[derive(Clone, Debug)]
pub struct UploadedImage {
    /// Public URL returned by the storage backend.
    pub url: String,
    /// The re-encoded image that was stored.
    pub optimized: OptimizedImage,
}

/// Saves rendered memes and uploaded backgrounds through injected collaborators.
#[derive(Clone)]
pub struct MemeGallery {
    repo: Arc<dyn MemeRepository>,
    storage: Arc<dyn ImageStorage>,
}

impl std::fmt::Debug for MemeGallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemeGallery").finish_non_exhaustive()
    }
}

impl MemeGallery {
    pub fn new(repo: Arc<dyn MemeRepository>, storage: Arc<dyn ImageStorage>) -> Self {
        Self { repo, storage }
    }

    /// Validate `file` as a meme background and store it under a unique name.
    #[tracing::instrument(skip(self, file), fields(file = %file.name, size = file.size()))]
    pub async fn upload_image(&self, file: &UploadFile) -> MemeResult<String> {
        validate_meme_file(file)?;
        let name = unique_filename(&file.name, Utc::now());
        let url = self
            .storage
            .upload(Arc::clone(&file.bytes), &name, &file.mime)
            .await?;
        tracing::debug!(%url, "background uploaded");
        Ok(url)
    }

    /// Validate `file`, optimize it with the upload defaults and store the optimized bytes.
    ///
    /// The stored name keeps the original stem but takes the output format's extension, and the
    /// object is tagged with the output MIME type rather than the uploaded one.
    #[tracing::instrument(skip(self, optimizer, file), fields(file = %file.name, size = file.size()))]
    pub async fn upload_optimized(
        &self,
        optimizer: &ImageOptimizer,
        file: &UploadFile,
    ) -> MemeResult<UploadedImage> {
        validate_meme_file(file)?;
        let optimized = optimizer.optimize_for_upload(file).await?;

        let format = optimized.blob.format;
        let stem = Path::new(&file.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("upload");
        let name = unique_filename(&format!("{stem}.{}", format.extension()), Utc::now());
        let url = self
            .storage
            .upload(Arc::from(optimized.blob.bytes.as_slice()), &name, format.mime())
            .await?;
        tracing::debug!(
            %url,
            %format,
            ratio = optimized.compression_ratio,
            "optimized background uploaded"
        );
        Ok(UploadedImage { url, optimized })
    }

    /// Export `raster` as PNG, store it and record it with its captions.
    #[tracing::instrument(skip(self, raster, top_text, bottom_text))]
    pub async fn save_meme(
        &self,
        raster: &RenderedRaster,
        top_text: &str,
        bottom_text: &str,
    ) -> MemeResult<MemeRecord> {
        let blob = export(raster, OutputFormat::Png, None)?;
        let now = Utc::now();
        let name = unique_filename(&format!("meme-{}.png", now.timestamp_millis()), now);
        let image_url = self
            .storage
            .upload(Arc::from(blob.bytes), &name, OutputFormat::Png.mime())
            .await?;

        let record = self
            .repo
            .create(NewMeme {
                image_url,
                top_text: top_text.to_string(),
                bottom_text: bottom_text.to_string(),
            })
            .await?;
        tracing::debug!(id = %record.id, "meme saved");
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> MemeResult<MemeRecord> {
        self.repo.get_by_id(id).await
    }

    /// All memes, newest first.
    pub async fn list(&self) -> MemeResult<Vec<MemeRecord>> {
        self.repo.list().await
    }

    pub async fn update(&self, id: &str, patch: MemePatch) -> MemeResult<MemeRecord> {
        self.repo.update(id, patch).await
    }

    /// Delete the record, then its stored image.
    ///
    /// A storage failure is returned even though the record is already gone.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> MemeResult<()> {
        let record = self.repo.get_by_id(id).await?;
        self.repo.delete(id).await?;
        self.storage.delete(&record.image_url).await
    }

    pub async fn count(&self) -> MemeResult<u64> {
        self.repo.count().await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/service.rs"]
mod tests;
