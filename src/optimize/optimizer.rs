use std::sync::Arc;

use image::imageops::FilterType;

use crate::{
    assets::{decode::decode_rgba8, loader::ImageLoader, source::ImageSource},
    config::{DimensionBounds, OptimizeOpts, ThumbnailOpts},
    encode::{
        blob::Blob,
        encoder::{encode_rgba_image, select_format},
        format::OutputFormat,
    },
    foundation::error::{MemeError, MemeResult},
    layout::fit::{fit_within, thumbnail_size},
    optimize::upload::UploadFile,
};

/// Result of re-encoding an upload.
#[derive(Clone, Debug)]
pub struct OptimizedImage {
    /// Re-encoded file.
    pub blob: Blob,
    /// `blob` as a data URL.
    pub data_url: String,
    pub original_size_bytes: usize,
    pub optimized_size_bytes: usize,
    /// `(original - optimized) / original`. Negative when re-encoding grew the file.
    pub compression_ratio: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// Why an image failed dimension validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DimensionIssue {
    TooSmall { min_width: u32, min_height: u32 },
    TooLarge { max_width: u32, max_height: u32 },
    Undecodable,
}

impl std::fmt::Display for DimensionIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooSmall {
                min_width,
                min_height,
            } => write!(f, "Image too small. Minimum size: {min_width}x{min_height}px"),
            Self::TooLarge {
                max_width,
                max_height,
            } => write!(f, "Image too large. Maximum size: {max_width}x{max_height}px"),
            Self::Undecodable => f.write_str("Failed to load image"),
        }
    }
}

/// Outcome of [`ImageOptimizer::validate_dimensions`]. Undecodable input reports `0x0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DimensionReport {
    pub valid: bool,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DimensionIssue>,
}

/// Downscales and re-encodes uploads, makes thumbnails and checks dimensions.
///
/// Every decode goes through a scoped object URL that is revoked when the decode finishes,
/// whether it succeeded or not.
#[derive(Clone, Debug, Default)]
pub struct ImageOptimizer {
    loader: ImageLoader,
}

impl ImageOptimizer {
    pub fn new(loader: ImageLoader) -> Self {
        Self { loader }
    }

    /// Loader whose object-URL registry backs decodes.
    pub fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    async fn decode_file(&self, file: &UploadFile) -> MemeResult<image::RgbaImage> {
        let url = self.loader.blobs().create(Arc::clone(&file.bytes));
        let bytes = self
            .loader
            .fetch_bytes(&ImageSource::Blob(url.as_str().to_string()))
            .await?;
        decode_rgba8(&bytes)
    }

    /// Intrinsic dimensions of `file` without decoding its pixels.
    pub async fn get_image_dimensions(&self, file: &UploadFile) -> MemeResult<(u32, u32)> {
        let url = self.loader.blobs().create(Arc::clone(&file.bytes));
        self.loader
            .probe(&ImageSource::Blob(url.as_str().to_string()))
            .await
    }

    /// Downscale `file` to fit `opts` bounds and re-encode it.
    #[tracing::instrument(skip(self, file, opts), fields(file = %file.name, size = file.size()))]
    pub async fn optimize(&self, file: &UploadFile, opts: &OptimizeOpts) -> MemeResult<OptimizedImage> {
        opts.validate()?;
        let source = self
            .decode_file(file)
            .await
            .map_err(|e| MemeError::optimize(format!("failed to load image '{}': {e}", file.name)))?;

        let (w, h) = source.dimensions();
        let (out_w, out_h) = fit_within(w, h, opts.max_width, opts.max_height);
        let resized = if (out_w, out_h) == (w, h) {
            source
        } else {
            image::imageops::resize(&source, out_w, out_h, FilterType::Triangle)
        };

        let format = opts.format.unwrap_or_else(select_format);
        let blob = encode_rgba_image(&resized, format, opts.quality)?;

        let original_size_bytes = file.size();
        let optimized_size_bytes = blob.size();
        let compression_ratio = if original_size_bytes == 0 {
            0.0
        } else {
            (original_size_bytes as f64 - optimized_size_bytes as f64) / original_size_bytes as f64
        };
        tracing::debug!(
            from = %format_args!("{w}x{h}"),
            to = %format_args!("{out_w}x{out_h}"),
            %format,
            original_size_bytes,
            optimized_size_bytes,
            compression_ratio,
            "upload optimized"
        );

        Ok(OptimizedImage {
            data_url: blob.to_data_url(),
            blob,
            original_size_bytes,
            optimized_size_bytes,
            compression_ratio,
            width: out_w,
            height: out_h,
        })
    }

    /// Optimize with the default upload settings.
    pub async fn optimize_for_upload(&self, file: &UploadFile) -> MemeResult<OptimizedImage> {
        self.optimize(file, &OptimizeOpts::default()).await
    }

    /// JPEG thumbnail data URL whose longer side is `size` pixels.
    pub async fn create_thumbnail(&self, file: &UploadFile, size: u32) -> MemeResult<String> {
        self.create_thumbnail_with(
            file,
            &ThumbnailOpts {
                size,
                ..ThumbnailOpts::default()
            },
        )
        .await
    }

    /// Thumbnail with explicit settings.
    #[tracing::instrument(skip(self, file, opts), fields(file = %file.name, size = opts.size))]
    pub async fn create_thumbnail_with(
        &self,
        file: &UploadFile,
        opts: &ThumbnailOpts,
    ) -> MemeResult<String> {
        if opts.size == 0 {
            return Err(MemeError::validation("thumbnail size must be > 0"));
        }
        let source = self.decode_file(file).await.map_err(|e| {
            MemeError::optimize(format!("failed to load image for thumbnail '{}': {e}", file.name))
        })?;
        let (w, h) = source.dimensions();
        let (tw, th) = thumbnail_size(w, h, opts.size);
        let thumb = image::imageops::resize(&source, tw, th, FilterType::Triangle);
        let blob = encode_rgba_image(&thumb, OutputFormat::Jpeg, opts.quality)?;
        Ok(blob.to_data_url())
    }

    /// Check `file` against `bounds`. Never fails; problems are reported in the result.
    #[tracing::instrument(skip(self, file, bounds), fields(file = %file.name))]
    pub async fn validate_dimensions(&self, file: &UploadFile, bounds: &DimensionBounds) -> DimensionReport {
        let (width, height) = match self.get_image_dimensions(file).await {
            Ok(dims) => dims,
            Err(e) => {
                tracing::debug!(error = %e, "dimension probe failed");
                return DimensionReport {
                    valid: false,
                    width: 0,
                    height: 0,
                    error: Some(DimensionIssue::Undecodable),
                };
            }
        };

        let error = if width < bounds.min_width || height < bounds.min_height {
            Some(DimensionIssue::TooSmall {
                min_width: bounds.min_width,
                min_height: bounds.min_height,
            })
        } else if width > bounds.max_width || height > bounds.max_height {
            Some(DimensionIssue::TooLarge {
                max_width: bounds.max_width,
                max_height: bounds.max_height,
            })
        } else {
            None
        };

        DimensionReport {
            valid: error.is_none(),
            width,
            height,
            error,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/optimize/optimizer.rs"]
mod tests;
