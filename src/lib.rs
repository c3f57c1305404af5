//! Memeforge is the compositing core of a meme editor.
//!
//! Two independent pieces do the work:
//!
//! - The [`Compositor`] loads an image, fits and centers it on a fixed canvas, burns in outlined
//!   top/bottom captions and hands back a [`RenderedRaster`] that exports to PNG, JPEG or WebP.
//! - The [`ImageOptimizer`] downscales and re-encodes uploads, makes thumbnails and validates
//!   intrinsic dimensions.
//!
//! Persistence and blob storage are injected through [`MemeRepository`] and [`ImageStorage`]
//! and driven by [`MemeGallery`].
#![forbid(unsafe_code)]

mod foundation;

/// Image references, fetching and decoding.
pub mod assets;
/// Caption normalization, sizing, fonts and shaping.
pub mod caption;
/// Runtime configuration.
pub mod config;
/// Raster encoders and export side effects.
pub mod encode;
/// Meme records and the storage/persistence collaborators.
pub mod gallery;
/// Pure geometry.
pub mod layout;
/// Upload optimization and file policy.
pub mod optimize;
/// Surfaces, the compositor and render sessions.
pub mod render;

pub use crate::foundation::core::{Affine, Canvas, Quality, Rect, Vec2};
pub use crate::foundation::error::{MemeError, MemeResult};

pub use crate::assets::decode::DecodedImage;
#[cfg(feature = "http")]
pub use crate::assets::http::HttpFetcher;
pub use crate::assets::loader::ImageLoader;
pub use crate::assets::object_url::{ObjectUrl, ObjectUrlRegistry};
pub use crate::assets::source::{ImageFetcher, ImageSource, NoRemoteFetcher};
pub use crate::caption::font::{CaptionFont, FontProvider};
pub use crate::config::{
    CompositorOpts, DimensionBounds, MemeforgeConfig, OptimizeOpts, ThumbnailOpts,
};
pub use crate::encode::blob::Blob;
pub use crate::encode::encoder::select_format;
#[cfg(feature = "clipboard")]
pub use crate::encode::export::SystemClipboard;
pub use crate::encode::export::{
    ClipboardSink, copy_to_clipboard, download, export, export_data_url,
};
pub use crate::encode::format::OutputFormat;
pub use crate::gallery::model::{MemePatch, MemeRecord, NewMeme};
pub use crate::gallery::service::{MemeGallery, UploadedImage};
pub use crate::gallery::store::{
    ImageStorage, InMemoryImageStorage, InMemoryMemeRepository, MemeRepository,
};
pub use crate::optimize::optimizer::{
    DimensionIssue, DimensionReport, ImageOptimizer, OptimizedImage,
};
pub use crate::optimize::policy::{
    CaptionFormErrors, default_download_name, unique_filename, validate_caption_form,
    validate_meme_file, validate_upload_file,
};
pub use crate::optimize::upload::UploadFile;
pub use crate::render::compositor::{Compositor, MemeComposite};
pub use crate::render::raster::RenderedRaster;
pub use crate::render::session::{RenderSession, RenderTicket};
pub use crate::render::surface::{Painter, Surface};
