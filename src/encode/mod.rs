pub mod blob;
pub mod encoder;
pub mod export;
pub mod format;
