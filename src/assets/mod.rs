pub mod decode;
#[cfg(feature = "http")]
pub mod http;
pub mod loader;
pub mod object_url;
pub mod source;
