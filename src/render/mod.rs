pub mod compositor;
pub mod raster;
pub mod session;
pub mod surface;
