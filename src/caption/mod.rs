pub mod font;
pub mod shape;
pub mod text;
