pub mod optimizer;
pub mod policy;
pub mod upload;
