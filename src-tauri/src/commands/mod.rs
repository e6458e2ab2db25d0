pub mod classifier;
pub mod session;
pub mod upload;
