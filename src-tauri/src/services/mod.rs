pub mod classifier;
pub mod presentation;
pub mod session;
