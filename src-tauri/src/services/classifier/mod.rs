pub mod inference;
pub mod model_context;
