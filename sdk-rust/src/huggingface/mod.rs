mod api;
mod model;

pub use model::{HuggingFaceModel, HuggingFaceModelOptions};
