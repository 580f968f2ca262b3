mod client_utils;
mod errors;
pub mod huggingface;
mod language_model;
pub mod openai;
mod opentelemetry;
pub mod sdk_test;
mod types;

pub use errors::*;
pub use language_model::LanguageModel;
pub use types::*;
