mod model;

pub use model::{MockGenerateResult, MockLanguageModel};
