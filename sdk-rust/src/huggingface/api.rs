use serde::{Deserialize, Serialize};
use serde_json::Value;

// https://huggingface.co/docs/api-inference/tasks/text-generation

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TextGenerationRequest {
    pub inputs: String,
    pub parameters: TextGenerationParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TextGenerationParameters {
    pub max_new_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedOutput {
    pub generated_text: String,
}

/// Inference endpoints either return a batch of outputs or a single object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextGenerationResponse {
    Batch(Vec<GeneratedOutput>),
    Single(GeneratedOutput),
    Other(Value),
}
