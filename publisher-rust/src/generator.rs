use crate::{prompt::SYSTEM_PROMPT, template::fallback_article, Config, GenerationRequest};
use autopost_sdk::{
    huggingface::{HuggingFaceModel, HuggingFaceModelOptions},
    openai::{OpenAIChatModel, OpenAIChatModelOptions},
    LanguageModel, LanguageModelInput, LanguageModelResult,
};
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

/// A configured model plus the sampling parameters it is called with.
pub struct GenerationTier {
    model: Arc<dyn LanguageModel>,
    system_prompt: Option<String>,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl GenerationTier {
    /// Chat-completion tier: system prompt, low temperature, long output.
    #[must_use]
    pub fn chat(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: 1600,
            temperature: Some(0.2),
        }
    }

    /// Raw text-generation tier: prompt only, shorter output.
    #[must_use]
    pub fn inference(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            system_prompt: None,
            max_tokens: 800,
            temperature: None,
        }
    }

    fn input(&self, request: &GenerationRequest) -> LanguageModelInput {
        LanguageModelInput {
            system_prompt: self.system_prompt.clone(),
            prompt: request.prompt(),
            max_tokens: Some(self.max_tokens),
            temperature: self.temperature,
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> LanguageModelResult<String> {
        let response = self.model.generate(self.input(request)).await?;
        Ok(response.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationSource {
    Model {
        provider: &'static str,
        model_id: String,
    },
    Template,
}

/// Raw article text, first line title, and which tier produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    pub text: String,
    pub source: GenerationSource,
}

/// Produces article text from the configured model, or from the built-in
/// template when there is no model or the model call fails. Never fails.
pub struct ContentGenerator {
    primary: Option<GenerationTier>,
}

impl ContentGenerator {
    #[must_use]
    pub fn new(primary: Option<GenerationTier>) -> Self {
        Self { primary }
    }

    /// The `OpenAI` key wins over the Hugging Face token; with neither set
    /// only the template is used.
    #[must_use]
    pub fn from_config(config: &Config, client: &Client) -> Self {
        let primary = if let Some(api_key) = &config.openai_api_key {
            let model = OpenAIChatModel::new(
                config.openai_model.clone(),
                OpenAIChatModelOptions {
                    base_url: config.openai_base_url.clone(),
                    api_key: api_key.clone(),
                    client: Some(client.clone()),
                    ..Default::default()
                },
            );
            Some(GenerationTier::chat(Arc::new(model)))
        } else if let Some(api_token) = &config.hf_token {
            let model = HuggingFaceModel::new(HuggingFaceModelOptions {
                model_url: config.hf_model_url.clone(),
                api_token: api_token.clone(),
                client: Some(client.clone()),
                ..Default::default()
            });
            Some(GenerationTier::inference(Arc::new(model)))
        } else {
            None
        };

        Self::new(primary)
    }

    pub async fn generate(&self, request: &GenerationRequest) -> GeneratedText {
        if let Some(tier) = &self.primary {
            let provider = tier.model.provider();
            let model_id = tier.model.model_id();
            info!(provider, model_id = %model_id, "Requesting article from model");

            match tier.generate(request).await {
                Ok(text) => {
                    return GeneratedText {
                        text,
                        source: GenerationSource::Model { provider, model_id },
                    }
                }
                Err(error) => {
                    warn!(provider, error = %error, "Model call failed, using fallback generator");
                }
            }
        } else {
            info!("No model credentials configured, using fallback generator");
        }

        GeneratedText {
            text: fallback_article(request),
            source: GenerationSource::Template,
        }
    }
}
