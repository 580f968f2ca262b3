use super::api::{TextGenerationParameters, TextGenerationRequest, TextGenerationResponse};
use crate::{
    client_utils, LanguageModel, LanguageModelError, LanguageModelInput, LanguageModelResult,
    ModelResponse,
};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client,
};
use serde_json::Value;
use std::time::Duration;

const PROVIDER: &str = "huggingface";
const DEFAULT_MODEL_URL: &str = "https://api-inference.huggingface.co/models/gpt2";
const DEFAULT_MAX_NEW_TOKENS: u32 = 800;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Text generation through a hosted Hugging Face inference endpoint.
///
/// The endpoint URL addresses the model, so the model id reported by this
/// type is the last path segment of that URL.
pub struct HuggingFaceModel {
    model_url: String,
    api_token: String,
    client: Client,
    timeout: Duration,
}

#[derive(Clone, Default)]
pub struct HuggingFaceModelOptions {
    pub model_url: Option<String>,
    pub api_token: String,
    pub client: Option<Client>,
    pub timeout: Option<Duration>,
}

impl HuggingFaceModel {
    #[must_use]
    pub fn new(options: HuggingFaceModelOptions) -> Self {
        let HuggingFaceModelOptions {
            model_url,
            api_token,
            client,
            timeout,
        } = options;

        let model_url = model_url
            .unwrap_or_else(|| DEFAULT_MODEL_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            model_url,
            api_token,
            client: client.unwrap_or_else(Client::new),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }

    fn request_headers(&self) -> LanguageModelResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth_header =
            HeaderValue::from_str(&format!("Bearer {}", self.api_token)).map_err(|error| {
                LanguageModelError::InvalidInput(format!(
                    "Invalid Hugging Face token header value: {error}"
                ))
            })?;
        headers.insert(header::AUTHORIZATION, auth_header);
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl LanguageModel for HuggingFaceModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_url
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        crate::opentelemetry::trace_generate(
            self.provider(),
            &self.model_id(),
            input,
            |input| async move {
                let request = TextGenerationRequest {
                    inputs: input.prompt,
                    parameters: TextGenerationParameters {
                        max_new_tokens: input.max_tokens.unwrap_or(DEFAULT_MAX_NEW_TOKENS),
                        temperature: input.temperature,
                    },
                };
                let headers = self.request_headers()?;

                let response: TextGenerationResponse = client_utils::send_json(
                    &self.client,
                    &self.model_url,
                    &request,
                    headers,
                    self.timeout,
                )
                .await?;

                Ok(ModelResponse::text(map_generated_text(response)?))
            },
        )
        .await
    }
}

fn map_generated_text(response: TextGenerationResponse) -> LanguageModelResult<String> {
    let text = match response {
        TextGenerationResponse::Batch(outputs) => outputs
            .into_iter()
            .next()
            .map(|output| output.generated_text)
            .ok_or_else(|| {
                LanguageModelError::Invariant(PROVIDER, "Empty generation batch".to_string())
            })?,
        TextGenerationResponse::Single(output) => output.generated_text,
        // Some models answer with a bare object of their own shape; keep it as text.
        TextGenerationResponse::Other(value @ Value::Object(_)) => value.to_string(),
        TextGenerationResponse::Other(value) => {
            return Err(LanguageModelError::Invariant(
                PROVIDER,
                format!("Unrecognized generation response: {value}"),
            ))
        }
    };

    if text.trim().is_empty() {
        return Err(LanguageModelError::Invariant(
            PROVIDER,
            "No generated text in response".to_string(),
        ));
    }
    Ok(text)
}
