use crate::ConfigError;

pub const DEFAULT_AFFILIATE_LINK: &str = "https://affiliate.example/?ref=you";
pub const DEFAULT_PRIMARY_KEYWORD: &str = "best marketing automation tools 2025";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://source.unsplash.com";
pub const DEFAULT_IMAGE_QUERY: &str = "saas dashboard";

/// Everything a run needs, read once from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Blog base URL without trailing slash, e.g. `https://your-site.com`.
    pub wp_url: String,
    pub wp_user: String,
    /// WordPress application password (not the login password).
    pub wp_app_pass: String,
    pub affiliate_link: String,
    pub primary_keyword: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub openai_model: String,
    pub hf_token: Option<String>,
    pub hf_model_url: Option<String>,
    pub image_base_url: String,
    pub image_query: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &'static str| optional(key).ok_or(ConfigError::Missing(key));
        let or_default = |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            wp_url: required("WP_URL")?.trim_end_matches('/').to_string(),
            wp_user: required("WP_USER")?,
            wp_app_pass: required("WP_APP_PASS")?,
            affiliate_link: or_default("AFF_LINK", DEFAULT_AFFILIATE_LINK),
            primary_keyword: or_default("PRIMARY_KEYWORD", DEFAULT_PRIMARY_KEYWORD),
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_base_url: optional("OPENAI_BASE_URL"),
            openai_model: or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            hf_token: optional("HF_TOKEN"),
            hf_model_url: optional("HF_MODEL_URL"),
            image_base_url: or_default("IMAGE_BASE_URL", DEFAULT_IMAGE_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            image_query: or_default("IMAGE_QUERY", DEFAULT_IMAGE_QUERY),
        })
    }
}
