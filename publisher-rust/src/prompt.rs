use crate::Config;

pub const SYSTEM_PROMPT: &str = "You are an expert B2B SaaS writer.";

/// What to write about and which link the call to action should carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub keyword: String,
    pub affiliate_link: String,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(keyword: impl Into<String>, affiliate_link: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            affiliate_link: affiliate_link.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.primary_keyword, &config.affiliate_link)
    }

    /// The instruction sent to a language model.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Write an SEO-friendly article (~900-1400 words) about: '{}'. Include: title, short \
             meta description (<=150 chars), H1, H2 sections, 3 FAQs, and a final CTA paragraph \
             with this affiliate link: {}. Return plain text starting with the title on the \
             first line.",
            self.keyword, self.affiliate_link
        )
    }
}
