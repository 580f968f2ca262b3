mod client_utils;
mod config;
mod errors;
mod formatter;
mod generator;
mod image;
mod pipeline;
mod prompt;
mod template;
mod wordpress;

pub use config::*;
pub use errors::{ConfigError, PublishError, PublishResult};
pub use formatter::{
    append_marker, excerpt, format_post, wrap_paragraphs, FormattedPost, COMPLETION_MARKER,
    EXCERPT_CHARS,
};
pub use generator::{ContentGenerator, GeneratedText, GenerationSource, GenerationTier};
pub use image::{ImageData, ImageSource};
pub use pipeline::{Publisher, RunReport};
pub use prompt::{GenerationRequest, SYSTEM_PROMPT};
pub use template::fallback_article;
pub use wordpress::{MediaAsset, MediaId, PostId, PublishedPost, WordPressClient};
