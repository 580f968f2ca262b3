use crate::{
    format_post, Config, ContentGenerator, GenerationRequest, GenerationSource, ImageSource,
    MediaAsset, PostId, PublishResult, PublishedPost, WordPressClient,
};
use reqwest::Client;
use tracing::{info, warn};

/// Outcome of a run that got as far as creating the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub post: PublishedPost,
    /// Set only when the image was fetched, uploaded and linked.
    pub featured_media: Option<MediaAsset>,
    pub source: GenerationSource,
}

/// generate → format → publish → attach image.
pub struct Publisher {
    request: GenerationRequest,
    generator: ContentGenerator,
    wordpress: WordPressClient,
    images: ImageSource,
    image_query: String,
}

impl Publisher {
    #[must_use]
    pub fn new(
        request: GenerationRequest,
        generator: ContentGenerator,
        wordpress: WordPressClient,
        images: ImageSource,
        image_query: impl Into<String>,
    ) -> Self {
        Self {
            request,
            generator,
            wordpress,
            images,
            image_query: image_query.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let client = Client::new();
        Self::new(
            GenerationRequest::from_config(config),
            ContentGenerator::from_config(config, &client),
            WordPressClient::from_config(config, client.clone()),
            ImageSource::from_config(config, client),
            config.image_query.clone(),
        )
    }

    /// Run once. Only a failed draft creation is an error; image problems are
    /// logged and reported as `featured_media: None`.
    pub async fn run(&self) -> PublishResult<RunReport> {
        info!(keyword = %self.request.keyword, "Generating content");
        let generated = self.generator.generate(&self.request).await;

        let post = format_post(&generated.text, &self.request.keyword);
        info!(title = %post.title, body_chars = post.body.chars().count(), "Formatted post");

        let published = self.wordpress.create_draft(&post).await?;
        info!(post_id = %published.id, "Draft created");

        let featured_media = match self.attach_featured_image(published.id).await {
            Ok(media) => {
                info!(post_id = %published.id, media_id = %media.id, "Featured image set");
                Some(media)
            }
            Err(error) => {
                warn!(post_id = %published.id, error = %error, "Image attach failed");
                None
            }
        };

        Ok(RunReport {
            post: published,
            featured_media,
            source: generated.source,
        })
    }

    async fn attach_featured_image(&self, post: PostId) -> PublishResult<MediaAsset> {
        let image = self.images.fetch(&self.image_query).await?;
        let media = self.wordpress.upload_media(&image).await?;
        self.wordpress.set_featured_media(post, media.id).await?;
        Ok(media)
    }
}
