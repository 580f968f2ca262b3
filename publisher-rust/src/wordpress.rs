use crate::{
    client_utils::{ensure_success, read_json},
    image::ImageData,
    Config, FormattedPost, PublishError, PublishResult,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client,
};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use tracing::debug;

const POST_TIMEOUT: Duration = Duration::from_secs(30);
const MEDIA_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub id: PostId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub id: MediaId,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum PostStatus {
    Draft,
}

// https://developer.wordpress.org/rest-api/reference/posts/#create-a-post

#[derive(Debug, Serialize)]
struct CreatePostRequest<'a> {
    title: &'a str,
    content: &'a str,
    excerpt: &'a str,
    status: PostStatus,
}

#[derive(Debug, Serialize)]
struct UpdatePostRequest {
    featured_media: MediaId,
}

/// The subset of a post or media object we read back.
#[derive(Debug, Deserialize)]
struct CreatedResource<Id> {
    id: Option<Id>,
}

/// WordPress REST API client authenticated with an application password.
pub struct WordPressClient {
    base_url: String,
    username: String,
    app_password: String,
    client: Client,
}

impl WordPressClient {
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        app_password: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            app_password: app_password.into(),
            client,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(
            config.wp_url.clone(),
            config.wp_user.clone(),
            config.wp_app_pass.clone(),
            client,
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/wp-json/wp/v2/{path}", self.base_url)
    }

    /// `Authorization: Basic base64(user:password)`, rebuilt for every request.
    fn request_headers(&self) -> PublishResult<HeaderMap> {
        let credentials = STANDARD.encode(format!("{}:{}", self.username, self.app_password));
        let auth_header = HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|error| {
            PublishError::InvalidInput(format!("Invalid WordPress credentials header: {error}"))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth_header);
        Ok(headers)
    }

    /// Create the post in `draft` status and return its id.
    pub async fn create_draft(&self, post: &FormattedPost) -> PublishResult<PublishedPost> {
        let request = CreatePostRequest {
            title: &post.title,
            content: &post.body,
            excerpt: &post.excerpt,
            status: PostStatus::Draft,
        };

        let response = self
            .client
            .post(self.endpoint("posts"))
            .headers(self.request_headers()?)
            .timeout(POST_TIMEOUT)
            .json(&request)
            .send()
            .await?;
        let created: CreatedResource<PostId> = read_json(response).await?;

        let id = created.id.ok_or_else(|| {
            PublishError::Invariant("Post creation response has no id".to_string())
        })?;
        debug!(post_id = %id, "WordPress accepted draft");

        Ok(PublishedPost { id })
    }

    /// Upload raw image bytes as a new media item.
    pub async fn upload_media(&self, image: &ImageData) -> PublishResult<MediaAsset> {
        let mut headers = self.request_headers()?;
        let disposition = HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            image.filename
        ))
        .map_err(|error| PublishError::InvalidInput(format!("Invalid media filename: {error}")))?;
        let content_type = HeaderValue::from_str(&image.content_type).map_err(|error| {
            PublishError::InvalidInput(format!("Invalid media content type: {error}"))
        })?;
        headers.insert(header::CONTENT_DISPOSITION, disposition);
        headers.insert(header::CONTENT_TYPE, content_type);

        let response = self
            .client
            .post(self.endpoint("media"))
            .headers(headers)
            .timeout(MEDIA_TIMEOUT)
            .body(image.bytes.clone())
            .send()
            .await?;
        let created: CreatedResource<MediaId> = read_json(response).await?;

        let id = created.id.ok_or_else(|| {
            PublishError::Invariant("Media upload response has no id".to_string())
        })?;
        debug!(media_id = %id, bytes = image.bytes.len(), "WordPress stored media");

        Ok(MediaAsset { id })
    }

    /// Point the post's `featured_media` at an uploaded media item.
    pub async fn set_featured_media(&self, post: PostId, media: MediaId) -> PublishResult<()> {
        let response = self
            .client
            .post(self.endpoint(&format!("posts/{post}")))
            .headers(self.request_headers()?)
            .timeout(POST_TIMEOUT)
            .json(&UpdatePostRequest {
                featured_media: media,
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
