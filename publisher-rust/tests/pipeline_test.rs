mod common;

use autopost::{
    Config, GenerationSource, MediaAsset, MediaId, PostId, PublishError, Publisher,
    COMPLETION_MARKER, EXCERPT_CHARS,
};
use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use common::{BoxedError, StubServer};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
const BASIC_AUTH: &str = "Basic ZWRpdG9yOnNlY3JldA==";

#[derive(Debug, Clone, PartialEq)]
enum Recorded {
    Chat,
    Inference {
        authorization: Option<String>,
        body: Value,
    },
    CreatePost {
        authorization: Option<String>,
        body: Value,
    },
    FetchImage {
        query: Option<String>,
    },
    UploadMedia {
        authorization: Option<String>,
        disposition: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
    UpdatePost {
        id: u64,
        authorization: Option<String>,
        body: Value,
    },
}

/// Status codes the stub answers with; everything succeeds by default.
#[derive(Clone, Copy)]
struct StubOptions {
    post_status: StatusCode,
    image_status: StatusCode,
    redirect_image: bool,
    upload_status: StatusCode,
    update_status: StatusCode,
    inference_status: StatusCode,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            post_status: StatusCode::CREATED,
            image_status: StatusCode::OK,
            redirect_image: false,
            upload_status: StatusCode::CREATED,
            update_status: StatusCode::OK,
            inference_status: StatusCode::OK,
        }
    }
}

struct StubState {
    options: StubOptions,
    log: Mutex<Vec<Recorded>>,
}

impl StubState {
    fn record(&self, entry: Recorded) {
        self.log.lock().unwrap().push(entry);
    }
}

struct StubBlog {
    server: StubServer,
    state: Arc<StubState>,
}

impl StubBlog {
    async fn start(options: StubOptions) -> Result<Self, BoxedError> {
        let state = Arc::new(StubState {
            options,
            log: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .route("/models/gpt2", post(inference))
            .route("/wp-json/wp/v2/posts", post(create_post))
            .route("/wp-json/wp/v2/posts/{id}", post(update_post))
            .route("/wp-json/wp/v2/media", post(upload_media))
            .route("/1200x630/", get(random_image))
            .route("/photos/hero.jpg", get(photo))
            .with_state(state.clone());

        Ok(Self {
            server: StubServer::start(router).await?,
            state,
        })
    }

    fn log(&self) -> Vec<Recorded> {
        self.state.log.lock().unwrap().clone()
    }

    fn config(&self, extra: &[(&str, &str)]) -> Config {
        let url = self.server.url().to_string();
        let mut vars: HashMap<String, String> = HashMap::from([
            ("WP_URL".to_string(), format!("{url}/")),
            ("WP_USER".to_string(), "editor".to_string()),
            ("WP_APP_PASS".to_string(), "secret".to_string()),
            ("IMAGE_BASE_URL".to_string(), url.clone()),
        ]);
        for (key, value) in extra {
            vars.insert((*key).to_string(), value.replace("{url}", &url));
        }
        Config::from_lookup(|key| vars.get(key).cloned()).expect("stub config is complete")
    }

    async fn stop(self) -> Result<(), BoxedError> {
        self.server.stop().await
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn chat_completions(State(state): State<Arc<StubState>>) -> impl IntoResponse {
    state.record(Recorded::Chat);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "message": "upstream unavailable" } })),
    )
}

async fn inference(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.record(Recorded::Inference {
        authorization: header_value(&headers, header::AUTHORIZATION),
        body,
    });
    let status = state.options.inference_status;
    if status.is_success() {
        (
            status,
            Json(json!([{ "generated_text": "Model picked CRMs\nHubSpot leads the pack." }])),
        )
    } else {
        (status, Json(json!({ "error": "Model gpt2 is currently loading" })))
    }
}

async fn create_post(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.record(Recorded::CreatePost {
        authorization: header_value(&headers, header::AUTHORIZATION),
        body,
    });
    if state.options.post_status.is_success() {
        (
            StatusCode::CREATED,
            Json(json!({ "id": 42, "status": "draft" })),
        )
    } else {
        (
            state.options.post_status,
            Json(json!({ "code": "internal_server_error" })),
        )
    }
}

async fn update_post(
    State(state): State<Arc<StubState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let featured_media = body["featured_media"].clone();
    state.record(Recorded::UpdatePost {
        id,
        authorization: header_value(&headers, header::AUTHORIZATION),
        body,
    });
    let status = state.options.update_status;
    if status.is_success() {
        (
            status,
            Json(json!({ "id": id, "featured_media": featured_media })),
        )
    } else {
        (status, Json(json!({ "code": "rest_cannot_edit" })))
    }
}

async fn upload_media(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.record(Recorded::UploadMedia {
        authorization: header_value(&headers, header::AUTHORIZATION),
        disposition: header_value(&headers, header::CONTENT_DISPOSITION),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        bytes: body.to_vec(),
    });
    let status = state.options.upload_status;
    if status.is_success() {
        (status, Json(json!({ "id": 7 })))
    } else {
        (status, Json(json!({ "code": "rest_upload_unknown_error" })))
    }
}

async fn random_image(
    State(state): State<Arc<StubState>>,
    RawQuery(query): RawQuery,
) -> Response {
    state.record(Recorded::FetchImage { query });
    if state.options.redirect_image {
        Redirect::temporary("/photos/hero.jpg").into_response()
    } else if state.options.image_status.is_success() {
        photo().await.into_response()
    } else {
        (state.options.image_status, "no such image").into_response()
    }
}

async fn photo() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/jpeg")], JPEG_BYTES)
}

fn expected_upload() -> Recorded {
    Recorded::UploadMedia {
        authorization: Some(BASIC_AUTH.to_string()),
        disposition: Some("attachment; filename=\"hero.jpg\"".to_string()),
        content_type: Some("image/jpeg".to_string()),
        bytes: JPEG_BYTES.to_vec(),
    }
}

fn expected_fetch() -> Recorded {
    Recorded::FetchImage {
        query: Some("saas%20dashboard".to_string()),
    }
}

#[tokio::test]
async fn run_creates_draft_and_sets_featured_image() -> Result<(), BoxedError> {
    let blog = StubBlog::start(StubOptions::default()).await?;

    let report = Publisher::from_config(&blog.config(&[])).run().await?;

    assert_eq!(report.post.id, PostId(42));
    assert_eq!(report.featured_media, Some(MediaAsset { id: MediaId(7) }));
    assert_eq!(report.source, GenerationSource::Template);

    let log = blog.log();
    assert_eq!(log.len(), 4);

    let Recorded::CreatePost {
        authorization,
        body,
    } = &log[0]
    else {
        panic!("expected post creation first, got {:?}", log[0]);
    };
    assert_eq!(authorization.as_deref(), Some(BASIC_AUTH));
    assert_eq!(
        body["title"],
        "best marketing automation tools 2025 — A practical guide"
    );
    assert_eq!(body["status"], "draft");
    let content = body["content"].as_str().unwrap();
    assert_eq!(content.matches(COMPLETION_MARKER).count(), 1);
    assert!(content.contains("https://affiliate.example/?ref=you"));
    let excerpt = body["excerpt"].as_str().unwrap();
    assert!(excerpt.chars().count() <= EXCERPT_CHARS);
    assert!(content.starts_with(excerpt));

    assert_eq!(log[1], expected_fetch());
    assert_eq!(log[2], expected_upload());
    assert_eq!(
        log[3],
        Recorded::UpdatePost {
            id: 42,
            authorization: Some(BASIC_AUTH.to_string()),
            body: json!({ "featured_media": 7 }),
        }
    );

    blog.stop().await
}

#[tokio::test]
async fn publish_failure_stops_before_image_work() -> Result<(), BoxedError> {
    let blog = StubBlog::start(StubOptions {
        post_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..StubOptions::default()
    })
    .await?;

    let error = Publisher::from_config(&blog.config(&[]))
        .run()
        .await
        .expect_err("a 500 from the blog must fail the run");

    assert!(matches!(
        error,
        PublishError::StatusCode(status, _) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));

    let log = blog.log();
    assert_eq!(log.len(), 1);
    assert!(matches!(log[0], Recorded::CreatePost { .. }));

    blog.stop().await
}

#[tokio::test]
async fn image_failure_still_reports_created_post() -> Result<(), BoxedError> {
    let blog = StubBlog::start(StubOptions {
        image_status: StatusCode::NOT_FOUND,
        ..StubOptions::default()
    })
    .await?;

    let report = Publisher::from_config(&blog.config(&[])).run().await?;

    assert_eq!(report.post.id, PostId(42));
    assert_eq!(report.featured_media, None);

    let log = blog.log();
    assert_eq!(log.len(), 2);
    assert!(matches!(log[0], Recorded::CreatePost { .. }));
    assert_eq!(log[1], expected_fetch());

    blog.stop().await
}

#[tokio::test]
async fn image_fetch_follows_redirects() -> Result<(), BoxedError> {
    let blog = StubBlog::start(StubOptions {
        redirect_image: true,
        ..StubOptions::default()
    })
    .await?;

    let report = Publisher::from_config(&blog.config(&[("IMAGE_QUERY", "crm & email")]))
        .run()
        .await?;

    assert_eq!(report.featured_media, Some(MediaAsset { id: MediaId(7) }));
    let log = blog.log();
    assert_eq!(
        log[1],
        Recorded::FetchImage {
            query: Some("crm%20%26%20email".to_string()),
        }
    );
    assert_eq!(log[2], expected_upload());

    blog.stop().await
}

#[tokio::test]
async fn failing_model_falls_back_and_still_publishes() -> Result<(), BoxedError> {
    let blog = StubBlog::start(StubOptions::default()).await?;
    let config = blog.config(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("OPENAI_BASE_URL", "{url}/v1"),
        ("HF_TOKEN", "hf-test"),
        ("PRIMARY_KEYWORD", "crm for startups"),
    ]);

    let report = Publisher::from_config(&config).run().await?;

    assert_eq!(report.source, GenerationSource::Template);
    assert_eq!(report.post.id, PostId(42));

    let log = blog.log();
    assert_eq!(log[0], Recorded::Chat);
    let Recorded::CreatePost { body, .. } = &log[1] else {
        panic!("expected post creation after the model call, got {:?}", log[1]);
    };
    assert_eq!(body["title"], "crm for startups — A practical guide");

    blog.stop().await
}

#[tokio::test]
async fn upload_failure_still_reports_created_post() -> Result<(), BoxedError> {
    let blog = StubBlog::start(StubOptions {
        upload_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..StubOptions::default()
    })
    .await?;

    let report = Publisher::from_config(&blog.config(&[])).run().await?;

    assert_eq!(report.post.id, PostId(42));
    assert_eq!(report.featured_media, None);

    let log = blog.log();
    assert_eq!(log.len(), 3);
    assert!(matches!(log[0], Recorded::CreatePost { .. }));
    assert_eq!(log[1], expected_fetch());
    assert_eq!(log[2], expected_upload());

    blog.stop().await
}

#[tokio::test]
async fn featured_media_link_failure_still_reports_created_post() -> Result<(), BoxedError> {
    let blog = StubBlog::start(StubOptions {
        update_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..StubOptions::default()
    })
    .await?;

    let report = Publisher::from_config(&blog.config(&[])).run().await?;

    assert_eq!(report.post.id, PostId(42));
    assert_eq!(report.featured_media, None);

    let log = blog.log();
    assert_eq!(log.len(), 4);
    assert_eq!(log[2], expected_upload());
    assert!(matches!(log[3], Recorded::UpdatePost { id: 42, .. }));

    blog.stop().await
}

const INFERENCE_ONLY: [(&str, &str); 2] = [
    ("HF_TOKEN", "hf-test"),
    ("HF_MODEL_URL", "{url}/models/gpt2"),
];

#[tokio::test]
async fn inference_backend_is_used_without_openai_key() -> Result<(), BoxedError> {
    let blog = StubBlog::start(StubOptions::default()).await?;

    let report = Publisher::from_config(&blog.config(&INFERENCE_ONLY))
        .run()
        .await?;

    assert_eq!(
        report.source,
        GenerationSource::Model {
            provider: "huggingface",
            model_id: "gpt2".to_string(),
        }
    );
    assert_eq!(report.post.id, PostId(42));

    let log = blog.log();
    let Recorded::Inference {
        authorization,
        body,
    } = &log[0]
    else {
        panic!("expected the inference call first, got {:?}", log[0]);
    };
    assert_eq!(authorization.as_deref(), Some("Bearer hf-test"));
    assert_eq!(body["parameters"], json!({ "max_new_tokens": 800 }));
    assert!(body["inputs"]
        .as_str()
        .unwrap()
        .contains("'best marketing automation tools 2025'"));

    let Recorded::CreatePost { body, .. } = &log[1] else {
        panic!("expected post creation after the model call, got {:?}", log[1]);
    };
    assert_eq!(body["title"], "Model picked CRMs");
    let content = body["content"].as_str().unwrap();
    assert!(content.starts_with("<p>HubSpot leads the pack.</p>"));
    assert_eq!(content.matches(COMPLETION_MARKER).count(), 1);

    blog.stop().await
}

#[tokio::test]
async fn failing_inference_backend_falls_back_to_template() -> Result<(), BoxedError> {
    let blog = StubBlog::start(StubOptions {
        inference_status: StatusCode::SERVICE_UNAVAILABLE,
        ..StubOptions::default()
    })
    .await?;

    let report = Publisher::from_config(&blog.config(&INFERENCE_ONLY))
        .run()
        .await?;

    assert_eq!(report.source, GenerationSource::Template);
    assert_eq!(report.post.id, PostId(42));

    let log = blog.log();
    assert!(matches!(log[0], Recorded::Inference { .. }));
    let Recorded::CreatePost { body, .. } = &log[1] else {
        panic!("expected post creation after the model call, got {:?}", log[1]);
    };
    assert_eq!(
        body["title"],
        "best marketing automation tools 2025 — A practical guide"
    );

    blog.stop().await
}
