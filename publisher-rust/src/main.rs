use autopost::{Config, GenerationSource, Publisher};
use dotenvy::dotenv;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!(error = %error, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match Publisher::from_config(&config).run().await {
        Ok(report) => {
            let source = match &report.source {
                GenerationSource::Model { provider, .. } => *provider,
                GenerationSource::Template => "template",
            };
            info!(
                post_id = %report.post.id,
                featured_media = report.featured_media.is_some(),
                source,
                "Run finished"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!(error = %error, "Failed to post");
            ExitCode::FAILURE
        }
    }
}
