use axum::Router;
use std::error::Error;
use tokio::{net::TcpListener, sync::oneshot};

pub type BoxedError = Box<dyn Error + Send + Sync>;

/// An HTTP server bound to an ephemeral local port for the duration of a test.
pub struct StubServer {
    url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    pub async fn start(router: Router) -> Result<Self, BoxedError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", listener.local_addr()?);
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
        });

        Ok(Self {
            url,
            shutdown: Some(tx),
            handle,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn stop(mut self) -> Result<(), BoxedError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        self.handle
            .await
            .map_err(|err| format!("Failed to join stub server task: {err}"))?;
        Ok(())
    }
}
