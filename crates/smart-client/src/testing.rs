//! In-process server for integration tests
//!
//! [`TestServer`] serves a fully built router on `127.0.0.1` with an
//! OS-assigned port and hands out clients pointed at it.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::{Result, SmartClient, SmartClientError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// A running router; stopped by [`TestServer::shutdown`] or on drop
pub struct TestServer {
    pub addr: SocketAddr,
    /// Client without an `Authorization` header
    pub client: SmartClient,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<std::io::Result<()>>>,
}

impl TestServer {
    /// Serve `router` until shutdown
    ///
    /// ```ignore
    /// let state = AppState::new(Arc::new(MemoryStore::new()));
    /// let server = TestServer::start(create_router(state)).await?;
    /// let products = server.client.list_products(None).await?;
    /// ```
    pub async fn start(router: Router) -> Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;

        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    stopped.await.ok();
                })
                .await
        });

        let client =
            SmartClient::with_config(&format!("http://{}", addr), REQUEST_TIMEOUT, CONNECT_TIMEOUT)?;

        Ok(Self {
            addr,
            client,
            stop: Some(stop),
            task: Some(task),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL for `path`, for raw requests through `client.http_client()`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Client that sends `Authorization: Bearer <token>`
    pub fn client_with_token(&self, token: &str) -> Result<SmartClient> {
        SmartClient::with_bearer_token(&self.base_url(), token)
    }

    /// Stop accepting, drain in-flight requests and report how serving ended
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        match task.await {
            Ok(served) => served.map_err(SmartClientError::from),
            Err(join) => Err(SmartClientError::IoError(std::io::Error::other(join))),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
