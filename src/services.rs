use async_trait::async_trait;
use brcode::{DecodeError, PayloadError};
use tokio::sync::mpsc;

use crate::settings::Settings;

mod http;
mod pix;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PayloadError> for ServiceError {
    fn from(e: PayloadError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

/// Handles one request taken off a service channel. Replies, if any, go
/// through a `oneshot` sender carried in the request.
#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

/// Drains a request channel, handling every request on its own task.
#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    fn name(&self) -> &'static str;

    /// Returns once every sender of `receiver` is dropped.
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        log::debug!("{} service accepting requests.", self.name());

        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }

        log::info!("{} service stopped: request channel closed.", self.name());
    }
}

pub async fn start_services(settings: Settings) -> Result<(), anyhow::Error> {
    let (pix_tx, mut pix_rx) = mpsc::channel(512);

    let mut pix_service = pix::PixService::new();

    log::info!("Starting Pix service.");
    let handler = pix::PixRequestHandler::new(settings.merchant, settings.charges);
    tokio::spawn(async move {
        pix_service.run(handler, &mut pix_rx).await;
    });

    log::info!("Starting HTTP server.");
    http::start_http_server(&settings.server.listen, pix_tx).await
}
