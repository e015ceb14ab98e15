use crate::remote::dsn::Dsn;
use crate::remote::transport::{Transport, TransportError};
use crate::remote::RemoteEvent;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// HTTP implementation of [`Transport`] posting JSON events to the store
/// endpoint derived from a [`Dsn`].
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    debug: bool,
}

impl HttpTransport {
    /// Construct a transport for `dsn`.
    ///
    /// **Parameters**
    /// - `timeout`: per-request timeout applied by the HTTP client, on top of
    ///   the sink's own bound.
    /// - `debug`: log every send through `tracing`.
    pub fn new(dsn: &Dsn, timeout: Duration, debug: bool) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: dsn.store_url(),
            debug,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, event: &RemoteEvent) -> Result<(), TransportError> {
        let resp = self.client.post(&self.endpoint).json(event).send().await?;
        let status = resp.status();
        if self.debug {
            tracing::debug!(status = status.as_u16(), level = event.level, "remote event sent");
        }
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
