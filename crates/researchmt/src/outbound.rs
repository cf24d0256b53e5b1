//! Outbound execution of engine requests.

use std::time::Duration;

use async_trait::async_trait;
use http::{Request, Response};

use crate::error::ResearchError;

/// Executes one engine request. Non-success statuses are returned as
/// responses, not errors, so engines can report the body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        req: Request<Vec<u8>>,
        timeout: Duration,
    ) -> Result<Response<Vec<u8>>, ResearchError>;
}

#[cfg(feature = "http-client")]
pub use http_client::{CLIENT, ReqwestTransport, call_outbound};

#[cfg(feature = "http-client")]
mod http_client {
    use std::time::Duration;

    use async_trait::async_trait;
    use http::{Request, Response};
    use once_cell::sync::Lazy;
    use reqwest::Client;

    use super::Transport;
    use crate::error::ResearchError;

    /// A single, global client, built once
    pub static CLIENT: Lazy<Client> = Lazy::new(Client::new);

    pub async fn call_outbound(
        req: Request<Vec<u8>>,
        timeout: Duration,
    ) -> Result<Response<Vec<u8>>, ResearchError> {
        let (parts, body) = req.into_parts();

        let resp = CLIENT
            .request(parts.method, parts.uri.to_string())
            .headers(parts.headers)
            .timeout(timeout)
            .body(body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?
            .to_vec();

        let mut builder = Response::builder().status(status);
        for (name, value) in headers.iter() {
            builder = builder.header(name, value);
        }
        Ok(builder.body(bytes)?)
    }

    /// [`Transport`] backed by the shared reqwest [`CLIENT`].
    #[derive(Debug, Default, Clone, Copy)]
    pub struct ReqwestTransport;

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn send(
            &self,
            req: Request<Vec<u8>>,
            timeout: Duration,
        ) -> Result<Response<Vec<u8>>, ResearchError> {
            call_outbound(req, timeout).await
        }
    }
}
