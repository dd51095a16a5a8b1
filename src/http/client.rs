use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use log::debug;
use reqwest::Client;

use crate::error::{Result, SmokeError};

use super::request::RequestInput;
use super::response::HttpResponse;

/// Boxed future returned by [`HttpBackend::get`].
pub type ResponseFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>>;

/// The network side of the caller. Swappable so the cases can run against a
/// canned backend.
pub trait HttpBackend: Send + Sync {
    /// Issue a single GET. No retries.
    fn get(&self, request: RequestInput) -> ResponseFuture<'_>;
}

/// Production backend over a shared `reqwest::Client`.
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl HttpBackend for ReqwestBackend {
    fn get(&self, request: RequestInput) -> ResponseFuture<'_> {
        Box::pin(send_request(&self.client, request))
    }
}

async fn send_request(client: &Client, request: RequestInput) -> Result<HttpResponse> {
    let mut url = request.url;
    if !request.params.is_empty() {
        let mut query_pairs = url.query_pairs_mut();
        for (key, value) in &request.params {
            query_pairs.append_pair(key, value);
        }
    }

    // The query may carry a token, so only the path is logged.
    debug!("GET {}", url.path());

    let mut req_builder = client.get(url.clone());
    if let Some(token) = &request.token {
        req_builder = req_builder.bearer_auth(token.as_str());
    }

    let started = Instant::now();
    let response = req_builder
        .send()
        .await
        .map_err(|e| transport_error(&url, e))?;
    let elapsed = started.elapsed().as_millis();

    let status = response.status().as_u16();
    let bytes = response.bytes().await.map_err(|e| transport_error(&url, e))?;
    let body = String::from_utf8_lossy(&bytes).into_owned();

    Ok(HttpResponse {
        url: without_query(&url),
        status,
        duration_ms: elapsed,
        body,
    })
}

fn transport_error(url: &url::Url, err: reqwest::Error) -> SmokeError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else {
        // Strip the URL from reqwest's message; it may include the token query.
        err.without_url().to_string()
    };
    SmokeError::Transport {
        url: without_query(url),
        message,
    }
}

fn without_query(url: &url::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
