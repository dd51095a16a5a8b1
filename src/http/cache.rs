use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use tokio::sync::RwLock;
use url::Url;

use crate::config::BearerToken;
use crate::error::Result;

use super::client::HttpBackend;
use super::request::RequestInput;
use super::response::HttpResponse;

/// Issues GET requests through a backend and remembers every successful
/// response for the lifetime of the caller.
///
/// One caller is built per run. Entries are never evicted or expired, so a
/// given (url, params, token) reaches the network at most once while it keeps
/// succeeding. Failed calls are not remembered.
pub struct HttpCaller {
    backend: Box<dyn HttpBackend>,
    responses: RwLock<HashMap<RequestInput, Arc<HttpResponse>>>,
}

impl HttpCaller {
    pub fn new(backend: impl HttpBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            responses: RwLock::new(HashMap::new()),
        }
    }

    pub async fn call(
        &self,
        url: Url,
        params: &[(&str, &str)],
        token: Option<&BearerToken>,
    ) -> Result<Arc<HttpResponse>> {
        let request = RequestInput::get(url, params, token);

        if let Some(response) = self.responses.read().await.get(&request) {
            debug!("reusing response for {}", request.url.path());
            return Ok(Arc::clone(response));
        }

        let response = Arc::new(self.backend.get(request.clone()).await?);
        debug!(
            "{} answered {} in {}ms",
            request.url.path(),
            response.status,
            response.duration_ms
        );
        self.responses
            .write()
            .await
            .insert(request, Arc::clone(&response));
        Ok(response)
    }

    /// Number of distinct calls remembered so far.
    pub async fn cached_calls(&self) -> usize {
        self.responses.read().await.len()
    }
}
