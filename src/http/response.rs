use serde::de::DeserializeOwned;

use crate::error::{Result, SmokeError};

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub duration_ms: u128,
    pub body: String,
}

impl HttpResponse {
    /// Decode the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| SmokeError::Decode {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }
}
