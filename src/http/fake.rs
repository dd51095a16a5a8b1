//! Canned HTTP backend for unit tests. Routes are matched on URL path only;
//! an unrouted path behaves like a connection failure.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::SmokeError;

use super::client::{HttpBackend, ResponseFuture};
use super::request::RequestInput;
use super::response::HttpResponse;

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<RequestInput>>>);

impl CallLog {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.url.path().to_string())
            .collect()
    }

    pub fn requests(&self) -> Vec<RequestInput> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct FakeBackend {
    routes: HashMap<String, (u16, String)>,
    calls: CallLog,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert(path.to_string(), (status, body.to_string()));
        self
    }

    pub fn calls(&self) -> CallLog {
        self.calls.clone()
    }
}

impl HttpBackend for FakeBackend {
    fn get(&self, request: RequestInput) -> ResponseFuture<'_> {
        let path = request.url.path().to_string();
        let url = request.url.to_string();
        self.calls.0.lock().unwrap().push(request);
        let route = self.routes.get(&path).cloned();

        Box::pin(async move {
            match route {
                Some((status, body)) => Ok(HttpResponse {
                    url,
                    status,
                    duration_ms: 0,
                    body,
                }),
                None => Err(SmokeError::Transport {
                    url,
                    message: "connection refused".into(),
                }),
            }
        })
    }
}
