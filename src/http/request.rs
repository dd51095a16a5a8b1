use url::Url;

use crate::config::BearerToken;

/// A GET request, and the key the caller memoizes responses under.
///
/// Parameters are kept sorted so two calls that differ only in parameter
/// order are the same call. Repeated keys are kept and all of them are sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestInput {
    pub url: Url,
    pub params: Vec<(String, String)>,
    pub token: Option<BearerToken>,
}

impl RequestInput {
    pub fn get(url: Url, params: &[(&str, &str)], token: Option<&BearerToken>) -> Self {
        let mut params: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        params.sort();

        Self {
            url,
            params,
            token: token.cloned(),
        }
    }

    /// First value sent for `key`.
    #[cfg(test)]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }
}
