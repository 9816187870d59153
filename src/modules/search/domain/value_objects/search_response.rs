use serde::de::DeserializeOwned;
use serde::Serialize;

/// Response of a lookup, as handed to the caller's response callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    url: String,
    status: u16,
    body: String,
}

impl SearchResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// The URL that was requested
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// True for 2xx status codes
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}
