pub use reqwest::Method;
use reqwest::multipart::Form;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// Payload attached to an outgoing request.
///
/// `data()` is called again for every attempt, so a resubmission after a token
/// refresh gets a freshly built body (multipart forms are single-use).
pub enum RequestData<T> {
    Empty,
    Query(T),
    Json(T),
    Multipart(Form),
}

pub trait Request {
    type Data: Serialize;
    type Response: DeserializeOwned;

    const METHOD: Method = Method::GET;

    fn method(&self) -> Method {
        Self::METHOD
    }

    fn endpoint(&self) -> Cow<'_, str>;

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Empty
    }
}

/// Response type for endpoints whose body carries nothing we use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyResponse;

impl<'de> Deserialize<'de> for EmptyResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(EmptyResponse)
    }
}

/// Untyped request used by [`crate::Client::request`].
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl RawRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl Request for RawRequest {
    type Data = serde_json::Value;
    type Response = serde_json::Value;

    fn method(&self) -> Method {
        self.method.clone()
    }

    fn endpoint(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.path)
    }

    fn data(&self) -> RequestData<&Self::Data> {
        match &self.body {
            None => RequestData::Empty,
            Some(params) if self.method == Method::GET || self.method == Method::DELETE => {
                RequestData::Query(params)
            }
            Some(body) => RequestData::Json(body),
        }
    }
}

/// Decode a 2xx body. An empty body reads as `null`, or `{}` when the target
/// type is a struct.
pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_slice(b"null").or_else(|_| serde_json::from_slice(b"{}"));
    }
    serde_json::from_slice(bytes)
}
