//! The request transport: the only place that turns a request description into
//! network traffic.
//!
//! Callers describe a request with a [RequestDescriptor] and hand it to a
//! [Transport]. The call returns immediately and the outcome arrives later,
//! exactly once, through the descriptor's completion callback. Every failure,
//! including ones detected before anything is sent, takes that same path.

mod http;

pub use http::HttpTransport;

use reqwest::Url;

use crate::params::Params;

/// The HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// How the body of a successful response should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Text,
}

/// The parsed body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

/// The errors a request can complete with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The target URL could not be parsed.
    #[error("invalid request URL \"{0}\"")]
    InvalidUrl(String),

    /// A request with a body was described without any data for it.
    #[error("{0} requests need form data")]
    MissingFormData(&'static str),

    /// The request could not be sent or its response could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server replied with a non-success status. `reason` is the status
    /// text, e.g. "Not Found".
    #[error("{code} {reason}")]
    Status { code: u16, reason: String },

    /// The response body did not match the requested [ResponseKind].
    #[error("could not decode response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        TransportError::Request(error.to_string())
    }
}

/// The callback that receives the outcome of one request.
pub type OnComplete = Box<dyn FnOnce(Result<ResponseBody, TransportError>)>;

/// Everything needed to issue one request.
///
/// A descriptor is moved into [Transport::send], so it is used for exactly one
/// request.
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub data: Option<Params>,
    pub response_kind: ResponseKind,
    pub on_complete: OnComplete,
}

impl RequestDescriptor {
    /// A descriptor for a JSON request.
    pub fn json(
        method: Method,
        url: impl Into<String>,
        data: Option<Params>,
        on_complete: impl FnOnce(Result<ResponseBody, TransportError>) + 'static,
    ) -> Self {
        Self {
            url: url.into(),
            method,
            data,
            response_kind: ResponseKind::Json,
            on_complete: Box::new(on_complete),
        }
    }
}

impl std::fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("data", &self.data)
            .field("response_kind", &self.response_kind)
            .finish_non_exhaustive()
    }
}

/// Issues requests described by [RequestDescriptor]s.
pub trait Transport {
    /// Start the request and return immediately.
    ///
    /// Implementations must call `descriptor.on_complete` exactly once, and
    /// never before `send` has returned, provided the caller meets the
    /// implementation's execution requirements. [HttpTransport] must be called
    /// from within a [tokio::task::LocalSet] that is driven until the request
    /// finishes. Outside one it panics and the callback is dropped uncalled.
    fn send(&self, descriptor: RequestDescriptor);
}

/// A request ready to be put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    /// Multipart text fields for methods other than GET.
    pub form: Option<Vec<(String, String)>>,
}

/// Build the outgoing request for `url`, `method` and `data`.
///
/// GET requests carry `data` in the query string, in insertion order, and add
/// nothing when `data` is empty or absent. Other methods send every pair as a
/// form field and require `data` to be present.
///
/// # Errors
/// Returns [TransportError::InvalidUrl] if the resulting URL does not parse and
/// [TransportError::MissingFormData] for a non-GET request without data.
pub fn prepare(
    url: &str,
    method: Method,
    data: Option<&Params>,
) -> Result<PreparedRequest, TransportError> {
    match method {
        Method::Get => {
            let target = match data.filter(|data| !data.is_empty()) {
                Some(data) => {
                    let query = serde_urlencoded::to_string(data)
                        .map_err(|error| TransportError::InvalidUrl(error.to_string()))?;
                    format!("{url}?{query}")
                }
                None => url.to_owned(),
            };

            Ok(PreparedRequest {
                method,
                url: parse_url(&target)?,
                form: None,
            })
        }
        _ => {
            let data = data.ok_or(TransportError::MissingFormData(method.as_str()))?;
            let form = data
                .iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect();

            Ok(PreparedRequest {
                method,
                url: parse_url(url)?,
                form: Some(form),
            })
        }
    }
}

fn parse_url(url: &str) -> Result<Url, TransportError> {
    Url::parse(url).map_err(|_| TransportError::InvalidUrl(url.to_owned()))
}
