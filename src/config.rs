//! Settings for talking to the API.

use std::{env, time::Duration};

use reqwest::Url;

/// The default API location, matching the default port of the `server` binary.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// The default time a request may take before it fails.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// The scheme, host and port of the API, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read the config from `COINPURSE_API_URL` and `COINPURSE_TIMEOUT_SECS`,
    /// falling back to the defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("COINPURSE_API_URL")
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or(defaults.base_url);

        let request_timeout = match env::var("COINPURSE_TIMEOUT_SECS") {
            Ok(value) => match value.parse::<u64>() {
                Ok(seconds) => Duration::from_secs(seconds),
                Err(error) => {
                    tracing::warn!("ignoring COINPURSE_TIMEOUT_SECS={value:?}: {error}");
                    defaults.request_timeout
                }
            },
            Err(_) => defaults.request_timeout,
        };

        Self {
            base_url,
            request_timeout,
        }
    }

    /// The absolute URL for `path`, e.g. `/account`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The absolute URL of the resource `id` under `path`, e.g.
    /// `/account/42`. `id` is percent-encoded as a single path segment.
    pub fn resource_url(&self, path: &str, id: &str) -> String {
        let collection = self.url(path);

        let Ok(mut url) = Url::parse(&collection) else {
            // Left for the transport to report as an invalid URL.
            return format!("{collection}/{id}");
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }

        url.into()
    }
}
