use reqwest::blocking::{self, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::{self, Value};
use url::Url;

use auth::AuthCache;
use config::Config;
use errors::ToolError;
use urls;

const USER_AGENT: &str = concat!("github-tool/", env!("CARGO_PKG_VERSION"));
const JSON_MIME_TYPE: &str = "application/vnd.github.v3+json";

/// A blocking client for the API described by a [`Config`].
///
/// The client remembers the API root object and the authentication headers
/// for as long as it lives.
#[derive(Debug)]
pub struct Client {
    config: Config,
    inner: blocking::Client,
    auth: AuthCache,
    api_root: Option<Value>,
}

impl Client {
    pub fn with_config(config: Config) -> Result<Client, ToolError> {
        let inner = blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ToolError::HttpClient { cause: e })?;

        Ok(Client {
            config,
            inner,
            auth: AuthCache::new(),
            api_root: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the API root object, reusing the previous response if there
    /// was one.
    pub fn api_root(&mut self) -> Result<&Value, ToolError> {
        let root = match self.api_root.take() {
            Some(root) => root,
            None => {
                let url = urls::base_url(&self.config)?;
                info!("Fetching the API root from {}", url);
                self.get_json(&url)?
            }
        };

        let root: &Value = self.api_root.get_or_insert(root);
        Ok(root)
    }

    /// Send an authenticated GET request and parse the response as JSON.
    pub fn get_json(&mut self, url: &Url) -> Result<Value, ToolError> {
        let mut headers = self.auth.headers(self.config.authentication.as_ref())?;
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME_TYPE));

        let response = self.send(url, headers)?;

        let body = response.bytes().map_err(|e| ToolError::Http {
            url: url.to_string(),
            cause: e,
        })?;

        let text = String::from_utf8(body.to_vec()).map_err(|e| ToolError::NotUtf8 {
            url: url.to_string(),
            cause: e,
        })?;

        if log_enabled!(::log::Level::Trace) {
            trace!("Body:");
            for line in text.lines() {
                trace!("{}", line);
            }
        }

        serde_json::from_str(&text).map_err(|e| ToolError::Decode {
            url: url.to_string(),
            cause: e,
        })
    }

    /// Start an unauthenticated GET request, leaving the body to be read by
    /// the caller.
    pub fn get_stream(&self, url: &Url) -> Result<Response, ToolError> {
        self.send(url, HeaderMap::new())
    }

    fn send(&self, url: &Url, headers: HeaderMap) -> Result<Response, ToolError> {
        debug!("Sending request to {}", url);

        let request = self.inner
            .get(url.as_str())
            .headers(headers)
            .build()
            .map_err(|e| ToolError::Http {
                url: url.to_string(),
                cause: e,
            })?;

        if log_enabled!(::log::Level::Trace) {
            // sensitive values are redacted by HeaderValue's Debug impl
            for line in format!("Request Headers {:#?}", request.headers()).lines() {
                trace!("{}", line);
            }
        }

        let response = self.inner.execute(request).map_err(|e| ToolError::Http {
            url: url.to_string(),
            cause: e,
        })?;

        let status = response.status();
        debug!("Received response ({})", status);

        if log_enabled!(::log::Level::Trace) {
            for line in format!("Response Headers {:#?}", response.headers()).lines() {
                trace!("{}", line);
            }
        }

        if !status.is_success() {
            warn!("Request failed with {}", status);

            return Err(ToolError::BadStatus {
                url: url.to_string(),
                status,
            });
        }

        Ok(response)
    }
}
