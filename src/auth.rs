//! Turning an authentication descriptor into request headers.

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use errors::ToolError;

/// The `authentication` entry of a config file.
///
/// Only `{"type": "basic", "username": ..., "password": ...}` is understood,
/// anything else is rejected when the headers are first needed.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Authentication {
    pub fn basic<U, P>(username: U, password: P) -> Authentication
    where
        U: Into<String>,
        P: Into<String>,
    {
        Authentication {
            kind: String::from("basic"),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Debug for Authentication {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Authentication")
            .field("kind", &self.kind)
            .field("username", &self.username)
            .field("password", &"XXXXXXXXXX")
            .finish()
    }
}

/// Compute the headers needed to authenticate as `auth`.
///
/// No descriptor means no headers.
pub fn headers_for(auth: Option<&Authentication>) -> Result<HeaderMap, ToolError> {
    let mut headers = HeaderMap::new();

    let auth = match auth {
        Some(auth) => auth,
        None => return Ok(headers),
    };

    match auth.kind.as_str() {
        "basic" => {
            let raw = format!("{}:{}", auth.username, auth.password);
            let encoded = STANDARD.encode(raw.as_bytes());

            let mut value = HeaderValue::from_str(&format!("Basic {}", encoded)).map_err(|_| {
                ToolError::InvalidCredentials {
                    kind: auth.kind.clone(),
                }
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        other => {
            return Err(ToolError::UnsupportedAuthType {
                kind: other.to_string(),
            })
        }
    }

    Ok(headers)
}

/// Memoizes [`headers_for`], keyed by the descriptor's contents.
#[derive(Debug, Default)]
pub struct AuthCache {
    entries: HashMap<Option<Authentication>, HeaderMap>,
}

impl AuthCache {
    pub fn new() -> AuthCache {
        AuthCache::default()
    }

    pub fn headers(&mut self, auth: Option<&Authentication>) -> Result<HeaderMap, ToolError> {
        let key = auth.cloned();

        if let Some(headers) = self.entries.get(&key) {
            return Ok(headers.clone());
        }

        debug!("Computing authentication headers");
        let headers = headers_for(auth)?;
        self.entries.insert(key, headers.clone());

        Ok(headers)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header() {
        let auth = Authentication::basic("u", "p");

        let headers = headers_for(Some(&auth)).unwrap();

        assert_eq!(headers.len(), 1);
        assert_eq!(headers[AUTHORIZATION], "Basic dTpw");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn credentials_are_utf8_encoded() {
        let auth = Authentication::basic("jürgen", "pässwörd");

        let headers = headers_for(Some(&auth)).unwrap();

        let should_be = format!("Basic {}", STANDARD.encode("jürgen:pässwörd".as_bytes()));
        assert_eq!(headers[AUTHORIZATION], should_be.as_str());
    }

    #[test]
    fn no_descriptor_means_no_headers() {
        let headers = headers_for(None).unwrap();

        assert!(headers.is_empty());
    }

    #[test]
    fn unknown_auth_types_are_rejected() {
        let auth = Authentication {
            kind: String::from("oauth"),
            username: String::new(),
            password: String::new(),
        };

        match headers_for(Some(&auth)) {
            Err(ToolError::UnsupportedAuthType { kind }) => assert_eq!(kind, "oauth"),
            other => panic!("Expected an UnsupportedAuthType, got {:?}", other),
        }
    }

    #[test]
    fn equal_descriptors_share_a_cache_entry() {
        let mut cache = AuthCache::new();
        let first = Authentication::basic("u", "p");
        let second = Authentication::basic("u", "p");

        let a = cache.headers(Some(&first)).unwrap();
        let b = cache.headers(Some(&second)).unwrap();

        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);

        cache.headers(Some(&Authentication::basic("u", "q"))).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn password_is_redacted_in_debug_output() {
        let auth = Authentication::basic("octocat", "hunter2");

        let got = format!("{:?}", auth);

        assert!(got.contains("octocat"));
        assert!(!got.contains("hunter2"));
    }
}
