//! Building API URLs from the configuration.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use config::Config;
use errors::ToolError;

/// Everything except RFC 3986's unreserved characters gets escaped, so a
/// segment can never introduce a `/`, `?` or `#` of its own.
pub(crate) const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The URL of the API root, as described by `config`.
///
/// The configured `api_root` always behaves like a directory, so
/// `"/api/v3"` and `"/api/v3/"` are equivalent.
pub fn base_url(config: &Config) -> Result<Url, ToolError> {
    let mut root = config.api_root.clone();
    if !root.starts_with('/') {
        root.insert(0, '/');
    }
    if !root.ends_with('/') {
        root.push('/');
    }

    let raw = format!("{}://{}{}", config.connection_method, config.api_host, root);

    Url::parse(&raw).map_err(|e| ToolError::InvalidUrl { url: raw, cause: e })
}

/// Create a URL for the API endpoint at `path`, relative to the API root.
///
/// Each path component is percent-escaped before being joined, e.g. under
/// the default config `api_url(&cfg, &["repos", "a b"])` gives
/// `https://api.github.com/repos/a%20b`.
pub fn api_url<S: AsRef<str>>(config: &Config, path: &[S]) -> Result<Url, ToolError> {
    let base = base_url(config)?;

    let relative = path.iter()
        .map(|segment| utf8_percent_encode(segment.as_ref(), UNRESERVED).to_string())
        .collect::<Vec<_>>()
        .join("/");

    base.join(&relative).map_err(|e| ToolError::InvalidUrl {
        url: relative,
        cause: e,
    })
}

/// Parse a URL the server handed us (after template expansion).
pub fn parse(raw: &str) -> Result<Url, ToolError> {
    Url::parse(raw).map_err(|e| ToolError::InvalidUrl {
        url: raw.to_string(),
        cause: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::ConnectionMethod;
    use percent_encoding::percent_decode_str;

    fn decoded_segments(url: &Url) -> Vec<String> {
        url.path_segments()
            .unwrap()
            .map(|s| percent_decode_str(s).decode_utf8().unwrap().into_owned())
            .collect()
    }

    #[test]
    fn default_root() {
        let got = api_url::<&str>(&Config::default(), &[]).unwrap();

        assert_eq!(got.as_str(), "https://api.github.com/");
    }

    #[test]
    fn segments_are_appended() {
        let got = api_url(&Config::default(), &["asdf", "foo", "bar"]).unwrap();

        assert_eq!(got.as_str(), "https://api.github.com/asdf/foo/bar");
    }

    #[test]
    fn api_root_acts_as_a_directory() {
        let cfg = Config {
            connection_method: ConnectionMethod::Http,
            api_host: String::from("ghe.example.com:8080"),
            api_root: String::from("/api/v3"),
            ..Config::default()
        };

        let got = api_url(&cfg, &["repos"]).unwrap();

        assert_eq!(got.as_str(), "http://ghe.example.com:8080/api/v3/repos");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let got = api_url(&Config::default(), &["a/b", "c?d", "e#f", "g h"]).unwrap();

        assert_eq!(
            got.as_str(),
            "https://api.github.com/a%2Fb/c%3Fd/e%23f/g%20h"
        );
        assert_eq!(got.query(), None);
        assert_eq!(got.fragment(), None);
    }

    #[test]
    fn segments_survive_a_round_trip() {
        let inputs: &[&[&str]] = &[
            &["repos", "octocat", "hello-world"],
            &["a/b", "c?d", "e#f", "g h"],
            &["100%", "ünïcödé", "semi;colon", "col:on", "at@sign"],
            &["x+y", "a&b=c", "[brackets]", "tilde~dot.under_score"],
        ];

        for &segments in inputs {
            let url = api_url(&Config::default(), segments).unwrap();

            let got = decoded_segments(&url);

            assert_eq!(got, segments.to_vec(), "{}", url);
        }
    }

    #[test]
    fn bad_hosts_are_reported() {
        let cfg = Config {
            api_host: String::from("not a host"),
            ..Config::default()
        };

        match base_url(&cfg) {
            Err(ToolError::InvalidUrl { .. }) => {}
            other => panic!("Expected an InvalidUrl, got {:?}", other),
        }
    }
}
