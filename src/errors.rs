//! The errors encountered in this crate.

use std::io;
use reqwest::StatusCode;

/// Everything which can go wrong while fetching an archive.
///
/// Each variant maps onto a process exit code (see [`ToolError::exit_code`])
/// so scripts can tell a bad config file apart from a network failure.
#[derive(Debug, Fail)]
pub enum ToolError {
    #[fail(display = "Unable to parse the config file at {}", path)]
    MalformedConfig {
        path: String,
        #[fail(cause)]
        cause: ::serde_json::Error,
    },
    #[fail(display = "Invalid config file at {}: {}", path, reason)]
    InvalidConfig { path: String, reason: String },
    #[fail(display = "Unable to read the config file at {}", path)]
    ReadConfig {
        path: String,
        #[fail(cause)]
        cause: io::Error,
    },

    #[fail(display = "Unsupported authentication type \"{}\"", kind)]
    UnsupportedAuthType { kind: String },
    #[fail(display = "The {} credentials can't be sent as an HTTP header", kind)]
    InvalidCredentials { kind: String },

    #[fail(display = "Unable to initialize the HTTP client")]
    HttpClient {
        #[fail(cause)]
        cause: ::reqwest::Error,
    },
    #[fail(display = "Request to {} failed", url)]
    Http {
        url: String,
        #[fail(cause)]
        cause: ::reqwest::Error,
    },
    #[fail(display = "GET {} returned {}", url, status)]
    BadStatus { url: String, status: StatusCode },

    #[fail(display = "The response from {} isn't valid UTF-8", url)]
    NotUtf8 {
        url: String,
        #[fail(cause)]
        cause: ::std::string::FromUtf8Error,
    },
    #[fail(display = "The response from {} isn't valid JSON", url)]
    Decode {
        url: String,
        #[fail(cause)]
        cause: ::serde_json::Error,
    },
    #[fail(display = "The {} object has no \"{}\" field", object, field)]
    MissingField { object: String, field: String },

    #[fail(display = "Unknown archive format \"{}\" (expected \"tarball\" or \"zipball\")", _0)]
    UnknownFormat(String),
    #[fail(display = "\"{}\" isn't a valid URL", url)]
    InvalidUrl {
        url: String,
        #[fail(cause)]
        cause: ::url::ParseError,
    },

    #[fail(display = "Unable to write {}", path)]
    Io {
        path: String,
        #[fail(cause)]
        cause: io::Error,
    },

    #[fail(display = "{}", _0)]
    Usage(String),
}

pub const EXIT_UNEXPECTED: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_CONFIG: i32 = 3;
pub const EXIT_AUTH: i32 = 4;
pub const EXIT_HTTP: i32 = 5;
pub const EXIT_DECODE: i32 = 6;
pub const EXIT_MISSING_FIELD: i32 = 7;
pub const EXIT_UNKNOWN_FORMAT: i32 = 8;
pub const EXIT_IO: i32 = 9;

impl ToolError {
    /// The process exit code to use when this error aborts a run.
    pub fn exit_code(&self) -> i32 {
        match *self {
            ToolError::MalformedConfig { .. }
            | ToolError::InvalidConfig { .. }
            | ToolError::ReadConfig { .. } => EXIT_CONFIG,
            ToolError::UnsupportedAuthType { .. } | ToolError::InvalidCredentials { .. } => {
                EXIT_AUTH
            }
            ToolError::HttpClient { .. }
            | ToolError::Http { .. }
            | ToolError::BadStatus { .. }
            | ToolError::InvalidUrl { .. } => EXIT_HTTP,
            ToolError::NotUtf8 { .. } | ToolError::Decode { .. } => EXIT_DECODE,
            ToolError::MissingField { .. } => EXIT_MISSING_FIELD,
            ToolError::UnknownFormat(_) => EXIT_UNKNOWN_FORMAT,
            ToolError::Io { .. } => EXIT_IO,
            ToolError::Usage(_) => EXIT_USAGE,
        }
    }

    pub(crate) fn missing_field(object: &str, field: &str) -> ToolError {
        ToolError::MissingField {
            object: object.to_string(),
            field: field.to_string(),
        }
    }
}

/// Find the exit code for an arbitrary error by looking for the first
/// `ToolError` in its chain of causes.
pub fn exit_code_for(err: &::failure::Error) -> i32 {
    err.iter_chain()
        .filter_map(|cause| cause.downcast_ref::<ToolError>())
        .map(ToolError::exit_code)
        .next()
        .unwrap_or(EXIT_UNEXPECTED)
}
