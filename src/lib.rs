//! A small client for the GitHub API which downloads a repository's source
//! archive (tarball or zipball) to disk.

extern crate base64;
extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate percent_encoding;
extern crate reqwest;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[cfg_attr(test, macro_use)]
extern crate serde_json;
extern crate shellexpand;
extern crate url;

#[cfg(test)]
extern crate mockito;
#[cfg(test)]
extern crate tempfile;

pub mod archive;
pub mod auth;
pub mod client;
pub mod config;
pub mod driver;
pub mod errors;
pub mod repo;
pub mod template;
pub mod urls;

pub use archive::{save_archive, ArchiveFormat, SaveOptions};
pub use auth::Authentication;
pub use client::Client;
pub use config::{Config, ConnectionMethod};
pub use driver::{Driver, GetRequest};
pub use errors::ToolError;
pub use repo::{get_repo, Repository};
