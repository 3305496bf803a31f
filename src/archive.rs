//! Downloading a repository's source archive to disk.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use client::Client;
use errors::ToolError;
use repo::Repository;
use template;
use urls;

/// The ways GitHub can package up a repository.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    /// A gzip'd tar archive.
    Tarball,
    /// A ZIP archive.
    Zipball,
}

impl ArchiveFormat {
    pub fn as_str(&self) -> &'static str {
        match *self {
            ArchiveFormat::Tarball => "tarball",
            ArchiveFormat::Zipball => "zipball",
        }
    }

    /// The file extension conventionally used for this format.
    pub fn extension(&self) -> &'static str {
        match *self {
            ArchiveFormat::Tarball => "tar.gz",
            ArchiveFormat::Zipball => "zip",
        }
    }
}

impl FromStr for ArchiveFormat {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<ArchiveFormat, ToolError> {
        match s {
            "tarball" => Ok(ArchiveFormat::Tarball),
            "zipball" => Ok(ArchiveFormat::Zipball),
            other => Err(ToolError::UnknownFormat(other.to_string())),
        }
    }
}

impl Display for ArchiveFormat {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where to save an archive and what it should contain. Anything left as
/// `None` falls back to a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveOptions {
    /// Defaults to the current directory.
    pub directory: Option<PathBuf>,
    /// Defaults to [`default_filename`].
    pub filename: Option<String>,
    /// Defaults to the config's `archive_format`.
    pub format: Option<ArchiveFormat>,
    /// The git ref to archive. The server picks the default branch when
    /// there isn't one.
    pub reference: Option<String>,
}

/// The name given to an archive when the user didn't choose one, e.g.
/// `octo.tar.gz` or `octo-v1.0.zip`.
///
/// Slashes in the ref (`feature/foo`) become dashes so the result is always
/// a single path component.
pub fn default_filename(name: &str, format: ArchiveFormat, reference: Option<&str>) -> String {
    match reference {
        Some(r) if !r.is_empty() => {
            format!("{}-{}.{}", name, r.replace('/', "-"), format.extension())
        }
        _ => format!("{}.{}", name, format.extension()),
    }
}

/// Work out the download URL and destination path for `repo`, without
/// touching the network or the filesystem.
pub fn plan(
    repo: &Repository,
    default_format: ArchiveFormat,
    options: &SaveOptions,
) -> Result<(::url::Url, PathBuf), ToolError> {
    let format = options.format.unwrap_or(default_format);
    let reference = options.reference.as_ref().map(|r| r.as_str());

    let directory = match options.directory {
        Some(ref dir) => dir.clone(),
        None => PathBuf::from("."),
    };
    let filename = match options.filename {
        Some(ref name) => name.clone(),
        None => default_filename(repo.name()?, format, reference),
    };

    let mut vars = HashMap::new();
    vars.insert("archive_format", format.as_str());
    if let Some(r) = reference {
        vars.insert("ref", r);
    }
    let url = urls::parse(&template::expand(repo.archive_url()?, &vars))?;

    Ok((url, directory.join(filename)))
}

/// Download an archive of `repo` and save it to disk, returning the path it
/// was written to.
///
/// An existing file at that path is overwritten.
pub fn save_archive(
    client: &Client,
    repo: &Repository,
    options: &SaveOptions,
) -> Result<PathBuf, ToolError> {
    let (url, path) = plan(repo, client.config().archive_format, options)?;
    info!("Downloading {} to {}", url, path.display());

    let mut response = client.get_stream(&url)?;

    let mut file = File::create(&path).map_err(|e| io_error(&path, e))?;
    let bytes = io::copy(&mut response, &mut file).map_err(|e| io_error(&path, e))?;
    file.sync_all().map_err(|e| io_error(&path, e))?;

    debug!("Wrote {} bytes to {}", bytes, path.display());
    Ok(path)
}

fn io_error(path: &Path, cause: io::Error) -> ToolError {
    ToolError::Io {
        path: path.display().to_string(),
        cause,
    }
}
