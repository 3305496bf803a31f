use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use serde_json::{self, Map, Value};
use shellexpand;

use archive::ArchiveFormat;
use auth::Authentication;
use errors::ToolError;

/// The files searched for overrides, lowest priority first.
pub const CONFIG_FILES: &[&str] = &[
    "/etc/github-tool/config.json",
    "~/.config/github-tool/config.json",
    "config.json",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether API requests use `http` or `https`.
    pub connection_method: ConnectionMethod,
    /// The server hosting the API (optionally with a `:port`).
    pub api_host: String,
    /// The path on `api_host` which serves the API root.
    pub api_root: String,
    /// The format used when no `--archive-type` is given.
    pub archive_format: ArchiveFormat,
    pub authentication: Option<Authentication>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMethod {
    Http,
    Https,
}

impl Display for ConnectionMethod {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ConnectionMethod::Http => write!(f, "http"),
            ConnectionMethod::Https => write!(f, "https"),
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            connection_method: ConnectionMethod::Https,
            api_host: String::from("api.github.com"),
            api_root: String::from("/"),
            archive_format: ArchiveFormat::Tarball,
            authentication: None,
        }
    }
}

impl Config {
    /// Load the configuration from the well-known [`CONFIG_FILES`], followed
    /// by an optional file the user asked for explicitly.
    ///
    /// Missing well-known files are skipped, a missing explicit file is an
    /// error.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ToolError> {
        let mut layers: Vec<(PathBuf, bool)> = CONFIG_FILES
            .iter()
            .map(|f| (PathBuf::from(&*shellexpand::tilde(f)), false))
            .collect();

        if let Some(path) = explicit {
            layers.push((path.to_path_buf(), true));
        }

        Config::load_layers(&layers)
    }

    /// Apply each of `files` over the defaults, skipping the ones which
    /// don't exist.
    pub fn load_from<P: AsRef<Path>>(files: &[P]) -> Result<Config, ToolError> {
        let layers: Vec<(PathBuf, bool)> = files
            .iter()
            .map(|f| (f.as_ref().to_path_buf(), false))
            .collect();

        Config::load_layers(&layers)
    }

    fn load_layers(layers: &[(PathBuf, bool)]) -> Result<Config, ToolError> {
        let mut merged = Map::new();
        let mut config = Config::default();

        for &(ref path, required) in layers {
            let layer = match read_layer(path)? {
                Some(layer) => layer,
                None if required => {
                    return Err(ToolError::ReadConfig {
                        path: path.display().to_string(),
                        cause: io::Error::new(io::ErrorKind::NotFound, "No such file"),
                    })
                }
                None => {
                    trace!("Skipping {} (not found)", path.display());
                    continue;
                }
            };

            debug!("Applying config overrides from {}", path.display());
            config = apply_layer(&mut merged, layer, path)?;
        }

        Ok(config)
    }

    /// The default config, for users who want a file to start from.
    pub fn example() -> Config {
        Config::default()
    }

    pub fn as_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn read_layer(path: &Path) -> Result<Option<Map<String, Value>>, ToolError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ToolError::ReadConfig {
                path: path.display().to_string(),
                cause: e,
            })
        }
    };

    let value: Value = serde_json::from_str(&text).map_err(|e| ToolError::MalformedConfig {
        path: path.display().to_string(),
        cause: e,
    })?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(ToolError::InvalidConfig {
            path: path.display().to_string(),
            reason: String::from("expected a JSON object"),
        }),
    }
}

/// Shallow-merge `layer` into `merged`, making sure the result still
/// describes a valid `Config`. Keys nobody has set fall back to the defaults.
fn apply_layer(
    merged: &mut Map<String, Value>,
    layer: Map<String, Value>,
    path: &Path,
) -> Result<Config, ToolError> {
    for (key, value) in layer {
        merged.insert(key, value);
    }

    serde_json::from_value(Value::Object(merged.clone())).map_err(|e| {
        ToolError::MalformedConfig {
            path: path.display().to_string(),
            cause: e,
        }
    })
}
