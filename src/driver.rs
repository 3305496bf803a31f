use std::path::PathBuf;
use failure::{Error, ResultExt};

use archive::{self, ArchiveFormat, SaveOptions};
use client::Client;
use config::Config;
use repo;

/// Everything needed to fetch a single archive (i.e. `get owner repo`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetRequest {
    pub owner: String,
    pub repo: String,
    pub archive_type: Option<String>,
    pub save_dir: Option<PathBuf>,
    pub filename: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug)]
pub struct Driver {
    client: Client,
}

impl Driver {
    pub fn with_config(config: Config) -> Result<Driver, Error> {
        let client = Client::with_config(config)?;

        Ok(Driver { client })
    }

    /// Locate the requested repository and save its archive, returning where
    /// the archive was written.
    pub fn get(&mut self, request: &GetRequest) -> Result<PathBuf, Error> {
        // validate the arguments before touching the network
        let format = match request.archive_type {
            Some(ref kind) => Some(kind.parse::<ArchiveFormat>()?),
            None => None,
        };

        self.client
            .api_root()
            .context("Unable to fetch the API root")?;

        let repository = repo::get_repo(&mut self.client, &request.owner, &request.repo)
            .with_context(|_| format!("Unable to fetch {}/{}", request.owner, request.repo))?;

        let options = SaveOptions {
            directory: request.save_dir.clone(),
            filename: request.filename.clone(),
            format,
            reference: request.reference.clone(),
        };

        let path = archive::save_archive(&self.client, &repository, &options)
            .context("Unable to save the archive")?;

        info!("Saved {}/{} to {}", request.owner, request.repo, path.display());
        Ok(path)
    }
}
