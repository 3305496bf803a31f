use std::collections::HashMap;
use serde_json::Value;

use client::Client;
use errors::ToolError;
use template;
use urls;

/// The object describing a single repository, as returned by the API.
///
/// Only a couple of fields are ever looked at, so the rest of the object is
/// kept around untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    raw: Value,
}

impl Repository {
    pub fn from_value(raw: Value) -> Repository {
        Repository { raw }
    }

    pub fn name(&self) -> Result<&str, ToolError> {
        self.field("name")
    }

    /// The URI template used to download an archive of this repository.
    pub fn archive_url(&self) -> Result<&str, ToolError> {
        self.field("archive_url")
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    fn field(&self, key: &str) -> Result<&str, ToolError> {
        self.raw
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::missing_field("repository", key))
    }
}

/// Look up the repository `owner/name` using the `repository_url` template
/// advertised by the API root.
pub fn get_repo(client: &mut Client, owner: &str, name: &str) -> Result<Repository, ToolError> {
    let repository_url = client
        .api_root()?
        .get("repository_url")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| ToolError::missing_field("API root", "repository_url"))?;

    let mut vars = HashMap::new();
    vars.insert("owner", owner);
    vars.insert("repo", name);

    let url = urls::parse(&template::expand(&repository_url, &vars))?;
    info!("Fetching {}/{}", owner, name);

    let raw = client.get_json(&url)?;
    Ok(Repository::from_value(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, ConnectionMethod};
    use mockito::Server;

    fn client_for(server: &Server) -> Client {
        let cfg = Config {
            connection_method: ConnectionMethod::Http,
            api_host: server.host_with_port(),
            ..Config::default()
        };

        Client::with_config(cfg).unwrap()
    }

    #[test]
    fn fields_are_looked_up_lazily() {
        let repo = Repository::from_value(json!({"name": "octo"}));

        assert_eq!(repo.name().unwrap(), "octo");
        match repo.archive_url() {
            Err(ToolError::MissingField { ref field, .. }) if field == "archive_url" => {}
            other => panic!("Expected a MissingField, got {:?}", other),
        }
    }

    #[test]
    fn resolve_a_repository_through_the_api_root() {
        let mut server = Server::new();
        let root = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(format!(
                r#"{{"repository_url": "{}/repos/{{owner}}/{{repo}}"}}"#,
                server.url()
            ))
            .create();
        let repo = server
            .mock("GET", "/repos/acme/widget")
            .with_status(200)
            .with_body(r#"{"name": "widget", "archive_url": "x"}"#)
            .create();
        let mut client = client_for(&server);

        let got = get_repo(&mut client, "acme", "widget").unwrap();

        root.assert();
        repo.assert();
        assert_eq!(got.name().unwrap(), "widget");
    }

    #[test]
    fn owner_and_name_are_escaped() {
        let mut server = Server::new();
        let _root = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(format!(
                r#"{{"repository_url": "{}/repos/{{owner}}/{{repo}}"}}"#,
                server.url()
            ))
            .create();
        let repo = server
            .mock("GET", "/repos/a%20b/c%2Fd")
            .with_status(200)
            .with_body(r#"{"name": "c/d"}"#)
            .create();
        let mut client = client_for(&server);

        get_repo(&mut client, "a b", "c/d").unwrap();

        repo.assert();
    }

    #[test]
    fn root_without_a_repository_url() {
        let mut server = Server::new();
        let _root = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"{"current_user_url": "https://api.github.com/user"}"#)
            .create();
        let mut client = client_for(&server);

        match get_repo(&mut client, "acme", "widget") {
            Err(ToolError::MissingField { ref field, .. }) if field == "repository_url" => {}
            other => panic!("Expected a MissingField, got {:?}", other),
        }
    }
}
