use crate::config::InstallConfig;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("querying release index: {0}")]
    Request(#[from] reqwest::Error),
    #[error("release index returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed release index response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("release index response carries no version tag")]
    EmptyTag,
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    #[serde(default)]
    tag_name: String,
}

/// Resolve the latest published version tag from the releases index.
/// One request per run, no caching; "latest" is always re-resolved.
pub fn resolve_latest(client: &Client, cfg: &InstallConfig) -> Result<String, ReleaseError> {
    let url = format!("{}/repos/{}/releases/latest", cfg.api_base, cfg.repo);
    let resp = client
        .get(&url)
        .header(
            "User-Agent",
            concat!("mq-task-install/", env!("CARGO_PKG_VERSION")),
        )
        .send()?;
    if !resp.status().is_success() {
        return Err(ReleaseError::Status(resp.status()));
    }
    let body = resp.text()?;
    let release: LatestRelease = serde_json::from_str(&body)?;
    if release.tag_name.is_empty() {
        return Err(ReleaseError::EmptyTag);
    }
    Ok(release.tag_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{COMMAND, REPO};
    use std::path::PathBuf;

    fn cfg_for(server: &mockito::Server) -> InstallConfig {
        InstallConfig {
            command: COMMAND.to_string(),
            repo: REPO.to_string(),
            api_base: server.url(),
            download_base: server.url(),
            install_root: PathBuf::from("/tmp/.mq-task"),
            manifest_name: "checksums.txt".to_string(),
            manifest_key_template: "{command}/{artifact}".to_string(),
            home: PathBuf::from("/tmp"),
            shell: None,
        }
    }

    #[test]
    fn extracts_tag_from_latest_release() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/repos/mqtask/mq-task/releases/latest")
            .with_header("content-type", "application/json")
            .with_body(r#"{"tag_name": "v1.2.0", "prerelease": false}"#)
            .create();
        let cfg = cfg_for(&server);
        let tag = resolve_latest(&Client::new(), &cfg).unwrap();
        assert_eq!(tag, "v1.2.0");
    }

    #[test]
    fn missing_tag_field_is_an_error() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/repos/mqtask/mq-task/releases/latest")
            .with_body("{}")
            .create();
        let cfg = cfg_for(&server);
        let err = resolve_latest(&Client::new(), &cfg).unwrap_err();
        assert!(matches!(err, ReleaseError::EmptyTag));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/repos/mqtask/mq-task/releases/latest")
            .with_body("not json")
            .create();
        let cfg = cfg_for(&server);
        let err = resolve_latest(&Client::new(), &cfg).unwrap_err();
        assert!(matches!(err, ReleaseError::Malformed(_)));
    }

    #[test]
    fn http_failure_is_an_error() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/repos/mqtask/mq-task/releases/latest")
            .with_status(404)
            .create();
        let cfg = cfg_for(&server);
        let err = resolve_latest(&Client::new(), &cfg).unwrap_err();
        assert!(matches!(err, ReleaseError::Status(_)));
    }
}
