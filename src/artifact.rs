use crate::config::InstallConfig;
use crate::platform::Platform;
use fs_err as fs;
use reqwest::blocking::Client;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("requesting {url}: {source}")]
    Request { url: String, source: reqwest::Error },
    #[error("download of {url} failed with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("writing downloaded file: {0}")]
    Io(#[from] io::Error),
}

/// Where a release artifact lives and how the checksum manifest refers to
/// it. Pure string construction from (version, platform); total for any
/// valid platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// Asset file name, `{command}-{triple}` plus `.exe` on windows.
    pub file_name: String,
    pub url: String,
    pub manifest_url: String,
    /// Key the manifest lists this artifact under.
    pub manifest_key: String,
}

impl ArtifactSpec {
    pub fn locate(cfg: &InstallConfig, version: &str, platform: Platform) -> Self {
        let file_name = format!(
            "{}-{}{}",
            cfg.command,
            platform.target_triple(),
            platform.os.exe_suffix()
        );
        let release_dir = format!(
            "{}/{}/releases/download/{}",
            cfg.download_base, cfg.repo, version
        );
        Self {
            url: format!("{release_dir}/{file_name}"),
            manifest_url: format!("{release_dir}/{}", cfg.manifest_name),
            manifest_key: cfg.manifest_key(&file_name),
            file_name,
        }
    }
}

/// Fetch `url` into `dest`. The caller owns the staging directory `dest`
/// lives in, so the file is released on every exit path.
pub fn download(client: &Client, url: &str, dest: &Path) -> Result<(), DownloadError> {
    let mut resp = client.get(url).send().map_err(|source| DownloadError::Request {
        url: url.to_string(),
        source,
    })?;
    if !resp.status().is_success() {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    let mut out = fs::File::create(dest)?;
    resp.copy_to(&mut out).map_err(|source| DownloadError::Request {
        url: url.to_string(),
        source,
    })?;
    Ok(())
}
