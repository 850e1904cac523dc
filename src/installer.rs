use crate::config::InstallConfig;
use crate::platform::{platform_ops, Platform};
use fs_err as fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("install step '{step}' failed: {source}")]
pub struct InstallError {
    pub step: &'static str,
    #[source]
    pub source: io::Error,
}

fn step(step: &'static str) -> impl FnOnce(io::Error) -> InstallError {
    move |source| InstallError { step, source }
}

/// Filesystem layout the binary is installed into. Derived once from the
/// configuration and platform, read-only afterwards. The binary keeps its
/// target-triple file name; the symlink carries the canonical command name.
#[derive(Debug, Clone)]
pub struct InstallTarget {
    pub bin_dir: PathBuf,
    pub binary_path: PathBuf,
    pub link_path: PathBuf,
}

impl InstallTarget {
    pub fn new(cfg: &InstallConfig, artifact_file: &str, platform: Platform) -> Self {
        let bin_dir = cfg.bin_dir();
        Self {
            binary_path: bin_dir.join(artifact_file),
            link_path: bin_dir.join(format!("{}{}", cfg.command, platform.os.exe_suffix())),
            bin_dir,
        }
    }
}

/// Promote a verified artifact into the install directory: create the bin
/// dir, move the file into place, mark it executable, and point the stable
/// command-name symlink at it. Steps run in order; the first failure is
/// reported with its step name. No rollback of earlier steps.
pub fn install(verified: &Path, target: &InstallTarget) -> Result<(), InstallError> {
    fs::create_dir_all(&target.bin_dir).map_err(step("create install directory"))?;
    move_file(verified, &target.binary_path).map_err(step("move binary into place"))?;
    platform_ops()
        .make_executable(&target.binary_path)
        .map_err(step("set executable permissions"))?;
    replace_link(&target.binary_path, &target.link_path).map_err(step("create command symlink"))?;
    Ok(())
}

// Staging dirs commonly sit on another filesystem, where rename fails.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)?;
            Ok(())
        }
    }
}

fn replace_link(target: &Path, link: &Path) -> io::Result<()> {
    match fs::symlink_metadata(link) {
        Ok(_) => fs::remove_file(link)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    platform_ops().symlink(target, link)
}
