use crate::installer::InstallTarget;
use crate::platform::platform_ops;
use fs_err as fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("installed binary {0} is missing or not executable")]
    BinaryNotExecutable(String),
    #[error("command link {0} is missing or not a symlink")]
    LinkMissing(String),
    #[error("command link {link} points at {found}, expected {expected}")]
    LinkTarget {
        link: String,
        found: String,
        expected: String,
    },
}

/// Final acceptance gate: re-check the filesystem state the installer
/// claims to have produced. Runs even though every upstream step reported
/// success.
pub fn verify_installed(target: &InstallTarget) -> Result<(), VerifyError> {
    if !platform_ops().is_executable(&target.binary_path) {
        return Err(VerifyError::BinaryNotExecutable(
            target.binary_path.display().to_string(),
        ));
    }
    let link = target.link_path.display().to_string();
    let meta = fs::symlink_metadata(&target.link_path)
        .map_err(|_| VerifyError::LinkMissing(link.clone()))?;
    if !meta.file_type().is_symlink() {
        return Err(VerifyError::LinkMissing(link));
    }
    let found = fs::read_link(&target.link_path).map_err(|_| VerifyError::LinkMissing(link.clone()))?;
    if found != target.binary_path {
        return Err(VerifyError::LinkTarget {
            link,
            found: found.display().to_string(),
            expected: target.binary_path.display().to_string(),
        });
    }
    Ok(())
}
