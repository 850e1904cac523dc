use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("unsupported operating system '{0}'")]
    UnsupportedOs(String),
    #[error("unsupported architecture '{0}'")]
    UnsupportedArch(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Os {
    pub fn parse(name: &str) -> Result<Self, PlatformError> {
        match name {
            "linux" => Ok(Os::Linux),
            "macos" | "darwin" => Ok(Os::Darwin),
            "windows" | "win32" | "cygwin" | "msys" => Ok(Os::Windows),
            other => Err(PlatformError::UnsupportedOs(other.to_string())),
        }
    }

    pub fn exe_suffix(self) -> &'static str {
        match self {
            Os::Windows => ".exe",
            _ => "",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        })
    }
}

impl Arch {
    pub fn parse(name: &str) -> Result<Self, PlatformError> {
        match name {
            "x86_64" | "amd64" | "x64" => Ok(Arch::X86_64),
            "aarch64" | "arm64" => Ok(Arch::Aarch64),
            other => Err(PlatformError::UnsupportedArch(other.to_string())),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
        })
    }
}

/// Canonical (os, arch) pair for the running host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Resolve the host platform from what the OS reports. Both axes must
    /// map to a known value; anything else fails here, before any network
    /// activity.
    pub fn detect() -> Result<Self, PlatformError> {
        Ok(Self {
            os: Os::parse(std::env::consts::OS)?,
            arch: Arch::parse(std::env::consts::ARCH)?,
        })
    }

    /// Release target triple, e.g. `x86_64-unknown-linux-gnu`.
    pub fn target_triple(&self) -> String {
        let suffix = match self.os {
            Os::Linux => "unknown-linux-gnu",
            Os::Darwin => "apple-darwin",
            Os::Windows => "pc-windows-msvc",
        };
        format!("{}-{}", self.arch, suffix)
    }
}

pub fn platform_ops() -> &'static dyn PlatformOps {
    &ConcretePlatform
}

pub trait PlatformOps: Sync + Send {
    fn make_executable(&self, path: &Path) -> io::Result<()>;
    fn is_executable(&self, path: &Path) -> bool;
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UNIX_PLATFORM as ConcretePlatform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WINDOWS_PLATFORM as ConcretePlatform;
