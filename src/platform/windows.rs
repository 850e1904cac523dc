use crate::platform::PlatformOps;
use std::io;
use std::path::Path;

pub static WINDOWS_PLATFORM: Windows = Windows;

pub struct Windows;

impl PlatformOps for Windows {
    // Windows has no executable bit; presence of the .exe file is enough.
    fn make_executable(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn is_executable(&self, path: &Path) -> bool {
        std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::windows::fs::symlink_file(target, link)
    }
}
