use clap::Parser;

/// Bootstrap installer for the mq-task binary. Detects the host platform,
/// resolves the latest release, downloads and checksum-verifies the
/// matching artifact, installs it under ~/.mq-task/bin, and registers that
/// directory on the shell PATH.
#[derive(Parser, Debug)]
#[command(
    name = "mq-task-install",
    version,
    disable_version_flag = true,
    about = "Install the latest mq-task release"
)]
pub struct Cli {
    /// Print installer version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,
}
