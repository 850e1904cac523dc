use crate::artifact::{self, ArtifactSpec};
use crate::checksum::{self, ChecksumError, Sha256Digest};
use crate::config::InstallConfig;
use crate::installer::{self, InstallTarget};
use crate::platform::Platform;
use crate::release;
use crate::shell::{self, RegisterOutcome};
use crate::verifier;
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::time::Duration;

/// One full installation pass, strictly sequential:
/// detect -> resolve -> locate -> download + checksum -> install ->
/// register PATH -> final verification. The first failing stage aborts the
/// rest; only PATH registration degrades to an advisory outcome.
pub fn run(cfg: &InstallConfig) -> Result<RegisterOutcome> {
    let platform = Platform::detect()?;

    let pb = spinner();
    let client = Client::new();

    pb.set_message(format!("resolving latest {} release", cfg.command));
    let version = release::resolve_latest(&client, cfg)?;
    let spec = ArtifactSpec::locate(cfg, &version, platform);

    // Both downloads stage under one TempDir so the files are released on
    // every exit path, including the checksum-failure abort.
    let staging = tempfile::tempdir().context("creating staging directory")?;
    pb.set_message(format!("downloading {}", spec.file_name));
    let artifact_path = staging.path().join(&spec.file_name);
    artifact::download(&client, &spec.url, &artifact_path)?;

    pb.set_message("verifying checksum");
    let manifest_path = staging.path().join(&cfg.manifest_name);
    artifact::download(&client, &spec.manifest_url, &manifest_path)
        .map_err(|e| ChecksumError::ManifestUnavailable(e.to_string()))?;
    checksum::verify(&Sha256Digest, &artifact_path, &manifest_path, &spec.manifest_key)?;

    pb.set_message(format!("installing {} {version}", cfg.command));
    let target = InstallTarget::new(cfg, &spec.file_name, platform);
    installer::install(&artifact_path, &target)?;

    let outcome = shell::register_path(&cfg.home, cfg.shell.as_deref(), &target.bin_dir);

    verifier::verify_installed(&target)?;
    pb.finish_and_clear();

    println!("{} {} {version}", "Installed".green().bold(), cfg.command);
    println!("  binary  {}", target.binary_path.display());
    println!("  command {}", target.link_path.display());
    match &outcome {
        RegisterOutcome::Updated(profile) => {
            println!(
                "  profile {} updated; restart your shell to pick up PATH",
                profile.display()
            );
        }
        RegisterOutcome::AlreadyRegistered(_) => {}
        RegisterOutcome::ManualActionRequired(reason) => {
            println!(
                "{} {reason}; add {} to your PATH manually",
                "note:".yellow().bold(),
                target.bin_dir.display()
            );
        }
    }
    Ok(outcome)
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
