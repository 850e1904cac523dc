use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use mq_task_installer::cli::Cli;
use mq_task_installer::config::InstallConfig;
use mq_task_installer::ops;

fn main() -> ExitCode {
    // try_parse so this process, not clap, decides exit codes: help and
    // version requests exit 0, anything unrecognized exits 1.
    if let Err(e) = Cli::try_parse() {
        let _ = e.print();
        return match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        };
    }

    match InstallConfig::standard().and_then(|cfg| ops::run(&cfg)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
