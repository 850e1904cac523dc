use fs_err as fs;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Marker comment written above the PATH line; also what re-runs look for.
pub const PATH_MARKER: &str = "# added by mq-task installer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Unknown,
}

impl Shell {
    /// Classify a shell program path by its basename. Pure; anything
    /// unrecognized degrades to a manual-action advisory later.
    pub fn from_program(program: &str) -> Self {
        let name = Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("");
        match name {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            _ => Shell::Unknown,
        }
    }

    /// Profile files this shell family reads, in preference order. The
    /// first existing candidate wins.
    pub fn profile_candidates(self, home: &Path) -> Vec<PathBuf> {
        match self {
            Shell::Bash => vec![
                home.join(".bashrc"),
                home.join(".bash_profile"),
                home.join(".profile"),
            ],
            Shell::Zsh => vec![home.join(".zshrc"), home.join(".zprofile")],
            Shell::Fish => vec![home.join(".config/fish/config.fish")],
            Shell::Unknown => Vec::new(),
        }
    }

    fn path_line(self, bin_dir: &str) -> String {
        match self {
            Shell::Fish => format!("fish_add_path {bin_dir}"),
            _ => format!("export PATH=\"{bin_dir}:$PATH\""),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::Unknown => "unknown",
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// PATH block appended to this profile.
    Updated(PathBuf),
    /// Profile already references the install directory.
    AlreadyRegistered(PathBuf),
    /// Non-fatal: the user has to extend PATH themselves.
    ManualActionRequired(String),
}

/// Idempotently put `bin_dir` on the user's PATH: pick the profile of the
/// detected shell family and append a marker comment plus one PATH line,
/// unless the install directory is already mentioned. Append-only; re-runs
/// never duplicate the entry. Every failure here is an advisory outcome,
/// never a pipeline error.
pub fn register_path(home: &Path, shell_program: Option<&str>, bin_dir: &Path) -> RegisterOutcome {
    let Some(program) = shell_program else {
        return RegisterOutcome::ManualActionRequired("$SHELL is not set".to_string());
    };
    let shell = Shell::from_program(program);
    if shell == Shell::Unknown {
        return RegisterOutcome::ManualActionRequired(format!("unrecognized shell '{program}'"));
    }
    let Some(profile) = shell
        .profile_candidates(home)
        .into_iter()
        .find(|p| p.exists())
    else {
        return RegisterOutcome::ManualActionRequired(format!("no {shell} profile file found"));
    };
    match append_once(&profile, shell, bin_dir) {
        Ok(outcome) => outcome,
        Err(e) => RegisterOutcome::ManualActionRequired(format!(
            "could not update {}: {e}",
            profile.display()
        )),
    }
}

fn append_once(profile: &Path, shell: Shell, bin_dir: &Path) -> io::Result<RegisterOutcome> {
    let bin_dir = bin_dir.to_string_lossy();
    let existing = fs::read_to_string(profile)?;
    if existing.contains(bin_dir.as_ref()) {
        return Ok(RegisterOutcome::AlreadyRegistered(profile.to_path_buf()));
    }
    let mut f = fs::OpenOptions::new().append(true).open(profile)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(f)?;
    }
    writeln!(f)?;
    writeln!(f, "{PATH_MARKER}")?;
    writeln!(f, "{}", shell.path_line(&bin_dir))?;
    Ok(RegisterOutcome::Updated(profile.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_classification_uses_basename() {
        assert_eq!(Shell::from_program("/bin/bash"), Shell::Bash);
        assert_eq!(Shell::from_program("/usr/bin/zsh"), Shell::Zsh);
        assert_eq!(Shell::from_program("/usr/local/bin/fish"), Shell::Fish);
        assert_eq!(Shell::from_program("zsh"), Shell::Zsh);
        assert_eq!(Shell::from_program("/bin/tcsh"), Shell::Unknown);
        assert_eq!(Shell::from_program(""), Shell::Unknown);
    }

    #[test]
    fn profile_candidates_per_family() {
        let home = Path::new("/home/u");
        let bash = Shell::Bash.profile_candidates(home);
        assert_eq!(bash[0], home.join(".bashrc"));
        assert_eq!(
            Shell::Fish.profile_candidates(home),
            vec![home.join(".config/fish/config.fish")]
        );
        assert!(Shell::Unknown.profile_candidates(home).is_empty());
    }

    #[test]
    fn registration_is_idempotent() {
        let home = tempfile::tempdir().unwrap();
        let profile = home.path().join(".zshrc");
        std::fs::write(&profile, "# existing config\n").unwrap();
        let bin_dir = home.path().join(".mq-task/bin");

        let first = register_path(home.path(), Some("/bin/zsh"), &bin_dir);
        assert_eq!(first, RegisterOutcome::Updated(profile.clone()));
        let second = register_path(home.path(), Some("/bin/zsh"), &bin_dir);
        assert_eq!(second, RegisterOutcome::AlreadyRegistered(profile.clone()));

        let text = std::fs::read_to_string(&profile).unwrap();
        assert_eq!(text.matches(PATH_MARKER).count(), 1);
        assert_eq!(text.matches("export PATH").count(), 1);
    }

    #[test]
    fn first_existing_candidate_wins() {
        let home = tempfile::tempdir().unwrap();
        // No .bashrc; .bash_profile is the first existing candidate.
        std::fs::write(home.path().join(".bash_profile"), "").unwrap();
        std::fs::write(home.path().join(".profile"), "").unwrap();
        let outcome = register_path(home.path(), Some("/bin/bash"), Path::new("/opt/bin"));
        assert_eq!(
            outcome,
            RegisterOutcome::Updated(home.path().join(".bash_profile"))
        );
        let untouched = std::fs::read_to_string(home.path().join(".profile")).unwrap();
        assert!(untouched.is_empty());
    }

    #[test]
    fn fish_gets_fish_syntax() {
        let home = tempfile::tempdir().unwrap();
        let confd = home.path().join(".config/fish");
        std::fs::create_dir_all(&confd).unwrap();
        let profile = confd.join("config.fish");
        std::fs::write(&profile, "").unwrap();
        register_path(home.path(), Some("/usr/bin/fish"), Path::new("/opt/bin"));
        let text = std::fs::read_to_string(&profile).unwrap();
        assert!(text.contains("fish_add_path /opt/bin"));
        assert!(!text.contains("export PATH"));
    }

    #[test]
    fn unknown_shell_degrades_to_manual_action() {
        let home = tempfile::tempdir().unwrap();
        let outcome = register_path(home.path(), Some("/bin/tcsh"), Path::new("/opt/bin"));
        assert!(matches!(outcome, RegisterOutcome::ManualActionRequired(_)));
    }

    #[test]
    fn missing_profile_degrades_to_manual_action() {
        let home = tempfile::tempdir().unwrap();
        let outcome = register_path(home.path(), Some("/bin/zsh"), Path::new("/opt/bin"));
        assert!(matches!(outcome, RegisterOutcome::ManualActionRequired(_)));
    }

    #[test]
    fn unset_shell_degrades_to_manual_action() {
        let home = tempfile::tempdir().unwrap();
        let outcome = register_path(home.path(), None, Path::new("/opt/bin"));
        assert!(matches!(outcome, RegisterOutcome::ManualActionRequired(_)));
    }
}
