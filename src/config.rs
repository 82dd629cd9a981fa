//! Environment-driven configuration.

use std::path::{Path, PathBuf};

/// Overrides the program that runs shell-slot command lines.
pub const SHELL_ENV: &str = "NSCRIPT_SHELL";

/// Starts every run in verbose mode when set to a truthy value.
pub const VERBOSE_ENV: &str = "NSCRIPT_VERBOSE";

/// Tracing filter, falling back to `RUST_LOG`.
pub const LOG_ENV: &str = "NSCRIPT_LOG";

/// The system shell and the argument that makes it run a command string.
pub fn shell_program() -> (String, &'static str) {
    let shell = if let Ok(custom_shell) = std::env::var(SHELL_ENV) {
        custom_shell
    } else if cfg!(target_os = "windows") {
        // Try to find pwsh (PowerShell 7+) first, then fallback to powershell (Windows PowerShell)
        if which::which("pwsh").is_ok() {
            "pwsh".to_string()
        } else {
            "powershell".to_string()
        }
    } else {
        "sh".to_string()
    };

    let arg = shell_command_arg(&shell);
    (shell, arg)
}

/// PowerShell wants `-Command`, everything else takes `-c`.
///
/// Both `/` and `\` count as separators so a Windows path in
/// `NSCRIPT_SHELL` is recognised on any host.
fn shell_command_arg(shell: &str) -> &'static str {
    let file_name = shell.rsplit(['/', '\\']).next().unwrap_or(shell);
    let lower = file_name.to_ascii_lowercase();
    let stem = lower.strip_suffix(".exe").unwrap_or(&lower);
    match stem {
        "pwsh" | "powershell" => "-Command",
        _ => "-c",
    }
}

pub fn verbose_from_env() -> bool {
    std::env::var(VERBOSE_ENV).is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

/// The tracing filter directive, if logging was requested.
pub fn log_filter() -> Option<String> {
    std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
}

/// Resolve a script path against the current working directory.
///
/// Called after `--chdir` has been applied, so relative paths follow it.
pub fn resolve_script_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_shell_command_arg() {
        assert_eq!(shell_command_arg("sh"), "-c");
        assert_eq!(shell_command_arg("/bin/bash"), "-c");
        assert_eq!(shell_command_arg("pwsh"), "-Command");
        assert_eq!(shell_command_arg("/opt/powershell/pwsh"), "-Command");
        assert_eq!(shell_command_arg("C:\\tools\\powershell.exe"), "-Command");
        assert_eq!(shell_command_arg("C:\\Program Files\\PowerShell\\7\\PWSH.EXE"), "-Command");
        assert_eq!(shell_command_arg("C:\\tools\\bash.exe"), "-c");
    }

    #[test]
    fn test_is_truthy() {
        for v in ["1", "true", "yes", "on", "anything"] {
            assert!(is_truthy(v), "{v} should be truthy");
        }
        for v in ["", "0", "false", "FALSE", "no", "off", " 0 "] {
            assert!(!is_truthy(v), "{v} should be falsy");
        }
    }

    #[test]
    #[serial]
    fn test_shell_env_override() {
        // SAFETY: serialised with the other env-touching tests
        unsafe { std::env::set_var(SHELL_ENV, "bash") };
        assert_eq!(shell_program(), ("bash".to_string(), "-c"));
        unsafe { std::env::remove_var(SHELL_ENV) };
    }

    #[test]
    fn test_resolve_absolute_path_unchanged() {
        let abs = std::env::temp_dir().join("script.ns");
        assert_eq!(resolve_script_path(&abs), abs);
    }

    #[test]
    #[serial]
    fn test_resolve_relative_path_uses_cwd() {
        let cwd = std::env::current_dir().unwrap_or_default();
        assert_eq!(resolve_script_path(Path::new("a.ns")), cwd.join("a.ns"));
    }
}
