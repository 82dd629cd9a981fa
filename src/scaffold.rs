//! `--touch` and `-x`: create a starter script and make scripts executable.

use crate::binder::{BoundArguments, BoundValue};
use crate::error::{Error, Result};
use crate::executor;
use crate::shell::{Alias, Shell};
use std::fs;
use std::path::{Path, PathBuf};

const GLOBAL_SHEBANG: &str = "#!/usr/bin/env nscript";

const DEMO_SCRIPT: &str = "\
function(shell, echo) {
    # generated by nscript
    shell.verbose true      # print each command before it runs
    echo hello world        # use the 'echo' alias
    shell whoami            # run any command line through 'shell'
}
";

fn local_suffix(local: bool) -> &'static str {
    if local { "[using local nscript]" } else { "" }
}

/// The interpreter line written at the top of a script. With `local` it
/// points at the running binary instead of whatever `nscript` is on PATH.
pub fn shebang(local: bool) -> Result<String> {
    if local {
        Ok(format!("#!{}", std::env::current_exe()?.display()))
    } else {
        Ok(GLOBAL_SHEBANG.to_string())
    }
}

/// Create a demo script at `path` and make it executable.
///
/// # Errors
///
/// Returns [`Error::FileExists`] if `path` already exists, or any error from
/// [`make_executable`].
pub fn touch_script(path: &Path, local: bool, shell: &Shell) -> Result<()> {
    if path.exists() {
        return Err(Error::FileExists(path.to_path_buf()));
    }
    println!(
        "Generating default script in '{}' {}",
        path.display(),
        local_suffix(local)
    );
    fs::write(path, DEMO_SCRIPT)?;
    make_executable(path, local, shell)
}

/// Make the script at `path` directly runnable.
///
/// On Unix the shebang is prepended (unless one is already there) and the
/// file is marked executable; on Windows a `.bat` launcher is written next to it.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if `path` does not exist, or
/// [`Error::CommandFailed`] if one of the helper commands fails.
pub fn make_executable(path: &Path, local: bool, shell: &Shell) -> Result<()> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    if cfg!(windows) {
        write_bat_launcher(path, local)
    } else {
        println!(
            "Marking script as executable: '{}' {}",
            path.display(),
            local_suffix(local)
        );
        prepend_shebang_and_chmod(path, local, shell)
    }
}

fn write_bat_launcher(path: &Path, local: bool) -> Result<()> {
    let mut bat = path.as_os_str().to_owned();
    bat.push(".bat");
    println!(
        "Generating executable script in '{}' {}",
        Path::new(&bat).display(),
        local_suffix(local)
    );

    let launcher = if local {
        std::env::current_exe()?.display().to_string()
    } else {
        "nscript".to_string()
    };
    let script_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    fs::write(&bat, format!("{launcher} {script_name} %*\r\n"))?;
    Ok(())
}

fn prepend_shebang_and_chmod(path: &Path, local: bool, shell: &Shell) -> Result<()> {
    let has_shebang = fs::read_to_string(path)?.starts_with("#!");
    let shebang = shebang(local)?;
    let script = path
        .to_str()
        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))?
        .to_string();
    let backup = format!("{script}.bak");

    executor::run_with(
        &["shell", "cp", "chmod", "rm", "echo", "cat"],
        &[],
        shell,
        |bound| {
            if !has_shebang {
                alias(bound, "cp")?.call(shell, &[script.clone(), backup.clone()], None)?;
                // From here on the only intact copy may be the backup.
                alias(bound, "echo")?
                    .write_to(shell, &[shebang], &script)
                    .and_then(|()| alias(bound, "cat")?.append_to(shell, &[backup.clone()], &script))
                    .map_err(|e| Error::BackupKept {
                        backup: PathBuf::from(&backup),
                        source: Box::new(e),
                    })?;
            }
            alias(bound, "chmod")?.call(shell, &["+x".to_string(), script.clone()], None)?;
            if !has_shebang {
                alias(bound, "rm")?.call(shell, &[backup], None)?;
            }
            Ok(())
        },
    )
}

fn alias<'b>(bound: &'b BoundArguments<'_>, name: &str) -> Result<&'b Alias> {
    match bound.get(name) {
        Some(BoundValue::Alias(alias)) => Ok(alias),
        _ => Err(Error::UnboundName(name.to_string())),
    }
}
