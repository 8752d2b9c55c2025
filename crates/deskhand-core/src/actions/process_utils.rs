//! Helpers for probing the host with short-lived commands
//!
//! These run synchronously and are only used for cheap, fixed queries such
//! as the kernel release. Model-requested commands go through
//! `deskhand_sandbox::run_with_timeout` instead.

use std::process::Command;

/// Windows creation flag to hide the console window
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Configure a std::process::Command to hide the console window on Windows
#[cfg(windows)]
pub fn hide_console_window(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
pub fn hide_console_window(_cmd: &mut Command) {}

/// Create a command for direct program execution with hidden console
pub fn direct_command(program: &str) -> Command {
    let mut cmd = Command::new(program);
    hide_console_window(&mut cmd);
    cmd
}

/// Create a command that prints the OS release.
pub fn os_version_command() -> Command {
    #[cfg(target_os = "linux")]
    {
        let mut cmd = direct_command("uname");
        cmd.arg("-r");
        cmd
    }

    #[cfg(target_os = "macos")]
    {
        let mut cmd = direct_command("sw_vers");
        cmd.arg("-productVersion");
        cmd
    }

    #[cfg(target_os = "windows")]
    {
        let mut cmd = direct_command("cmd");
        cmd.args(["/C", "ver"]);
        cmd
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        let mut cmd = direct_command("uname");
        cmd.arg("-r");
        cmd
    }
}

/// Run a probe command and return its trimmed stdout, if it succeeded and
/// printed something.
pub fn probe_output(mut cmd: Command) -> Option<String> {
    let output = cmd.output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
