//! Process execution with a hard wall-clock deadline

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{SandboxError, SandboxResult};

/// Windows creation flag to hide the console window
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Create a shell command configured for the current platform
///
/// On Windows, uses `cmd /C` with hidden console window.
/// On Unix, uses `sh -c`.
pub fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd.creation_flags(CREATE_NO_WINDOW);
        cmd
    }

    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Run `command` through the platform shell in `cwd`, giving up after `timeout`.
///
/// On Unix the shell is placed in a fresh process group. When the deadline
/// passes, the whole group is killed so that nothing the command spawned
/// outlives the call, and the shell itself is reaped by the runtime.
pub async fn run_with_timeout(
    command: &str,
    cwd: &Path,
    timeout: Duration,
) -> Result<SandboxResult, SandboxError> {
    let start = Instant::now();

    let mut cmd = shell_command(command);
    cmd.current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    let child = cmd
        .spawn()
        .map_err(|e| SandboxError::Spawn(format!("{}: {}", command, e)))?;
    let pid = child.id();
    debug!(command, ?pid, "spawned command");

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let result = SandboxResult {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
            };
            debug!(
                command,
                exit_code = result.exit_code,
                duration_ms = result.duration_ms,
                "command finished"
            );
            Ok(result)
        }
        Ok(Err(e)) => Err(SandboxError::Execution(e.to_string())),
        Err(_) => {
            warn!(
                command,
                ?pid,
                timeout_secs = timeout.as_secs_f64(),
                "command timed out, terminating"
            );
            if let Some(pid) = pid {
                terminate_group(pid);
            }
            Err(SandboxError::Timeout(timeout))
        }
    }
}

/// Kill every process in the group led by `pid`.
#[cfg(unix)]
fn terminate_group(pid: u32) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) => debug!(pid, "killed process group"),
        // ESRCH: the group already exited
        Err(nix::errno::Errno::ESRCH) => {}
        Err(e) => warn!(pid, "failed to kill process group: {}", e),
    }
}

#[cfg(not(unix))]
fn terminate_group(_pid: u32) {
    // The direct child is killed on drop; there is no group to signal.
}
