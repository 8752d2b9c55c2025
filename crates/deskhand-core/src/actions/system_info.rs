//! System information action

use serde_json::{json, Value};

use crate::actions::{Action, ActionOutput, BoxFuture};
use crate::error::ActionError;

use super::process_utils::{direct_command, os_version_command, probe_output};

const UNKNOWN: &str = "unknown";

/// Reports a fixed set of host descriptors. Takes no parameters and never fails.
#[derive(Debug, Default)]
pub struct SystemInfo;

impl SystemInfo {
    pub fn new() -> Self {
        Self
    }

    /// Collect the host descriptors
    pub fn collect() -> Value {
        json!({
            "platform": platform_family(),
            "platform_release": platform_release(),
            "platform_version": platform_version(),
            "architecture": std::env::consts::ARCH,
            "processor": processor(),
            "hostname": hostname(),
            "agent_version": env!("CARGO_PKG_VERSION"),
        })
    }
}

impl Action for SystemInfo {
    fn name(&self) -> &str {
        "system_info"
    }

    fn description(&self) -> &str {
        "Collects information about the current system"
    }

    fn execute(&self, _params: Value) -> BoxFuture<'_, Result<ActionOutput, ActionError>> {
        Box::pin(async move {
            // The probes spawn short blocking processes
            let info = tokio::task::spawn_blocking(Self::collect)
                .await
                .map_err(|e| ActionError::ExecutionError(e.to_string()))?;
            Ok(ActionOutput::success(info))
        })
    }
}

/// OS family in the conventional capitalised form
fn platform_family() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        "openbsd" => "OpenBSD",
        "netbsd" => "NetBSD",
        other => other,
    }
}

fn platform_release() -> String {
    probe_output(os_version_command()).unwrap_or_else(|| UNKNOWN.to_string())
}

fn platform_version() -> String {
    #[cfg(unix)]
    {
        let mut cmd = direct_command("uname");
        cmd.arg("-v");
        probe_output(cmd).unwrap_or_else(|| UNKNOWN.to_string())
    }

    #[cfg(not(unix))]
    {
        probe_output(os_version_command()).unwrap_or_else(|| UNKNOWN.to_string())
    }
}

fn processor() -> String {
    #[cfg(target_os = "linux")]
    {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo")
            && let Some(model) = cpuinfo
                .lines()
                .find(|line| line.starts_with("model name"))
                .and_then(|line| line.split_once(':'))
                .map(|(_, model)| model.trim().to_string())
        {
            return model;
        }
    }

    #[cfg(windows)]
    {
        if let Ok(id) = std::env::var("PROCESSOR_IDENTIFIER") {
            return id;
        }
    }

    std::env::consts::ARCH.to_string()
}

fn hostname() -> String {
    for var in ["HOSTNAME", "COMPUTERNAME"] {
        if let Ok(name) = std::env::var(var)
            && !name.is_empty()
        {
            return name;
        }
    }

    probe_output(direct_command("hostname")).unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_all_descriptors() {
        let output = SystemInfo::new().execute(Value::Null).await.unwrap();
        assert!(output.success);
        for key in [
            "platform",
            "platform_release",
            "platform_version",
            "architecture",
            "processor",
            "hostname",
            "agent_version",
        ] {
            let value = output.get(key).and_then(Value::as_str);
            assert!(value.is_some_and(|v| !v.is_empty()), "missing {}", key);
        }
    }

    #[tokio::test]
    async fn test_ignores_parameters() {
        let output = SystemInfo::new()
            .execute(json!({"unexpected": true}))
            .await
            .unwrap();
        assert!(output.success);
        assert_eq!(output.get("architecture"), Some(&json!(std::env::consts::ARCH)));
    }
}
