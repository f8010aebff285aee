use std::path::PathBuf;
use std::time::Duration;

use nmhost_frame::FrameConfig;

/// Environment variable naming the system drive on Windows (e.g. `C:`).
pub const SYSTEM_DRIVE_VAR: &str = "SystemDrive";

/// Execution context for the one command a host invocation runs.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Working directory of the shell.
    pub root: PathBuf,
    /// Kill the command if it is still running after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl ExecConfig {
    /// Run in `root` with no timeout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self::new(system_root())
    }
}

/// Everything a single invocation needs, resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    pub frame: FrameConfig,
    pub exec: ExecConfig,
}

/// Root of the system drive, e.g. `C:\`.
///
/// Falls back to `\` (root of the current drive) when `SystemDrive` is unset.
#[cfg(windows)]
pub fn system_root() -> PathBuf {
    let drive = std::env::var(SYSTEM_DRIVE_VAR).unwrap_or_default();
    PathBuf::from(format!("{drive}\\"))
}

/// Filesystem root.
#[cfg(not(windows))]
pub fn system_root() -> PathBuf {
    PathBuf::from("/")
}

/// Parse a duration such as `5s`, `500ms` or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration value: {input}"))?;

    if value == 0 {
        return Err("duration must be greater than zero".to_string());
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
