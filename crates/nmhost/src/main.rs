mod exit;
mod logging;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use nmhost::frame::{FrameConfig, DEFAULT_MAX_PAYLOAD};
use nmhost::{parse_duration, serve_once, ExecConfig, HostConfig};

use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "nmhost",
    version,
    about = "Native messaging host: runs one shell command per framed stdin request"
)]
struct Cli {
    /// Working directory for commands. Default: system drive root.
    #[arg(long, value_name = "DIR", env = "NMHOST_ROOT")]
    root: Option<PathBuf>,

    /// Kill commands still running after this long (e.g. 30s, 500ms). Default: wait forever.
    #[arg(long, value_name = "DURATION", env = "NMHOST_TIMEOUT", value_parser = parse_duration)]
    timeout: Option<Duration>,

    /// Largest request payload accepted, in bytes.
    #[arg(long, value_name = "BYTES", env = "NMHOST_MAX_FRAME", default_value_t = DEFAULT_MAX_PAYLOAD)]
    max_frame: usize,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", env = "NMHOST_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", env = "NMHOST_LOG_LEVEL", default_value = "warn")]
    log_level: LogLevel,

    /// Window handle of the calling browser (Windows).
    #[arg(long, value_name = "HWND", hide = true)]
    parent_window: Option<i64>,

    /// Caller identity passed by the browser (extension origin or manifest path).
    #[arg(value_name = "CALLER")]
    caller: Vec<String>,
}

impl Cli {
    fn host_config(&self) -> HostConfig {
        let exec = match &self.root {
            Some(root) => ExecConfig::new(root),
            None => ExecConfig::default(),
        };
        HostConfig {
            frame: FrameConfig {
                max_payload_size: self.max_frame,
            },
            exec: exec.with_timeout(self.timeout),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let config = cli.host_config();
    tracing::debug!(
        caller = ?cli.caller,
        parent_window = ?cli.parent_window,
        root = %config.exec.root.display(),
        timeout = ?config.exec.timeout,
        "host started"
    );

    let result = serve_once(std::io::stdin().lock(), std::io::stdout().lock(), &config);
    std::process::exit(exit::finish(result));
}
