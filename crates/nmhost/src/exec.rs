//! Shell command execution.
//!
//! The command text is handed to the platform interpreter exactly as received:
//! `cmd /C <text>` on Windows, `/bin/sh -c <text>` elsewhere. No stdin is
//! forwarded, stdout and stderr are captured in full.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::ExecConfig;
use crate::response::ExecutionResult;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const KILL_GRACE: Duration = Duration::from_millis(500);
const READ_CHUNK_SIZE: usize = 8 * 1024;

#[cfg(windows)]
const SHELL: &str = "cmd";
#[cfg(not(windows))]
const SHELL: &str = "/bin/sh";

struct Captured {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    timed_out: bool,
}

/// Run `command` through the system shell and report how it went.
///
/// Blocks until the child exits, or until `config.timeout` elapses when one is set.
pub fn execute(command: &str, config: &ExecConfig) -> ExecutionResult {
    let mut cmd = shell_command(command);
    cmd.current_dir(&config.root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    #[cfg(unix)]
    if config.timeout.is_some() {
        use std::os::unix::process::CommandExt;
        // Own process group so a timeout can take down the whole pipeline.
        cmd.process_group(0);
    }

    let started = Instant::now();
    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::warn!(error = %err, root = %config.root.display(), "failed to start shell");
            return ExecutionResult::failed(format!("failed to start {SHELL}: {err}"), "");
        }
    };
    tracing::debug!(pid = child.id(), "command started");

    let captured = match config.timeout {
        None => child.wait_with_output().map(|out| Captured {
            status: out.status,
            stdout: out.stdout,
            stderr: out.stderr,
            timed_out: false,
        }),
        Some(limit) => wait_bounded(child, limit),
    };

    let captured = match captured {
        Ok(captured) => captured,
        Err(err) => {
            tracing::warn!(error = %err, "failed waiting for command");
            return ExecutionResult::failed(format!("failed waiting for command: {err}"), "");
        }
    };

    let stdout = String::from_utf8_lossy(&captured.stdout).into_owned();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if captured.timed_out {
        tracing::warn!(elapsed_ms, "command timed out and was killed");
        let limit = config.timeout.unwrap_or_default();
        return ExecutionResult::failed(format!("command timed out after {limit:?}"), stdout);
    }

    tracing::info!(
        exit_code = captured.status.code(),
        elapsed_ms,
        stdout_len = captured.stdout.len(),
        stderr_len = captured.stderr.len(),
        "command finished"
    );

    if captured.status.success() {
        ExecutionResult::succeeded(stdout)
    } else {
        let stderr = String::from_utf8_lossy(&captured.stderr).into_owned();
        ExecutionResult::failed(stderr, stdout)
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new(SHELL);
    // cmd.exe does its own parsing; quoting the text again would change it.
    cmd.arg("/C").raw_arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new(SHELL);
    cmd.arg("-c").arg(command);
    cmd
}

/// Wait for `child` at most `limit`, draining its pipes on helper threads.
///
/// The deadline covers both the shell and its pipes: a background job that keeps
/// stdout or stderr open past the deadline gets its process group killed too.
fn wait_bounded(mut child: Child, limit: Duration) -> io::Result<Captured> {
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);
    let pipes_closed = || {
        stdout.as_ref().map_or(true, Drain::is_finished)
            && stderr.as_ref().map_or(true, Drain::is_finished)
    };

    let deadline = Instant::now() + limit;
    let mut status = None;
    let mut timed_out = false;
    loop {
        if status.is_none() {
            let polled = child.try_wait();
            status = reap_on_error(&mut child, polled)?;
        }
        if status.is_some() && pipes_closed() {
            break;
        }
        if Instant::now() >= deadline {
            timed_out = true;
            kill(&mut child);
            break;
        }
        thread::sleep(POLL_INTERVAL);
    }

    let status = match status {
        Some(status) => status,
        None => child.wait()?,
    };

    // Pipes held by processes outside our reach are abandoned after a grace period.
    let grace = Instant::now() + KILL_GRACE;
    while !pipes_closed() && Instant::now() < grace {
        thread::sleep(POLL_INTERVAL);
    }

    Ok(Captured {
        status,
        stdout: stdout.map(Drain::take).unwrap_or_default(),
        stderr: stderr.map(Drain::take).unwrap_or_default(),
        timed_out,
    })
}

/// Kill the process group before handing a wait error back.
fn reap_on_error<T>(child: &mut Child, result: io::Result<T>) -> io::Result<T> {
    if let Err(err) = &result {
        tracing::warn!(error = %err, "wait failed, killing command");
        kill(child);
        let _ = child.wait();
    }
    result
}

/// Pipe contents collected by a helper thread, readable before the thread ends.
struct Drain {
    buf: Arc<Mutex<Vec<u8>>>,
    handle: JoinHandle<()>,
}

impl Drain {
    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    fn take(self) -> Vec<u8> {
        match self.buf.lock() {
            Ok(mut buf) => std::mem::take(&mut *buf),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Drain {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buf);
    let handle = thread::spawn(move || {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => match sink.lock() {
                    Ok(mut buf) => buf.extend_from_slice(&chunk[..n]),
                    Err(_) => break,
                },
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    tracing::debug!(error = %err, "pipe read ended early");
                    break;
                }
            }
        }
    });
    Drain { buf, handle }
}

#[cfg(unix)]
fn kill(child: &mut Child) {
    // SAFETY: plain syscall on a process group we created; no memory is shared.
    let rc = unsafe { libc::kill(-(child.id() as libc::pid_t), libc::SIGKILL) };
    if rc != 0 {
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill(child: &mut Child) {
    let _ = child.kill();
}
