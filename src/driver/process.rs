use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::DriverError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Output of a subprocess that exited successfully.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Run a command to completion, killing it once `timeout` elapses.
///
/// stdout and stderr are drained on helper threads so a chatty child
/// cannot stall on a full pipe while we poll for its exit.
pub fn run_with_timeout(
    command: &mut Command,
    timeout: Duration,
) -> Result<CapturedOutput, DriverError> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(program = %program, timeout_ms = timeout.as_millis() as u64, "spawning backend call");

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| DriverError::Spawn {
            program: program.clone(),
            source,
        })?;

    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);
    let deadline = Instant::now() + timeout;

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DriverError::Timeout {
                    program,
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => {
                return Err(DriverError::Io {
                    context: format!("waiting for {}", program),
                    source,
                });
            }
        }
    };

    let stdout = collect(stdout);
    let stderr = String::from_utf8_lossy(&collect(stderr)).trim().to_string();

    if !status.success() {
        return Err(DriverError::Failed {
            program,
            status,
            stderr,
        });
    }

    Ok(CapturedOutput { stdout, stderr })
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
