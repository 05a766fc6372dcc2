//! Renderer process execution: spawn, stream, resolve.
//!
//! ## Why write and read concurrently?
//!
//! OS pipes hold only a few tens of kilobytes. A renderer that starts
//! writing its output before it has consumed all of its input blocks once
//! the stdout pipe is full; if we were still blocked writing stdin at that
//! point, both sides would wait forever. So the stdin writer and the stdout
//! and stderr readers run as three independent futures joined together, and
//! only after all three finish do we wait for the exit status.
//!
//! ## Broken pipe
//!
//! A renderer that fails early (bad arguments, unreadable classpath) may
//! close stdin before reading the payload. The resulting `BrokenPipe` is not
//! an error in itself; the exit status decides the outcome.

use crate::error::ConvertError;
use crate::pipeline::launch::LaunchSpec;
use std::io;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::ChildStdin;
use tracing::{debug, warn};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Everything a finished renderer produced.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Non-`BrokenPipe` error hit while sending the payload, if any.
    pub write_error: Option<io::Error>,
    pub elapsed: Duration,
}

impl ProcessOutput {
    /// Map the run onto the success/failure contract.
    ///
    /// * exit 0 → stdout as text, trimmed of surrounding whitespace
    /// * non-zero → [`ConvertError::Execution`] (stderr verbatim, or the code)
    /// * exit 0 but the payload could not be sent → [`ConvertError::PayloadWrite`]
    pub fn into_result(self) -> Result<String, ConvertError> {
        let stderr = String::from_utf8_lossy(&self.stderr);

        if !self.status.success() {
            return Err(ConvertError::execution(self.status.code(), &stderr));
        }
        if let Some(e) = self.write_error {
            return Err(ConvertError::PayloadWrite(e));
        }
        if !stderr.trim().is_empty() {
            debug!("Renderer diagnostics: {}", stderr.trim());
        }

        let stdout = match String::from_utf8(self.stdout) {
            Ok(s) => s,
            Err(e) => {
                warn!("Renderer stdout is not valid UTF-8; replacing invalid sequences");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        Ok(stdout
            .trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
            .to_string())
    }
}

/// Run the renderer described by `spec`, feeding it `payload` on stdin.
///
/// Suspends until stdout and stderr are closed and the exit status is known,
/// or until `timeout` elapses, in which case the child is killed and reaped.
pub async fn run_renderer(
    spec: &LaunchSpec,
    payload: &[u8],
    timeout: Option<Duration>,
) -> Result<ProcessOutput, ConvertError> {
    debug!("Launching renderer: {} {:?}", spec.program, spec.args);
    let start = Instant::now();

    let mut child = spec
        .command()
        .spawn()
        .map_err(|source| ConvertError::LaunchFailed {
            program: spec.program.clone(),
            source,
        })?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| ConvertError::Internal("renderer stdin was not piped".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ConvertError::Internal("renderer stdout was not piped".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| ConvertError::Internal("renderer stderr was not piped".into()))?;

    let exchange = async {
        let (write_error, out, err) =
            tokio::join!(write_payload(stdin, payload), read_all(stdout), read_all(stderr));
        let status = child.wait().await?;
        Ok::<_, io::Error>((status, out?, err?, write_error))
    };

    let finished = match timeout {
        Some(limit) => {
            let outcome = tokio::time::timeout(limit, exchange).await;
            match outcome {
                Ok(r) => r,
                Err(_) => {
                    let elapsed_ms = start.elapsed().as_millis() as u64;
                    warn!("Renderer exceeded {:?}; killing it", limit);
                    if let Err(e) = child.kill().await {
                        warn!("Failed to kill timed-out renderer: {}", e);
                    }
                    return Err(ConvertError::Timeout { elapsed_ms });
                }
            }
        }
        None => exchange.await,
    };

    let (status, stdout, stderr, write_error) = finished?;
    let elapsed = start.elapsed();
    debug!(
        "Renderer exited with {} after {}ms ({} bytes out, {} bytes err)",
        status,
        elapsed.as_millis(),
        stdout.len(),
        stderr.len()
    );

    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
        write_error,
        elapsed,
    })
}

/// Write the whole payload, then close stdin to signal end of input.
///
/// Returns the first error other than `BrokenPipe`.
async fn write_payload(mut stdin: ChildStdin, payload: &[u8]) -> Option<io::Error> {
    let result = async {
        stdin.write_all(payload).await?;
        stdin.shutdown().await
    }
    .await;
    drop(stdin);

    match result {
        Ok(()) => None,
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("Renderer closed stdin before reading the whole payload");
            None
        }
        Err(e) => Some(e),
    }
}

/// Drain a pipe to EOF, preserving byte order.
async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}
