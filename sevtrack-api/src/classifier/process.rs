//! External process gateway
//!
//! Runs `<interpreter> <script> <args...>` and collects its standard output.
//! Any output on the error stream fails the call at once, whatever the exit
//! code or standard output. The exit status is logged but never inspected.

use super::{ClassifierError, ClassifierGateway};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, ChildStdout, Command};
use tracing::{debug, error};

/// Spawns one classifier process per call
#[derive(Debug, Clone)]
pub struct ProcessGateway {
    interpreter: String,
    timeout: Option<Duration>,
}

impl ProcessGateway {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, script: &Path, args: &[String]) -> Result<String, ClassifierError> {
        // kill_on_drop: an early stderr return or a timeout must not leave the child running
        let mut child = Command::new(&self.interpreter)
            .arg(script)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(ClassifierError::Spawn)?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ClassifierError::Io(std::io::Error::other("classifier stdout not captured"))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            ClassifierError::Io(std::io::Error::other("classifier stderr not captured"))
        })?;

        let stdout_done = read_to_end(stdout);
        let stderr_chunk = first_chunk(stderr);
        tokio::pin!(stdout_done, stderr_chunk);

        let mut output: Option<Vec<u8>> = None;
        let mut stderr_open = true;

        while stderr_open || output.is_none() {
            tokio::select! {
                chunk = &mut stderr_chunk, if stderr_open => {
                    match chunk? {
                        Some(text) => {
                            error!(script = %script.display(), "Classifier error output: {}", text);
                            return Err(ClassifierError::Stderr(text));
                        }
                        None => stderr_open = false,
                    }
                }
                bytes = &mut stdout_done, if output.is_none() => {
                    output = Some(bytes?);
                }
            }
        }

        let status = child.wait().await?;
        debug!(script = %script.display(), status = %status, "Classifier exited");

        let output = output.unwrap_or_default();
        Ok(String::from_utf8_lossy(&output).trim().to_string())
    }
}

#[async_trait]
impl ClassifierGateway for ProcessGateway {
    async fn classify(&self, script: &Path, args: &[String]) -> Result<String, ClassifierError> {
        debug!(
            interpreter = %self.interpreter,
            script = %script.display(),
            arg_count = args.len(),
            "Spawning classifier"
        );

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(script, args))
                .await
                .map_err(|_| ClassifierError::Timeout(limit))?,
            None => self.run(script, args).await,
        }
    }
}

async fn read_to_end(mut stdout: ChildStdout) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    stdout.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// First bytes written to stderr, or `None` once the stream closes empty
async fn first_chunk(mut stderr: ChildStderr) -> std::io::Result<Option<String>> {
    let mut buf = [0u8; 4096];
    let n = stderr.read(&mut buf).await?;
    if n == 0 {
        Ok(None)
    } else {
        Ok(Some(String::from_utf8_lossy(&buf[..n]).into_owned()))
    }
}
