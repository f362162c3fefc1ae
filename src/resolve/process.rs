//! Subprocess-backed symbol resolver.
//!
//! Queries an external resolver binary per identifier use, in the style of
//! `guru -json describe <file>:#<offset>`, and decodes the JSON reply. Each
//! query is a blocking subprocess invocation. An optional wall-clock timeout
//! bounds a hung resolver; with no timeout configured, a hang stalls the
//! pipeline.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{debug, trace};

use super::{ResolveError, SymbolResolver};

/// Reply shape of a `describe`-style resolver query.
#[derive(Debug, Deserialize)]
struct DescribeReply {
    #[serde(default)]
    package: Option<DescribePackage>,
}

#[derive(Debug, Deserialize)]
struct DescribePackage {
    #[serde(default)]
    path: Option<String>,
}

/// A [`SymbolResolver`] that shells out to an external binary.
#[derive(Debug, Clone)]
pub struct ProcessResolver {
    command: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessResolver {
    /// A resolver invoking `command` with `args` plus the positional query
    /// argument `<file>:#<offset>`.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            timeout: None,
        }
    }

    /// The classic `guru -json describe` invocation.
    pub fn guru() -> Self {
        Self::new("guru", vec!["-json".to_string(), "describe".to_string()])
    }

    /// Bound each query by a wall-clock timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn run(&self, query: &str) -> Result<Vec<u8>, ResolveError> {
        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let Some(timeout) = self.timeout else {
            let output = command.output().map_err(|source| ResolveError::Spawn {
                command: self.command.clone(),
                source,
            })?;
            if !output.status.success() {
                return Err(ResolveError::Status {
                    status: output.status,
                });
            }
            return Ok(output.stdout);
        };

        let mut child = command.spawn().map_err(|source| ResolveError::Spawn {
            command: self.command.clone(),
            source,
        })?;

        // Drain stdout on a separate thread so a chatty resolver cannot fill
        // the pipe and block before the deadline check sees it exit.
        let mut stdout = child.stdout.take();
        let reader = std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Some(out) = stdout.as_mut() {
                let _ = out.read_to_end(&mut buf);
            }
            buf
        });

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait().map_err(ResolveError::Io)? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = reader.join();
                    return Err(ResolveError::Timeout(timeout));
                }
                None => std::thread::sleep(Duration::from_millis(10)),
            }
        };

        let output = reader.join().unwrap_or_default();
        if !status.success() {
            return Err(ResolveError::Status { status });
        }
        Ok(output)
    }
}

impl SymbolResolver for ProcessResolver {
    fn query(&self, file: &Path, offset: u32) -> Result<Option<String>, ResolveError> {
        let query = format!("{}:#{}", file.display(), offset);
        trace!(command = %self.command, %query, "resolver query");

        let output = self.run(&query)?;
        let reply: DescribeReply = serde_json::from_slice(&output)?;

        let path = reply
            .package
            .and_then(|p| p.path)
            .filter(|p| !p.is_empty());
        debug!(%query, path = ?path, "resolver reply");
        Ok(path)
    }
}
