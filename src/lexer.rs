use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::TokenStream;


/// Something that can turn a prepared source file into token lines. The
/// orchestrator only depends on this, so an in-process lexer can stand in
/// for a child process.
pub trait Lex {
    fn id(&self) -> &str;
    fn lex(&self, prepared: &Path) -> Result<TokenStream, InvokeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("{id}: cannot spawn: {source}")]
    Spawn {
        id: String,
        #[source]
        source: io::Error,
    },
    #[error("{id}: {status}")]
    Failed { id: String, status: ExitStatus },
    #[error("{}: killed after {}s", .id, .limit.as_secs_f64())]
    TimedOut { id: String, limit: Duration },
}

/// An external lexer executable, invoked as `path <prepared-source>`.
pub struct Lexer {
    path: PathBuf,
    id: String,
    timeout: Option<Duration>,
}

impl Lexer {
    pub fn new(path: PathBuf) -> Self {
        let id = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => path.display().to_string(),
        };
        Lexer {
            path,
            id,
            timeout: None,
        }
    }

    pub fn with_id(path: PathBuf, id: impl Into<String>) -> Self {
        Lexer {
            path,
            id: id.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn command(&self, prepared: &Path) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.arg(prepared)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn spawn_error(&self, source: io::Error) -> InvokeError {
        InvokeError::Spawn {
            id: self.id.clone(),
            source,
        }
    }

    fn wait(&self, prepared: &Path) -> Result<(ExitStatus, Vec<u8>), InvokeError> {
        let output = self
            .command(prepared)
            .output()
            .map_err(|e| self.spawn_error(e))?;
        let mut captured = output.stdout;
        captured.extend_from_slice(&output.stderr);
        Ok((output.status, captured))
    }

    fn wait_deadline(
        &self,
        prepared: &Path,
        limit: Duration,
    ) -> Result<(ExitStatus, Vec<u8>), InvokeError> {
        let mut child = self
            .command(prepared)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let deadline = Instant::now() + limit;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(InvokeError::TimedOut {
                        id: self.id.clone(),
                        limit,
                    });
                }
                Ok(None) => thread::sleep(Duration::from_millis(10)),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(self.spawn_error(e));
                }
            }
        };
        let mut captured = finish(stdout);
        captured.extend(finish(stderr));
        Ok((status, captured))
    }
}

impl Lex for Lexer {
    fn id(&self) -> &str {
        &self.id
    }

    fn lex(&self, prepared: &Path) -> Result<TokenStream, InvokeError> {
        let (status, captured) = match self.timeout {
            None => self.wait(prepared)?,
            Some(limit) => self.wait_deadline(prepared, limit)?,
        };
        if !status.success() {
            return Err(InvokeError::Failed {
                id: self.id.clone(),
                status,
            });
        }
        Ok(tokens(&captured))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut captured = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut captured);
        }
        captured
    })
}

fn finish(reader: JoinHandle<Vec<u8>>) -> Vec<u8> {
    reader.join().unwrap_or_default()
}

// Invalid byte sequences are dropped, not errors.
fn tokens(captured: &[u8]) -> TokenStream {
    let text: String = String::from_utf8_lossy(captured)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
