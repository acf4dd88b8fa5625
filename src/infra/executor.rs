//! Shell command execution
//!
//! Runs one shell command inside a package folder and forwards its output
//! line by line, each line prefixed with a coloured tag so the interleaved
//! output of concurrent packages stays readable. The exit status is handed
//! back to the caller; a failing command is not an error at this layer.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::core::color::{ColorRotation, OutputTags};
use crate::error::ExecutorError;
use crate::infra::filesystem;

/// Outcome of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReport {
    /// Tag the output was prefixed with
    pub tag: String,
    /// Command line passed to the shell
    pub command: String,
    /// Directory the command ran in
    pub working_dir: PathBuf,
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    /// Whether the process exited with status 0
    pub success: bool,
}

/// Which child stream a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

/// A forwarded output line, tag included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedLine {
    /// Source stream
    pub stream: StreamKind,
    /// `<tag> <line>`
    pub text: String,
}

/// Where forwarded lines go
#[derive(Debug, Clone)]
pub enum OutputSink {
    /// Our own stdout / stderr
    Console,
    /// In-memory buffer
    Memory(Arc<Mutex<Vec<TaggedLine>>>),
}

impl OutputSink {
    fn write(&self, stream: StreamKind, text: String) {
        match self {
            Self::Console => {
                // One locked write per line keeps concurrent lines whole
                let _ = match stream {
                    StreamKind::Stdout => writeln!(std::io::stdout().lock(), "{text}"),
                    StreamKind::Stderr => writeln!(std::io::stderr().lock(), "{text}"),
                };
            }
            Self::Memory(lines) => {
                lines
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(TaggedLine { stream, text });
            }
        }
    }
}

/// Runs shell commands with tagged output
#[derive(Debug)]
pub struct CommandExecutor {
    colors: Mutex<ColorRotation>,
    colored: bool,
    sink: OutputSink,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    /// Executor writing coloured tags to the console
    pub fn new() -> Self {
        Self {
            colors: Mutex::new(ColorRotation::new()),
            colored: true,
            sink: OutputSink::Console,
        }
    }

    /// Enable or disable tag colours
    #[must_use]
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Send forwarded lines to `sink`
    #[must_use]
    pub fn with_sink(mut self, sink: OutputSink) -> Self {
        self.sink = sink;
        self
    }

    /// Executor that records uncoloured output in memory
    pub fn capturing() -> (Self, Arc<Mutex<Vec<TaggedLine>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let executor = Self::new()
            .with_color(false)
            .with_sink(OutputSink::Memory(Arc::clone(&lines)));
        (executor, lines)
    }

    /// Run `command` in `working_dir`
    ///
    /// Output lines are tagged with `tag`, or with the folder name of
    /// `working_dir` when no tag is given. Resolves once the process exits,
    /// whatever its exit code.
    pub async fn execute(
        &self,
        working_dir: &Path,
        command: &str,
        tag: Option<&str>,
    ) -> Result<ExitReport, ExecutorError> {
        let tag = tag.map_or_else(|| filesystem::folder_name(working_dir), str::to_string);
        let tags = self.tags_for(&tag);

        tracing::debug!("{tag}: cd {} && {command}", working_dir.display());

        let mut child = shell(command)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutorError::Spawn {
                command: command.to_string(),
                dir: working_dir.to_path_buf(),
                error: e.to_string(),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (status, (), ()) = tokio::join!(
            child.wait(),
            forward_lines(stdout, &tags.stdout, StreamKind::Stdout, &self.sink),
            forward_lines(stderr, &tags.stderr, StreamKind::Stderr, &self.sink),
        );

        let status = status.map_err(|e| ExecutorError::Wait {
            command: command.to_string(),
            error: e.to_string(),
        })?;

        if !status.success() {
            tracing::debug!("{tag}: '{command}' exited with {status}");
        }

        Ok(ExitReport {
            tag,
            command: command.to_string(),
            working_dir: working_dir.to_path_buf(),
            code: status.code(),
            success: status.success(),
        })
    }

    fn tags_for(&self, name: &str) -> OutputTags {
        if !self.colored {
            return OutputTags::plain(name);
        }
        let color = self
            .colors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        OutputTags::colored(name, color)
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

async fn forward_lines<R>(reader: Option<R>, tag: &str, stream: StreamKind, sink: &OutputSink)
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };

    // Drain to EOF: closing the pipe early would SIGPIPE the child
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                sink.write(stream, format!("{tag} {line}"));
            }
            Err(e) => {
                tracing::warn!("{tag} output stream failed: {e}");
                break;
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lines(buffer: &Arc<Mutex<Vec<TaggedLine>>>) -> Vec<TaggedLine> {
        buffer.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let temp = TempDir::new().unwrap();
        let (executor, _) = CommandExecutor::capturing();

        let report = executor
            .execute(temp.path(), "touch marker", Some("core"))
            .await
            .unwrap();

        assert!(report.success);
        assert_eq!(report.code, Some(0));
        assert!(temp.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_output_lines_are_tagged_per_stream() {
        let temp = TempDir::new().unwrap();
        let (executor, buffer) = CommandExecutor::capturing();

        executor
            .execute(temp.path(), "echo one; echo two; echo oops 1>&2", Some("core"))
            .await
            .unwrap();

        let captured = lines(&buffer);
        let stdout: Vec<&str> = captured
            .iter()
            .filter(|l| l.stream == StreamKind::Stdout)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(stdout, vec!["core: one", "core: two"]);
        assert!(captured.contains(&TaggedLine {
            stream: StreamKind::Stderr,
            text: "core: oops".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_default_tag_is_folder_name() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("utils");
        std::fs::create_dir(&folder).unwrap();
        let (executor, buffer) = CommandExecutor::capturing();

        let report = executor.execute(&folder, "echo hi", None).await.unwrap();

        assert_eq!(report.tag, "utils");
        assert_eq!(lines(&buffer)[0].text, "utils: hi");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported_not_raised() {
        let temp = TempDir::new().unwrap();
        let (executor, _) = CommandExecutor::capturing();

        let report = executor.execute(temp.path(), "exit 3", None).await.unwrap();

        assert!(!report.success);
        assert_eq!(report.code, Some(3));
    }

    #[tokio::test]
    async fn test_missing_working_directory_fails_to_spawn() {
        let temp = TempDir::new().unwrap();
        let (executor, _) = CommandExecutor::capturing();

        let result = executor
            .execute(&temp.path().join("missing"), "true", None)
            .await;

        assert!(matches!(result, Err(ExecutorError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_non_utf8_output_keeps_streaming() {
        let temp = TempDir::new().unwrap();
        let (executor, buffer) = CommandExecutor::capturing();

        let report = executor
            .execute(
                temp.path(),
                "printf 'caf\\351\\n'; sleep 0.2; echo after; touch done",
                Some("x"),
            )
            .await
            .unwrap();

        assert!(report.success);
        assert!(temp.path().join("done").exists());
        let texts: Vec<String> = lines(&buffer).into_iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["x: caf\u{FFFD}", "x: after"]);
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_forwarded() {
        let temp = TempDir::new().unwrap();
        let (executor, buffer) = CommandExecutor::capturing();

        executor
            .execute(temp.path(), "printf 'partial'", Some("x"))
            .await
            .unwrap();

        assert_eq!(lines(&buffer)[0].text, "x: partial");
    }

    #[test]
    fn test_colored_executor_rotates_colors() {
        use crossterm::style::Color;

        let executor = CommandExecutor::new();
        executor.tags_for("a");
        executor.tags_for("b");
        assert_eq!(executor.colors.lock().unwrap().current(), Color::Blue);

        // Plain executors leave the rotation alone
        let (plain, _) = CommandExecutor::capturing();
        plain.tags_for("a");
        assert_eq!(plain.colors.lock().unwrap().current(), Color::Cyan);
    }
}
