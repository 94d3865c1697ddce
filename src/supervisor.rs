//! Engine process supervision.
//!
//! One [`Ffmpeg`] instance drives at most one engine process at a time. A
//! run blocks the calling thread until the process terminates, while a
//! dedicated reader thread drains the diagnostic stream; `stop` and `kill`
//! stay serviceable from other threads because the run loop polls the
//! process handle instead of parking in `wait`.
//!
//! Success is decided by inspecting the declared output artifact, never by
//! the engine's exit code: the engine is known to exit zero after writing
//! nothing useful under some configurations. The exit code is still
//! attached to failures as context.

use crate::error::{Error, Result};
use crate::progress;
use crate::tools::{self, ToolsConfig};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStderr, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lifecycle of the most recent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Launching,
    Running,
    Completed,
    Failed,
}

/// Observer for completion percentages.
///
/// Invoked synchronously from the diagnostic reader thread, not from the
/// thread that called `run_with_progress`.
pub type ProgressHook = Box<dyn FnMut(f64) + Send + 'static>;

/// Supervisor for the conversion engine.
#[derive(Debug)]
pub struct Ffmpeg {
    ffmpeg_path: PathBuf,
    state: Mutex<RunState>,
    child: Mutex<Option<std::process::Child>>,
    stdin: Mutex<Option<ChildStdin>>,
    kill_faulty: AtomicBool,
}

impl Ffmpeg {
    /// Resolves the engine binary up front; a missing engine is reported
    /// here, not at the first run.
    pub fn new(config: &ToolsConfig) -> Result<Self> {
        let ffmpeg_path = tools::resolve_tool(tools::FFMPEG, config)?;
        Ok(Self {
            ffmpeg_path,
            state: Mutex::new(RunState::Idle),
            child: Mutex::new(None),
            stdin: Mutex::new(None),
            kill_faulty: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.ffmpeg_path
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap()
    }

    /// Runs the engine with the rendered token string and blocks until it
    /// terminates, then classifies the outcome from the output artifact.
    pub fn run(&self, arguments: &str, output: &Path) -> Result<()> {
        self.run_inner(arguments, output, None)
    }

    /// Like [`Ffmpeg::run`], additionally reporting completion percentages
    /// against `total` (the source media duration) to `hook`.
    pub fn run_with_progress(
        &self,
        arguments: &str,
        output: &Path,
        total: Duration,
        hook: ProgressHook,
    ) -> Result<()> {
        self.run_inner(arguments, output, Some((total, hook)))
    }

    fn run_inner(
        &self,
        arguments: &str,
        output: &Path,
        progress: Option<(Duration, ProgressHook)>,
    ) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            if matches!(*state, RunState::Launching | RunState::Running) {
                return Err(Error::AlreadyRunning);
            }
            *state = RunState::Launching;
        }

        let argv = match shell_words::split(arguments) {
            Ok(argv) => argv,
            Err(err) => {
                *self.state.lock().unwrap() = RunState::Failed;
                return Err(Error::InvalidInput(format!(
                    "unsplittable argument string: {err}"
                )));
            }
        };

        tracing::info!(engine = %self.ffmpeg_path.display(), "launching conversion");
        tracing::debug!(arguments, "engine invocation");

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(&argv)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                *self.state.lock().unwrap() = RunState::Failed;
                return Err(Error::conversion_failed(
                    format!("failed to launch {}: {err}", self.ffmpeg_path.display()),
                    None,
                ));
            }
        };

        let stderr = match child.stderr.take() {
            Some(stderr) => stderr,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                *self.state.lock().unwrap() = RunState::Failed;
                return Err(Error::conversion_failed(
                    "failed to capture the engine's diagnostic stream",
                    None,
                ));
            }
        };

        *self.stdin.lock().unwrap() = child.stdin.take();
        *self.child.lock().unwrap() = Some(child);
        *self.state.lock().unwrap() = RunState::Running;

        let lines: Mutex<Vec<String>> = Mutex::new(Vec::new());
        let status = thread::scope(|scope| {
            let reader = scope.spawn(|| self.consume_diagnostics(stderr, &lines, progress));
            let status = self.poll_to_completion();
            let _ = reader.join();
            status
        });

        *self.stdin.lock().unwrap() = None;
        *self.child.lock().unwrap() = None;
        let diagnostics = lines.into_inner().unwrap();

        let produced = output.exists()
            && std::fs::metadata(output).map(|m| m.len() > 0).unwrap_or(false);
        if produced {
            *self.state.lock().unwrap() = RunState::Completed;
            tracing::info!(output = %output.display(), "conversion completed");
            Ok(())
        } else {
            *self.state.lock().unwrap() = RunState::Failed;
            let exit_code = status.and_then(|s| s.code());
            tracing::warn!(?exit_code, output = %output.display(), "conversion failed");
            Err(Error::conversion_failed(diagnostics.join("\n"), exit_code))
        }
    }

    /// Polls the child roughly every 100ms. The child slot is locked only
    /// for the duration of each poll, so `stop`/`kill` issued from other
    /// threads can get at the handle between polls.
    fn poll_to_completion(&self) -> Option<std::process::ExitStatus> {
        loop {
            {
                let mut slot = self.child.lock().unwrap();
                match slot.as_mut() {
                    Some(child) => match child.try_wait() {
                        Ok(Some(status)) => return Some(status),
                        Ok(None) => {}
                        Err(_) => return None,
                    },
                    None => return None,
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Splits the diagnostic stream on `\r` as well as `\n`; the engine
    /// rewrites its progress line in place with bare carriage returns.
    fn consume_diagnostics(
        &self,
        stderr: ChildStderr,
        lines: &Mutex<Vec<String>>,
        mut progress: Option<(Duration, ProgressHook)>,
    ) {
        let mut reader = BufReader::new(stderr);
        let mut buf: Vec<u8> = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match reader.read(&mut byte) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            match byte[0] {
                b'\r' | b'\n' => {
                    if buf.is_empty() {
                        continue;
                    }
                    let line = String::from_utf8_lossy(&buf).to_string();
                    buf.clear();
                    self.handle_line(&line, lines, &mut progress);
                }
                other => buf.push(other),
            }
        }
        if !buf.is_empty() {
            let line = String::from_utf8_lossy(&buf).to_string();
            self.handle_line(&line, lines, &mut progress);
        }
    }

    fn handle_line(
        &self,
        line: &str,
        lines: &Mutex<Vec<String>>,
        progress: &mut Option<(Duration, ProgressHook)>,
    ) {
        tracing::trace!("{line}");
        lines.lock().unwrap().push(line.to_string());
        if let Some((total, hook)) = progress {
            if let Some(pct) = progress::parse_progress_line(line, *total) {
                if self.is_alive() {
                    hook(pct);
                }
            }
        }
    }

    /// Requests a graceful stop by writing the engine's quit keystroke to
    /// its standard input. A no-op when nothing is running.
    pub fn stop(&self) -> Result<()> {
        if self.is_alive() {
            if let Some(stdin) = self.stdin.lock().unwrap().as_mut() {
                stdin.write_all(b"q")?;
                stdin.flush()?;
            }
        }
        Ok(())
    }

    /// Forcibly terminates the process. A kill that itself fails is
    /// recorded in the sticky [`Ffmpeg::kill_faulty`] flag rather than
    /// raised; callers killing a process are already cleaning up.
    pub fn kill(&self) {
        let mut slot = self.child.lock().unwrap();
        if let Some(child) = slot.as_mut() {
            let running = matches!(child.try_wait(), Ok(None));
            if running && child.kill().is_err() {
                tracing::warn!("failed to kill engine process");
                self.kill_faulty.store(true, Ordering::SeqCst);
            }
        }
    }

    /// True once a `kill` attempt has failed on this instance.
    pub fn kill_faulty(&self) -> bool {
        self.kill_faulty.load(Ordering::SeqCst)
    }

    /// True while the supervised process exists, has not exited, and is
    /// still present in the operating system's process table. The extra
    /// table check guards against a handle that briefly reports "not
    /// exited" after the OS has recycled the process ID.
    pub fn is_alive(&self) -> bool {
        let mut slot = self.child.lock().unwrap();
        match slot.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(None) => process_exists(child.id()),
                _ => false,
            },
            None => false,
        }
    }
}

#[cfg(unix)]
fn process_exists(pid: u32) -> bool {
    // Signal 0 performs the permission and existence checks without
    // delivering anything.
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}

#[cfg(not(unix))]
fn process_exists(_pid: u32) -> bool {
    true
}
