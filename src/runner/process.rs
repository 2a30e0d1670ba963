//! @ai:module:intent Launch the benchmarked program and capture its stdout and timing
//! @ai:module:layer infrastructure
//! @ai:module:public_api ProcessRunner, ProcessRunnerTrait, MockProcessRunner, RunInvocation, RunResult, CpuUsageResult
//! @ai:module:stateless true

use crate::config::LaunchMode;
use crate::error::{BenchError, Result};
use std::collections::VecDeque;
use std::process::{ExitStatus, Stdio};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Appended to the command line when CPU extensions are disabled
pub const NO_CPU_EXTENSIONS_FLAG: &str = "--no_cpu_extensions";

/// Shell exit codes meaning the program itself never started
const SHELL_NOT_EXECUTABLE: i32 = 126;
const SHELL_NOT_FOUND: i32 = 127;

/// @ai:intent One requested execution of the external program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInvocation {
    pub command: String,
    pub extensions_disabled: bool,
}

impl RunInvocation {
    /// @ai:effects pure
    pub fn new(command: impl Into<String>, extensions_disabled: bool) -> Self {
        Self {
            command: command.into(),
            extensions_disabled,
        }
    }

    /// @ai:intent Command line as actually executed
    /// @ai:effects pure
    pub fn command_line(&self) -> String {
        if self.extensions_disabled {
            format!("{} {}", self.command, NO_CPU_EXTENSIONS_FLAG)
        } else {
            self.command.clone()
        }
    }
}

/// @ai:intent Captured outcome of one completed invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// Wall-clock seconds from spawn to exit
    pub elapsed_seconds: f64,
    pub raw_output: Vec<String>,
    /// Non-zero is surfaced, never treated as an error by itself
    pub exit_status: i32,
}

impl RunResult {
    /// @ai:intent Build a result from stdout text (used by the mock runner)
    /// @ai:effects pure
    pub fn from_text(elapsed_seconds: f64, stdout: &str, exit_status: i32) -> Self {
        Self {
            elapsed_seconds,
            raw_output: split_lines(stdout.as_bytes()),
            exit_status,
        }
    }
}

/// @ai:intent Run result plus CPU time consumed by the child
#[derive(Debug, Clone, PartialEq)]
pub struct CpuUsageResult {
    pub run: RunResult,
    pub user_time: Duration,
    pub system_time: Duration,
}

impl CpuUsageResult {
    pub fn cpu_time(&self) -> Duration {
        self.user_time + self.system_time
    }
}

/// @ai:intent Split captured bytes on `\n`, decoding each line on its own
/// @ai:effects pure
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    bytes
        .split(|b| *b == b'\n')
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect()
}

/// @ai:intent Trait for launching the benchmarked program
#[allow(async_fn_in_trait)]
pub trait ProcessRunnerTrait: Send + Sync {
    /// @ai:intent Run one invocation to completion and capture stdout
    async fn run(&self, invocation: &RunInvocation) -> Result<RunResult>;
}

/// @ai:intent Runs the external program as a child process, one at a time
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    launch: LaunchMode,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// @ai:intent Create a runner without a deadline
    /// @ai:effects pure
    pub fn new(launch: LaunchMode) -> Self {
        Self {
            launch,
            timeout: None,
        }
    }

    /// @ai:intent Kill the child and fail with Timeout once the deadline passes
    /// @ai:effects pure
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// @ai:intent Build the OS command for a command line
    /// @ai:effects pure
    fn std_command(&self, command_line: &str) -> Result<std::process::Command> {
        match self.launch {
            LaunchMode::Shell => {
                let mut cmd = std::process::Command::new("sh");
                cmd.arg("-c").arg(command_line);
                Ok(cmd)
            }
            LaunchMode::Direct => {
                let mut words = command_line.split_whitespace();
                let program = words.next().ok_or_else(|| BenchError::LaunchFailure {
                    command: command_line.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
                })?;

                let mut cmd = std::process::Command::new(program);
                cmd.args(words);
                Ok(cmd)
            }
        }
    }

    /// @ai:intent Map the shell's "could not start" statuses to LaunchFailure
    /// @ai:effects pure
    fn check_started(&self, command_line: &str, exit_status: i32) -> Result<()> {
        if self.launch != LaunchMode::Shell {
            return Ok(());
        }

        let kind = match exit_status {
            SHELL_NOT_FOUND => std::io::ErrorKind::NotFound,
            SHELL_NOT_EXECUTABLE => std::io::ErrorKind::PermissionDenied,
            _ => return Ok(()),
        };

        Err(BenchError::LaunchFailure {
            command: command_line.to_string(),
            source: std::io::Error::new(
                kind,
                format!("shell exited with status {exit_status}"),
            ),
        })
    }

    /// @ai:intent Run once and report user/system CPU time of the child
    /// @ai:post blocks the calling thread; no deadline is applied
    /// @ai:effects io
    #[cfg(unix)]
    pub fn run_with_cpu_accounting(&self, invocation: &RunInvocation) -> Result<CpuUsageResult> {
        let command_line = invocation.command_line();
        let mut cmd = self.std_command(&command_line)?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        tracing::info!("Running `{}` with CPU accounting", command_line);

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|source| BenchError::LaunchFailure {
            command: command_line.clone(),
            source,
        })?;

        let mut stdout = Vec::new();
        if let Some(pipe) = child.stdout.take() {
            drain_or_reap(&mut child, pipe, &mut stdout)?;
        }

        let (exit_status, usage) = rusage::wait(child.id())?;
        let elapsed_seconds = start.elapsed().as_secs_f64();

        self.check_started(&command_line, exit_status)?;

        Ok(CpuUsageResult {
            run: RunResult {
                elapsed_seconds,
                raw_output: split_lines(&stdout),
                exit_status,
            },
            user_time: usage.user_time,
            system_time: usage.system_time,
        })
    }

    #[cfg(not(unix))]
    pub fn run_with_cpu_accounting(&self, _invocation: &RunInvocation) -> Result<CpuUsageResult> {
        Err(BenchError::Unsupported(
            "CPU accounting needs wait4 and is only available on Unix".to_string(),
        ))
    }
}

impl ProcessRunnerTrait for ProcessRunner {
    /// @ai:intent Spawn, wait for exit, capture stdout, time the whole span
    /// @ai:effects io
    async fn run(&self, invocation: &RunInvocation) -> Result<RunResult> {
        let command_line = invocation.command_line();

        let mut std_cmd = self.std_command(&command_line)?;
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;

            // Own group, so a timeout reaches whatever the shell started
            std_cmd.process_group(0);
        }

        let mut cmd = tokio::process::Command::from(std_cmd);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        tracing::info!("Running `{}`", command_line);

        let start = Instant::now();
        let child = cmd.spawn().map_err(|source| BenchError::LaunchFailure {
            command: command_line.clone(),
            source,
        })?;
        let pid = child.id();

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output?,
                Err(_elapsed) => {
                    if let Some(pid) = pid {
                        kill_process_group(pid);
                    }
                    tracing::warn!("`{}` timed out after {:?}, killed", command_line, limit);
                    return Err(BenchError::Timeout {
                        command: command_line,
                        after: limit,
                    });
                }
            },
            None => child.wait_with_output().await?,
        };

        let elapsed_seconds = start.elapsed().as_secs_f64();
        let exit_status = exit_code(&output.status);

        self.check_started(&command_line, exit_status)?;

        tracing::debug!(
            "`{}` finished in {:.3}s, {} bytes of stdout",
            command_line,
            elapsed_seconds,
            output.stdout.len()
        );

        Ok(RunResult {
            elapsed_seconds,
            raw_output: split_lines(&output.stdout),
            exit_status,
        })
    }
}

/// @ai:intent SIGKILL every process in the group led by `pid`
/// @ai:effects io
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    // SAFETY: killpg takes plain integers and touches no memory of ours
    let rc = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
    if rc == -1 {
        tracing::debug!(
            "killpg({}) failed: {}",
            pid,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) {}

/// @ai:intent Read the child's stdout to the end; on a read error kill and reap it first
/// @ai:effects io
#[cfg(unix)]
fn drain_or_reap(
    child: &mut std::process::Child,
    mut pipe: impl std::io::Read,
    buf: &mut Vec<u8>,
) -> Result<()> {
    let Err(err) = pipe.read_to_end(buf) else {
        return Ok(());
    };

    if let Err(kill_err) = child.kill() {
        tracing::debug!("Failed to kill child {}: {}", child.id(), kill_err);
    }
    if let Err(wait_err) = rusage::wait(child.id()) {
        tracing::debug!("Failed to reap child {}: {}", child.id(), wait_err);
    }

    Err(err.into())
}

/// @ai:intent Exit code, or 128 + signal number when killed by a signal
/// @ai:effects pure
fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

#[cfg(unix)]
mod rusage {
    use std::time::Duration;

    pub struct ChildUsage {
        pub user_time: Duration,
        pub system_time: Duration,
    }

    fn to_duration(tv: libc::timeval) -> Duration {
        Duration::from_secs(tv.tv_sec.max(0) as u64) + Duration::from_micros(tv.tv_usec.max(0) as u64)
    }

    /// Reap `pid` and return its exit code together with its resource usage
    pub fn wait(pid: u32) -> std::io::Result<(i32, ChildUsage)> {
        let mut status: libc::c_int = 0;
        // SAFETY: rusage is plain old data; all-zero is a valid value
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };

        loop {
            // SAFETY: pid is our own unreaped child; both out-pointers are valid
            let rc = unsafe { libc::wait4(pid as libc::pid_t, &mut status, 0, &mut usage) };
            if rc != -1 {
                break;
            }

            let err = std::io::Error::last_os_error();
            if err.kind() != std::io::ErrorKind::Interrupted {
                return Err(err);
            }
        }

        let code = if libc::WIFEXITED(status) {
            libc::WEXITSTATUS(status)
        } else if libc::WIFSIGNALED(status) {
            128 + libc::WTERMSIG(status)
        } else {
            -1
        };

        Ok((
            code,
            ChildUsage {
                user_time: to_duration(usage.ru_utime),
                system_time: to_duration(usage.ru_stime),
            },
        ))
    }
}

/// @ai:intent Replays scripted results instead of launching processes
#[derive(Debug, Default)]
pub struct MockProcessRunner {
    scripted: Mutex<VecDeque<Result<RunResult>>>,
    seen: Mutex<Vec<RunInvocation>>,
}

impl MockProcessRunner {
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Queue a successful run with the given stdout
    /// @ai:effects state:write
    pub fn push_output(&self, elapsed_seconds: f64, stdout: &str) {
        self.push_result(Ok(RunResult::from_text(elapsed_seconds, stdout, 0)));
    }

    /// @ai:effects state:write
    pub fn push_result(&self, result: Result<RunResult>) {
        if let Ok(mut scripted) = self.scripted.lock() {
            scripted.push_back(result);
        }
    }

    /// @ai:intent Invocations received so far, in order
    /// @ai:effects pure
    pub fn invocations(&self) -> Vec<RunInvocation> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

impl ProcessRunnerTrait for MockProcessRunner {
    async fn run(&self, invocation: &RunInvocation) -> Result<RunResult> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(invocation.clone());
        }

        let next = self
            .scripted
            .lock()
            .ok()
            .and_then(|mut scripted| scripted.pop_front());

        next.unwrap_or_else(|| {
            Err(BenchError::LaunchFailure {
                command: invocation.command_line(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no scripted result left",
                ),
            })
        })
    }
}
