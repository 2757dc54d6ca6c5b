// src/exec/process.rs

//! Build step, child launch and child termination.

use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use crate::config::ProgramConfig;
use crate::errors::{Result, SupervisorError};
use crate::types::LaunchStrategy;

/// A running instance of the supervised program.
///
/// With `kill_on_drop`, dropping the handle kills the process, so a
/// supervisor that goes away never leaves its child behind.
pub struct RunningChild {
    child: Child,
    pid: Option<u32>,
}

impl fmt::Debug for RunningChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunningChild")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl RunningChild {
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// True while the process has not exited.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(line);
        c
    }
}

/// Start the program according to its launch strategy.
pub async fn launch_program(program: &ProgramConfig, root: &Path) -> Result<RunningChild> {
    match program.strategy {
        LaunchStrategy::Build => {
            run_build(&program.build_cmd, root).await?;
            let executable = root.join(&program.executable);
            info!(executable = ?executable, "starting program");
            spawn_child(Command::new(&executable), root, &executable.display().to_string())
        }
        LaunchStrategy::Run => {
            info!(cmd = %program.run_cmd, "starting program");
            spawn_child(shell_command(&program.run_cmd), root, &program.run_cmd)
        }
    }
}

/// Run the build command to completion. A non-zero exit is a launch failure.
async fn run_build(build_cmd: &str, root: &Path) -> Result<()> {
    info!(cmd = %build_cmd, "running build step");

    let status = shell_command(build_cmd)
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| SupervisorError::LaunchError(format!("running build `{build_cmd}`: {e}")))?;

    if !status.success() {
        return Err(SupervisorError::LaunchError(format!(
            "build `{build_cmd}` failed with exit code {}",
            status.code().unwrap_or(-1)
        )));
    }

    debug!(cmd = %build_cmd, "build step succeeded");
    Ok(())
}

fn spawn_child(mut cmd: Command, root: &Path, what: &str) -> Result<RunningChild> {
    cmd.current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    // Own process group, so signals also reach grandchildren (`go run`).
    #[cfg(unix)]
    cmd.process_group(0);

    let child = cmd
        .spawn()
        .map_err(|e| SupervisorError::LaunchError(format!("starting `{what}`: {e}")))?;
    let pid = child.id();

    info!(?pid, "child process started");
    Ok(RunningChild { child, pid })
}

/// Stop a child: SIGTERM to its process group, wait up to `grace`, then kill.
///
/// A child that has already exited is not an error. The call returns only
/// once no member of the child's process group is left.
pub async fn stop_child(mut running: RunningChild, grace: Duration) -> Result<()> {
    let pid = running.pid;

    let leader_exited = match running.child.try_wait() {
        Ok(Some(status)) => {
            debug!(?pid, ?status, "child already exited");
            true
        }
        Ok(None) => false,
        Err(e) => {
            warn!(?pid, error = %e, "could not query child status");
            false
        }
    };

    if !leader_exited {
        stop_leader(&mut running, grace).await?;
    }

    // The leader can exit and leave the rest of its group running.
    sweep_group(pid, grace).await;
    Ok(())
}

async fn stop_leader(running: &mut RunningChild, grace: Duration) -> Result<()> {
    let pid = running.pid;

    if !grace.is_zero() && signal_group(pid, GroupSignal::Terminate) {
        match timeout(grace, running.child.wait()).await {
            Ok(Ok(status)) => {
                info!(?pid, ?status, "child process exited");
                return Ok(());
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => warn!(?pid, ?grace, "child did not exit within grace period; killing"),
        }
    }

    signal_group(pid, GroupSignal::Kill);
    if let Err(e) = running.child.start_kill() {
        debug!(?pid, error = %e, "kill failed; child already gone");
    }
    let status = running.child.wait().await?;
    info!(?pid, ?status, "child process killed");
    Ok(())
}

const GROUP_POLL: Duration = Duration::from_millis(20);
const GROUP_KILL_WAIT: Duration = Duration::from_secs(1);

/// Terminate what is left of the child's process group after the leader is
/// gone, with the same SIGTERM, grace, SIGKILL escalation.
async fn sweep_group(pid: Option<u32>, grace: Duration) {
    if !group_alive(pid) {
        return;
    }
    info!(?pid, "process group outlived its leader; stopping remaining members");

    if !grace.is_zero()
        && signal_group(pid, GroupSignal::Terminate)
        && group_exited_within(pid, grace).await
    {
        return;
    }

    signal_group(pid, GroupSignal::Kill);
    if !group_exited_within(pid, GROUP_KILL_WAIT).await {
        warn!(?pid, "process group still present after SIGKILL");
    }
}

async fn group_exited_within(pid: Option<u32>, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    loop {
        if !group_alive(pid) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(GROUP_POLL).await;
    }
}

#[derive(Debug, Clone, Copy)]
enum GroupSignal {
    Terminate,
    Kill,
}

/// Signal the child's process group. Returns false if no signal could be
/// delivered and the caller should fall back to killing the child directly.
#[cfg(unix)]
fn signal_group(pid: Option<u32>, sig: GroupSignal) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        return false;
    };
    let signal = match sig {
        GroupSignal::Terminate => Signal::SIGTERM,
        GroupSignal::Kill => Signal::SIGKILL,
    };

    match killpg(Pid::from_raw(pid as i32), signal) {
        Ok(()) => true,
        // Group already gone: waiting will return immediately.
        Err(Errno::ESRCH) => true,
        Err(e) => {
            warn!(pid, ?signal, error = %e, "failed to signal process group");
            false
        }
    }
}

/// True while any process is still in the child's process group.
#[cfg(unix)]
fn group_alive(pid: Option<u32>) -> bool {
    use nix::sys::signal::killpg;
    use nix::unistd::Pid;

    match pid {
        Some(pid) => killpg(Pid::from_raw(pid as i32), None).is_ok(),
        None => false,
    }
}

#[cfg(not(unix))]
fn signal_group(_pid: Option<u32>, _sig: GroupSignal) -> bool {
    false
}

#[cfg(not(unix))]
fn group_alive(_pid: Option<u32>) -> bool {
    false
}
