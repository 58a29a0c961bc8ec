use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::error::LauncherError;

const RELAY_BIN_VAR: &str = "ESA_RELAY_BIN";
const RELAY_BIN_NAME: &str = "esa-relay";

#[derive(Debug)]
pub enum RunOutcome {
    /// The relay exited on its own.
    Exited(ExitStatus),
    /// Ctrl-C was received and the relay was stopped.
    Interrupted,
}

/// The relay binary, run as a child process with inherited stdio.
#[derive(Debug, Clone)]
pub struct ServerProcess {
    program: PathBuf,
}

impl ServerProcess {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `$ESA_RELAY_BIN`, else `esa-relay` next to the current executable,
    /// else `esa-relay` looked up on `PATH`.
    pub fn locate() -> Self {
        if let Some(bin) = std::env::var_os(RELAY_BIN_VAR).filter(|v| !v.is_empty()) {
            return Self::new(bin);
        }
        let file_name = format!("{RELAY_BIN_NAME}{}", std::env::consts::EXE_SUFFIX);
        let sibling = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(&file_name)))
            .filter(|path| path.exists());
        Self::new(sibling.unwrap_or_else(|| PathBuf::from(file_name)))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Starts the relay with `env` layered over the inherited environment.
    pub fn spawn(&self, env: &[(&str, String)]) -> Result<RelayChild, LauncherError> {
        let child = Command::new(&self.program)
            .envs(env.iter().map(|(k, v)| (*k, v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LauncherError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        info!(program = %self.program.display(), pid = child.id(), "relay process spawned");
        Ok(RelayChild { child })
    }
}

#[derive(Debug)]
pub struct RelayChild {
    child: Child,
}

impl RelayChild {
    /// Waits until the relay exits or Ctrl-C arrives. On Ctrl-C the child is
    /// killed and reaped before returning.
    pub async fn wait(self) -> Result<RunOutcome, LauncherError> {
        self.wait_until(tokio::signal::ctrl_c()).await
    }

    /// Like [`RelayChild::wait`], with `shutdown` standing in for Ctrl-C.
    pub async fn wait_until<F>(mut self, shutdown: F) -> Result<RunOutcome, LauncherError>
    where
        F: Future<Output = std::io::Result<()>>,
    {
        enum Stop {
            Exited(std::io::Result<ExitStatus>),
            Interrupted(std::io::Result<()>),
        }

        let stop = tokio::select! {
            status = self.child.wait() => Stop::Exited(status),
            signal = shutdown => Stop::Interrupted(signal),
        };

        match stop {
            Stop::Exited(status) => Ok(RunOutcome::Exited(status?)),
            Stop::Interrupted(signal) => {
                if let Err(e) = signal {
                    warn!(error = %e, "failed to listen for ctrl-c, stopping relay");
                }
                self.child.start_kill()?;
                let status = self.child.wait().await?;
                info!(%status, "relay process stopped");
                Ok(RunOutcome::Interrupted)
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::time::{Duration, Instant};

    /// An executable that stays up far longer than any test.
    fn long_running_relay(dir: &tempfile::TempDir) -> ServerProcess {
        let script = dir.path().join("esa-relay");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 30\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        ServerProcess::new(script)
    }

    /// Retries while a concurrently forked test still holds the fresh script
    /// open for writing (ETXTBSY).
    async fn spawn_retrying(process: &ServerProcess) -> RelayChild {
        let mut attempts = 0;
        loop {
            match process.spawn(&[]) {
                Err(LauncherError::Spawn { source, .. })
                    if source.raw_os_error() == Some(26) && attempts < 10 =>
                {
                    attempts += 1;
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                result => return result.unwrap(),
            }
        }
    }

    #[tokio::test]
    async fn exit_status_is_reported() {
        let child = ServerProcess::new("true").spawn(&[]).unwrap();
        let outcome = child.wait().await.unwrap();
        assert!(matches!(outcome, RunOutcome::Exited(status) if status.success()));

        let child = ServerProcess::new("false").spawn(&[]).unwrap();
        let outcome = child.wait().await.unwrap();
        assert!(matches!(outcome, RunOutcome::Exited(status) if !status.success()));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let process = ServerProcess::new("/nonexistent/esa-relay");
        let err = process.spawn(&[("PORT", "3000".to_string())]).unwrap_err();
        assert!(matches!(err, LauncherError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/esa-relay"));
    }

    #[tokio::test]
    async fn shutdown_kills_a_running_relay() {
        let dir = tempfile::tempdir().unwrap();
        let child = spawn_retrying(&long_running_relay(&dir)).await;
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let _ = tx.send(());
        });

        let started = Instant::now();
        let outcome = child
            .wait_until(async move {
                let _ = rx.await;
                Ok(())
            })
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Interrupted));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn env_override_wins() {
        // No other test touches ESA_RELAY_BIN.
        std::env::set_var(RELAY_BIN_VAR, "/opt/esa/esa-relay");
        let located = ServerProcess::locate();
        std::env::remove_var(RELAY_BIN_VAR);
        assert_eq!(located.program(), Path::new("/opt/esa/esa-relay"));
    }
}
