//! Coordinator role: spawn workers, then observe their exits.
//!
//! There is deliberately no restart logic. A dead worker is logged and
//! the remaining workers keep serving with reduced capacity.

use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use hydra_common::HydraError;

/// Handle to a spawned worker, kept only to identify it when it exits
struct WorkerHandle {
    pid: u32,
    child: Child,
}

/// Spawn one worker per resolved core, then wait for exits indefinitely.
pub async fn run(config: AppConfig) -> Result<()> {
    info!("Master process {} is running", std::process::id());

    let count = config.resolved_workers();
    let mut workers = Vec::with_capacity(count);
    for _ in 0..count {
        workers.push(spawn_worker(&config)?);
    }
    debug!(count, "All workers spawned");

    // Observation phase: one monitoring task per child. Exactly one log
    // line per exit, regardless of how the worker died.
    let mut exits = JoinSet::new();
    for mut worker in workers {
        exits.spawn(async move {
            let status = worker.child.wait().await;
            (worker.pid, status)
        });
    }

    while let Some(joined) = exits.join_next().await {
        match joined {
            Ok((pid, Ok(status))) => {
                info!(code = status.code(), "Worker {} died", pid);
            }
            Ok((pid, Err(e))) => {
                info!(error = %e, "Worker {} died", pid);
            }
            Err(e) => warn!(error = %e, "Worker monitor task failed"),
        }
    }

    warn!("All workers have exited, no serving capacity remains");
    Ok(())
}

/// Build the command that re-executes this binary in the worker role.
///
/// The resolved host and port are passed explicitly so workers do not
/// depend on finding the same config file the coordinator loaded.
fn worker_command(config: &AppConfig) -> Result<Command> {
    let exe = std::env::current_exe()
        .map_err(|e| HydraError::Spawn(format!("cannot locate current executable: {e}")))?;

    let mut cmd = Command::new(exe);
    cmd.arg("--role")
        .arg("worker")
        .arg("--host")
        .arg(&config.host)
        .arg("--port")
        .arg(config.port.to_string())
        .stdin(Stdio::null());

    Ok(cmd)
}

fn spawn_worker(config: &AppConfig) -> Result<WorkerHandle> {
    let mut cmd = worker_command(config)?;
    let child = cmd.spawn().context("Failed to spawn worker process")?;
    let pid = child
        .id()
        .ok_or_else(|| HydraError::Spawn("spawned worker has no pid".to_string()))?;
    debug!(pid, "Spawned worker");

    Ok(WorkerHandle { pid, child })
}
