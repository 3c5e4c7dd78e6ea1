// src/exec/process.rs

//! Spawning a single invocation as an OS process and routing its output.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{Result, TaskpadError};

use super::diagnostics::DiagnosticCollector;
use super::invocation::{Invocation, InvocationOutcome, OutputRouting};

/// Build the `Command` for an invocation: arguments as declared, overrides
/// merged onto the ambient environment, working directory `cwd`.
pub fn build_command(invocation: &Invocation, cwd: &Path) -> Command {
    let mut cmd = Command::new(program_path(&invocation.program, cwd));
    cmd.args(&invocation.args)
        .env_clear()
        .envs(invocation.merged_env(std::env::vars_os()))
        .current_dir(cwd)
        .kill_on_drop(true);
    cmd
}

/// `./install-script.sh` names a file in the project directory, not in
/// whatever directory taskpad was started from. Only an absolute `cwd` makes
/// this unambiguous.
fn program_path(program: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(program);
    if cwd.is_absolute() && path.is_relative() && path.components().count() > 1 {
        cwd.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Run `invocation` to completion, applying its output routing.
///
/// Output is treated as bytes; only diagnostic extraction decodes it, lossily.
/// Failure-signaling (`bang`) is left to the caller; see
/// [`InvocationOutcome::check`].
pub async fn run_invocation(
    task: &str,
    invocation: &Invocation,
    cwd: &Path,
) -> Result<InvocationOutcome> {
    info!(
        task = %task,
        program = %invocation.program,
        routing = %invocation.routing,
        cmd = %invocation.command_line(),
        "starting process"
    );

    let mut cmd = build_command(invocation, cwd);

    let outcome = match invocation.routing {
        OutputRouting::Terminal { size } => {
            if let Some(rows) = size {
                debug!(task = %task, rows, "terminal panel size hint");
            }
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
            let mut child = spawn(&mut cmd, task, invocation)?;
            wait(&mut child, task, invocation).await?
        }
        OutputRouting::Immediate { .. } => {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            let child = spawn(&mut cmd, task, invocation)?;
            run_immediate(child, task, invocation).await?
        }
        OutputRouting::Background => {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            let mut child = spawn(&mut cmd, task, invocation)?;
            let drains = [
                drain_to_log(child.stdout.take(), task, "stdout"),
                drain_to_log(child.stderr.take(), task, "stderr"),
            ];
            let outcome = wait(&mut child, task, invocation).await?;
            for drain in drains.into_iter().flatten() {
                if let Err(err) = drain.await {
                    warn!(task = %task, error = %err, "output drain task failed");
                }
            }
            outcome
        }
    };

    if outcome.success {
        info!(task = %task, exit_code = outcome.exit_code, "process exited");
    } else {
        warn!(
            task = %task,
            program = %invocation.program,
            exit_code = outcome.exit_code,
            "process exited with failure"
        );
    }

    Ok(outcome)
}

fn spawn(cmd: &mut Command, task: &str, invocation: &Invocation) -> Result<Child> {
    cmd.spawn()
        .map_err(|err| TaskpadError::process_io(task, &invocation.program, "spawning", err))
}

async fn wait(
    child: &mut Child,
    task: &str,
    invocation: &Invocation,
) -> Result<InvocationOutcome> {
    let status = child
        .wait()
        .await
        .map_err(|err| TaskpadError::process_io(task, &invocation.program, "waiting for", err))?;
    Ok(InvocationOutcome::from_code(status.code().unwrap_or(-1)))
}

/// Echo output as it arrives and collect diagnostics from both streams.
async fn run_immediate(
    mut child: Child,
    task: &str,
    invocation: &Invocation,
) -> Result<InvocationOutcome> {
    let read_error =
        |err: std::io::Error| TaskpadError::process_io(task, &invocation.program, "reading", err);
    let not_piped = || {
        read_error(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "output was not piped",
        ))
    };

    let mut collector = DiagnosticCollector::default();
    let mut out_reader = BufReader::new(child.stdout.take().ok_or_else(not_piped)?);
    let mut err_reader = BufReader::new(child.stderr.take().ok_or_else(not_piped)?);
    let mut echo_out = tokio::io::stdout();
    let mut echo_err = tokio::io::stderr();

    // A `read_until` cancelled by `select!` leaves its partial line in the
    // buffer; the next call appends the rest, or returns 0 at EOF with the
    // unterminated tail still buffered.
    let (mut out_line, mut err_line) = (Vec::new(), Vec::new());
    let (mut out_done, mut err_done) = (false, false);

    while !(out_done && err_done) {
        tokio::select! {
            read = out_reader.read_until(b'\n', &mut out_line), if !out_done => {
                out_done = read.map_err(read_error)? == 0;
                if !out_line.is_empty() {
                    echo(&mut echo_out, &out_line).await;
                    collector.feed(&String::from_utf8_lossy(trim_newline(&out_line)));
                    out_line.clear();
                }
            }
            read = err_reader.read_until(b'\n', &mut err_line), if !err_done => {
                err_done = read.map_err(read_error)? == 0;
                if !err_line.is_empty() {
                    echo(&mut echo_err, &err_line).await;
                    collector.feed(&String::from_utf8_lossy(trim_newline(&err_line)));
                    err_line.clear();
                }
            }
        }
    }

    let mut outcome = wait(&mut child, task, invocation).await?;
    outcome.markers = collector.finish();
    debug!(task = %task, markers = outcome.markers.len(), "collected diagnostics");

    if !outcome.markers.is_empty() {
        eprintln!("-- {} diagnostics ({}) --", task, outcome.markers.len());
        for marker in outcome.markers.iter() {
            eprintln!("{marker}");
        }
    }
    Ok(outcome)
}

/// Pass a line through unchanged. A closed terminal must not stop the task,
/// so write failures are only logged.
async fn echo<W>(out: &mut W, line: &[u8])
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        out.write_all(line).await?;
        out.flush().await
    };
    if let Err(err) = written.await {
        debug!(error = %err, "echoing task output failed");
    }
}

fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Read a stream to EOF into the debug log. The pipe stays open until the
/// child closes it, whatever bytes it writes.
fn drain_to_log<R>(stream: Option<R>, task: &str, label: &'static str) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let stream = stream?;
    let task = task.to_string();
    Some(tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(trim_newline(&line));
                    debug!(task = %task, "{}: {}", label, text);
                }
                Err(err) => {
                    warn!(task = %task, error = %err, "reading {} failed", label);
                    break;
                }
            }
        }
    }))
}
