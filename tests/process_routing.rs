// tests/process_routing.rs

#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use taskpad::engine::TaskSession;
use taskpad::errors::TaskpadError;
use taskpad::exec::process::run_invocation;
use taskpad::exec::{Invocation, OutputRouting, ProcessExecutor, Severity};
use taskpad::fs::RealFileSystem;
use taskpad::provider::ProviderContext;
use taskpad::registry::{ResolvedParams, SuppliedArgs, TaskDefinition, TaskRegistry};
use taskpad_test_utils::{init_tracing, with_timeout, within};

fn sh(script: &str) -> Invocation {
    Invocation::new("sh").arg("-c").arg(script)
}

#[tokio::test]
async fn background_run_reports_exit_code() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let inv = sh("echo hidden; exit 3").routing(OutputRouting::Background);
    let outcome = with_timeout(run_invocation("bg", &inv, dir.path()))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 3);
    assert!(!outcome.success);
    assert!(outcome.markers.is_empty());
}

#[tokio::test]
async fn immediate_run_collects_diagnostics() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let inv = sh(r#"echo "error[E0425]: cannot find value \`x\`" >&2; echo "  --> src/lib.rs:3:5" >&2; exit 101"#)
        .routing(OutputRouting::Immediate { bang: false });
    let outcome = with_timeout(run_invocation("check", &inv, dir.path()))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 101);
    assert_eq!(outcome.markers.len(), 1);
    let marker = &outcome.markers[0];
    assert_eq!(marker.severity, Severity::Error);
    assert_eq!(marker.file.as_deref(), Some("src/lib.rs"));
    assert_eq!((marker.line, marker.column), (Some(3), Some(5)));
}

#[tokio::test]
async fn overrides_are_merged_with_ambient_environment() {
    let dir = tempfile::tempdir().unwrap();

    // PATH comes from the ambient environment, the probe from the override.
    let inv = sh(r#"test "$TASKPAD_PROBE" = yes && test -n "$PATH""#)
        .env("TASKPAD_PROBE", "yes")
        .routing(OutputRouting::Background);
    let outcome = with_timeout(run_invocation("env", &inv, dir.path()))
        .await
        .unwrap();

    assert!(outcome.success);
}

#[tokio::test]
async fn runs_in_project_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("chapter_tracker.db3.old"), b"backup").unwrap();

    let inv = Invocation::new("cp")
        .args(["chapter_tracker.db3.old", "chapter_tracker.db3"])
        .routing(OutputRouting::Immediate { bang: true });
    let outcome = with_timeout(run_invocation("reset_db", &inv, dir.path()))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(
        std::fs::read(dir.path().join("chapter_tracker.db3")).unwrap(),
        b"backup"
    );
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let dir = tempfile::tempdir().unwrap();

    let inv = Invocation::new("taskpad-no-such-program-xyz");
    let err = run_invocation("ghost", &inv, dir.path()).await.unwrap_err();
    match err {
        TaskpadError::IoError {
            ref task,
            ref program,
            action,
            ref source,
        } => {
            assert_eq!(task, "ghost");
            assert_eq!(program, "taskpad-no-such-program-xyz");
            assert_eq!(action, "spawning");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected IoError, got {other:?}"),
    }
}

#[tokio::test]
async fn immediate_run_passes_non_utf8_output_through() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    // Latin-1 "café" on stdout, a diagnostic with a stray byte on stderr.
    let inv = sh(r"printf 'caf\351\n'; printf 'warning: odd byte \377 here\n' >&2; exit 0")
        .routing(OutputRouting::Immediate { bang: false });
    let outcome = with_timeout(run_invocation("go", &inv, dir.path()))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.markers.len(), 1);
    assert_eq!(outcome.markers[0].severity, Severity::Warning);
    assert_eq!(outcome.markers[0].message, "odd byte \u{FFFD} here");
}

#[tokio::test]
async fn immediate_run_keeps_unterminated_last_line() {
    let dir = tempfile::tempdir().unwrap();

    let inv = sh(r"printf 'error: linker not found' >&2; exit 1")
        .routing(OutputRouting::Immediate { bang: false });
    let outcome = with_timeout(run_invocation("compile", &inv, dir.path()))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 1);
    assert_eq!(outcome.markers.len(), 1);
    assert_eq!(outcome.markers[0].message, "linker not found");
}

#[tokio::test]
async fn background_run_reads_past_non_utf8_output() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    // Far more than a pipe buffer after the bad byte: if the reader gave up,
    // the writer would die of SIGPIPE or block.
    let script = r#"printf '\377\n'; sleep 0.2
i=0
while [ $i -lt 5000 ]; do
  echo "migration step $i ................................................"
  i=$((i+1))
done
exit 0"#;
    let inv = sh(script).routing(OutputRouting::Background);
    let run = run_invocation("add_migration", &inv, dir.path());
    let outcome = within(Duration::from_secs(20), run).await.unwrap();

    assert!(outcome.success, "exit code {}", outcome.exit_code);
    assert_eq!(outcome.exit_code, 0);
}

#[tokio::test]
async fn bang_failure_through_process_executor() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();

    let mut registry = TaskRegistry::new(ProviderContext::new(dir.path(), Arc::new(RealFileSystem)));
    registry
        .register(TaskDefinition::new(
            "compile",
            |_: &ResolvedParams| -> taskpad::errors::Result<Vec<Invocation>> {
                Ok(vec![
                    sh("exit 2").routing(OutputRouting::Immediate { bang: true }),
                ])
            },
        ))
        .unwrap();

    let mut session = TaskSession::new(registry, ProcessExecutor::new(dir.path()));
    let err = with_timeout(session.trigger("compile", &SuppliedArgs::new()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaskpadError::TaskFailed { ref program, code: 2, .. } if program == "sh"
    ));
}
