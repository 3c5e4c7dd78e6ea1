// tests/session_fake_executor.rs

use taskpad::engine::TaskSession;
use taskpad::errors::TaskpadError;
use taskpad::fs::mock::MockFileSystem;
use taskpad::registry::SuppliedArgs;
use taskpad_test_utils::builders::{ConfigFileBuilder, TaskConfigBuilder};
use taskpad_test_utils::fake_executor::FakeExecutor;
use taskpad_test_utils::{init_tracing, with_timeout};

fn chain_config() -> ConfigFileBuilder {
    ConfigFileBuilder::new()
        .with_task("reset_db", TaskConfigBuilder::new("cp").args(&["a.old", "a"]).build())
        .with_task(
            "migrate",
            TaskConfigBuilder::new("sqlx")
                .args(&["migrate", "run"])
                .after("reset_db")
                .build(),
        )
        .with_task(
            "go",
            TaskConfigBuilder::new("cargo")
                .args(&["run", "--example", "{example}"])
                .param_with_default("example", "demo")
                .after("migrate")
                .build(),
        )
}

#[tokio::test]
async fn trigger_runs_prerequisites_first() {
    init_tracing();

    let registry = chain_config().build_registry(MockFileSystem::new());
    let executor = FakeExecutor::new();
    let recorded = executor.recorded();
    let mut session = TaskSession::new(registry, executor);

    let report = with_timeout(session.trigger("go", &SuppliedArgs::new().with("example", "x")))
        .await
        .unwrap();

    assert!(report.success());
    let order: Vec<String> = report.runs.iter().map(|r| r.task.clone()).collect();
    assert_eq!(order, vec!["reset_db", "migrate", "go"]);

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 3);
    assert_eq!(recorded[2].invocation.args, vec!["run", "--example", "x"]);
}

#[tokio::test]
async fn bang_failure_stops_the_trigger() {
    init_tracing();

    let registry = ConfigFileBuilder::new()
        .with_task(
            "check",
            TaskConfigBuilder::new("cargo").arg("check").immediate(true).build(),
        )
        .with_task(
            "run",
            TaskConfigBuilder::new("runner").after("check").build(),
        )
        .build_registry(MockFileSystem::new());
    let executor = FakeExecutor::new().exit_with("cargo", 101);
    let recorded = executor.recorded();
    let mut session = TaskSession::new(registry, executor);

    match session.trigger("run", &SuppliedArgs::new()).await {
        Err(TaskpadError::TaskFailed { task, program, code }) => {
            assert_eq!(task, "check");
            assert_eq!(program, "cargo");
            assert_eq!(code, 101);
        }
        other => panic!("expected TaskFailed, got {:?}", other),
    }
    assert_eq!(recorded.lock().unwrap().len(), 1, "run must not start after a bang failure");
}

#[tokio::test]
async fn non_bang_failure_is_reported_not_raised() {
    let registry = ConfigFileBuilder::new()
        .with_task(
            "test",
            TaskConfigBuilder::new("cargo").arg("test").immediate(false).build(),
        )
        .build_registry(MockFileSystem::new());
    let mut session = TaskSession::new(registry, FakeExecutor::new().exit_with("cargo", 1));

    let report = session.trigger("test", &SuppliedArgs::new()).await.unwrap();
    assert!(!report.success());
    assert_eq!(report.runs[0].outcomes[0].exit_code, 1);
}

#[tokio::test]
async fn session_stays_usable_after_errors() {
    let registry = chain_config().build_registry(MockFileSystem::new());
    let executor = FakeExecutor::new();
    let recorded = executor.recorded();
    let mut session = TaskSession::new(registry, executor);

    let err = session.trigger("nope", &SuppliedArgs::new()).await.unwrap_err();
    assert!(matches!(err, TaskpadError::UnknownTask(_)));

    let report = session.trigger("reset_db", &SuppliedArgs::new()).await.unwrap();
    assert_eq!(report.invocation_count(), 1);
    assert_eq!(recorded.lock().unwrap()[0].task, "reset_db");
}

#[test]
fn render_plans_without_invoking() {
    let registry = chain_config().build_registry(MockFileSystem::new());
    let executor = FakeExecutor::new();
    let recorded = executor.recorded();
    let session = TaskSession::new(registry, executor);

    let plan = session.render("go", &SuppliedArgs::new()).unwrap();
    assert_eq!(plan.len(), 3);
    assert_eq!(plan[2].params.get("example").map(String::as_str), Some("demo"));
    assert!(recorded.lock().unwrap().is_empty());
}
