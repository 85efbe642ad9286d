// tests/runtime_fake_backend.rs

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use slswatch::catalog::Catalog;
use slswatch::dispatch::{Dispatcher, ForwardedOptions};
use slswatch::engine::{CoreLoop, Runtime, RuntimeEvent, RuntimeOptions};
use slswatch::errors::SlswatchError;
use slswatch::feedback::Status;
use slswatch::types::ServiceFailurePolicy;
use slswatch_test_utils::builders::ServiceMetadataBuilder;
use slswatch_test_utils::fake_backend::FakeDeployBackend;
use slswatch_test_utils::recording_feedback::{FeedbackEvent, RecordingFeedback};
use slswatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn catalog() -> Catalog {
    ServiceMetadataBuilder::new(".")
        .function("hello", "src/index.handler")
        .function("users", "src/users.handler")
        .catalog()
}

fn runtime(
    backend: &FakeDeployBackend,
    feedback: &RecordingFeedback,
    policy: ServiceFailurePolicy,
) -> (mpsc::Sender<RuntimeEvent>, Runtime<RecordingFeedback>) {
    let catalog = catalog();
    let (tx, rx) = mpsc::channel(16);
    let dispatcher = Dispatcher::new(
        Arc::new(backend.clone()),
        ForwardedOptions::default(),
        &catalog,
    );
    let runtime = Runtime::new(
        CoreLoop::new(catalog),
        rx,
        dispatcher,
        feedback.clone(),
        RuntimeOptions {
            service_failure: policy,
        },
    );
    (tx, runtime)
}

fn changed(path: &str) -> RuntimeEvent {
    RuntimeEvent::PathChanged {
        path: PathBuf::from(path),
    }
}

#[tokio::test]
async fn runtime_dispatches_each_change_and_returns_to_watching() -> TestResult {
    init_tracing();
    let backend = FakeDeployBackend::new();
    let feedback = RecordingFeedback::new();
    let (tx, runtime) = runtime(&backend, &feedback, ServiceFailurePolicy::Propagate);

    tx.send(changed("src/index.ts")).await?;
    tx.send(changed("serverless.yml")).await?;
    tx.send(changed("README.md")).await?;
    drop(tx);

    with_timeout(runtime.run()).await?;

    assert_eq!(
        feedback.statuses(),
        vec![
            Status::Watching,
            Status::DeployingFunction("hello".to_string()),
            Status::Watching,
            Status::DeployingService,
            Status::Watching,
            Status::DeployingAllFunctions,
            Status::Watching,
        ]
    );

    let events = feedback.events();
    assert_eq!(events[0], FeedbackEvent::Clear);
    assert_eq!(
        events.iter().filter(|e| **e == FeedbackEvent::Clear).count(),
        4,
        "screen is cleared at start and after every dispatch"
    );

    let deployed = backend.deployed_functions();
    assert_eq!(deployed[0], "hello");
    let mut fan_out = deployed[1..].to_vec();
    fan_out.sort();
    assert_eq!(fan_out, vec!["hello", "users"]);
    assert_eq!(backend.service_calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn dispatches_never_overlap() -> TestResult {
    init_tracing();
    let backend = FakeDeployBackend::new().with_delay(Duration::from_millis(30));
    let feedback = RecordingFeedback::new();
    let (tx, runtime) = runtime(&backend, &feedback, ServiceFailurePolicy::Propagate);

    for _ in 0..3 {
        tx.send(changed("src/index.ts")).await?;
    }
    drop(tx);

    with_timeout(runtime.run()).await?;

    // Three saves, three sequential single-function deploys.
    assert_eq!(backend.deployed_functions(), vec!["hello"; 3]);
    assert_eq!(backend.max_in_flight(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_function_deploy_keeps_watching() -> TestResult {
    init_tracing();
    let backend = FakeDeployBackend::new().failing_function("hello");
    let feedback = RecordingFeedback::new();
    let (tx, runtime) = runtime(&backend, &feedback, ServiceFailurePolicy::Propagate);

    tx.send(changed("src/index.ts")).await?;
    tx.send(changed("src/users.ts")).await?;
    drop(tx);

    with_timeout(runtime.run()).await?;

    assert_eq!(backend.deployed_functions(), vec!["hello", "users"]);
    assert_eq!(feedback.statuses().last(), Some(&Status::Watching));
    Ok(())
}

#[tokio::test]
async fn failed_service_deploy_ends_the_session_by_default() -> TestResult {
    init_tracing();
    let backend = FakeDeployBackend::new().failing_service();
    let feedback = RecordingFeedback::new();
    let (tx, runtime) = runtime(&backend, &feedback, ServiceFailurePolicy::Propagate);

    tx.send(changed("serverless.yml")).await?;
    tx.send(changed("src/index.ts")).await?;

    let result = with_timeout(runtime.run()).await;
    match result {
        Err(SlswatchError::ServiceDeployFailed(_)) => {}
        other => panic!("Expected ServiceDeployFailed, got: {:?}", other),
    }
    assert!(backend.deployed_functions().is_empty());
    Ok(())
}

#[tokio::test]
async fn keep_watching_policy_survives_service_failure() -> TestResult {
    init_tracing();
    let backend = FakeDeployBackend::new().failing_service();
    let feedback = RecordingFeedback::new();
    let (tx, runtime) = runtime(&backend, &feedback, ServiceFailurePolicy::KeepWatching);

    tx.send(changed("serverless.yml")).await?;
    tx.send(changed("src/index.ts")).await?;
    drop(tx);

    with_timeout(runtime.run()).await?;

    assert_eq!(backend.service_calls().len(), 1);
    assert_eq!(backend.deployed_functions(), vec!["hello"]);
    Ok(())
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_dispatch() -> TestResult {
    init_tracing();
    let backend = FakeDeployBackend::new().with_delay(Duration::from_millis(50));
    let feedback = RecordingFeedback::new();
    let (tx, runtime) = runtime(&backend, &feedback, ServiceFailurePolicy::Propagate);

    tx.send(changed("README.md")).await?;
    tx.send(RuntimeEvent::ShutdownRequested).await?;
    tx.send(changed("src/index.ts")).await?;

    with_timeout(runtime.run()).await?;

    // The fan-out completed; the change after shutdown was never handled.
    let mut deployed = backend.deployed_functions();
    deployed.sort();
    assert_eq!(deployed, vec!["hello", "users"]);
    assert_eq!(backend.in_flight(), 0);
    Ok(())
}
