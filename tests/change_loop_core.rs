// tests/change_loop_core.rs

use std::path::PathBuf;

use slswatch::engine::{CoreCommand, CoreLoop, LoopEvent, LoopState};
use slswatch::feedback::Status;
use slswatch::resolve::Resolution;
use slswatch_test_utils::builders::hello_service;

fn core() -> CoreLoop {
    CoreLoop::new(hello_service().include("src").catalog())
}

fn changed(path: &str) -> LoopEvent {
    LoopEvent::PathChanged(PathBuf::from(path))
}

#[test]
fn start_clears_and_announces_watching() {
    let mut core = core();
    let step = core.step(LoopEvent::Started);

    assert!(step.keep_running);
    assert_eq!(
        step.commands,
        vec![
            CoreCommand::ClearScreen,
            CoreCommand::Announce(Status::Watching)
        ]
    );
    assert_eq!(core.state(), LoopState::Idle);
}

#[test]
fn change_announces_then_dispatches() {
    let mut core = core();
    core.step(LoopEvent::Started);

    let step = core.step(changed("src/index.ts"));
    assert_eq!(
        step.commands,
        vec![
            CoreCommand::Announce(Status::DeployingFunction("hello".to_string())),
            CoreCommand::Dispatch(Resolution::SingleTarget("hello".to_string())),
        ]
    );
    assert_eq!(core.state(), LoopState::Dispatching);

    let step = core.step(LoopEvent::DispatchFinished);
    assert_eq!(
        step.commands,
        vec![
            CoreCommand::ClearScreen,
            CoreCommand::Announce(Status::Watching)
        ]
    );
    assert_eq!(core.state(), LoopState::Idle);
}

#[test]
fn each_strategy_has_its_own_announcement() {
    let mut core = core();
    core.step(LoopEvent::Started);

    let step = core.step(changed("serverless.yml"));
    assert_eq!(
        step.commands[0],
        CoreCommand::Announce(Status::DeployingService)
    );
    core.step(LoopEvent::DispatchFinished);

    let step = core.step(changed("src/logic.ts"));
    assert_eq!(
        step.commands,
        vec![
            CoreCommand::Announce(Status::DeployingAllFunctions),
            CoreCommand::Dispatch(Resolution::Unmatched),
        ]
    );
}

#[test]
fn changes_during_dispatch_are_queued_in_order_not_coalesced() {
    let mut core = core();
    core.step(LoopEvent::Started);
    core.step(changed("src/index.ts"));

    // Burst while the first deploy is running.
    assert!(core.step(changed("serverless.yml")).commands.is_empty());
    assert!(core.step(changed("src/index.ts")).commands.is_empty());
    assert!(core.step(changed("src/index.ts")).commands.is_empty());
    assert_eq!(core.pending_len(), 3);

    let mut dispatched = Vec::new();
    loop {
        let step = core.step(LoopEvent::DispatchFinished);
        let next: Vec<Resolution> = step
            .commands
            .into_iter()
            .filter_map(|c| match c {
                CoreCommand::Dispatch(r) => Some(r),
                _ => None,
            })
            .collect();
        if next.is_empty() {
            break;
        }
        assert_eq!(core.state(), LoopState::Dispatching);
        dispatched.extend(next);
    }

    assert_eq!(
        dispatched,
        vec![
            Resolution::ServiceConfig,
            Resolution::SingleTarget("hello".to_string()),
            Resolution::SingleTarget("hello".to_string()),
        ]
    );
    assert_eq!(core.state(), LoopState::Idle);
    assert_eq!(core.pending_len(), 0);
}

#[test]
fn shutdown_stops_the_loop() {
    let mut core = core();
    core.step(LoopEvent::Started);

    let step = core.step(LoopEvent::ShutdownRequested);
    assert!(!step.keep_running);
    assert!(step.commands.is_empty());
}
