use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use slswatch::dispatch::{
    DeployBackend, DeployFuture, FunctionDeployRequest, ServiceDeployCommand,
};
use slswatch::errors::SlswatchError;

#[derive(Default)]
struct FakeState {
    function_calls: Mutex<Vec<FunctionDeployRequest>>,
    service_calls: Mutex<Vec<ServiceDeployCommand>>,
    failing: Mutex<HashSet<String>>,
    fail_service: AtomicBool,
    delay: Mutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// A fake deploy backend that:
/// - records every request it receives
/// - optionally sleeps to make concurrency observable
/// - fails the functions (or the service deploy) it is told to fail.
///
/// Clones share state, so a test can keep one handle and give another to
/// the dispatcher.
#[derive(Clone, Default)]
pub struct FakeDeployBackend {
    state: Arc<FakeState>,
}

impl FakeDeployBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.state.delay.lock().unwrap() = delay;
        self
    }

    pub fn failing_function(self, name: &str) -> Self {
        self.state.failing.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn failing_service(self) -> Self {
        self.state.fail_service.store(true, Ordering::SeqCst);
        self
    }

    pub fn function_calls(&self) -> Vec<FunctionDeployRequest> {
        self.state.function_calls.lock().unwrap().clone()
    }

    /// Names of deployed functions, in call order.
    pub fn deployed_functions(&self) -> Vec<String> {
        self.function_calls()
            .into_iter()
            .map(|r| r.function)
            .collect()
    }

    pub fn service_calls(&self) -> Vec<ServiceDeployCommand> {
        self.state.service_calls.lock().unwrap().clone()
    }

    /// Highest number of function deploys observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    /// Number of function deploys currently running.
    pub fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::SeqCst)
    }
}

impl DeployBackend for FakeDeployBackend {
    fn deploy_function(&self, request: FunctionDeployRequest) -> DeployFuture<'_> {
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            let function = request.function.clone();
            state.function_calls.lock().unwrap().push(request);

            let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            state.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = *state.delay.lock().unwrap();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            state.in_flight.fetch_sub(1, Ordering::SeqCst);

            if state.failing.lock().unwrap().contains(&function) {
                return Err(SlswatchError::FunctionDeployFailed {
                    function,
                    reason: "fake failure".to_string(),
                });
            }
            Ok(())
        })
    }

    fn deploy_service(&self, command: ServiceDeployCommand) -> DeployFuture<'_> {
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            state.service_calls.lock().unwrap().push(command);
            if state.fail_service.load(Ordering::SeqCst) {
                return Err(SlswatchError::ServiceDeployFailed(
                    "fake exit status 1".to_string(),
                ));
            }
            Ok(())
        })
    }
}
