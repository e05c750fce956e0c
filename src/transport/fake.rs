use std::collections::VecDeque;

use super::{CallError, Transport};

/// Scripted transport used in tests. Each call pops the next scripted
/// outcome (success once the script runs out) and records what was sent.
#[derive(Default)]
pub struct FakeTransport {
    script: VecDeque<Result<(), CallError>>,
    calls: Vec<(String, String)>,
}

impl FakeTransport {
    pub fn new(script: Vec<Result<(), CallError>>) -> Self {
        Self {
            script: script.into(),
            calls: Vec::new(),
        }
    }

    pub fn always_ok() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[(String, String)] {
        &self.calls
    }
}

impl Transport for FakeTransport {
    fn call(&mut self, method: &str, payload: &str) -> Result<(), CallError> {
        self.calls.push((method.to_string(), payload.to_string()));
        self.script.pop_front().unwrap_or(Ok(()))
    }
}
