// src/proc/mock.rs

//! Scripted [`ProcessRunner`] double for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{render_command, ProcessRunner};
use crate::errors::{BuildError, Result};

#[derive(Debug, Clone)]
enum MockResponse {
    Lines(Vec<String>),
    Fail(i32),
}

/// Records every command issued and replays canned responses.
///
/// Commands are keyed by their rendered command line (program plus args,
/// space separated). Unscripted commands succeed with empty output, which
/// keeps tests focused on the commands they actually care about.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `command` to succeed with the given stdout lines.
    pub fn on(&self, command: &str, lines: &[&str]) {
        self.responses.lock().unwrap().insert(
            command.to_string(),
            MockResponse::Lines(lines.iter().map(|l| l.to_string()).collect()),
        );
    }

    /// Script `command` to fail with the given exit code.
    pub fn fail(&self, command: &str, code: i32) {
        self.responses
            .lock()
            .unwrap()
            .insert(command.to_string(), MockResponse::Fail(code));
    }

    /// Every command line issued so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<String>> {
        let rendered = render_command(program, args);
        self.log.lock().unwrap().push(rendered.clone());

        let response = self.responses.lock().unwrap().get(&rendered).cloned();
        match response {
            Some(MockResponse::Lines(lines)) => Ok(lines),
            Some(MockResponse::Fail(code)) => Err(BuildError::CommandFailed {
                command: rendered,
                code,
            }),
            None => Ok(Vec::new()),
        }
    }
}
