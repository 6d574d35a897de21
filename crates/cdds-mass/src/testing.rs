//! Scripted stand-in for MASS, for tests that must not touch the archive.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::command::MassCommand;
use crate::error::MassCommandError;

/// Replays queued responses in order and records every command it is given.
///
/// Once the queue is exhausted every command succeeds with empty output.
#[derive(Debug, Default)]
pub struct ScriptedMass {
    responses: RefCell<VecDeque<Result<String, MassCommandError>>>,
    commands: RefCell<Vec<Vec<String>>>,
}

impl ScriptedMass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn respond(self, stdout: &str) -> Self {
        self.responses.borrow_mut().push_back(Ok(stdout.to_string()));
        self
    }

    /// Queue a failure.
    pub fn respond_err(self, err: MassCommandError) -> Self {
        self.responses.borrow_mut().push_back(Err(err));
        self
    }

    /// Every command run so far, without the `moo` executable.
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands.borrow().clone()
    }

    /// The sub-command names run so far (`ls`, `mkdir`, `put`, ...).
    pub fn subcommands(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|c| c.first().cloned())
            .collect()
    }
}

impl MassCommand for ScriptedMass {
    fn run(&self, args: &[String]) -> Result<String, MassCommandError> {
        self.commands.borrow_mut().push(args.to_vec());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
