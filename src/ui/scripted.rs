use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::{BumpError, Result};
use crate::ui::{MenuItem, Prompter};

/// A pre-recorded operator answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Pick the first selectable row whose label starts with this text
    Pick(String),
    Yes,
    No,
    /// Abort the prompt (Esc / Ctrl-C)
    Cancel,
}

impl Answer {
    pub fn pick(prefix: impl Into<String>) -> Self {
        Answer::Pick(prefix.into())
    }
}

/// Prompter that replays a fixed list of answers and records every question
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        ScriptedPrompter {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, message: &str) -> Result<Answer> {
        self.asked.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| BumpError::prompt(format!("no scripted answer for '{}'", message)))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&self, message: &str, items: &[MenuItem]) -> Result<usize> {
        match self.next(message)? {
            Answer::Pick(prefix) => items
                .iter()
                .position(|item| item.selectable && item.label.starts_with(&prefix))
                .ok_or_else(|| {
                    BumpError::prompt(format!("no entry starting with '{}' in '{}'", prefix, message))
                }),
            Answer::Cancel => Err(BumpError::Cancelled),
            other => Err(BumpError::prompt(format!(
                "expected a pick for '{}', got {:?}",
                message, other
            ))),
        }
    }

    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        match self.next(message)? {
            Answer::Yes => Ok(true),
            Answer::No => Ok(false),
            Answer::Cancel => Err(BumpError::Cancelled),
            other => Err(BumpError::prompt(format!(
                "expected yes/no for '{}', got {:?}",
                message, other
            ))),
        }
    }
}
