//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `scripted` - Pre-recorded answers for driving flows in tests
//! - This module - The [Prompter] seam and its terminal implementation

use inquire::InquireError;

use crate::error::{BumpError, Result};

pub mod formatter;
pub mod scripted;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_manual_push_instruction, display_status,
    display_success, display_version_change, display_warning,
};
pub use scripted::{Answer, ScriptedPrompter};

/// One row of a selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub selectable: bool,
}

impl MenuItem {
    pub fn option(label: impl Into<String>) -> Self {
        MenuItem {
            label: label.into(),
            selectable: true,
        }
    }

    pub fn heading(label: impl Into<String>) -> Self {
        MenuItem {
            label: label.into(),
            selectable: false,
        }
    }
}

/// Source of operator decisions
///
/// Every decision point of a run goes through this trait, so flows can be
/// driven by [ScriptedPrompter] in tests.
pub trait Prompter {
    /// Ask the operator to pick one selectable item.
    ///
    /// # Returns
    /// * `Ok(index)` - Index into `items` of a selectable row
    /// * `Err(BumpError::Cancelled)` - If the operator aborted the prompt
    fn select(&self, message: &str, items: &[MenuItem]) -> Result<usize>;

    /// Ask a yes/no question.
    ///
    /// # Arguments
    /// * `message` - The question
    /// * `default` - Answer used when the operator just presses Enter
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}

/// Terminal prompts backed by `inquire`
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn select(&self, message: &str, items: &[MenuItem]) -> Result<usize> {
        if items.iter().all(|item| !item.selectable) {
            return Err(BumpError::prompt("nothing to choose from"));
        }

        let labels: Vec<String> = items
            .iter()
            .map(|item| {
                if item.selectable {
                    item.label.clone()
                } else {
                    formatter::separator_label(&item.label)
                }
            })
            .collect();

        let mut cursor = items.iter().position(|item| item.selectable).unwrap_or(0);
        loop {
            let answer = inquire::Select::new(message, labels.clone())
                .with_page_size(labels.len())
                .with_starting_cursor(cursor)
                .raw_prompt()
                .map_err(prompt_error)?;

            if items[answer.index].selectable {
                return Ok(answer.index);
            }
            display_status("That row is a heading, pick one of the entries below it.");
            cursor = (answer.index + 1).min(items.len() - 1);
        }
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        inquire::Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }
}

fn prompt_error(err: InquireError) -> BumpError {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            BumpError::Cancelled
        }
        other => BumpError::prompt(other.to_string()),
    }
}
