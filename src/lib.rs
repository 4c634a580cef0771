pub mod boundary;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod package_manager;
pub mod tagging;
pub mod ui;

pub use error::{BumpError, Result};
