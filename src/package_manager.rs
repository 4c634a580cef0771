//! The package manager's own version command
//!
//! Writing the manifest (and, inside a git work tree, committing and tagging
//! it) is delegated to the package manager. verbump always hands it a
//! literal version.

use log::debug;
use std::cell::RefCell;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::domain::Version;
use crate::error::{BumpError, Result};

/// Package-manager operations used by the bump flow
pub trait PackageManager {
    /// Write `version` into the manifest
    fn set_version(&self, version: &Version) -> Result<()>;

    /// Read the manifest version back through the package manager
    fn read_version(&self) -> Result<String>;
}

/// `npm`-compatible CLI (`<program> version <V>`, `<program> pkg get version`)
#[derive(Debug, Clone)]
pub struct NpmCommand {
    program: String,
    working_dir: PathBuf,
}

impl NpmCommand {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        NpmCommand {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        debug!("running {} {:?} in {}", self.program, args, self.working_dir.display());
        let mut cmd = Command::new(&self.program);
        cmd.args(args).current_dir(&self.working_dir);
        cmd
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }
}

impl PackageManager for NpmCommand {
    fn set_version(&self, version: &Version) -> Result<()> {
        let literal = version.to_string();
        let args = ["version", literal.as_str()];

        let status = self
            .command(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| BumpError::command(format!("Failed to run {}: {}", self.describe(&args), e)))?;

        if !status.success() {
            return Err(BumpError::command(format!(
                "{} exited with code {}",
                self.describe(&args),
                status.code().unwrap_or(-1)
            )));
        }
        Ok(())
    }

    fn read_version(&self) -> Result<String> {
        let args = ["pkg", "get", "version"];
        let output = self
            .command(&args)
            .output()
            .map_err(|e| BumpError::command(format!("Failed to run {}: {}", self.describe(&args), e)))?;

        if !output.status.success() {
            return Err(BumpError::command(format!(
                "{} failed with exit code {}\nStderr: {}",
                self.describe(&args),
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(clean_version_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// `npm pkg get version` prints a JSON string, e.g. `"1.2.3"`
fn clean_version_output(raw: &str) -> String {
    raw.trim().replace('"', "")
}

/// In-memory package manager for tests: remembers the last written version
#[derive(Debug)]
pub struct MockPackageManager {
    version: RefCell<String>,
    writes: RefCell<Vec<String>>,
    fail: bool,
}

impl MockPackageManager {
    pub fn new(current: impl Into<String>) -> Self {
        MockPackageManager {
            version: RefCell::new(current.into()),
            writes: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    /// Make every `set_version` fail
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Literal versions passed to `set_version`
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl PackageManager for MockPackageManager {
    fn set_version(&self, version: &Version) -> Result<()> {
        if self.fail {
            return Err(BumpError::command("npm version exited with code 1"));
        }
        let literal = version.to_string();
        self.writes.borrow_mut().push(literal.clone());
        *self.version.borrow_mut() = literal;
        Ok(())
    }

    fn read_version(&self) -> Result<String> {
        Ok(self.version.borrow().clone())
    }
}
