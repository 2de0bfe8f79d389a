//! Typed descriptors for the external programs of a pipeline.

use super::shell;
use crate::Passphrase;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Role of a stage within the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Emits an uncompressed tar stream of the selected paths.
    Archive,
    /// Passes bytes through while reporting progress against the total.
    Progress,
    /// Compresses the stream.
    Compress,
    /// Encrypts the stream symmetrically.
    Encrypt,
}

impl StageKind {
    /// Lowercase stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Progress => "progress",
            Self::Compress => "compress",
            Self::Encrypt => "encrypt",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One argument of a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Option or literal value.
    Plain(OsString),
    /// A filesystem path, always quoted when rendered.
    Path(PathBuf),
    /// The passphrase, redacted when rendered.
    Secret(Passphrase),
}

impl Arg {
    fn as_os_str(&self) -> &std::ffi::OsStr {
        match self {
            Self::Plain(s) => s.as_os_str(),
            Self::Path(p) => p.as_os_str(),
            Self::Secret(p) => std::ffi::OsStr::new(p.expose()),
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Plain(s) => shell::token(&s.to_string_lossy()),
            Self::Path(p) => shell::quote(&p.to_string_lossy()),
            Self::Secret(_) => shell::quote("***"),
        }
    }
}

/// An external program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    kind: StageKind,
    program: PathBuf,
    args: Vec<Arg>,
}

impl Stage {
    /// Creates a stage with no arguments.
    pub fn new(kind: StageKind, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends a plain argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(Arg::Plain(arg.into()));
        self
    }

    /// Appends a path argument.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.args.push(Arg::Path(path.into()));
        self
    }

    /// Appends the passphrase.
    #[must_use]
    pub fn secret(mut self, passphrase: Passphrase) -> Self {
        self.args.push(Arg::Secret(passphrase));
        self
    }

    /// Stage role.
    #[must_use]
    pub const fn kind(&self) -> StageKind {
        self.kind
    }

    /// Program to execute.
    #[must_use]
    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Arguments in order.
    #[must_use]
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Human-readable name used in diagnostics, e.g. `compress (gzip)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.kind, self.program.display())
    }

    /// Builds the process command. Arguments go straight to argv, never
    /// through a shell.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args.iter().map(Arg::as_os_str));
        cmd
    }

    /// Renders the stage as shell words with the passphrase redacted.
    #[must_use]
    pub fn render(&self) -> String {
        std::iter::once(shell::token(&self.program.to_string_lossy()))
            .chain(self.args.iter().map(Arg::render))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
