//! Run configuration and value-source precedence.
//!
//! Each request field is resolved once, in a fixed order of precedence:
//! explicit value, then environment variable, then interactive prompt.

use crate::Passphrase;
use crate::Toolchain;
use std::fmt;
use std::path::PathBuf;

/// Environment variable holding the passphrase.
pub const PASSPHRASE_ENV: &str = "PACKER_PASS";

/// Environment variable holding the output path.
pub const DESTINATION_ENV: &str = "PACKER_OUT";

/// Read access to environment variables.
///
/// Implemented for closures so tests can supply a fixed environment.
pub trait Environment {
    /// Returns the value of `key`, or `None` if unset.
    fn var(&self, key: &str) -> Option<String>;
}

impl<F> Environment for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// The environment of the current process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Command-line flag or positional argument.
    Argument,
    /// The named environment variable.
    Environment(&'static str),
    /// Interactive prompt.
    Prompt,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argument => f.write_str("arguments"),
            Self::Environment(var) => write!(f, "env {var}"),
            Self::Prompt => f.write_str("prompt"),
        }
    }
}

/// Inputs to a pack run, before prompting.
///
/// # Examples
///
/// ```
/// use packer_core::PackerConfig;
///
/// let config = PackerConfig::new("/data")
///     .with_destination("backup")
///     .with_include_hidden(true);
/// assert!(config.passphrase.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PackerConfig {
    /// Explicit passphrase; overrides [`PASSPHRASE_ENV`].
    pub passphrase: Option<Passphrase>,

    /// Explicit output path; overrides [`DESTINATION_ENV`].
    pub destination: Option<PathBuf>,

    /// Directory whose children are offered.
    pub directory: PathBuf,

    /// Offer dot-prefixed entries too.
    ///
    /// Default: `false`.
    pub include_hidden: bool,

    /// Programs for each pipeline stage.
    pub toolchain: Toolchain,
}

impl Default for PackerConfig {
    /// Current directory, no explicit credentials, default toolchain.
    fn default() -> Self {
        Self::new(".")
    }
}

impl PackerConfig {
    /// Creates a configuration for `directory`.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            passphrase: None,
            destination: None,
            directory: directory.into(),
            include_hidden: false,
            toolchain: Toolchain::default(),
        }
    }

    /// Sets the explicit passphrase.
    #[must_use]
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(Passphrase::new(passphrase));
        self
    }

    /// Sets the explicit output path.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Sets whether hidden entries are offered.
    #[must_use]
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Sets the toolchain.
    #[must_use]
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }
}

/// Picks the first non-empty value among explicit and environment.
///
/// The environment value is moved into `T` without copying, so a
/// [`Passphrase`] read from the environment owns the only buffer.
/// Returns `None` when the caller has to prompt.
pub fn explicit_or_env<T>(
    explicit: Option<T>,
    env: &dyn Environment,
    var: &'static str,
) -> Option<(T, Source)>
where
    T: AsRef<str> + From<String>,
{
    explicit
        .filter(|v| !v.as_ref().is_empty())
        .map(|v| (v, Source::Argument))
        .or_else(|| {
            env.var(var)
                .filter(|v| !v.is_empty())
                .map(|v| (T::from(v), Source::Environment(var)))
        })
}
