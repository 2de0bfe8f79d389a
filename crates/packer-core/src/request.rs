//! The validated unit of work handed to the pipeline.

use crate::Entry;
use crate::Field;
use crate::PackerError;
use crate::Result;
use crate::pipeline::shell;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use zeroize::Zeroizing;

/// Suffix naming the tar, gzip, gpg layering of the output file.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz.gpg";

/// Encryption passphrase.
///
/// The buffer is wiped when the value is dropped, clones included.
/// `Debug` never prints the secret; use [`Passphrase::expose`] at the one
/// place that must hand it to the encryptor.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Passphrase(Zeroizing<String>);

impl Passphrase {
    /// Wraps a secret, taking ownership of its buffer.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    /// Returns the secret.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Passphrase {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl AsRef<str> for Passphrase {
    fn as_ref(&self) -> &str {
        self.expose()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(***)")
    }
}

/// Appends [`ARCHIVE_SUFFIX`] unless `destination` already ends with it.
///
/// Returns the adjusted path and whether it changed.
///
/// # Examples
///
/// ```
/// use packer_core::request::with_archive_suffix;
/// use std::path::Path;
///
/// let (path, adjusted) = with_archive_suffix(Path::new("out"));
/// assert_eq!(path, Path::new("out.tar.gz.gpg"));
/// assert!(adjusted);
/// ```
#[must_use]
pub fn with_archive_suffix(destination: &Path) -> (PathBuf, bool) {
    if destination
        .as_os_str()
        .to_string_lossy()
        .ends_with(ARCHIVE_SUFFIX)
    {
        return (destination.to_path_buf(), false);
    }
    let mut name = OsString::from(destination.as_os_str());
    name.push(ARCHIVE_SUFFIX);
    (PathBuf::from(name), true)
}

/// A validated request: credentials, destination and selected entries.
///
/// Only obtainable through [`ArchiveRequestBuilder::build`], so every
/// instance satisfies the non-empty invariants.
#[derive(Debug, Clone)]
pub struct ArchiveRequest {
    passphrase: Passphrase,
    destination: PathBuf,
    source_directory: PathBuf,
    all_entries: Vec<Entry>,
    selected_entries: Vec<Entry>,
}

impl ArchiveRequest {
    /// Starts a new builder.
    #[must_use]
    pub fn builder() -> ArchiveRequestBuilder {
        ArchiveRequestBuilder::default()
    }

    /// The encryption passphrase.
    #[must_use]
    pub fn passphrase(&self) -> &Passphrase {
        &self.passphrase
    }

    /// The output file.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// The scanned directory.
    #[must_use]
    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    /// The full inventory in listing order.
    #[must_use]
    pub fn all_entries(&self) -> &[Entry] {
        &self.all_entries
    }

    /// The chosen entries in selection order.
    #[must_use]
    pub fn selected_entries(&self) -> &[Entry] {
        &self.selected_entries
    }

    /// Sum of the selected entry sizes, recomputed on every call.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.selected_entries
            .iter()
            .fold(0_u64, |acc, e| acc.saturating_add(e.size))
    }

    /// Shell-safe tokens for the selected paths, in selection order.
    #[must_use]
    pub fn path_tokens(&self) -> Vec<String> {
        self.selected_entries
            .iter()
            .map(|e| shell::quote(&e.path.to_string_lossy()))
            .collect()
    }
}

/// Collects request fields one at a time and validates them at the end.
///
/// # Examples
///
/// ```
/// use packer_core::ArchiveRequest;
/// use packer_core::Entry;
/// use packer_core::Passphrase;
///
/// let entries = vec![Entry {
///     name: "a.txt".into(),
///     path: "/data/a.txt".into(),
///     size: 100,
///     is_directory: false,
/// }];
///
/// let request = ArchiveRequest::builder()
///     .passphrase(Passphrase::new("x"))
///     .destination("out.tar.gz.gpg")
///     .source_directory("/data")
///     .entries(entries)
///     .select([0])
///     .build()?;
///
/// assert_eq!(request.total_size(), 100);
/// # Ok::<(), packer_core::PackerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveRequestBuilder {
    passphrase: Passphrase,
    destination: PathBuf,
    source_directory: PathBuf,
    entries: Vec<Entry>,
    selection: Vec<usize>,
}

impl ArchiveRequestBuilder {
    /// Sets the passphrase.
    #[must_use]
    pub fn passphrase(mut self, passphrase: Passphrase) -> Self {
        self.passphrase = passphrase;
        self
    }

    /// Sets the output path, used exactly as given.
    #[must_use]
    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = destination.into();
        self
    }

    /// Sets the scanned directory.
    #[must_use]
    pub fn source_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_directory = dir.into();
        self
    }

    /// Sets the full inventory.
    #[must_use]
    pub fn entries(mut self, entries: Vec<Entry>) -> Self {
        self.entries = entries;
        self
    }

    /// Sets the selection as zero-based indices into the inventory.
    #[must_use]
    pub fn select(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.selection = indices.into_iter().collect();
        self
    }

    /// Checks the required fields in order and reports the first missing
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for passphrase, destination, directory, then
    /// files (empty inventory or empty selection).
    pub fn validate(&self) -> Result<()> {
        let missing = if self.passphrase.is_empty() {
            Some(Field::Passphrase)
        } else if self.destination.as_os_str().is_empty() {
            Some(Field::Destination)
        } else if self.source_directory.as_os_str().is_empty() {
            Some(Field::Directory)
        } else if self.entries.is_empty() || self.selection.is_empty() {
            Some(Field::Files)
        } else {
            None
        };

        match missing {
            Some(field) => Err(PackerError::MissingField { field }),
            None => Ok(()),
        }
    }

    /// Validates and produces the request.
    ///
    /// # Errors
    ///
    /// Returns the first `MissingField`, or `SelectionOutOfRange` if an
    /// index does not refer to an inventory entry.
    pub fn build(self) -> Result<ArchiveRequest> {
        self.validate()?;

        let len = self.entries.len();
        let selected_entries = self
            .selection
            .iter()
            .map(|&index| {
                self.entries
                    .get(index)
                    .cloned()
                    .ok_or(PackerError::SelectionOutOfRange { index, len })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ArchiveRequest {
            passphrase: self.passphrase,
            destination: self.destination,
            source_directory: self.source_directory,
            all_entries: self.entries,
            selected_entries,
        })
    }
}
