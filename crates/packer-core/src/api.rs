//! High-level flow: resolve inputs, scan, select, then run the pipeline.

use crate::ArchiveRequest;
use crate::Field;
use crate::Inventory;
use crate::PackerConfig;
use crate::PackerError;
use crate::Result;
use crate::Toolchain;
use crate::config::DESTINATION_ENV;
use crate::config::Environment;
use crate::config::PASSPHRASE_ENV;
use crate::config::Source;
use crate::config::explicit_or_env;
use crate::inventory::Entry;
use crate::inventory::InventoryWarning;
use crate::inventory::ScanProgress;
use crate::pipeline::Pipeline;
use crate::pipeline::PipelineReport;
use crate::pipeline::executor;
use crate::request::with_archive_suffix;
use crate::selection::Prompter;
use crate::selection::select_entries;
use std::path::Path;
use std::path::PathBuf;

/// Notifications emitted while a request is prepared.
///
/// All methods except the inherited `on_entry` have empty defaults.
pub trait PrepareObserver: ScanProgress {
    /// A field got its value from `source`. The value itself is not passed
    /// so the passphrase cannot leak through an observer.
    fn on_resolved(&mut self, _field: Field, _source: Source) {}

    /// The canonical suffix was appended to the destination.
    fn on_destination_adjusted(&mut self, _destination: &Path) {}

    /// A child was sized as zero because its subtree could not be read.
    fn on_inventory_warning(&mut self, _warning: &InventoryWarning) {}
}

/// An observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanProgress for NoopObserver {
    fn on_entry(&mut self, _entry: &Entry) {}
}

impl PrepareObserver for NoopObserver {}

/// Resolves credentials and paths, scans the directory and asks for a
/// selection, producing a validated request.
///
/// Steps run in order (passphrase, destination, directory, inventory,
/// selection) and stop at the first empty field, so the reported
/// `MissingField` always follows that order.
///
/// # Errors
///
/// `PromptAborted` if a prompt is cancelled, `MissingField` for the first
/// empty field, `DirectoryUnreadable` if the directory cannot be listed,
/// `SelectionOutOfRange` for a bogus selection.
///
/// # Examples
///
/// ```no_run
/// use packer_core::NoopObserver;
/// use packer_core::PackerConfig;
/// use packer_core::ProcessEnvironment;
/// use packer_core::prepare_request;
/// use packer_core::selection::ScriptedPrompter;
///
/// let config = PackerConfig::new("/data").with_passphrase("x").with_destination("out");
/// let mut prompter = ScriptedPrompter::new().with_selection(vec![0]);
/// let request = prepare_request(&config, &ProcessEnvironment, &mut prompter, &mut NoopObserver)?;
/// assert_eq!(request.destination().to_str(), Some("out.tar.gz.gpg"));
/// # Ok::<(), packer_core::PackerError>(())
/// ```
pub fn prepare_request(
    config: &PackerConfig,
    env: &dyn Environment,
    prompter: &mut dyn Prompter,
    observer: &mut dyn PrepareObserver,
) -> Result<ArchiveRequest> {
    let (passphrase, source) =
        match explicit_or_env(config.passphrase.clone(), env, PASSPHRASE_ENV) {
            Some(found) => found,
            None => (prompter.password("Passphrase")?, Source::Prompt),
        };
    require(!passphrase.is_empty(), Field::Passphrase)?;
    observer.on_resolved(Field::Passphrase, source);

    let explicit_destination = config
        .destination
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned());
    let (destination, source) = match explicit_or_env(explicit_destination, env, DESTINATION_ENV)
    {
        Some(found) => found,
        None => (prompter.input("Output file")?, Source::Prompt),
    };
    require(!destination.is_empty(), Field::Destination)?;
    observer.on_resolved(Field::Destination, source);
    // Non-UTF-8 explicit paths are kept intact rather than round-tripped
    // through the lossy string used for the emptiness check.
    let destination = match (&config.destination, source) {
        (Some(path), Source::Argument) => path.clone(),
        _ => PathBuf::from(destination),
    };
    let (destination, adjusted) = with_archive_suffix(&destination);
    if adjusted {
        observer.on_destination_adjusted(&destination);
    }

    require(!config.directory.as_os_str().is_empty(), Field::Directory)?;
    observer.on_resolved(Field::Directory, Source::Argument);

    let inventory = Inventory::scan_with_progress(&config.directory, observer)?;
    for warning in &inventory.warnings {
        observer.on_inventory_warning(warning);
    }
    require(!inventory.is_empty(), Field::Files)?;

    let selection = select_entries(&inventory.entries, config.include_hidden, prompter)?;

    ArchiveRequest::builder()
        .passphrase(passphrase)
        .destination(destination)
        .source_directory(&config.directory)
        .entries(inventory.entries)
        .select(selection)
        .build()
}

/// Consumes a request and runs its pipeline to completion.
///
/// # Errors
///
/// Returns `PipelineFailed` if any stage fails; the destination may then
/// hold partial output.
pub fn pack(request: ArchiveRequest, tools: &Toolchain) -> Result<PipelineReport> {
    let pipeline = Pipeline::from_request(&request, tools);
    log::info!(
        "packing {} entries ({} bytes) into {}",
        request.selected_entries().len(),
        request.total_size(),
        request.destination().display()
    );
    executor::execute(&pipeline)
}

fn require(present: bool, field: Field) -> Result<()> {
    if present {
        Ok(())
    } else {
        Err(PackerError::MissingField { field })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::selection::ScriptedPrompter;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[derive(Default)]
    struct Recorder {
        resolved: Vec<(Field, Source)>,
        adjusted: Option<PathBuf>,
        scanned: usize,
    }

    impl ScanProgress for Recorder {
        fn on_entry(&mut self, _entry: &Entry) {
            self.scanned += 1;
        }
    }

    impl PrepareObserver for Recorder {
        fn on_resolved(&mut self, field: Field, source: Source) {
            self.resolved.push((field, source));
        }

        fn on_destination_adjusted(&mut self, destination: &Path) {
            self.adjusted = Some(destination.to_path_buf());
        }
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), vec![0_u8; 100]).unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/b.txt"), vec![0_u8; 4000]).unwrap();
        temp
    }

    #[test]
    fn test_prepare_with_prompts() {
        let temp = fixture();
        let config = PackerConfig::new(temp.path());
        let mut prompter = ScriptedPrompter::new()
            .with_password("x")
            .with_input("out")
            .with_selection(vec![1]);
        let mut recorder = Recorder::default();

        let request = prepare_request(&config, &no_env, &mut prompter, &mut recorder).unwrap();

        assert_eq!(request.destination(), Path::new("out.tar.gz.gpg"));
        assert_eq!(request.selected_entries()[0].name, "sub");
        assert_eq!(request.total_size(), 4000);
        assert_eq!(recorder.adjusted, Some(PathBuf::from("out.tar.gz.gpg")));
        assert_eq!(recorder.scanned, 2);
        assert_eq!(
            recorder.resolved,
            vec![
                (Field::Passphrase, Source::Prompt),
                (Field::Destination, Source::Prompt),
                (Field::Directory, Source::Argument),
            ]
        );
    }

    #[test]
    fn test_env_suppresses_prompts() {
        let temp = fixture();
        let config = PackerConfig::new(temp.path());
        let env = |key: &str| match key {
            PASSPHRASE_ENV => Some("secret".to_string()),
            DESTINATION_ENV => Some("backup.tar.gz.gpg".to_string()),
            _ => None,
        };
        let mut prompter = ScriptedPrompter::new().with_selection(vec![0]);
        let mut recorder = Recorder::default();

        let request = prepare_request(&config, &env, &mut prompter, &mut recorder).unwrap();

        assert_eq!(request.passphrase().expose(), "secret");
        assert_eq!(request.destination(), Path::new("backup.tar.gz.gpg"));
        assert!(recorder.adjusted.is_none());
        assert_eq!(
            recorder.resolved[0],
            (Field::Passphrase, Source::Environment(PASSPHRASE_ENV))
        );
    }

    #[test]
    fn test_arguments_override_env() {
        let temp = fixture();
        let config = PackerConfig::new(temp.path())
            .with_passphrase("arg-secret")
            .with_destination("arg-out");
        let env = |_: &str| Some("env-value".to_string());
        let mut prompter = ScriptedPrompter::new().with_selection(vec![0]);

        let request = prepare_request(&config, &env, &mut prompter, &mut NoopObserver).unwrap();

        assert_eq!(request.passphrase().expose(), "arg-secret");
        assert_eq!(request.destination(), Path::new("arg-out.tar.gz.gpg"));
    }

    #[test]
    fn test_empty_prompted_passphrase() {
        let temp = fixture();
        let config = PackerConfig::new(temp.path());
        let mut prompter = ScriptedPrompter::new().with_password("");

        let err = prepare_request(&config, &no_env, &mut prompter, &mut NoopObserver).unwrap_err();
        assert_eq!(err.missing_field(), Some(Field::Passphrase));
    }

    #[test]
    fn test_empty_prompted_destination() {
        let temp = fixture();
        let config = PackerConfig::new(temp.path()).with_passphrase("x");
        let mut prompter = ScriptedPrompter::new().with_input("");

        let err = prepare_request(&config, &no_env, &mut prompter, &mut NoopObserver).unwrap_err();
        assert_eq!(err.missing_field(), Some(Field::Destination));
    }

    #[test]
    fn test_empty_directory_path() {
        let config = PackerConfig::new("").with_passphrase("x").with_destination("o");
        let mut prompter = ScriptedPrompter::new();

        let err = prepare_request(&config, &no_env, &mut prompter, &mut NoopObserver).unwrap_err();
        assert_eq!(err.missing_field(), Some(Field::Directory));
    }

    #[test]
    fn test_empty_inventory() {
        let temp = TempDir::new().unwrap();
        let config = PackerConfig::new(temp.path())
            .with_passphrase("x")
            .with_destination("o");
        let mut prompter = ScriptedPrompter::new().with_selection(vec![0]);

        let err = prepare_request(&config, &no_env, &mut prompter, &mut NoopObserver).unwrap_err();
        assert_eq!(err.missing_field(), Some(Field::Files));
    }

    #[test]
    fn test_only_hidden_children_is_missing_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), b"KEY=value").unwrap();
        let config = PackerConfig::new(temp.path())
            .with_passphrase("x")
            .with_destination("o");
        let mut prompter = ScriptedPrompter::new();

        let err = prepare_request(&config, &no_env, &mut prompter, &mut NoopObserver).unwrap_err();
        assert_eq!(err.missing_field(), Some(Field::Files));
        assert!(!err.is_cancellation());
    }

    #[test]
    fn test_empty_selection() {
        let temp = fixture();
        let config = PackerConfig::new(temp.path())
            .with_passphrase("x")
            .with_destination("o");
        let mut prompter = ScriptedPrompter::new().with_selection(vec![]);

        let err = prepare_request(&config, &no_env, &mut prompter, &mut NoopObserver).unwrap_err();
        assert_eq!(err.missing_field(), Some(Field::Files));
    }

    #[test]
    fn test_cancelled_selection_creates_nothing() {
        let temp = fixture();
        let out = temp.path().join("never");
        let config = PackerConfig::new(temp.path())
            .with_passphrase("x")
            .with_destination(&out);
        let mut prompter = ScriptedPrompter::new();

        let err = prepare_request(&config, &no_env, &mut prompter, &mut NoopObserver).unwrap_err();
        assert!(err.is_cancellation());
        assert!(!out.exists());
        assert!(!temp.path().join("never.tar.gz.gpg").exists());
    }

    #[test]
    fn test_unreadable_directory() {
        let temp = TempDir::new().unwrap();
        let config = PackerConfig::new(temp.path().join("missing"))
            .with_passphrase("x")
            .with_destination("o");
        let mut prompter = ScriptedPrompter::new();

        let err = prepare_request(&config, &no_env, &mut prompter, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, PackerError::DirectoryUnreadable { .. }));
    }
}
