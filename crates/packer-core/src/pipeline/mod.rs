//! The archive, progress, compress, encrypt pipeline.
//!
//! A [`Pipeline`] is built from an [`ArchiveRequest`] as a list of typed
//! [`Stage`]s and the destination file. It can be rendered as an
//! equivalent shell command line for display, or executed with
//! [`executor::execute`], which connects the stages with OS pipes.

pub mod executor;
pub mod shell;
pub mod stage;

pub use executor::PipelineReport;
pub use stage::Arg;
pub use stage::Stage;
pub use stage::StageKind;

use crate::ArchiveRequest;
use std::path::Path;
use std::path::PathBuf;

/// Programs used for each stage.
///
/// # Examples
///
/// ```
/// use packer_core::Toolchain;
///
/// let tools = Toolchain::default().with_progress(None);
/// assert_eq!(tools.archiver.to_str(), Some("tar"));
/// assert!(tools.progress.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Tar-compatible archiver.
    pub archiver: PathBuf,

    /// Progress meter accepting `-s <bytes>`; `None` drops the stage.
    pub progress: Option<PathBuf>,

    /// Stream compressor.
    pub compressor: PathBuf,

    /// GnuPG-compatible encryptor.
    pub encryptor: PathBuf,
}

impl Default for Toolchain {
    /// `tar`, `pv`, `gzip` and `gpg`, resolved through `PATH`.
    fn default() -> Self {
        Self {
            archiver: PathBuf::from("tar"),
            progress: Some(PathBuf::from("pv")),
            compressor: PathBuf::from("gzip"),
            encryptor: PathBuf::from("gpg"),
        }
    }
}

impl Toolchain {
    /// Sets the archiver program.
    #[must_use]
    pub fn with_archiver(mut self, program: impl Into<PathBuf>) -> Self {
        self.archiver = program.into();
        self
    }

    /// Sets or removes the progress meter.
    #[must_use]
    pub fn with_progress(mut self, program: Option<PathBuf>) -> Self {
        self.progress = program;
        self
    }

    /// Sets the compressor program.
    #[must_use]
    pub fn with_compressor(mut self, program: impl Into<PathBuf>) -> Self {
        self.compressor = program.into();
        self
    }

    /// Sets the encryptor program.
    #[must_use]
    pub fn with_encryptor(mut self, program: impl Into<PathBuf>) -> Self {
        self.encryptor = program.into();
        self
    }
}

/// Stages plus the file the last stage writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
    output: PathBuf,
}

impl Pipeline {
    /// Builds the pipeline for a request.
    ///
    /// The progress stage sits before compression so it can measure
    /// against the precomputed uncompressed total.
    #[must_use]
    pub fn from_request(request: &ArchiveRequest, tools: &Toolchain) -> Self {
        let mut archive = Stage::new(StageKind::Archive, &tools.archiver)
            .arg("-cf")
            .arg("-");
        for entry in request.selected_entries() {
            archive = archive.path(&entry.path);
        }

        let mut stages = vec![archive];
        if let Some(progress) = &tools.progress {
            stages.push(
                Stage::new(StageKind::Progress, progress)
                    .arg("-s")
                    .arg(request.total_size().to_string()),
            );
        }
        stages.push(Stage::new(StageKind::Compress, &tools.compressor));
        stages.push(
            Stage::new(StageKind::Encrypt, &tools.encryptor)
                .arg("--passphrase")
                .secret(request.passphrase().clone())
                .arg("--batch")
                .arg("--quiet")
                .arg("--yes")
                .arg("-c"),
        );

        Self {
            stages,
            output: request.destination().to_path_buf(),
        }
    }

    /// Stages in data-flow order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Destination file.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Renders the pipeline as one POSIX shell command line.
    ///
    /// Every path is single-quoted and the passphrase is replaced by
    /// `'***'`, so the result is safe to print or log.
    #[must_use]
    pub fn render(&self) -> String {
        let stages = self
            .stages
            .iter()
            .map(Stage::render)
            .collect::<Vec<_>>()
            .join(" | ");
        format!(
            "{stages} > {}",
            shell::quote(&self.output.to_string_lossy())
        )
    }
}
