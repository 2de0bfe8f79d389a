//! Selection-to-pipeline core for encrypted, compressed archives.
//!
//! `packer-core` lists the children of a directory with their recursive
//! sizes, lets an operator pick some of them through a [`Prompter`], and
//! streams exactly that subset through `tar | pv | gzip | gpg` into a single
//! `.tar.gz.gpg` file. Nothing is buffered in memory or on disk before
//! encryption; compression and cryptography are left to the external tools.
//!
//! # Examples
//!
//! ```no_run
//! use packer_core::NoopObserver;
//! use packer_core::PackerConfig;
//! use packer_core::ProcessEnvironment;
//! use packer_core::selection::ScriptedPrompter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PackerConfig::new("/data")
//!     .with_passphrase("correct horse")
//!     .with_destination("/backups/data");
//! let mut prompter = ScriptedPrompter::new().with_selection(vec![0, 2]);
//!
//! let request =
//!     packer_core::prepare_request(&config, &ProcessEnvironment, &mut prompter, &mut NoopObserver)?;
//! let report = packer_core::pack(request, &config.toolchain)?;
//! println!("wrote {} bytes", report.bytes_written);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod inventory;
pub mod pipeline;
pub mod request;
pub mod selection;
pub mod size;

// Re-export main API types
pub use api::NoopObserver;
pub use api::PrepareObserver;
pub use api::pack;
pub use api::prepare_request;
pub use config::Environment;
pub use config::PackerConfig;
pub use config::ProcessEnvironment;
pub use config::Source;
pub use error::Field;
pub use error::PackerError;
pub use error::Result;
pub use inventory::Entry;
pub use inventory::Inventory;
pub use inventory::InventoryWarning;
pub use inventory::ScanProgress;
pub use pipeline::Pipeline;
pub use pipeline::PipelineReport;
pub use pipeline::Toolchain;
pub use request::ArchiveRequest;
pub use request::Passphrase;
pub use selection::Prompter;
