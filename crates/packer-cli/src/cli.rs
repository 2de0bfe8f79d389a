//! CLI argument parsing using clap.

use clap::Parser;
use clap_complete::Shell;
use packer_core::PackerConfig;
use packer_core::Toolchain;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "packer")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Values not given as arguments are read from PACKER_PASS and PACKER_OUT, \
                  then prompted for."
)]
pub struct Cli {
    /// Directory whose entries are offered (default: current directory)
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Output archive path; `.tar.gz.gpg` is appended if missing
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Directory whose entries are offered
    #[arg(long = "dir", value_name = "DIRECTORY", conflicts_with = "directory")]
    pub dir: Option<PathBuf>,

    /// Output archive path
    #[arg(long, value_name = "FILE", conflicts_with = "output")]
    pub out: Option<PathBuf>,

    /// Encryption passphrase (visible to other local users; prefer PACKER_PASS)
    #[arg(long, value_name = "PASSPHRASE")]
    pub pass: Option<String>,

    /// Entries to pack by their number in `--list`, skipping the menu
    #[arg(
        short,
        long,
        value_name = "N",
        value_delimiter = ',',
        value_parser = parse_position
    )]
    pub select: Option<Vec<usize>>,

    /// Offer dot-prefixed entries too
    #[arg(long)]
    pub include_hidden: bool,

    /// List the directory's entries with their numbers and exit
    #[arg(short, long)]
    pub list: bool,

    /// Print the command that would run instead of running it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Leave out the progress meter stage
    #[arg(long)]
    pub no_progress: bool,

    /// Archiver program
    #[arg(long, value_name = "PROGRAM", env = "PACKER_TAR", default_value = "tar")]
    pub tar: PathBuf,

    /// Progress meter program
    #[arg(long, value_name = "PROGRAM", env = "PACKER_PV", default_value = "pv")]
    pub pv: PathBuf,

    /// Compressor program
    #[arg(long, value_name = "PROGRAM", env = "PACKER_GZIP", default_value = "gzip")]
    pub gzip: PathBuf,

    /// Encryption program
    #[arg(long, value_name = "PROGRAM", env = "PACKER_GPG", default_value = "gpg")]
    pub gpg: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub generate_completions: Option<Shell>,
}

impl Cli {
    /// Directory from `--dir` or the positional argument.
    pub fn source_directory(&self) -> PathBuf {
        self.dir
            .clone()
            .or_else(|| self.directory.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain::default()
            .with_archiver(&self.tar)
            .with_progress((!self.no_progress).then(|| self.pv.clone()))
            .with_compressor(&self.gzip)
            .with_encryptor(&self.gpg)
    }

    /// Explicit values only; environment and prompts are layered on by
    /// `prepare_request`.
    pub fn packer_config(&self) -> PackerConfig {
        let mut config = PackerConfig::new(self.source_directory())
            .with_include_hidden(self.include_hidden)
            .with_toolchain(self.toolchain());
        if let Some(pass) = &self.pass {
            config = config.with_passphrase(pass.clone());
        }
        if let Some(out) = self.out.as_ref().or(self.output.as_ref()) {
            config = config.with_destination(out);
        }
        config
    }
}

/// Parse a 1-based entry number into a 0-based position
fn parse_position(s: &str) -> Result<usize, String> {
    let n = s
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid entry number: {s}"))?;
    n.checked_sub(1)
        .ok_or_else(|| "entry numbers start at 1".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("1").unwrap(), 0);
        assert_eq!(parse_position(" 3 ").unwrap(), 2);
        assert!(parse_position("0").is_err());
        assert!(parse_position("-1").is_err());
        assert!(parse_position("two").is_err());
    }

    #[test]
    fn test_select_list() {
        let cli = Cli::try_parse_from(["packer", "--select", "2,1", "-s", "4"]).unwrap();
        assert_eq!(cli.select, Some(vec![1, 0, 3]));
    }

    #[test]
    fn test_positionals() {
        let cli = Cli::try_parse_from(["packer", "/data", "out"]).unwrap();
        let config = cli.packer_config();
        assert_eq!(config.directory, Path::new("/data"));
        assert_eq!(config.destination.as_deref(), Some(Path::new("out")));
        assert!(config.passphrase.is_none());
    }

    #[test]
    fn test_flags_equivalent_to_positionals() {
        let cli = Cli::try_parse_from(["packer", "--dir", "/data", "--out", "out"]).unwrap();
        let config = cli.packer_config();
        assert_eq!(config.directory, Path::new("/data"));
        assert_eq!(config.destination.as_deref(), Some(Path::new("out")));
    }

    #[test]
    fn test_dir_conflicts_with_positional() {
        assert!(Cli::try_parse_from(["packer", "/a", "--dir", "/b"]).is_err());
    }

    #[test]
    fn test_default_directory() {
        let cli = Cli::try_parse_from(["packer"]).unwrap();
        assert_eq!(cli.source_directory(), Path::new("."));
    }

    #[test]
    fn test_no_progress_drops_stage() {
        let cli = Cli::try_parse_from(["packer", "--no-progress", "--gzip", "pigz"]).unwrap();
        let tools = cli.toolchain();
        assert!(tools.progress.is_none());
        assert_eq!(tools.compressor, Path::new("pigz"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["packer", "-q", "-v"]).is_err());
    }
}
