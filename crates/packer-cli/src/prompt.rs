//! Terminal prompts backed by dialoguer.

use console::Term;
use dialoguer::Input;
use dialoguer::MultiSelect;
use dialoguer::Password;
use dialoguer::theme::ColorfulTheme;
use packer_core::PackerError;
use packer_core::Passphrase;
use packer_core::Prompter;
use packer_core::Result;

/// Prompts on stderr (dialoguer's default) so stdout stays clean for
/// results.
///
/// A preset selection (from `--select`) replaces the menu; everything else
/// needs an interactive terminal and aborts without one.
pub struct TerminalPrompter {
    term: Term,
    theme: ColorfulTheme,
    preset: Option<Vec<usize>>,
}

impl TerminalPrompter {
    pub fn new(preset: Option<Vec<usize>>) -> Self {
        Self {
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
            preset,
        }
    }

    fn require_terminal(&self, message: &str) -> Result<()> {
        if self.term.is_term() {
            Ok(())
        } else {
            Err(PackerError::prompt_aborted(format!(
                "cannot ask for '{message}': not a terminal"
            )))
        }
    }
}

fn aborted(err: dialoguer::Error) -> PackerError {
    PackerError::prompt_aborted(err.to_string())
}

impl Prompter for TerminalPrompter {
    fn password(&mut self, message: &str) -> Result<Passphrase> {
        self.require_terminal(message)?;
        Password::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty_password(true)
            .interact()
            .map(Passphrase::new)
            .map_err(aborted)
    }

    fn input(&mut self, message: &str) -> Result<String> {
        self.require_terminal(message)?;
        Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map_err(aborted)
    }

    fn multi_select(&mut self, message: &str, labels: &[String]) -> Result<Vec<usize>> {
        if let Some(preset) = self.preset.take() {
            log::debug!("using preset selection {preset:?}");
            return Ok(preset);
        }
        self.require_terminal(message)?;
        MultiSelect::with_theme(&self.theme)
            .with_prompt(format!("{message} (space toggles, enter confirms, esc cancels)"))
            .items(labels)
            .interact_opt()
            .map_err(aborted)?
            .ok_or_else(|| PackerError::prompt_aborted("selection cancelled"))
    }
}
