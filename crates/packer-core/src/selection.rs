//! Turning an inventory into choices and choices back into indices.
//!
//! The interactive widget lives behind the [`Prompter`] trait so the flow
//! can run against a terminal, a preset index list, or a test script.

use crate::Entry;
use crate::Field;
use crate::PackerError;
use crate::Passphrase;
use crate::Result;
use crate::size::format_mebibytes;
use std::collections::VecDeque;

/// Source of operator answers.
///
/// Implementations must report cancellation and surface failures as
/// `PromptAborted`, never as an empty answer.
pub trait Prompter {
    /// Asks for a secret without echoing it.
    ///
    /// # Errors
    ///
    /// Returns `PromptAborted` if the operator cancels or the terminal fails.
    fn password(&mut self, message: &str) -> Result<Passphrase>;

    /// Asks for a line of text.
    ///
    /// # Errors
    ///
    /// Returns `PromptAborted` if the operator cancels or the terminal fails.
    fn input(&mut self, message: &str) -> Result<String>;

    /// Asks the operator to pick any number of `labels`.
    ///
    /// Returns positions into `labels` in the order they were chosen.
    ///
    /// # Errors
    ///
    /// Returns `PromptAborted` if the operator cancels or the terminal fails.
    fn multi_select(&mut self, message: &str, labels: &[String]) -> Result<Vec<usize>>;
}

/// Display label for an entry, e.g. `photos (12.50 MB)`.
#[must_use]
pub fn label(entry: &Entry) -> String {
    format!("{} ({} MB)", entry.name, format_mebibytes(entry.size))
}

/// The entries shown to the operator and where they sit in the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choices {
    labels: Vec<String>,
    positions: Vec<usize>,
}

impl Choices {
    /// Builds the choice list, dropping dot-prefixed names unless
    /// `include_hidden` is set.
    #[must_use]
    pub fn new(entries: &[Entry], include_hidden: bool) -> Self {
        let (positions, labels): (Vec<usize>, Vec<String>) = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| include_hidden || !e.is_hidden())
            .map(|(i, e)| (i, label(e)))
            .unzip();
        Self { labels, positions }
    }

    /// Labels in display order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Inventory index behind each label.
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Number of displayed choices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if nothing can be chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Maps displayed positions to inventory indices, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `SelectionOutOfRange` for a position past the displayed list.
    pub fn resolve(&self, chosen: &[usize]) -> Result<Vec<usize>> {
        chosen
            .iter()
            .map(|&i| {
                self.positions
                    .get(i)
                    .copied()
                    .ok_or(PackerError::SelectionOutOfRange {
                        index: i,
                        len: self.positions.len(),
                    })
            })
            .collect()
    }
}

/// Asks the operator to choose entries and returns their inventory indices.
///
/// # Errors
///
/// Returns `MissingField` for files when nothing can be offered (every
/// entry is hidden), without asking. Propagates `PromptAborted` from the
/// prompter and `SelectionOutOfRange` if it returns a position that was
/// not offered.
pub fn select_entries(
    entries: &[Entry],
    include_hidden: bool,
    prompter: &mut dyn Prompter,
) -> Result<Vec<usize>> {
    let choices = Choices::new(entries, include_hidden);
    if choices.is_empty() {
        return Err(PackerError::MissingField { field: Field::Files });
    }
    let chosen = prompter.multi_select("Select files", choices.labels())?;
    choices.resolve(&chosen)
}

/// A prompter that replays preset answers.
///
/// Any question without a queued answer aborts, which makes it suitable
/// for unattended runs and tests.
///
/// # Examples
///
/// ```
/// use packer_core::selection::Prompter;
/// use packer_core::selection::ScriptedPrompter;
///
/// let mut prompter = ScriptedPrompter::new().with_selection(vec![1]);
/// assert_eq!(prompter.multi_select("pick", &["a".into(), "b".into()])?, vec![1]);
/// assert!(prompter.password("Passphrase").is_err());
/// # Ok::<(), packer_core::PackerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    passwords: VecDeque<Passphrase>,
    inputs: VecDeque<String>,
    selection: Option<Vec<usize>>,
}

impl ScriptedPrompter {
    /// Creates a prompter with no answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an answer for the next password question.
    #[must_use]
    pub fn with_password(mut self, answer: impl Into<String>) -> Self {
        self.passwords.push_back(Passphrase::new(answer));
        self
    }

    /// Queues an answer for the next input question.
    #[must_use]
    pub fn with_input(mut self, answer: impl Into<String>) -> Self {
        self.inputs.push_back(answer.into());
        self
    }

    /// Sets the positions returned by the selection question.
    #[must_use]
    pub fn with_selection(mut self, positions: Vec<usize>) -> Self {
        self.selection = Some(positions);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn password(&mut self, message: &str) -> Result<Passphrase> {
        self.passwords
            .pop_front()
            .ok_or_else(|| PackerError::prompt_aborted(format!("no answer for '{message}'")))
    }

    fn input(&mut self, message: &str) -> Result<String> {
        self.inputs
            .pop_front()
            .ok_or_else(|| PackerError::prompt_aborted(format!("no answer for '{message}'")))
    }

    fn multi_select(&mut self, message: &str, _labels: &[String]) -> Result<Vec<usize>> {
        self.selection
            .take()
            .ok_or_else(|| PackerError::prompt_aborted(format!("no answer for '{message}'")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, size: u64) -> Entry {
        Entry {
            name: name.into(),
            path: PathBuf::from(name),
            size,
            is_directory: false,
        }
    }

    #[test]
    fn test_label_format() {
        assert_eq!(label(&entry("photos", 13_107_200)), "photos (12.50 MB)");
        assert_eq!(label(&entry("a.txt", 100)), "a.txt (0.00 MB)");
    }

    #[test]
    fn test_hidden_entries_filtered() {
        let entries = vec![entry(".git", 1), entry("src", 2), entry(".env", 3)];
        let choices = Choices::new(&entries, false);
        assert_eq!(choices.len(), 1);
        assert_eq!(choices.labels()[0], "src (0.00 MB)");
        assert_eq!(choices.positions(), [1]);
        assert_eq!(choices.resolve(&[0]).unwrap(), vec![1]);
    }

    #[test]
    fn test_hidden_entries_included() {
        let entries = vec![entry(".git", 1), entry("src", 2)];
        let choices = Choices::new(&entries, true);
        assert_eq!(choices.len(), 2);
        assert_eq!(choices.resolve(&[1, 0]).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_resolve_out_of_range() {
        let choices = Choices::new(&[entry("a", 1)], false);
        let err = choices.resolve(&[3]).unwrap_err();
        assert!(matches!(
            err,
            PackerError::SelectionOutOfRange { index: 3, len: 1 }
        ));
    }

    #[test]
    fn test_select_entries_maps_to_inventory() {
        let entries = vec![entry(".hidden", 1), entry("a", 2), entry("b", 3)];
        let mut prompter = ScriptedPrompter::new().with_selection(vec![1]);
        let selected = select_entries(&entries, false, &mut prompter).unwrap();
        assert_eq!(selected, vec![2]);
    }

    #[test]
    fn test_only_hidden_entries_is_missing_files() {
        let entries = vec![entry(".env", 1)];
        let mut prompter = ScriptedPrompter::new().with_selection(vec![0]);
        let err = select_entries(&entries, false, &mut prompter).unwrap_err();
        assert_eq!(err.missing_field(), Some(Field::Files));
        // The prompter was never consulted.
        assert!(prompter.selection.is_some());

        let selected = select_entries(&entries, true, &mut prompter).unwrap();
        assert_eq!(selected, vec![0]);
    }

    #[test]
    fn test_cancelled_selection() {
        let entries = vec![entry("a", 1)];
        let mut prompter = ScriptedPrompter::new();
        let err = select_entries(&entries, false, &mut prompter).unwrap_err();
        assert!(err.is_cancellation());
    }

    #[test]
    fn test_empty_selection_is_not_cancellation() {
        let entries = vec![entry("a", 1)];
        let mut prompter = ScriptedPrompter::new().with_selection(vec![]);
        let selected = select_entries(&entries, false, &mut prompter).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_scripted_answers_in_order() {
        let mut prompter = ScriptedPrompter::new()
            .with_input("first")
            .with_input("second");
        assert_eq!(prompter.input("q").unwrap(), "first");
        assert_eq!(prompter.input("q").unwrap(), "second");
        assert!(prompter.input("q").is_err());
    }
}
