//! Where the spreadsheet goes

use crate::error::{CliError, Result};
use inquire::{InquireError, Text};
use std::path::{Path, PathBuf};

/// Chooses the output path for an export; `None` means the user backed out
pub trait DestinationPicker {
    fn choose(&mut self, suggested: &str) -> Result<Option<PathBuf>>;
}

/// Asks on the terminal, pre-filled with the suggested file name
#[derive(Debug, Default)]
pub struct PromptDestination;

impl DestinationPicker for PromptDestination {
    fn choose(&mut self, suggested: &str) -> Result<Option<PathBuf>> {
        let answer = Text::new("Save spreadsheet as:")
            .with_initial_value(suggested)
            .with_help_message("Enter to save, Esc to skip the export")
            .prompt();

        match answer {
            Ok(path) if path.trim().is_empty() => Ok(Some(with_xlsx_extension(Path::new(suggested)))),
            Ok(path) => Ok(Some(with_xlsx_extension(Path::new(path.trim())))),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(CliError::Prompt(e.to_string())),
        }
    }
}

/// Always answers with the same path (`--output`)
#[derive(Debug, Clone)]
pub struct FixedDestination(pub PathBuf);

impl DestinationPicker for FixedDestination {
    fn choose(&mut self, _suggested: &str) -> Result<Option<PathBuf>> {
        Ok(Some(with_xlsx_extension(&self.0)))
    }
}

/// Append `.xlsx` unless the path already ends with it
pub fn with_xlsx_extension(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);

    if has_extension {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".xlsx");
        PathBuf::from(name)
    }
}
