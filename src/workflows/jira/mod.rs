mod normalizer;
mod parser;

pub use parser::REQUIRED_COLUMNS;

use crate::workflows::sprint::IssueRow;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum JiraImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumns(Vec<String>),
}

impl std::fmt::Display for JiraImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JiraImportError::Io(err) => write!(f, "failed to read Jira export: {}", err),
            JiraImportError::Csv(err) => write!(f, "could not read CSV: {}", err),
            JiraImportError::MissingColumns(columns) => {
                write!(f, "missing columns: {}", columns.join(", "))
            }
        }
    }
}

impl std::error::Error for JiraImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JiraImportError::Io(err) => Some(err),
            JiraImportError::Csv(err) => Some(err),
            JiraImportError::MissingColumns(_) => None,
        }
    }
}

impl From<std::io::Error> for JiraImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for JiraImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a Jira "Export Issues → CSV (all fields)" file into cleaned rows.
pub struct JiraExportImporter;

impl JiraExportImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<IssueRow>, JiraImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<IssueRow>, JiraImportError> {
        parser::parse_records(reader)
    }
}
