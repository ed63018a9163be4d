mod parser;

use crate::placement::Employee;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use parser::RowError;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("missing employee file: {}", .path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read employee file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid employee CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("employee file contains no valid employee rows")]
    NoEmployees,
}

/// Employees that passed validation plus every row that did not.
#[derive(Debug, Default)]
pub struct ImportedRoster {
    pub employees: Vec<Employee>,
    pub row_errors: Vec<RowError>,
}

pub struct EmployeeImporter;

impl EmployeeImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ImportedRoster, ImportError> {
        let path = path.as_ref();
        info!(path = %path.display(), "reading employee file");
        let file = std::fs::File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => ImportError::MissingFile {
                path: path.to_path_buf(),
            },
            _ => ImportError::Io(err),
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ImportedRoster, ImportError> {
        let parsed = parser::parse_rows(reader)?;
        for err in &parsed.row_errors {
            warn!(line = err.line(), "{err}");
        }
        info!(
            employees = parsed.employees.len(),
            rejected = parsed.row_errors.len(),
            "loaded employee records"
        );

        if parsed.employees.is_empty() {
            return Err(ImportError::NoEmployees);
        }

        Ok(ImportedRoster {
            employees: parsed.employees,
            row_errors: parsed.row_errors,
        })
    }
}
