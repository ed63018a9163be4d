use crate::placement::Employee;
use csv::StringRecord;
use std::io::Read;

pub(crate) const FIELD_COUNT: usize = 6;

/// A malformed input row. Reported and skipped; never fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("error at line {line}. Invalid number of fields: {found}")]
    FieldCount { line: u64, found: usize },
    #[error("error at line {line}, column {column}. Invalid integer: {value}")]
    InvalidInteger {
        line: u64,
        column: usize,
        value: String,
    },
    #[error("error at line {line}, column {column}. Invalid number: {value}")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },
    #[error("error at line {line}, column {column}. FTE must be greater than zero: {value}")]
    NonPositiveFte {
        line: u64,
        column: usize,
        value: String,
    },
    #[error("error at line {line}, column {column}. Text is not valid UTF-8")]
    InvalidEncoding { line: u64, column: usize },
}

impl RowError {
    pub fn line(&self) -> u64 {
        match self {
            Self::FieldCount { line, .. }
            | Self::InvalidInteger { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::NonPositiveFte { line, .. }
            | Self::InvalidEncoding { line, .. } => *line,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ParsedRows {
    pub(crate) employees: Vec<Employee>,
    pub(crate) row_errors: Vec<RowError>,
}

/// Reads `name, pref1, pref2, age, fte, role` rows after a header line.
/// Only structural CSV failures escape as `Err`.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<ParsedRows, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut parsed = ParsedRows::default();

    // Byte records so a badly encoded row is rejected alone instead of
    // aborting the import.
    for record in csv_reader.byte_records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let record = match StringRecord::from_byte_record(record) {
            Ok(record) => record,
            Err(err) => {
                parsed.row_errors.push(RowError::InvalidEncoding {
                    line,
                    column: err.utf8_error().field() + 1,
                });
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }
        match parse_employee(&record, line) {
            Ok(employee) => parsed.employees.push(employee),
            Err(err) => parsed.row_errors.push(err),
        }
    }

    Ok(parsed)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.is_empty())
}

fn parse_employee(record: &StringRecord, line: u64) -> Result<Employee, RowError> {
    if record.len() != FIELD_COUNT {
        return Err(RowError::FieldCount {
            line,
            found: record.len(),
        });
    }

    let age = parse_integer(record, line, 3)?;
    let fte = parse_fte(record, line, 4)?;
    Ok(Employee::new(
        &record[0],
        &record[1],
        &record[2],
        age,
        fte,
        &record[5],
    ))
}

fn parse_integer(record: &StringRecord, line: u64, index: usize) -> Result<u32, RowError> {
    let raw = &record[index];
    raw.parse::<u32>().map_err(|_| RowError::InvalidInteger {
        line,
        column: index + 1,
        value: raw.to_string(),
    })
}

fn parse_fte(record: &StringRecord, line: u64, index: usize) -> Result<f64, RowError> {
    let raw = &record[index];
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RowError::InvalidNumber {
            line,
            column: index + 1,
            value: raw.to_string(),
        })?;
    if value <= 0.0 {
        return Err(RowError::NonPositiveFte {
            line,
            column: index + 1,
            value: raw.to_string(),
        });
    }
    Ok(value)
}
