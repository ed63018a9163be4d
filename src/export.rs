use crate::placement::Roster;
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const HEADER: [&str; 5] = ["Location", "Employee", "FTE", "Preference 1", "Preference 2"];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write assignment file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode assignment CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes one row per placed employee: 1-based location ordinal, name, FTE
/// and both preferences, in location then slot order. Every field is quoted.
pub fn write_assignments<W: Write>(writer: W, roster: &Roster) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for (index, location) in roster.locations().iter().enumerate() {
        let ordinal = (index + 1).to_string();
        for employee in location.employees() {
            csv_writer.write_record([
                ordinal.as_str(),
                employee.name.as_str(),
                format_fte(employee.fte).as_str(),
                employee.pref1.as_str(),
                employee.pref2.as_str(),
            ])?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes `employees-per-location.<epoch millis>.csv` under `dir`, creating
/// the directory when needed, and returns the file path.
pub fn write_assignments_to_dir<P: AsRef<Path>>(
    dir: P,
    roster: &Roster,
) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "employees-per-location.{}.csv",
        Utc::now().timestamp_millis()
    ));
    info!(path = %path.display(), "writing assignment file");
    let file = std::fs::File::create(&path)?;
    write_assignments(std::io::BufWriter::new(file), roster)?;
    Ok(path)
}

/// Whole numbers keep one decimal place (`1.0`), everything else prints in
/// shortest form (`0.4`).
pub fn format_fte(fte: f64) -> String {
    if fte.is_finite() && fte.fract() == 0.0 {
        format!("{fte:.1}")
    } else {
        fte.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{Employee, Location};

    #[test]
    fn fte_formatting_keeps_a_decimal_place() {
        assert_eq!(format_fte(1.0), "1.0");
        assert_eq!(format_fte(0.4), "0.4");
        assert_eq!(format_fte(0.75), "0.75");
    }

    #[test]
    fn writes_rows_in_location_order_with_ordinals() {
        let roster = Roster::from_partition(vec![
            Location::with_employees(
                "North",
                vec![Employee::new("Ada", "North", "South", 41, 1.0, "Nurse")],
            ),
            Location::new("East"),
            Location::with_employees(
                "South",
                vec![
                    Employee::new("Bo", "South", "North", 29, 0.4, "Nurse"),
                    Employee::new("Cy", "East", "South", 35, 0.6, "Porter"),
                ],
            ),
        ]);

        let mut buffer = Vec::new();
        write_assignments(&mut buffer, &roster).expect("write succeeds");
        let output = String::from_utf8(buffer).expect("utf8 output");

        assert_eq!(
            output,
            "\"Location\",\"Employee\",\"FTE\",\"Preference 1\",\"Preference 2\"\n\
\"1\",\"Ada\",\"1.0\",\"North\",\"South\"\n\
\"3\",\"Bo\",\"0.4\",\"South\",\"North\"\n\
\"3\",\"Cy\",\"0.6\",\"East\",\"South\"\n"
        );
    }

    #[test]
    fn writes_timestamped_file_into_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let roster = Roster::from_partition(vec![Location::with_employees(
            "North",
            vec![Employee::new("Ada", "North", "South", 41, 0.5, "Nurse")],
        )]);

        let path = write_assignments_to_dir(dir.path().join("out"), &roster).expect("written");
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .expect("file name");
        assert!(file_name.starts_with("employees-per-location."));
        assert!(file_name.ends_with(".csv"));
        let contents = std::fs::read_to_string(&path).expect("readable");
        assert_eq!(contents.lines().count(), 2);
    }
}
