use crate::catalog::REQUIRED_COLUMNS;
use crate::types::{RawRow, ValidRow};
use crate::util::parse_polarity;
use csv::ReaderBuilder;
use log::debug;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Everything that can go wrong between a file path and a usable row set.
/// All three variants surface to the user as a single message.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read the file as CSV: {0}")]
    Parse(#[from] csv::Error),
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("no usable rows: every row is missing a region or has a polarity outside 1-5")]
    EmptyDataset,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub dropped_rows: usize,
}

/// Load the CSV and keep the rows usable for aggregation.
///
/// The header set is checked once against [`REQUIRED_COLUMNS`]; any absent
/// column fails the whole load. Individual rows are then kept iff the region
/// is non-empty and the polarity parses as an integer in 1..=5. Rows failing
/// either predicate are dropped and counted, not reported individually.
pub fn load_and_validate(path: &Path) -> Result<(Vec<ValidRow>, LoadReport), IngestError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = rdr.headers()?.clone();
    let present: HashSet<&str> = headers.iter().collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.contains(**col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns { missing });
    }

    let mut total_rows = 0usize;
    let mut rows: Vec<ValidRow> = Vec::new();
    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let raw = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("skipping undecodable row {}: {}", total_rows, e);
                continue;
            }
        };

        let region = match raw.region.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => continue,
        };
        let polarity = match parse_polarity(raw.polarity.as_deref()) {
            Some(p) => p,
            None => continue,
        };
        let establishment_type = raw
            .establishment_type
            .unwrap_or_else(|| "Unspecified".to_string())
            .trim()
            .to_string();

        rows.push(ValidRow {
            region,
            establishment_type,
            polarity,
        });
    }

    if rows.is_empty() {
        return Err(IngestError::EmptyDataset);
    }

    let report = LoadReport {
        total_rows,
        valid_rows: rows.len(),
        dropped_rows: total_rows - rows.len(),
    };
    debug!(
        "loaded {} rows, kept {}, dropped {}",
        report.total_rows, report.valid_rows, report.dropped_rows
    );
    Ok((rows, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn keeps_a_valid_row() {
        let f = csv_file(
            "Title,Review,Polarity,Town,Region,Type\n\
             A,good,5,T,Jalisco,hotel\n",
        );
        let (rows, report) = load_and_validate(f.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region, "Jalisco");
        assert_eq!(rows[0].polarity, 5);
        assert_eq!(rows[0].establishment_type, "hotel");
        assert_eq!(report.total_rows, 1);
        assert_eq!(report.dropped_rows, 0);
    }

    #[test]
    fn missing_column_fails_whole_load() {
        let f = csv_file(
            "Title,Polarity,Town,Region,Type\n\
             A,5,T,Jalisco,hotel\n",
        );
        match load_and_validate(f.path()) {
            Err(IngestError::MissingColumns { missing }) => {
                assert_eq!(missing, vec!["Review".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_column_message_lists_names() {
        let f = csv_file("Title,Town,Region\nA,T,Jalisco\n");
        let err = load_and_validate(f.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Review"));
        assert!(msg.contains("Polarity"));
        assert!(msg.contains("Type"));
    }

    #[test]
    fn all_rows_out_of_range_is_empty_dataset() {
        let f = csv_file(
            "Title,Review,Polarity,Town,Region,Type\n\
             A,bad,0,T,Jalisco,hotel\n\
             B,bad,6,T,Oaxaca,hotel\n\
             C,bad,,T,Puebla,hotel\n",
        );
        assert!(matches!(
            load_and_validate(f.path()),
            Err(IngestError::EmptyDataset)
        ));
    }

    #[test]
    fn rows_without_region_are_dropped_silently() {
        let f = csv_file(
            "Title,Review,Polarity,Town,Region,Type\n\
             A,good,5,T,,hotel\n\
             B,good,4,T,Oaxaca,hotel\n",
        );
        let (rows, report) = load_and_validate(f.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region, "Oaxaca");
        assert_eq!(report.dropped_rows, 1);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let f = csv_file(
            "Title,Review,Polarity,Town,Region,Type,Extra\n\
             A,good,3,T,Jalisco,hotel,whatever\n",
        );
        let (rows, _) = load_and_validate(f.path()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn unreadable_file_is_a_parse_failure() {
        let path = Path::new("definitely/not/a/file.csv");
        assert!(matches!(
            load_and_validate(path),
            Err(IngestError::Parse(_))
        ));
    }
}
