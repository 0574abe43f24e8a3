use crate::ingest::{IngestError, RawTable};
use std::path::Path;
use tracing::info;

/// Read a CSV file into a [`RawTable`].
///
/// Short rows are padded and long rows truncated to the header width, so
/// ragged exports do not abort the load.
pub fn load_csv(path: &Path) -> Result<RawTable, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Read {
            path: path.display().to_string(),
            source,
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::Read {
            path: path.display().to_string(),
            source,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut row: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    info!(path = %path.display(), rows = rows.len(), "Loaded CSV");
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_reads_headers_and_rows() {
        let file = write_temp("date,service,cost\n2026-01-01,EC2,1.5\n");
        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.headers, vec!["date", "service", "cost"]);
        assert_eq!(table.rows, vec![vec!["2026-01-01", "EC2", "1.5"]]);
    }

    #[test]
    fn test_load_pads_short_rows() {
        let file = write_temp("date,service,cost\n2026-01-01,EC2\n");
        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.rows[0], vec!["2026-01-01", "EC2", ""]);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = load_csv(Path::new("/nonexistent/billing.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
    }
}
