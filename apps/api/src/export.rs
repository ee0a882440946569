//! Record export: candidate records to a spreadsheet-compatible CSV table and back.

use csv::Writer;
use thiserror::Error;

use crate::models::candidate::{CandidateRecord, COLUMNS};

/// Filename offered to the browser for the exported table.
pub const EXPORT_FILENAME: &str = "resume_data.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV output: {0}")]
    Flush(String),

    #[cfg(test)]
    #[error("Unexpected table header: {0}")]
    Header(String),
}

/// One header row, then one row per record in input order.
/// Absent values are written as empty cells.
pub fn to_table(records: &[CandidateRecord]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.write_record(record.cells())?;
    }
    wtr.into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))
}

/// Parses a table written by `to_table`. Empty cells become `None`.
#[cfg(test)]
pub fn read_table(bytes: &[u8]) -> Result<Vec<CandidateRecord>, ExportError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let headers = rdr.headers()?.clone();
    if headers.len() != COLUMNS.len() || headers.iter().zip(COLUMNS).any(|(h, c)| h != c) {
        return Err(ExportError::Header(headers.iter().collect::<Vec<_>>().join(",")));
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let cell = |i: usize| row.get(i).unwrap_or("");
        records.push(CandidateRecord::from_cells([
            cell(0),
            cell(1),
            cell(2),
            cell(3),
            cell(4),
            cell(5),
            cell(6),
            cell(7),
        ]));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> CandidateRecord {
        CandidateRecord {
            name: Some("Jane Doe".to_string()),
            email: Some("jane.doe@example.com".to_string()),
            phone: Some("(415) 555-0199".to_string()),
            education: Some("B.Tech, MBA".to_string()),
            skills: Some("Python, SQL".to_string()),
            experience: Some("3 years experience".to_string()),
            position: Some("Software Engineer".to_string()),
            source_filename: "jane.pdf".to_string(),
        }
    }

    #[test]
    fn test_header_and_one_row_per_record() {
        let table = to_table(&[jane(), CandidateRecord::empty("blank.docx")]).unwrap();
        let text = String::from_utf8(table).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Name,Email,Phone,Education,Skills,Experience,Position,Filename");
        assert_eq!(lines[2], ",,,,,,,blank.docx");
    }

    #[test]
    fn test_absent_values_are_never_written_as_none() {
        let table = to_table(&[CandidateRecord::empty("x.pdf")]).unwrap();
        let text = String::from_utf8(table).unwrap();
        assert!(!text.contains("None"));
        assert!(!text.contains("null"));
    }

    #[test]
    fn test_comma_values_are_quoted_and_read_back() {
        let records = vec![jane(), CandidateRecord::empty("blank.docx"), jane()];
        let table = to_table(&records).unwrap();
        assert!(String::from_utf8_lossy(&table).contains("\"Python, SQL\""));
        assert_eq!(read_table(&table).unwrap(), records);
    }

    #[test]
    fn test_empty_batch_is_header_only() {
        let table = to_table(&[]).unwrap();
        assert!(read_table(&table).unwrap().is_empty());
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let err = read_table(b"Filename,Summary\nx.pdf,hi\n").unwrap_err();
        assert!(matches!(err, ExportError::Header(_)));
    }
}
