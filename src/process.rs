// src/process.rs

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::{fs::File, io::Read, path::Path};
use tracing::info;

/// Number of fields a well-formed row carries: year, city code, age,
/// zip code, person count.
pub const RECORD_FIELDS: usize = 5;

/// One row of the population dataset. All fields stay untyped text; no
/// numeric conversion is performed anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub year: String,
    pub city: String,
    pub age: String,
    pub zip_code: String,
    pub persons: String,
}

impl Record {
    /// Build a `Record` from a raw CSV record.
    ///
    /// A row with fewer than five fields is malformed and fails; fields
    /// beyond the fifth are ignored.
    pub fn from_csv_record(record: &StringRecord) -> Result<Self> {
        if record.len() < RECORD_FIELDS {
            bail!(
                "malformed row: expected {} fields, got {}",
                RECORD_FIELDS,
                record.len()
            );
        }
        Ok(Record {
            year: record[0].to_string(),
            city: record[1].to_string(),
            age: record[2].to_string(),
            zip_code: record[3].to_string(),
            persons: record[4].to_string(),
        })
    }
}

/// Read records from any CSV source, in row order.
///
/// `has_header` skips the first row. The reader is flexible so that rows
/// with the wrong field count reach our own validation instead of dying
/// inside the CSV layer with a length mismatch against the first row.
pub fn load_records_from_reader<R: Read>(reader: R, has_header: bool) -> Result<Vec<Record>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let raw = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        let record =
            Record::from_csv_record(&raw).with_context(|| format!("at record {}", idx))?;
        records.push(record);
    }
    Ok(records)
}

/// Load every record from a CSV file on disk.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_records<P: AsRef<Path>>(path: P, has_header: bool) -> Result<Vec<Record>> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("failed to open CSV file {}", path.as_ref().display()))?;
    let records = load_records_from_reader(file, has_header)?;
    info!(rows = records.len(), "loaded records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,kkdata::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn parses_five_field_rows() -> Result<()> {
        let csv = "1992,101,0,1000,5\n1992,101,0,1001,8\n";
        let records = load_records_from_reader(Cursor::new(csv), false)?;

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            Record {
                year: "1992".into(),
                city: "101".into(),
                age: "0".into(),
                zip_code: "1000".into(),
                persons: "5".into(),
            }
        );
        assert_eq!(records[1].zip_code, "1001");
        Ok(())
    }

    #[test]
    fn short_row_is_a_structural_error() {
        let csv = "1992,101,0,1000,5\n1992,101,0,1000\n";
        let err = load_records_from_reader(Cursor::new(csv), false).unwrap_err();

        let msg = format!("{:#}", err);
        assert!(msg.contains("at record 1"), "unexpected error: {msg}");
        assert!(
            msg.contains("expected 5 fields, got 4"),
            "unexpected error: {msg}"
        );
    }

    #[test]
    fn extra_fields_are_ignored() -> Result<()> {
        let csv = "1992,101,0,1000,5,EXTRA\n";
        let records = load_records_from_reader(Cursor::new(csv), false)?;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].persons, "5");
        Ok(())
    }

    #[test]
    fn header_row_is_skipped_on_request() -> Result<()> {
        let csv = "AAR,BYDEL,ALDER,STATKODE,PERSONER\n1992,101,0,1000,5\n";
        let records = load_records_from_reader(Cursor::new(csv), true)?;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, "1992");
        Ok(())
    }

    #[test]
    fn header_row_is_data_when_not_requested() -> Result<()> {
        let csv = "AAR,BYDEL,ALDER,STATKODE,PERSONER\n1992,101,0,1000,5\n";
        let records = load_records_from_reader(Cursor::new(csv), false)?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year, "AAR");
        Ok(())
    }

    #[test]
    fn empty_input_yields_no_records() -> Result<()> {
        let records = load_records_from_reader(Cursor::new(""), false)?;
        assert!(records.is_empty());
        Ok(())
    }

    #[test]
    fn loads_records_from_a_file() -> Result<()> {
        init_test_logging();
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"1992,101,0,1000,5\n1993,101,0,1000,6\n")?;

        let records = load_records(tmp.path(), false)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].year, "1993");
        Ok(())
    }
}
