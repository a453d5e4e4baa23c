//! Writers for command results.

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

/// Open `path` for writing, or stdout when no path is given.
pub fn open(path: Option<&str>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("failed to create {}", p))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Write `rows` as CSV (header from the field names) or as a JSON array.
pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        Format::Json => write_json(writer, rows)?,
    }
    Ok(())
}

/// Write any serializable value as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        country: String,
        total_cases: u64,
        region: Option<String>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                country: "Testland".into(),
                total_cases: 200,
                region: Some("EURO".into()),
            },
            Row {
                country: "Otherland".into(),
                total_cases: 80,
                region: None,
            },
        ]
    }

    #[test]
    fn test_write_csv() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &rows(), Format::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "country,total_cases,region\nTestland,200,EURO\nOtherland,80,\n"
        );
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_rows(&mut buf, &rows(), Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["country"], "Testland");
        assert!(value[1]["region"].is_null());
    }

    #[test]
    fn test_write_csv_empty() {
        let mut buf = Vec::new();
        write_rows::<_, Row>(&mut buf, &[], Format::Csv).unwrap();
        assert!(buf.is_empty());
    }
}
