use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::parser::record::Record;

/// Stable sort by end date; polls ending the same day keep input order.
pub fn sort_by_end_date(records: &mut [Record]) {
    records.sort_by_key(|r| r.end_date);
}

/// Write records as CSV with a header row.
pub fn write_csv<W: Write>(out: W, records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, records: &[Record]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(file, records).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;
    use chrono::NaiveDate;

    fn record(end: (i32, u32, u32), name: &str) -> Record {
        let end = NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap();
        Record {
            start_date: end,
            end_date: end,
            pollster_link: String::new(),
            pollster_name: name.into(),
            client: "N/A".into(),
            sample_size: 1000,
            rejoin: 0.5,
            stay_out: 0.4,
            neither: 0.1,
        }
    }

    #[test]
    fn sorts_stably_by_end_date() {
        let mut records = vec![
            record((2024, 3, 1), "b"),
            record((2023, 1, 1), "a"),
            record((2024, 3, 1), "c"),
            record((2024, 1, 1), "d"),
        ];
        sort_by_end_date(&mut records);
        let names: Vec<&str> = records.iter().map(|r| r.pollster_name.as_str()).collect();
        assert_eq!(names, vec!["a", "d", "b", "c"]);
    }

    #[test]
    fn csv_layout() {
        let text = std::fs::read_to_string("tests/fixtures/2024.txt").unwrap();
        let records = parse_table(&text).unwrap();
        let mut buf = Vec::new();
        write_csv(&mut buf, &records[..2]).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "start_date,end_date,pollster_link,pollster_name,client,sample_size,rejoin,stay_out,neither"
        );
        assert!(lines[1].starts_with("2024-01-02,2024-01-03,https://yougov.co.uk/"));
        assert!(lines[1].ends_with(",YouGov,N/A,2016,0.51,0.36,0.13"));
        assert_eq!(lines[2], "2023-12-29,2024-01-03,,Omnisis,N/A,1250,0.55,0.39,0.06");
    }

    #[test]
    fn quotes_fields_with_commas() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[record((2024, 1, 1), "Ipsos, MORI")]).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.contains("\"Ipsos, MORI\""));
    }
}
