use crate::error::{ChartError, Result};
use crate::record::ThreatRecord;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

const COUNTRY_HEADER: &str = "country";
const YEAR_HEADER: &str = "year";
const DATE_HEADER: &str = "discovery_date";
const SEVERITY_HEADER: &str = "severity";
const RISK_LEVEL_HEADER: &str = "risk_level";

/// Where the year of a row comes from
#[derive(Debug, Clone, Copy)]
enum YearColumn {
    Year(usize),
    Date(usize),
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    country: usize,
    year: YearColumn,
    severity: usize,
}

/// Reads task records from a `.csv` or `.json` file
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<ThreatRecord>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => read_records_from_reader(std::fs::File::open(path)?),
        Some("json") => read_records_json_from_reader(std::fs::File::open(path)?),
        _ => Err(ChartError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Read CSV records.
/// - `country` column is required
/// - year: `year`, or the year of `discovery_date`
/// - severity: `severity` or `risk_level`
/// - other columns (`task_name`, `source`, ...) are ignored
/// - unparseable cells give a record with the field missing
pub fn read_records_from_reader<R: Read>(reader: R) -> Result<Vec<ThreatRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = resolve_columns(rdr.headers()?)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        if rec.iter().all(|f| f.is_empty()) {
            continue;
        }
        let parsed = parse_record(&rec, columns);
        if parsed.year.is_none() || parsed.severity.is_none() || parsed.country.is_none() {
            log::debug!("row {} has unreadable cells: {:?}", i + 2, rec);
        }
        records.push(parsed);
    }
    Ok(records)
}

fn resolve_columns(headers: &StringRecord) -> Result<Columns> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let country = find(COUNTRY_HEADER).ok_or_else(|| {
        ChartError::CsvHeader(format!("Missing '{}' column", COUNTRY_HEADER))
    })?;
    let year = find(YEAR_HEADER)
        .map(YearColumn::Year)
        .or_else(|| find(DATE_HEADER).map(YearColumn::Date))
        .ok_or_else(|| {
            ChartError::CsvHeader(format!(
                "Missing '{}' or '{}' column",
                YEAR_HEADER, DATE_HEADER
            ))
        })?;
    let severity = find(SEVERITY_HEADER)
        .or_else(|| find(RISK_LEVEL_HEADER))
        .ok_or_else(|| {
            ChartError::CsvHeader(format!(
                "Missing '{}' or '{}' column",
                SEVERITY_HEADER, RISK_LEVEL_HEADER
            ))
        })?;

    Ok(Columns {
        country,
        year,
        severity,
    })
}

fn parse_record(rec: &StringRecord, columns: Columns) -> ThreatRecord {
    let cell = |i: usize| rec.get(i).map(str::trim).filter(|s| !s.is_empty());

    let country = cell(columns.country).map(str::to_string);
    let year = match columns.year {
        YearColumn::Year(i) => cell(i).and_then(|s| s.parse().ok()),
        YearColumn::Date(i) => cell(i).and_then(year_from_date),
    };
    let severity = cell(columns.severity).and_then(|s| s.parse().ok());

    ThreatRecord {
        country,
        year,
        severity,
    }
}

/// Year of a provider timestamp (`2024-12-08 00:00:00`, ISO 8601 or a bare date)
pub fn year_from_date(s: &str) -> Option<i32> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|dt| dt.year())
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.year()))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.year()))
        .ok()
}

/// JSON row as served by the task API
#[derive(Debug, Deserialize)]
struct JsonTaskRecord {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    year: Option<serde_json::Value>,
    #[serde(default)]
    discovery_date: Option<String>,
    #[serde(default)]
    severity: Option<serde_json::Value>,
    #[serde(default)]
    risk_level: Option<serde_json::Value>,
}

fn json_int(v: &serde_json::Value) -> Option<i64> {
    match v {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl From<JsonTaskRecord> for ThreatRecord {
    fn from(raw: JsonTaskRecord) -> Self {
        let year = raw
            .year
            .as_ref()
            .and_then(json_int)
            .and_then(|y| i32::try_from(y).ok())
            .or_else(|| raw.discovery_date.as_deref().and_then(year_from_date));
        let severity = raw
            .severity
            .as_ref()
            .or(raw.risk_level.as_ref())
            .and_then(json_int)
            .and_then(|s| u8::try_from(s).ok());
        ThreatRecord {
            country: raw.country.filter(|c| !c.trim().is_empty()),
            year,
            severity,
        }
    }
}

/// Reads a JSON array of task records
pub fn read_records_json_from_reader<R: Read>(reader: R) -> Result<Vec<ThreatRecord>> {
    let raw: Vec<JsonTaskRecord> = serde_json::from_reader(reader)?;
    Ok(raw.into_iter().map(ThreatRecord::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_export_format() {
        let data = "\
task_name,country,discovery_date,source,risk_level
test,China,2024-12-08 00:00:00,Provider B,5
test,USA,2023-01-15 12:30:00,Provider A,3
";
        let records = read_records_from_reader(data.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![
                ThreatRecord::new("China", 2024, 5),
                ThreatRecord::new("USA", 2023, 3)
            ]
        );
    }

    #[test]
    fn test_simple_format_case_insensitive_headers() {
        let data = "Country,Year,Severity\nIndia,2020,2\n\n";
        let records = read_records_from_reader(data.as_bytes()).unwrap();
        assert_eq!(records, vec![ThreatRecord::new("India", 2020, 2)]);
    }

    #[test]
    fn test_broken_cells_are_kept_as_missing() {
        let data = "country,year,severity\n,2020,2\nUSA,soon,3\nUSA,2020,high\n";
        let records = read_records_from_reader(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].country, None);
        assert_eq!(records[1].year, None);
        assert_eq!(records[2].severity, None);
    }

    #[test]
    fn test_missing_headers() {
        let no_country = "year,severity\n2020,1\n";
        assert!(matches!(
            read_records_from_reader(no_country.as_bytes()),
            Err(ChartError::CsvHeader(_))
        ));
        let no_year = "country,severity\nUSA,1\n";
        assert!(matches!(
            read_records_from_reader(no_year.as_bytes()),
            Err(ChartError::CsvHeader(_))
        ));
    }

    #[test]
    fn test_year_from_date() {
        assert_eq!(year_from_date("2024-12-08 00:00:00"), Some(2024));
        assert_eq!(year_from_date("2021-03-01T10:00:00"), Some(2021));
        assert_eq!(year_from_date("2022-06-30T08:00:00+02:00"), Some(2022));
        assert_eq!(year_from_date("2019-02-03"), Some(2019));
        assert_eq!(year_from_date("yesterday"), None);
    }

    #[test]
    fn test_json_records() {
        let data = r#"[
            {"task_name":"test","country":"China","discovery_date":"2024-12-08 00:00:00","source":"Provider B","risk_level":5},
            {"country":"USA","year":2020,"severity":"3"},
            {"country":"","year":2020,"severity":1},
            {"country":"India","year":2020,"severity":900}
        ]"#;
        let records = read_records_json_from_reader(data.as_bytes()).unwrap();
        assert_eq!(records[0], ThreatRecord::new("China", 2024, 5));
        assert_eq!(records[1], ThreatRecord::new("USA", 2020, 3));
        assert_eq!(records[2].country, None);
        assert_eq!(records[3].severity, None);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            read_records("tasks/report.xlsx"),
            Err(ChartError::UnsupportedFormat(_))
        ));
    }
}
