// 📂 Loader - CSV/JSON files → SourceRows → merged CanonicalRecords
// File-level problems (missing file, broken CSV) are errors with context.
// Row-level oddities (short rows, odd values) are the normalizer's job.

use crate::config::AppConfig;
use crate::merger::merge;
use crate::normalizer::{normalize_source, SourceId};
use crate::record::{row_from_json, CanonicalRecord, SourceRow};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

// ============================================================================
// CSV READING
// ============================================================================

/// Read every data row of a CSV stream as column name → value
///
/// Rows shorter than the header simply lack the trailing columns.
pub fn read_rows_from_reader<R: Read>(reader: R) -> Result<Vec<SourceRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();

    let mut rows = Vec::new();
    for (line_num, result) in reader.records().enumerate() {
        let record = result.with_context(|| {
            // +2: 1-indexed plus header row
            format!("Failed to parse CSV line {}", line_num + 2)
        })?;

        let row: SourceRow = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

// ============================================================================
// JSON READING
// ============================================================================

/// Read a JSON array of row objects
///
/// Scalar cells are stringified; anything that is not an object becomes an
/// empty row, which the normalizer turns into an all-empty record.
pub fn read_json_rows_from_reader<R: Read>(reader: R) -> Result<Vec<SourceRow>> {
    let json: Value = serde_json::from_reader(reader).context("Failed to parse JSON")?;
    let items = json
        .as_array()
        .context("Expected a JSON array of row objects")?;

    Ok(items.iter().map(row_from_json).collect())
}

/// Read a source file from disk; `.json` files are JSON arrays, anything else CSV
pub fn read_rows(path: &Path) -> Result<Vec<SourceRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let rows = if is_json {
        read_json_rows_from_reader(BufReader::new(file))
    } else {
        read_rows_from_reader(file)
    };
    rows.with_context(|| format!("Failed to read {}", path.display()))
}

// ============================================================================
// LOAD REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SourceLoadStat {
    pub source: SourceId,
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub loaded_at: DateTime<Utc>,
    pub sources: Vec<SourceLoadStat>,
}

impl LoadReport {
    pub fn total_rows(&self) -> usize {
        self.sources.iter().map(|s| s.rows).sum()
    }
}

/// Merged records plus what went into them
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub records: Vec<CanonicalRecord>,
    pub report: LoadReport,
}

// ============================================================================
// LOADING
// ============================================================================

/// Read, normalize and merge every configured source, in config order
pub fn load_sources(config: &AppConfig) -> Result<LoadedData> {
    let mut normalized = Vec::with_capacity(config.sources.len());
    let mut stats = Vec::with_capacity(config.sources.len());

    for source in &config.sources {
        let rows = read_rows(&source.path)?;
        let profile = config.profile_for(source.source);
        let records = normalize_source(&profile, rows);

        log::info!(
            "📥 {} ({}): {} rows from {}",
            source.source.name(),
            source.source.code(),
            records.len(),
            source.path.display()
        );

        stats.push(SourceLoadStat {
            source: source.source,
            path: source.path.clone(),
            rows: records.len(),
        });
        normalized.push(records);
    }

    let records = merge(normalized);
    let report = LoadReport {
        loaded_at: Utc::now(),
        sources: stats,
    };

    log::info!("✓ Merged {} records from {} sources", records.len(), report.sources.len());

    Ok(LoadedData { records, report })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use std::fs;

    const NS_CSV: &str = "\
lastName,firstName,Town,party,specificCampaign,Amount,Year
MacDonald,Anne,Truro,PC,Colchester North,$250.00,2019
Smith,John, Halifax ,NSNDP,Halifax Chebucto,\"$1,000.00\",2020
";

    const EC_CSV: &str = "\
lastName,firstName,postalCode,city,party,specificCampaign,Date_received,Monetary
Smith,Jane,B3H 2Y9,Halifax,Conservative Party of Canada,Halifax association,2021-08-30,$75.00
Short,Row
";

    #[test]
    fn test_read_rows_from_reader() {
        let rows = read_rows_from_reader(NS_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Town"], "Truro");
        // Trimmed, quoted thousands separator kept intact
        assert_eq!(rows[1]["Town"], "Halifax");
        assert_eq!(rows[1]["Amount"], "$1,000.00");
    }

    #[test]
    fn test_short_rows_lack_trailing_columns() {
        let rows = read_rows_from_reader(EC_CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["lastName"], "Short");
        assert!(!rows[1].contains_key("Monetary"));
    }

    const NS_JSON: &str = r#"[
        {"lastName": "MacDonald", "firstName": "Anne", "Town": "Truro", "party": "PC", "Amount": 250, "Year": 2019},
        {"lastName": "Smith", "Town": null, "party": "NSNDP", "Amount": "$1,000.00"},
        "not a row"
    ]"#;

    #[test]
    fn test_read_json_rows_from_reader() {
        let rows = read_json_rows_from_reader(NS_JSON.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["Amount"], "250");
        assert_eq!(rows[0]["Year"], "2019");
        assert_eq!(rows[1]["Town"], "");
        assert!(!rows[1].contains_key("firstName"));
        assert!(rows[2].is_empty());
    }

    #[test]
    fn test_json_must_be_an_array() {
        assert!(read_json_rows_from_reader(r#"{"lastName": "Smith"}"#.as_bytes()).is_err());
        assert!(read_json_rows_from_reader("[{".as_bytes()).is_err());
    }

    #[test]
    fn test_read_rows_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("ns.JSON");
        fs::write(&json_path, NS_JSON).unwrap();

        let rows = read_rows(&json_path).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["Town"], "Truro");

        let records = normalize_source(&SourceId::NovaScotia.profile(), rows);
        assert_eq!(records[0].donation, "250");
        assert_eq!(records[1].city, "");
        assert_eq!(records[2], CanonicalRecord::default());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = read_rows(Path::new("/nonexistent/donations.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }

    #[test]
    fn test_load_sources_merges_in_config_order() {
        let dir = tempfile::tempdir().unwrap();
        let ns_path = dir.path().join("ns.csv");
        let ec_path = dir.path().join("ec.csv");
        fs::write(&ns_path, NS_CSV).unwrap();
        fs::write(&ec_path, EC_CSV).unwrap();

        let config = AppConfig {
            sources: vec![
                SourceConfig {
                    source: SourceId::ElectionsCanada,
                    path: ec_path,
                },
                SourceConfig {
                    source: SourceId::NovaScotia,
                    path: ns_path,
                },
            ],
            ..AppConfig::default()
        };

        let loaded = load_sources(&config).unwrap();
        assert_eq!(loaded.records.len(), 4);
        assert_eq!(loaded.report.total_rows(), 4);
        assert_eq!(loaded.report.sources[0].source, SourceId::ElectionsCanada);

        // Federal rows first, with party rewritten
        assert_eq!(loaded.records[0].party, "CPC");
        assert_eq!(loaded.records[0].donation, "$75.00");
        // Short row still has every field
        assert_eq!(loaded.records[1].donation, "");
        // Provincial rows after, renamed columns
        assert_eq!(loaded.records[2].city, "Truro");
        assert_eq!(loaded.records[3].date, "2020");
        assert_eq!(loaded.records[3].postal_code, "");
    }

    #[test]
    fn test_load_sources_fails_on_missing_source() {
        let config = AppConfig {
            sources: vec![SourceConfig {
                source: SourceId::NovaScotia,
                path: PathBuf::from("/nonexistent/ns.csv"),
            }],
            ..AppConfig::default()
        };
        assert!(load_sources(&config).is_err());
    }
}
