//! Text and JSON rendering of scan and resolution results.
//!
//! The JSON schema is stable for scripting: `{ root, mode, algorithm,
//! groups: [{ fingerprint, files }], summary }`, with a `resolution` block
//! added after a clean run.

use std::io::{self, Write};
use std::path::Path;

use bytesize::ByteSize;
use serde::Serialize;

use crate::resolver::ResolveSummary;
use crate::scanner::{DuplicateMap, HashAlgorithm, ScanMode, ScanSummary};

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Serialize)]
struct JsonGroup<'a> {
    fingerprint: &'a str,
    files: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    files_hashed: usize,
    files_skipped: usize,
    groups: usize,
    duplicate_files: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: String,
    mode: &'static str,
    algorithm: HashAlgorithm,
    groups: Vec<JsonGroup<'a>>,
    summary: JsonSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<&'a ResolveSummary>,
}

/// Everything a report needs about one run.
pub struct Report<'a> {
    /// Scan root, echoed back in the report.
    pub root: &'a Path,
    /// Fingerprinting mode used.
    pub mode: ScanMode,
    /// Digest used.
    pub algorithm: HashAlgorithm,
    /// The duplicate groups found.
    pub groups: &'a DuplicateMap,
    /// Scan totals.
    pub scan: ScanSummary,
    /// Resolution totals, when a resolve pass ran.
    pub resolution: Option<&'a ResolveSummary>,
}

impl Report<'_> {
    /// Write the report to `out` in the requested format.
    pub fn write(&self, out: &mut impl Write, format: OutputFormat) -> io::Result<()> {
        match format {
            OutputFormat::Text => self.write_text(out),
            OutputFormat::Json => self.write_json(out),
        }
    }

    fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        if self.groups.is_empty() {
            writeln!(out, "No duplicates found under {}", self.root.display())?;
            return Ok(());
        }

        for (fingerprint, files) in self.groups {
            let short = &fingerprint[..fingerprint.len().min(12)];
            writeln!(out, "[{short}] {} files:", files.len())?;
            for path in files {
                let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                writeln!(out, "  {} ({})", path.display(), ByteSize(size))?;
            }
        }

        let duplicate_files: usize = self.groups.values().map(|g| g.len() - 1).sum();
        writeln!(
            out,
            "\n{} group(s), {} duplicate file(s), {} file(s) scanned, {} skipped",
            self.groups.len(),
            duplicate_files,
            self.scan.files_hashed,
            self.scan.files_skipped
        )?;

        if let Some(res) = self.resolution {
            writeln!(
                out,
                "Resolved {} file(s) ({}), {} failure(s)",
                res.processed,
                ByteSize(res.bytes_reclaimed),
                res.failures
            )?;
        }
        Ok(())
    }

    fn write_json(&self, out: &mut impl Write) -> io::Result<()> {
        let groups: Vec<JsonGroup> = self
            .groups
            .iter()
            .map(|(fp, files)| JsonGroup {
                fingerprint: fp,
                files: files.iter().map(|p| p.display().to_string()).collect(),
            })
            .collect();

        let report = JsonReport {
            root: self.root.display().to_string(),
            mode: match self.mode {
                ScanMode::Raw => "raw",
                ScanMode::Source => "source",
            },
            algorithm: self.algorithm,
            summary: JsonSummary {
                files_hashed: self.scan.files_hashed,
                files_skipped: self.scan.files_skipped,
                groups: groups.len(),
                duplicate_files: self.groups.values().map(|g| g.len() - 1).sum(),
            },
            groups,
            resolution: self.resolution,
        };

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writeln!(out, "{json}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use std::path::PathBuf;

    fn sample_groups() -> DuplicateMap {
        let mut groups = IndexMap::new();
        groups.insert(
            "abcdef0123456789".to_string(),
            vec![PathBuf::from("/t/a.txt"), PathBuf::from("/t/b.txt")],
        );
        groups
    }

    #[test]
    fn test_json_report_schema() {
        let groups = sample_groups();
        let report = Report {
            root: Path::new("/t"),
            mode: ScanMode::Raw,
            algorithm: HashAlgorithm::Blake3,
            groups: &groups,
            scan: ScanSummary {
                files_hashed: 3,
                files_skipped: 0,
                groups: 1,
            },
            resolution: None,
        };

        let mut buf = Vec::new();
        report.write(&mut buf, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["mode"], "raw");
        assert_eq!(value["algorithm"], "blake3");
        assert_eq!(value["summary"]["groups"], 1);
        assert_eq!(value["summary"]["duplicate_files"], 1);
        assert_eq!(value["groups"][0]["files"].as_array().unwrap().len(), 2);
        assert!(value.get("resolution").is_none());
    }

    #[test]
    fn test_text_report_empty() {
        let groups = DuplicateMap::new();
        let report = Report {
            root: Path::new("/t"),
            mode: ScanMode::Raw,
            algorithm: HashAlgorithm::Blake3,
            groups: &groups,
            scan: ScanSummary::default(),
            resolution: None,
        };

        let mut buf = Vec::new();
        report.write(&mut buf, OutputFormat::Text).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("No duplicates found"));
    }
}
