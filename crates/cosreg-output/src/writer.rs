//! Run artifacts and their manifest.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use cosreg_core::{ParseReport, TableStore};
use cosreg_model::{Jurisdiction, MasterView, Statistics, TableCollection, TableType};
use cosreg_validate::ValidationReport;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::atomic::write_atomic;
use crate::error::OutputError;
use crate::hash::sha256_hex;

pub const MASTER_VIEW_FILE: &str = "master_view.json";
pub const STATISTICS_FILE: &str = "statistics.json";
pub const VALIDATION_REPORT_FILE: &str = "validation_report.json";
pub const PARSE_REPORT_FILE: &str = "parse_report.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const PARSED_DIR: &str = "parsed";

/// One written file, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub sha256: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub artifacts: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn entry(&self, path: &str) -> Option<&ManifestEntry> {
        self.artifacts.iter().find(|e| e.path == path)
    }
}

/// Relative path of a per-table collection, optionally versioned.
pub fn table_artifact_path(
    jurisdiction: Jurisdiction,
    table_type: TableType,
    version: Option<&str>,
) -> String {
    match version {
        Some(version) => format!(
            "{PARSED_DIR}/{}/{}_{}.json",
            jurisdiction.as_str(),
            table_type.file_stem(),
            sanitize_version(version)
        ),
        None => format!(
            "{PARSED_DIR}/{}/{}.json",
            jurisdiction.as_str(),
            table_type.file_stem()
        ),
    }
}

fn sanitize_version(version: &str) -> String {
    version
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect()
}

/// Writes every artifact of one run under a root directory, each through a
/// temporary sibling, and records their digests.
#[derive(Debug)]
pub struct ArtifactWriter {
    root: PathBuf,
    version: String,
    generated_at: DateTime<Utc>,
    written: Vec<ManifestEntry>,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>, version: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            root: root.into(),
            version: version.into(),
            generated_at,
            written: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Serializes `value` as pretty JSON to `relative`.
    pub fn write_json<T: Serialize>(&mut self, relative: &str, value: &T) -> Result<&ManifestEntry, OutputError> {
        let path = self.root.join(relative);
        let mut bytes =
            serde_json::to_vec_pretty(value).map_err(|source| OutputError::Serialize {
                path: path.clone(),
                source,
            })?;
        bytes.push(b'\n');
        write_atomic(&path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "artifact written");

        let entry = ManifestEntry {
            path: relative.to_string(),
            sha256: sha256_hex(&bytes),
            bytes: bytes.len(),
        };
        self.written.retain(|e| e.path != entry.path);
        self.written.push(entry);
        Ok(&self.written[self.written.len() - 1])
    }

    /// Writes the six collections of each listed jurisdiction, plus a
    /// versioned copy of each. Jurisdictions not listed keep whatever files
    /// a previous run left.
    pub fn write_table_collections(
        &mut self,
        store: &TableStore,
        jurisdictions: &[Jurisdiction],
    ) -> Result<usize, OutputError> {
        let mut count = 0;
        for &jurisdiction in jurisdictions {
            for table_type in TableType::ALL {
                let collection = TableCollection::new(
                    jurisdiction,
                    table_type,
                    self.version.clone(),
                    self.generated_at,
                    store.table(jurisdiction, table_type).to_vec(),
                );
                let version = self.version.clone();
                self.write_json(&table_artifact_path(jurisdiction, table_type, None), &collection)?;
                self.write_json(
                    &table_artifact_path(jurisdiction, table_type, Some(&version)),
                    &collection,
                )?;
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn write_master_view(&mut self, view: &MasterView) -> Result<(), OutputError> {
        self.write_json(MASTER_VIEW_FILE, view).map(|_| ())
    }

    pub fn write_statistics(&mut self, statistics: &Statistics) -> Result<(), OutputError> {
        self.write_json(STATISTICS_FILE, statistics).map(|_| ())
    }

    pub fn write_validation_report(&mut self, report: &ValidationReport) -> Result<(), OutputError> {
        self.write_json(VALIDATION_REPORT_FILE, report).map(|_| ())
    }

    pub fn write_parse_report(&mut self, report: &ParseReport) -> Result<(), OutputError> {
        self.write_json(PARSE_REPORT_FILE, report).map(|_| ())
    }

    /// Writes `manifest.json` listing every artifact written so far, sorted
    /// by path.
    pub fn finish(mut self) -> Result<Manifest, OutputError> {
        self.written.sort_by(|a, b| a.path.cmp(&b.path));
        let manifest = Manifest {
            generated_at: self.generated_at,
            version: self.version.clone(),
            artifacts: std::mem::take(&mut self.written),
        };
        self.write_json(MANIFEST_FILE, &manifest)?;
        info!(
            root = %self.root.display(),
            artifacts = manifest.artifacts.len(),
            version = %manifest.version,
            "artifacts written"
        );
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_artifact_paths() {
        assert_eq!(
            table_artifact_path(Jurisdiction::Jp, TableType::UvFilter, None),
            "parsed/JP/uv_filters.json"
        );
        assert_eq!(
            table_artifact_path(Jurisdiction::Eu, TableType::Preservative, Some("2025/01 rev")),
            "parsed/EU/preservatives_2025_01_rev.json"
        );
    }
}
