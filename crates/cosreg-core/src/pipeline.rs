//! Parallel parsing of raw sources into the table store.
//!
//! Every (jurisdiction, table type) source is an independent job. Workers
//! pull jobs from a channel and push results back; aggregation happens on
//! the calling thread after all workers have joined.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use cosreg_map::{
    FieldMappingParser, MappingRegistry, ParseOutcome, ParseStats, RawDocument, RowDiagnostic,
    SourceReadError, TableMapping,
};
use chrono::{DateTime, Utc};
use cosreg_model::{Jurisdiction, TableType};
use crossbeam_channel::unbounded;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::store::TableStore;

/// Options controlling a full run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    /// Snapshot version label; defaults to the version declared by the
    /// sources or the run date.
    pub version: Option<String>,
    /// Abort the run when any source cannot be read.
    pub strict_sources: bool,
    pub workers: usize,
}

impl RunOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            version: None,
            strict_sources: false,
            workers: default_workers(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_strict_sources(mut self, strict: bool) -> Self {
        self.strict_sources = strict;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Where a job's raw document comes from.
#[derive(Debug, Clone)]
pub enum JobSource {
    Path(PathBuf),
    Document(RawDocument),
}

/// One (jurisdiction, table type) parse.
#[derive(Debug, Clone)]
pub struct ParseJob {
    pub jurisdiction: Jurisdiction,
    pub table_type: TableType,
    pub source: JobSource,
}

impl ParseJob {
    pub fn from_path(
        jurisdiction: Jurisdiction,
        table_type: TableType,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            jurisdiction,
            table_type,
            source: JobSource::Path(path.into()),
        }
    }

    pub fn from_document(
        jurisdiction: Jurisdiction,
        table_type: TableType,
        document: RawDocument,
    ) -> Self {
        Self {
            jurisdiction,
            table_type,
            source: JobSource::Document(document),
        }
    }

    fn execute(&self, registry: &MappingRegistry) -> Result<ParseOutcome, SourceReadError> {
        let loaded;
        let document = match &self.source {
            JobSource::Document(document) => document,
            JobSource::Path(path) => {
                loaded = RawDocument::from_path(path)?;
                &loaded
            }
        };
        match registry.get(self.jurisdiction) {
            Some(mapping) => FieldMappingParser::new(mapping).parse(document, self.table_type),
            None => {
                let default_mapping = TableMapping::default();
                cosreg_map::parse(document, self.jurisdiction, self.table_type, &default_mapping)
            }
        }
    }
}

/// Finds sources laid out as `<root>/<JUR>/<table_stem>.json|csv`.
///
/// The jurisdiction directory may be upper or lower case; JSON wins over
/// CSV when both exist.
pub fn discover_jobs(root: &Path, jurisdictions: &[Jurisdiction]) -> Vec<ParseJob> {
    let mut jobs = Vec::new();
    for &jurisdiction in jurisdictions {
        let Some(dir) = [
            jurisdiction.as_str().to_string(),
            jurisdiction.as_str().to_lowercase(),
        ]
        .into_iter()
        .map(|name| root.join(name))
        .find(|dir| dir.is_dir()) else {
            debug!(jurisdiction = %jurisdiction, "no source directory");
            continue;
        };

        for table_type in TableType::ALL {
            let found = ["json", "csv"]
                .into_iter()
                .map(|ext| dir.join(format!("{}.{ext}", table_type.file_stem())))
                .find(|path| path.is_file());
            if let Some(path) = found {
                jobs.push(ParseJob::from_path(jurisdiction, table_type, path));
            }
        }
    }
    jobs
}

/// A source whose document could not be read.
#[derive(Debug)]
pub struct SourceFailure {
    pub jurisdiction: Jurisdiction,
    pub table_type: TableType,
    pub error: SourceReadError,
}

/// Per-source summary kept for reporting.
#[derive(Debug, Clone)]
pub struct SourceSummary {
    pub jurisdiction: Jurisdiction,
    pub table_type: TableType,
    pub stats: ParseStats,
    pub diagnostics: Vec<RowDiagnostic>,
    pub version: Option<String>,
    /// False when the jurisdiction was excluded because another of its
    /// sources failed.
    pub included: bool,
}

/// Row counters of one source in the written parse report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceStats {
    pub jurisdiction: Jurisdiction,
    pub table_type: TableType,
    #[serde(flatten)]
    pub stats: ParseStats,
    pub included: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreadableSource {
    pub jurisdiction: Jurisdiction,
    pub table_type: TableType,
    pub error: String,
}

/// Per-run row accounting: what was read, parsed and skipped per source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub generated_at: DateTime<Utc>,
    /// Included sources only.
    pub totals: ParseStats,
    pub sources: Vec<SourceStats>,
    pub unreadable: Vec<UnreadableSource>,
}

/// Aggregated result of [`run_parse_jobs`].
#[derive(Debug, Default)]
pub struct ParseRun {
    pub store: TableStore,
    pub sources: Vec<SourceSummary>,
    pub failures: Vec<SourceFailure>,
}

impl ParseRun {
    /// Jurisdictions whose contribution was dropped.
    pub fn failed_jurisdictions(&self) -> BTreeSet<Jurisdiction> {
        self.failures.iter().map(|f| f.jurisdiction).collect()
    }

    pub fn stats(&self) -> ParseStats {
        let mut total = ParseStats::default();
        for source in self.sources.iter().filter(|s| s.included) {
            total.merge(&source.stats);
        }
        total
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &RowDiagnostic> {
        self.sources.iter().flat_map(|s| s.diagnostics.iter())
    }

    pub fn report(&self, generated_at: DateTime<Utc>) -> ParseReport {
        ParseReport {
            generated_at,
            totals: self.stats(),
            sources: self
                .sources
                .iter()
                .map(|s| SourceStats {
                    jurisdiction: s.jurisdiction,
                    table_type: s.table_type,
                    stats: s.stats,
                    included: s.included,
                })
                .collect(),
            unreadable: self
                .failures
                .iter()
                .map(|f| UnreadableSource {
                    jurisdiction: f.jurisdiction,
                    table_type: f.table_type,
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }

    /// First snapshot version declared by a source, in job order.
    pub fn declared_version(&self) -> Option<&str> {
        self.sources.iter().find_map(|s| s.version.as_deref())
    }
}

/// Parses every job on up to `workers` scoped threads.
///
/// Results are aggregated after join in job order, so the store contents do
/// not depend on scheduling. A failed source removes its jurisdiction's
/// whole contribution.
pub fn run_parse_jobs(jobs: Vec<ParseJob>, registry: &MappingRegistry, workers: usize) -> ParseRun {
    let span = info_span!("parse_sources", jobs = jobs.len());
    let _guard = span.enter();
    let start = Instant::now();

    let job_count = jobs.len();
    let workers = workers.clamp(1, job_count.max(1));
    let (job_tx, job_rx) = unbounded::<(usize, ParseJob)>();
    let (result_tx, result_rx) = unbounded();

    for indexed in jobs.into_iter().enumerate() {
        if job_tx.send(indexed).is_err() {
            break;
        }
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (index, job) in job_rx.iter() {
                    let result = job.execute(registry);
                    if result_tx.send((index, job.jurisdiction, job.table_type, result)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut results: Vec<_> = result_rx.iter().collect();
    results.sort_by_key(|(index, ..)| *index);

    let mut run = ParseRun::default();
    let mut outcomes = Vec::new();
    for (_, jurisdiction, table_type, result) in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(error) => {
                warn!(
                    jurisdiction = %jurisdiction,
                    table_type = %table_type,
                    error = %error,
                    "source unreadable, jurisdiction excluded from run"
                );
                run.failures.push(SourceFailure {
                    jurisdiction,
                    table_type,
                    error,
                });
            }
        }
    }

    let failed = run.failed_jurisdictions();
    for outcome in outcomes {
        let included = !failed.contains(&outcome.jurisdiction);
        if included {
            run.store
                .append(outcome.jurisdiction, outcome.table_type, outcome.records);
        }
        run.sources.push(SourceSummary {
            jurisdiction: outcome.jurisdiction,
            table_type: outcome.table_type,
            stats: outcome.stats,
            diagnostics: outcome.diagnostics,
            version: outcome.version,
            included,
        });
    }

    info!(
        jobs = job_count,
        workers,
        records = run.store.len(),
        failed_sources = run.failures.len(),
        duration_ms = start.elapsed().as_millis(),
        "sources parsed"
    );
    run
}
