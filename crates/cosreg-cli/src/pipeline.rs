//! One full run: discover sources, parse in parallel, validate, integrate
//! and write artifacts.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use cosreg_core::{
    Integrator, ParseReport, RunOptions, SourceSummary, discover_jobs, run_parse_jobs,
};
use cosreg_map::{MappingRegistry, ParseStats};
use cosreg_model::{Jurisdiction, MasterView, Statistics};
use cosreg_output::{ArtifactWriter, Manifest};
use cosreg_validate::{ValidationReport, validate_records, validate_source_rows};
use tracing::{info, info_span, warn};

/// A source that could not be read, kept for the summary.
#[derive(Debug, Clone)]
pub struct FailedSource {
    pub jurisdiction: Jurisdiction,
    pub table: String,
    pub message: String,
}

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub sources: Vec<SourceSummary>,
    pub failures: Vec<FailedSource>,
    pub parse_stats: ParseStats,
    pub parse_report: ParseReport,
    pub master_view: MasterView,
    pub statistics: Statistics,
    pub report: ValidationReport,
    /// `None` for dry runs.
    pub manifest: Option<Manifest>,
}

impl RunResult {
    pub fn excluded_jurisdictions(&self) -> BTreeSet<Jurisdiction> {
        self.failures.iter().map(|f| f.jurisdiction).collect()
    }
}

/// Runs the whole pipeline over `sources_dir`.
///
/// Source and integration failures abort; row problems and validation
/// findings only show up in the result.
pub fn run_pipeline(
    sources_dir: &Path,
    registry: &MappingRegistry,
    options: &RunOptions,
    generated_at: DateTime<Utc>,
    dry_run: bool,
) -> Result<RunResult> {
    let span = info_span!("run", sources = %sources_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    if !sources_dir.is_dir() {
        bail!("sources directory not found: {}", sources_dir.display());
    }
    let jurisdictions: Vec<Jurisdiction> = registry.jurisdictions().collect();
    let jobs = discover_jobs(sources_dir, &jurisdictions);
    if jobs.is_empty() {
        bail!(
            "no sources found under {} (expected <JUR>/<table>.json or .csv)",
            sources_dir.display()
        );
    }

    let run = run_parse_jobs(jobs, registry, options.workers);

    if options.strict_sources
        && let Some(failure) = run.failures.first()
    {
        bail!(
            "source for {} {} unreadable: {}",
            failure.jurisdiction,
            failure.table_type,
            failure.error
        );
    }
    let parse_stats = run.stats();
    let parse_report = run.report(generated_at);
    let mut report = validate_source_rows(run.diagnostics());

    let store = run.store;
    let sources = run.sources;
    let failures: Vec<FailedSource> = run
        .failures
        .into_iter()
        .map(|f| FailedSource {
            jurisdiction: f.jurisdiction,
            table: f.table_type.to_string(),
            message: f.error.to_string(),
        })
        .collect();
    let excluded: BTreeSet<Jurisdiction> = failures.iter().map(|f| f.jurisdiction).collect();

    let records = store.to_vec();
    report.merge(validate_records(&records));
    let integration = Integrator::new(generated_at)
        .integrate(&records)
        .context("integrate records")?;

    let version = options
        .version
        .clone()
        .or_else(|| sources.iter().find_map(|s| s.version.clone()))
        .unwrap_or_else(|| generated_at.format("%Y%m%d").to_string());

    let manifest = if dry_run {
        None
    } else {
        let written: Vec<Jurisdiction> = sources
            .iter()
            .map(|s| s.jurisdiction)
            .filter(|j| !excluded.contains(j))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut writer = ArtifactWriter::new(&options.output_dir, version.clone(), generated_at);
        writer
            .write_table_collections(&store, &written)
            .context("write table collections")?;
        writer
            .write_master_view(&integration.master_view)
            .context("write master view")?;
        writer
            .write_statistics(&integration.statistics)
            .context("write statistics")?;
        writer
            .write_validation_report(&report)
            .context("write validation report")?;
        writer
            .write_parse_report(&parse_report)
            .context("write parse report")?;
        Some(writer.finish().context("write manifest")?)
    };

    for jurisdiction in &excluded {
        warn!(jurisdiction = %jurisdiction, "jurisdiction excluded; its ingredients are NotSpecified");
    }
    info!(
        ingredients = integration.master_view.len(),
        records = records.len(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );

    Ok(RunResult {
        output_dir: options.output_dir.clone(),
        version,
        generated_at,
        sources,
        failures,
        parse_stats,
        parse_report,
        master_view: integration.master_view,
        statistics: integration.statistics,
        report,
        manifest,
    })
}
