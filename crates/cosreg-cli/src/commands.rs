use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::Table;
use cosreg_cli::pipeline::run_pipeline;
use cosreg_core::{RunOptions, diff_master_views};
use cosreg_map::{MappingRegistry, mappings_root};
use cosreg_model::{Jurisdiction, MasterView};
use cosreg_validate::validate_master_view;
use tracing::info;

use crate::cli::{DiffArgs, RunArgs, ValidateArgs};
use crate::summary::{apply_table_style, header_cell, print_diff, print_report, print_run_summary};

fn load_registry(mappings: Option<&Path>) -> Result<MappingRegistry> {
    let dir = mappings_root(mappings);
    let registry = MappingRegistry::load_dir(&dir)
        .with_context(|| format!("load mappings from {}", dir.display()))?;
    info!(dir = %dir.display(), jurisdictions = registry.len(), "mappings loaded");
    Ok(registry)
}

fn load_master_view(path: &Path) -> Result<MasterView> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}

pub fn run_run(args: &RunArgs, mappings: Option<&Path>) -> Result<i32> {
    let registry = load_registry(mappings)?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.sources.join("output"));
    let mut options = RunOptions::new(output_dir).with_strict_sources(args.strict_sources);
    if let Some(workers) = args.workers {
        options = options.with_workers(workers);
    }
    if let Some(version) = &args.snapshot_version {
        options = options.with_version(version.clone());
    }

    let result = run_pipeline(&args.sources, &registry, &options, Utc::now(), args.dry_run)?;
    print_run_summary(&result);
    Ok(0)
}

/// Exits with 1 when the report has errors.
pub fn run_validate(args: &ValidateArgs) -> Result<i32> {
    let view = load_master_view(&args.master_view)?;
    let report = validate_master_view(&view);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Master view: {} ({} ingredients)",
            args.master_view.display(),
            view.len()
        );
        print_report(&report);
    }
    Ok(if report.has_errors() { 1 } else { 0 })
}

pub fn run_diff(args: &DiffArgs) -> Result<i32> {
    let old = load_master_view(&args.old)?;
    let new = load_master_view(&args.new)?;
    let diff = diff_master_views(&old, &new);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        print_diff(&diff);
    }
    Ok(0)
}

pub fn run_jurisdictions(mappings: Option<&Path>) -> Result<()> {
    let registry = load_registry(mappings)?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Name"),
        header_cell("Regulation"),
        header_cell("Configured tables"),
    ]);
    apply_table_style(&mut table);
    for jurisdiction in Jurisdiction::ALL {
        let tables = registry.get(jurisdiction).map_or_else(
            || "-".to_string(),
            |mapping| {
                mapping
                    .table_types()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        );
        table.add_row(vec![
            jurisdiction.as_str().to_string(),
            jurisdiction.name().to_string(),
            jurisdiction.regulation().to_string(),
            tables,
        ]);
    }
    println!("{table}");
    Ok(())
}
