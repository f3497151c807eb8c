//! End-to-end runs over the bundled demo sources.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use cosreg_cli::pipeline::run_pipeline;
use cosreg_core::RunOptions;
use cosreg_map::MappingRegistry;
use cosreg_model::{IdentityKey, Jurisdiction, MasterView, ProductType, Status};

fn workspace_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(name)
}

fn registry() -> MappingRegistry {
    MappingRegistry::load_dir(&workspace_dir("mappings")).unwrap()
}

fn cas(value: &str) -> IdentityKey {
    IdentityKey::Cas(value.to_string())
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

#[test]
fn test_demo_run_writes_resolved_master_view() {
    let out = tempfile::tempdir().unwrap();
    let ts = Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap();
    let options = RunOptions::new(out.path()).with_version("2025.04");

    let result = run_pipeline(&workspace_dir("demos/sources"), &registry(), &options, ts, false)
        .unwrap();

    assert!(result.failures.is_empty());
    assert_eq!(result.version, "2025.04");
    // The EU footnote row has no identity.
    assert!(result.parse_stats.rows_skipped >= 1);

    let manifest = result.manifest.as_ref().unwrap();
    for file in [
        "master_view.json",
        "statistics.json",
        "validation_report.json",
        "parse_report.json",
    ] {
        assert!(manifest.entry(file).is_some(), "{file}");
        assert!(out.path().join(file).exists());
    }
    assert!(out.path().join("manifest.json").exists());
    assert!(out.path().join("parsed/EU/preservatives_2025.04.json").exists());
    assert!(out.path().join("parsed/CN/whitelist.json").exists());

    let view: MasterView =
        serde_json::from_slice(&fs::read(out.path().join("master_view.json")).unwrap()).unwrap();
    assert_eq!(view, result.master_view);

    let triclosan = view.entry(&cas("3380-34-5")).unwrap();
    let eu = triclosan.regulation(Jurisdiction::Eu).unwrap();
    assert_eq!(eu.status, Status::Allowed);
    assert_eq!(eu.max_conc_percent, Some(0.3));
    assert_eq!(eu.product_type, Some(ProductType::LeaveOn));
    assert_eq!(
        triclosan.regulation(Jurisdiction::Cn).unwrap().status,
        Status::NotSpecified
    );

    let salicylic = view.entry(&cas("69-72-7")).unwrap();
    let eu = salicylic.regulation(Jurisdiction::Eu).unwrap();
    assert_eq!(eu.status, Status::Restricted);
    assert_eq!(eu.max_conc_percent, Some(3.0));
    assert!(eu.notes.as_deref().unwrap().contains(
        "Conflict: Allowed entry from Preservative table superseded by Restricted entry from Restricted table"
    ));
    assert_eq!(
        salicylic.regulation(Jurisdiction::Jp).unwrap().max_conc_percent,
        Some(0.2)
    );
    // Preservative entry outranks the inventory listing.
    assert_eq!(
        salicylic.regulation(Jurisdiction::Cn).unwrap().status,
        Status::Allowed
    );

    let hydroquinone = view.entry(&cas("123-31-9")).unwrap();
    let eu = hydroquinone.regulation(Jurisdiction::Eu).unwrap();
    assert_eq!(eu.status, Status::Prohibited);
    assert_eq!(eu.max_conc_percent, None);

    let water = view.entry(&cas("7732-18-5")).unwrap();
    let cn = water.regulation(Jurisdiction::Cn).unwrap();
    assert_eq!(cn.status, Status::Listed);
    assert_eq!(cn.local_name.as_deref(), Some("水"));

    for entry in &view.data {
        assert_eq!(entry.regulations.len(), Jurisdiction::ALL.len());
    }
    assert_eq!(result.statistics.total_ingredients, view.len());
}

#[test]
fn test_row_problems_are_persisted_with_their_source_row() {
    let out = tempfile::tempdir().unwrap();
    let ts = Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap();
    let options = RunOptions::new(out.path()).with_version("2025.04");

    let result = run_pipeline(&workspace_dir("demos/sources"), &registry(), &options, ts, false)
        .unwrap();
    let manifest = result.manifest.as_ref().unwrap();
    assert!(manifest.entry("parse_report.json").is_some());

    let report: serde_json::Value =
        serde_json::from_slice(&fs::read(out.path().join("validation_report.json")).unwrap())
            .unwrap();
    let diagnostics: Vec<&serde_json::Value> = ["errors", "warnings", "info"]
        .iter()
        .flat_map(|key| report[*key].as_array().unwrap().iter())
        .collect();
    // Benzoic acid's "0.5%（以酸计）" has no recognized unit.
    let unknown_unit = diagnostics
        .iter()
        .find(|d| {
            d["code"] == "NORMALIZATION_ERROR"
                && d["record_ref"]["jurisdiction"] == "CN"
                && d["record_ref"]["table_type"] == "Preservative"
        })
        .expect("unknown-unit row reported");
    assert_eq!(unknown_unit["record_ref"]["row"], 1);
    assert_eq!(unknown_unit["severity"], "error");
    assert!(diagnostics.iter().any(|d| d["code"] == "MISSING_IDENTITY"
        && d["record_ref"]["jurisdiction"] == "EU"));

    let parse_report: serde_json::Value =
        serde_json::from_slice(&fs::read(out.path().join("parse_report.json")).unwrap()).unwrap();
    assert_eq!(
        parse_report["totals"]["rows_skipped"],
        result.parse_stats.rows_skipped
    );
    assert!(result.parse_stats.rows_skipped >= 2);
    let cn_preservatives = parse_report["sources"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["jurisdiction"] == "CN" && s["table_type"] == "Preservative")
        .unwrap();
    assert_eq!(cn_preservatives["rows_skipped"], 1);
    assert_eq!(cn_preservatives["rows_read"], 2);
    assert!(parse_report["unreadable"].as_array().unwrap().is_empty());
}

#[test]
fn test_japanese_matrix_keeps_permitted_columns_only() {
    let out = tempfile::tempdir().unwrap();
    let ts = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    let options = RunOptions::new(out.path());

    let result = run_pipeline(&workspace_dir("demos/sources"), &registry(), &options, ts, true)
        .unwrap();

    let jp_table = result
        .sources
        .iter()
        .find(|s| s.jurisdiction == Jurisdiction::Jp)
        .unwrap();
    // Triclosan and salicylic acid emit three columns each; benzoic acid's
    // blank mucosa cell is not listed.
    assert_eq!(jp_table.stats.records_emitted, 8);
    assert_eq!(jp_table.stats.rows_skipped, 0);
}

#[test]
fn test_dry_run_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("output");
    let ts = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    let options = RunOptions::new(&target);

    let result = run_pipeline(&workspace_dir("demos/sources"), &registry(), &options, ts, true)
        .unwrap();

    assert!(result.manifest.is_none());
    assert!(!result.master_view.is_empty());
    assert!(!result.version.is_empty());
    assert!(!target.exists());
}

#[test]
fn test_broken_source_excludes_jurisdiction_unless_strict() {
    let sources = tempfile::tempdir().unwrap();
    copy_dir(&workspace_dir("demos/sources"), sources.path());
    fs::write(sources.path().join("CN/prohibited.json"), "{ broken").unwrap();
    let out = tempfile::tempdir().unwrap();
    let ts = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();

    let strict = RunOptions::new(out.path()).with_strict_sources(true);
    let err = run_pipeline(sources.path(), &registry(), &strict, ts, false).unwrap_err();
    assert!(err.to_string().contains("CN"), "{err}");
    assert!(!out.path().join("master_view.json").exists());

    let lenient = RunOptions::new(out.path());
    let result = run_pipeline(sources.path(), &registry(), &lenient, ts, false).unwrap();
    assert_eq!(result.failures.len(), 1);
    assert!(result.excluded_jurisdictions().contains(&Jurisdiction::Cn));
    assert!(!out.path().join("parsed/CN").exists());
    assert!(out.path().join("parsed/EU").exists());

    let water = result.master_view.entry(&cas("7732-18-5"));
    assert!(water.is_none());
    let salicylic = result.master_view.entry(&cas("69-72-7")).unwrap();
    assert_eq!(
        salicylic.regulation(Jurisdiction::Cn).unwrap().status,
        Status::NotSpecified
    );
}

#[test]
fn test_missing_sources_directory_is_fatal() {
    let out = tempfile::tempdir().unwrap();
    let ts = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    let options = RunOptions::new(out.path());
    let err = run_pipeline(&out.path().join("nope"), &registry(), &options, ts, false).unwrap_err();
    assert!(err.to_string().contains("not found"));
}
