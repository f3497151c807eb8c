//! Parallel parse runner over on-disk and in-memory sources.

use std::fs;

use chrono::{TimeZone, Utc};
use cosreg_core::{ParseJob, discover_jobs, integrate, run_parse_jobs};
use cosreg_map::{JurisdictionMapping, MappingRegistry, RawDocument};
use cosreg_model::{Jurisdiction, Status, TableType};
use serde_json::json;

fn registry() -> MappingRegistry {
    let eu = JurisdictionMapping::from_toml_str(
        r#"
jurisdiction = "EU"
[tables.preservative.fields]
INCI_Name = ["INCI"]
CAS_No = ["CAS"]
Max_Conc_Percent = ["max_pct"]
"#,
    )
    .unwrap();
    MappingRegistry::from_mappings([eu])
}

fn write(path: &std::path::Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

#[test]
fn test_discovers_sources_by_layout() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("EU/preservatives.json"), "[]");
    write(&dir.path().join("EU/prohibited.csv"), "INCI_Name\nLead\n");
    write(&dir.path().join("jp/uv_filters.json"), "[]");
    write(&dir.path().join("EU/notes.txt"), "ignored");

    let jobs = discover_jobs(dir.path(), &Jurisdiction::ALL);
    let found: Vec<_> = jobs.iter().map(|j| (j.jurisdiction, j.table_type)).collect();
    assert_eq!(
        found,
        vec![
            (Jurisdiction::Eu, TableType::Prohibited),
            (Jurisdiction::Eu, TableType::Preservative),
            (Jurisdiction::Jp, TableType::UvFilter),
        ]
    );
}

#[test]
fn test_unreadable_source_excludes_its_jurisdiction_only() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("EU/preservatives.json"),
        r#"[{"INCI": "Triclosan", "CAS": "3380-34-5", "max_pct": "0.3"}]"#,
    );
    write(
        &dir.path().join("CN/prohibited.json"),
        r#"[{"INCI_Name": "Triclosan", "CAS_No": "3380-34-5"}]"#,
    );
    write(&dir.path().join("CN/whitelist.json"), "{ not json");

    let jobs = discover_jobs(dir.path(), &Jurisdiction::ALL);
    let run = run_parse_jobs(jobs, &registry(), 4);

    assert_eq!(run.failures.len(), 1);
    assert_eq!(run.failures[0].table_type, TableType::Whitelist);
    assert!(run.failed_jurisdictions().contains(&Jurisdiction::Cn));
    assert_eq!(run.store.jurisdictions().len(), 1);
    assert_eq!(run.store.len(), 1);
    assert!(run.sources.iter().any(|s| s.jurisdiction == Jurisdiction::Cn && !s.included));

    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let report = run.report(ts);
    assert_eq!(report.unreadable.len(), 1);
    assert_eq!(report.unreadable[0].jurisdiction, Jurisdiction::Cn);
    assert_eq!(report.totals, run.stats());
    assert_eq!(report.totals.rows_read, 1);
    let cn = report
        .sources
        .iter()
        .find(|s| s.jurisdiction == Jurisdiction::Cn)
        .unwrap();
    assert!(!cn.included);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["totals"]["rows_read"], 1);
    assert_eq!(json["unreadable"][0]["table_type"], "Whitelist");

    let result = integrate(&run.store.to_vec(), ts).unwrap();
    let entry = &result.master_view.data[0];
    assert_eq!(
        entry.regulation(Jurisdiction::Eu).map(|r| r.status),
        Some(Status::Allowed)
    );
    assert_eq!(
        entry.regulation(Jurisdiction::Cn).map(|r| r.status),
        Some(Status::NotSpecified)
    );
}

#[test]
fn test_store_contents_do_not_depend_on_worker_count() {
    let jobs = || {
        Jurisdiction::ALL
            .into_iter()
            .flat_map(|j| {
                TableType::ALL.into_iter().map(move |t| {
                    let doc = RawDocument::from_value(
                        format!("{j}/{t}"),
                        json!([
                            {"INCI_Name": format!("{j} {t} one"), "Max_Conc_Percent": "1"},
                            {"INCI_Name": format!("{j} {t} two")}
                        ]),
                    );
                    ParseJob::from_document(j, t, doc)
                })
            })
            .collect::<Vec<_>>()
    };
    let registry = MappingRegistry::default();

    let serial = run_parse_jobs(jobs(), &registry, 1);
    let parallel = run_parse_jobs(jobs(), &registry, 8);

    assert_eq!(serial.store.len(), 60);
    assert_eq!(serial.stats().rows_read, 60);
    let names = |run: &cosreg_core::ParseRun| {
        run.store
            .records()
            .map(|r| r.display_name().to_string())
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&serial), names(&parallel));
}

#[test]
fn test_empty_job_list_is_empty_run() {
    let run = run_parse_jobs(Vec::new(), &MappingRegistry::default(), 4);
    assert!(run.store.is_empty());
    assert!(run.failures.is_empty());
    assert_eq!(run.declared_version(), None);
}
