//! Artifact layout and manifest digests.

use std::fs;

use chrono::{TimeZone, Utc};
use cosreg_core::{TableStore, integrate};
use cosreg_model::{CanonicalRecord, Jurisdiction, MasterView, Status, TableType};
use cosreg_output::{ArtifactWriter, MANIFEST_FILE, Manifest, sha256_hex, table_artifact_path};
use cosreg_validate::validate_records;

fn store() -> TableStore {
    let mut store = TableStore::new();
    store.append(
        Jurisdiction::Eu,
        TableType::Preservative,
        [CanonicalRecord::new(Jurisdiction::Eu, TableType::Preservative, Status::Allowed)
            .with_inci_name("Triclosan")
            .with_cas_no("3380-34-5")
            .with_max_conc(0.3)],
    );
    store
}

#[test]
fn test_writes_all_artifacts_with_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let ts = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    let store = store();
    let records = store.to_vec();
    let integration = integrate(&records, ts).unwrap();

    let mut writer = ArtifactWriter::new(dir.path(), "2025.04", ts);
    let tables = writer
        .write_table_collections(&store, &[Jurisdiction::Eu])
        .unwrap();
    writer.write_master_view(&integration.master_view).unwrap();
    writer.write_statistics(&integration.statistics).unwrap();
    writer
        .write_validation_report(&validate_records(&records))
        .unwrap();
    let manifest = writer.finish().unwrap();

    assert_eq!(tables, 6);
    // 12 table files plus master view, statistics and report.
    assert_eq!(manifest.artifacts.len(), 15);

    let preservatives = dir.path().join("parsed/EU/preservatives.json");
    let collection: serde_json::Value =
        serde_json::from_slice(&fs::read(&preservatives).unwrap()).unwrap();
    assert_eq!(collection["total_records"], 1);
    assert_eq!(collection["version"], "2025.04");
    assert_eq!(collection["records"][0]["Max_Conc_Percent"], 0.3);
    assert!(dir.path().join("parsed/EU/preservatives_2025.04.json").exists());
    assert!(dir.path().join("parsed/EU/whitelist.json").exists());
    assert!(!dir.path().join("parsed/CN").exists());

    for entry in &manifest.artifacts {
        let bytes = fs::read(dir.path().join(&entry.path)).unwrap();
        assert_eq!(sha256_hex(&bytes), entry.sha256, "{}", entry.path);
    }

    let on_disk: Manifest =
        serde_json::from_slice(&fs::read(dir.path().join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(on_disk, manifest);

    let view: MasterView =
        serde_json::from_slice(&fs::read(dir.path().join("master_view.json")).unwrap()).unwrap();
    assert_eq!(view, integration.master_view);
}

#[test]
fn test_excluded_jurisdiction_files_are_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let ts = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    let previous = dir
        .path()
        .join(table_artifact_path(Jurisdiction::Cn, TableType::Prohibited, None));
    fs::create_dir_all(previous.parent().unwrap()).unwrap();
    fs::write(&previous, "previous run").unwrap();

    let mut writer = ArtifactWriter::new(dir.path(), "v2", ts);
    writer
        .write_table_collections(&store(), &[Jurisdiction::Eu])
        .unwrap();
    writer.finish().unwrap();

    assert_eq!(fs::read_to_string(&previous).unwrap(), "previous run");
}

#[test]
fn test_identical_input_gives_identical_digests() {
    let ts = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    let records = store().to_vec();
    let digest = || {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ArtifactWriter::new(dir.path(), "v1", ts);
        writer
            .write_master_view(&integrate(&records, ts).unwrap().master_view)
            .unwrap();
        writer.finish().unwrap().artifacts[0].sha256.clone()
    };
    assert_eq!(digest(), digest());
}
