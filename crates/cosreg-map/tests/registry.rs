//! Loading mapping directories from disk.

use std::fs;
use std::path::Path;

use cosreg_map::{MappingError, MappingRegistry, mappings_root};
use cosreg_model::{Jurisdiction, TableType};

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).expect("write mapping");
}

#[test]
fn test_loads_all_toml_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "eu.toml",
        "jurisdiction = \"EU\"\n[tables.prohibited]\nlegal_basis = \"Annex II\"\n",
    );
    write(dir.path(), "cn.toml", "jurisdiction = \"CN\"\n[tables.whitelist]\n");
    write(dir.path(), "README.md", "not a mapping");

    let registry = MappingRegistry::load_dir(dir.path()).expect("load registry");
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.jurisdictions().collect::<Vec<_>>(),
        vec![Jurisdiction::Eu, Jurisdiction::Cn]
    );
    let eu = registry.get(Jurisdiction::Eu).expect("eu mapping");
    assert_eq!(
        eu.table(TableType::Prohibited)
            .and_then(|t| t.legal_basis.as_deref()),
        Some("Annex II")
    );
}

#[test]
fn test_duplicate_jurisdiction_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "a.toml", "jurisdiction = \"JP\"\n");
    write(dir.path(), "b.toml", "jurisdiction = \"JP\"\n");

    let err = MappingRegistry::load_dir(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        MappingError::DuplicateJurisdiction {
            jurisdiction: Jurisdiction::Jp,
            ..
        }
    ));
}

#[test]
fn test_invalid_toml_names_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), "asean.toml", "jurisdiction = ");

    let err = MappingRegistry::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, MappingError::Toml { .. }));
    assert!(err.to_string().contains("asean.toml"));
}

#[test]
fn test_empty_directory_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(matches!(
        MappingRegistry::load_dir(dir.path()),
        Err(MappingError::Empty { .. })
    ));
}

#[test]
fn test_explicit_directory_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(mappings_root(Some(dir.path())), dir.path());
}

#[test]
fn test_shipped_mappings_load() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../mappings");
    let registry = MappingRegistry::load_dir(&root).expect("load shipped mappings");
    assert_eq!(registry.len(), Jurisdiction::ALL.len());
    let jp = registry.get(Jurisdiction::Jp).expect("jp mapping");
    assert!(
        jp.table(TableType::Preservative)
            .is_some_and(|t| t.is_matrix())
    );
}
