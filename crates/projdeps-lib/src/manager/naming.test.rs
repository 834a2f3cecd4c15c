use super::*;
use crate::model::Site;
use std::io::Write;
use tempfile::NamedTempFile;

const CATALOG: &str = r#"
[[hostless]]
name = "Ant Design"
project_id = ["antd-v4", "antd-v5"]

[[hostless]]
name = "React Slick"
project_id = "slick"
"#;

fn dep_from(project_id: &str, name: &str) -> ProjectDependency {
    ProjectDependency::new("pkg", "1", name, project_id, Site::new("site"))
}

#[test]
fn test_single_project_id_matches_exactly() {
    let catalog = HostlessCatalog::from_toml_str(CATALOG).unwrap();
    let dep = dep_from("slick", "internal-slick");
    assert_eq!(catalog.display_name(&dep), "React Slick");
}

#[test]
fn test_project_id_list_matches_last_entry_only() {
    let catalog = HostlessCatalog::from_toml_str(CATALOG).unwrap();

    assert_eq!(catalog.display_name(&dep_from("antd-v5", "antd-internal")), "Ant Design");
    assert_eq!(
        catalog.display_name(&dep_from("antd-v4", "antd-internal")),
        "antd-internal"
    );
}

#[test]
fn test_unlisted_dependency_keeps_its_name() {
    let catalog = HostlessCatalog::default();
    assert_eq!(catalog.display_name(&dep_from("anything", "My Lib")), "My Lib");
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();

    let catalog = HostlessCatalog::load(file.path()).unwrap();
    assert_eq!(catalog.hostless.len(), 2);
}

#[test]
fn test_load_errors_carry_path() {
    let missing = HostlessCatalog::load(Path::new("/nonexistent/hostless.toml"));
    assert!(matches!(missing, Err(ConfigError::CatalogReadError { .. })));

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"[[hostless]]\nname = 3\n").unwrap();
    let broken = HostlessCatalog::load(file.path());
    assert!(matches!(
        broken,
        Err(ConfigError::CatalogParseError { ref path, .. }) if path == file.path()
    ));
}
