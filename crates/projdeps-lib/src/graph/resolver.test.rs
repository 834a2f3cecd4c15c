use super::*;
use crate::testing::{dep, host, leaf};

#[test]
fn test_build_map_collects_whole_closure() {
    let a = dep("a", "1.0", &[dep("b", "2.0", &[leaf("c", "3.0")])]);
    let map = build_map(&a).unwrap();

    let resolved: Vec<(&str, &str)> = map
        .iter()
        .map(|(id, d)| (id.as_str(), d.version.as_str()))
        .collect();
    assert_eq!(resolved, vec![("a", "1.0"), ("b", "2.0"), ("c", "3.0")]);
}

#[test]
fn test_build_map_from_site_excludes_host() {
    let project = host("host", &[leaf("a", "1.0")]);
    let map = build_map(&project.site).unwrap();
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn test_build_map_accepts_same_version_twice() {
    let a = dep("a", "1", &[leaf("shared", "5")]);
    let b = dep("b", "1", &[leaf("shared", "5")]);
    let project = host("host", &[a, b]);

    let map = build_map(&project.site).unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map["shared"].version, "5");
}

#[test]
fn test_build_map_reports_first_seen_and_conflicting_version() {
    let a = dep("a", "1", &[leaf("shared", "1.0")]);
    let b = dep("b", "1", &[dep("c", "1", &[leaf("shared", "2.0")])]);
    let project = host("host", &[a, b]);

    match build_map(&project.site) {
        Err(DependencyError::VersionConflict {
            pkg_id,
            name,
            version_a,
            version_b,
        }) => {
            assert_eq!(pkg_id, "shared");
            assert_eq!(name, "shared");
            assert_eq!(version_a, "1.0");
            assert_eq!(version_b, "2.0");
        }
        other => panic!("expected version conflict, got {:?}", other),
    }
}

#[test]
fn test_versions_compare_as_exact_strings() {
    let project = host("host", &[dep("a", "1", &[leaf("x", "1.0")]), leaf("x", "1.0.0")]);
    assert!(matches!(
        build_map(&project.site),
        Err(DependencyError::VersionConflict { .. })
    ));
}

#[test]
fn test_check_compatible_orders_local_then_imported() {
    let local = build_map(&host("host", &[leaf("a", "1.0")]).site).unwrap();
    let candidate = dep("cand", "1", &[leaf("a", "2.0")]);
    let imported = build_map(&candidate).unwrap();

    let err = check_compatible(&local, &imported).unwrap_err();
    match err {
        DependencyError::VersionConflict {
            pkg_id,
            version_a,
            version_b,
            ..
        } => {
            assert_eq!(pkg_id, "a");
            assert_eq!(version_a, "1.0");
            assert_eq!(version_b, "2.0");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_check_compatible_allows_disjoint_and_equal() {
    let local = build_map(&host("host", &[leaf("a", "1.0"), leaf("b", "1")]).site).unwrap();
    let candidate = dep("cand", "1", &[leaf("a", "1.0"), leaf("z", "9")]);
    let imported = build_map(&candidate).unwrap();

    assert!(check_compatible(&local, &imported).is_ok());
}

#[test]
fn test_check_cycle_detects_host_package() {
    let candidate = dep("cand", "1", &[leaf("host-pkg", "3")]);
    let imported = build_map(&candidate).unwrap();

    let err = check_cycle(Some("host-pkg"), &imported, "proj-cand").unwrap_err();
    assert!(matches!(
        err,
        DependencyError::CircularDependency { ref imported_project_id } if imported_project_id == "proj-cand"
    ));
    assert!(check_cycle(Some("other"), &imported, "proj-cand").is_ok());
    assert!(check_cycle(None, &imported, "proj-cand").is_ok());
}
