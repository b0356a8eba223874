use super::{normalize_name, same_package};

#[test]
fn lowercases_names() {
    assert_eq!(normalize_name("NumPy"), "numpy");
}

#[test]
fn separators_are_equivalent() {
    assert_eq!(normalize_name("ruamel.yaml"), "ruamel-yaml");
    assert_eq!(normalize_name("ruamel_yaml"), "ruamel-yaml");
    assert_eq!(normalize_name("ruamel-yaml"), "ruamel-yaml");
}

#[test]
fn separator_runs_collapse() {
    assert_eq!(normalize_name("zope.interface__ext"), "zope-interface-ext");
}

#[test]
fn surrounding_whitespace_is_dropped() {
    assert_eq!(normalize_name("  scikit-learn "), "scikit-learn");
}

#[test]
fn same_package_across_spellings() {
    assert!(same_package("Ruamel.YAML", "ruamel_yaml"));
    assert!(!same_package("numpy", "pandas"));
}
