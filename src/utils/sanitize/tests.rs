use super::validate_package_name;

#[test]
fn accepts_ordinary_names() {
    for name in ["numpy", "scikit-learn", "ruamel.yaml", "typing_extensions"] {
        assert!(validate_package_name(name).is_ok(), "rejected {}", name);
    }
}

#[test]
fn rejects_shell_metacharacters() {
    for name in ["foo; rm -rf /", "a&&b", "pkg$(id)", "a b", "x|y"] {
        assert!(validate_package_name(name).is_err(), "accepted {}", name);
    }
}

#[test]
fn rejects_empty_and_traversal() {
    assert!(validate_package_name("").is_err());
    assert!(validate_package_name("..").is_err());
}
