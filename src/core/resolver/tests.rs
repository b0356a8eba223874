use super::{SyncPlan, resolve};
use crate::core::types::PackageObservation;
use std::collections::BTreeMap;

fn recorded(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect()
}

fn observed(entries: &[(&str, &str)]) -> Vec<PackageObservation> {
    entries
        .iter()
        .map(|(n, v)| PackageObservation::new(n, *v))
        .collect()
}

#[test]
fn empty_record_adopts_everything() {
    let plan = resolve(&recorded(&[]), &observed(&[("numpy", "1.26.0")]));
    assert_eq!(plan.added.get("numpy"), Some(&"1.26.0".to_string()));
    assert!(plan.removed.is_empty());
    assert!(plan.changed.is_empty());
}

#[test]
fn version_bump_and_new_package() {
    // Record has numpy 1.24.0; live env has numpy 1.26.0 plus pandas.
    let plan = resolve(
        &recorded(&[("numpy", "1.24.0")]),
        &observed(&[("numpy", "1.26.0"), ("pandas", "2.0.0")]),
    );
    assert_eq!(plan.added, recorded(&[("pandas", "2.0.0")]));
    assert_eq!(plan.changed, recorded(&[("numpy", "1.26.0")]));
    assert!(plan.removed.is_empty());
}

#[test]
fn uninstalled_package_is_removed() {
    let plan = resolve(
        &recorded(&[("scipy", "1.11.0"), ("pandas", "2.0.0")]),
        &observed(&[("scipy", "1.11.0")]),
    );
    assert!(plan.added.is_empty());
    assert!(plan.changed.is_empty());
    assert_eq!(plan.removed, vec!["pandas".to_string()]);
}

#[test]
fn identical_sets_yield_empty_plan() {
    let plan = resolve(
        &recorded(&[("scipy", "1.11.0")]),
        &observed(&[("scipy", "1.11.0")]),
    );
    assert!(plan.is_empty());
}

#[test]
fn resolve_is_idempotent_after_apply() {
    let before = recorded(&[("numpy", "1.24.0"), ("gone", "0.1")]);
    let obs = observed(&[("numpy", "1.26.0"), ("pandas", "2.0.0")]);

    let plan = resolve(&before, &obs);
    let after = plan.apply(&before);

    assert_eq!(resolve(&after, &obs), SyncPlan::default());
}

#[test]
fn spellings_match_across_normalization() {
    // Recorded with pip spelling, observed with conda spelling.
    let plan = resolve(
        &recorded(&[("ruamel-yaml", "0.18.6")]),
        &observed(&[("ruamel_yaml", "0.18.6")]),
    );
    assert!(plan.is_empty());
}

#[test]
fn version_strings_compare_verbatim() {
    let plan = resolve(
        &recorded(&[("numpy", "1.26.0")]),
        &observed(&[("numpy", "1.26.0.post1")]),
    );
    assert_eq!(plan.changed.get("numpy"), Some(&"1.26.0.post1".to_string()));
}
