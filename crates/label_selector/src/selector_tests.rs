//! Tests for selector parsing and evaluation.

use std::collections::BTreeMap;

use super::*;
use crate::requirement::Operator;

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn test_empty_selector_matches_everything() {
    let selector = Selector::parse("").unwrap();
    assert!(selector.is_empty());
    assert!(selector.matches(&labels(&[])));
    assert!(selector.matches(&labels(&[("env", "prod")])));
}

#[test]
fn test_default_selector_is_empty() {
    let selector = Selector::default();
    assert!(selector.is_empty());
    assert!(selector.matches(&labels(&[("any", "thing")])));
}

#[test]
fn test_conjunction_requires_every_clause() {
    let selector = Selector::parse("env=prod,tier in (web,api)").unwrap();
    assert!(selector.matches(&labels(&[("env", "prod"), ("tier", "web")])));
    assert!(selector.matches(&labels(&[("env", "prod"), ("tier", "api")])));
    assert!(!selector.matches(&labels(&[("env", "prod"), ("tier", "db")])));
    assert!(!selector.matches(&labels(&[("tier", "web")])));
}

#[test]
fn test_requirements_are_sorted_by_key() {
    let selector = Selector::parse("zone=us,env=prod").unwrap();
    let keys: Vec<&str> = selector
        .requirements()
        .iter()
        .map(Requirement::key)
        .collect();
    assert_eq!(keys, vec!["env", "zone"]);
}

#[test]
fn test_display_is_canonical() {
    let selector = Selector::parse("zone=us, env in (prod , dev)").unwrap();
    assert_eq!(selector.to_string(), "env in (dev,prod),zone=us");
}

#[test]
fn test_display_round_trips() {
    let selector = Selector::parse("!legacy,env=prod,tier notin (db),replicas>3").unwrap();
    let reparsed = Selector::parse(&selector.to_string()).unwrap();
    assert_eq!(selector, reparsed);
}

#[test]
fn test_from_str() {
    let selector: Selector = "env=prod".parse().unwrap();
    assert!(selector.matches(&labels(&[("env", "prod")])));
}

#[test]
fn test_add_keeps_key_order() {
    let mut selector = Selector::parse("zone=us").unwrap();
    let requirement =
        Requirement::new("env", Operator::Equals, vec!["prod".to_string()]).unwrap();
    selector.add(requirement);
    let keys: Vec<&str> = selector
        .requirements()
        .iter()
        .map(Requirement::key)
        .collect();
    assert_eq!(keys, vec!["env", "zone"]);
}

#[test]
fn test_numeric_ordering_end_to_end() {
    let selector = Selector::parse("replicas>3").unwrap();
    assert!(selector.matches(&labels(&[("replicas", "4")])));
    assert!(!selector.matches(&labels(&[("replicas", "3")])));
    assert!(!selector.matches(&labels(&[("replicas", "old")])));
}

#[test]
fn test_empty_value_comparison() {
    // `key=` compares against the empty value and does not match a
    // missing key.
    let selector = Selector::parse("env=").unwrap();
    assert!(selector.matches(&labels(&[("env", "")])));
    assert!(!selector.matches(&labels(&[("env", "prod")])));
    assert!(!selector.matches(&labels(&[])));
}

#[test]
fn test_parse_reports_invalid_key() {
    let result = Selector::parse("-bad=x");
    assert!(matches!(result, Err(ParseError::InvalidKey { .. })));
}

#[test]
fn test_parse_reports_syntax_errors() {
    assert!(Selector::parse("env=prod,").is_err());
    assert!(Selector::parse("env in (").is_err());
    assert!(Selector::parse("env &= prod").is_err());
}
