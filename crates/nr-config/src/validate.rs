//! Policy validation. Every finding is a named, non-fatal issue; the engine
//! itself tolerates all of them at composition time, so validation exists
//! for the admin surface (`check` subcommand), not as a gate.

use regex::RegexBuilder;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::{PolicyConfig, TERMINAL_POLICIES};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("region #{index} has an empty name")]
    EmptyRegionName { index: usize },
    #[error("region {name:?}: invalid regex: {error}")]
    InvalidRegionRegex { name: String, error: String },
    #[error("group order entry {name:?} resolves to no group")]
    UnknownOrderEntry { name: String },
    #[error("group order entry {name:?} appears more than once")]
    DuplicateOrderEntry { name: String },
    #[error("group name {name:?} is both a built-in and a custom group")]
    AmbiguousGroupName { name: String },
    #[error("global rule targets {target:?}, not a terminal policy")]
    InvalidGlobalTarget { target: String },
}

pub fn validate(cfg: &PolicyConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    for (index, region) in cfg.lb_groups.iter().enumerate() {
        if region.name.trim().is_empty() {
            issues.push(ConfigIssue::EmptyRegionName { index });
        }
        if let Err(e) = RegexBuilder::new(&region.regex).case_insensitive(true).build() {
            issues.push(ConfigIssue::InvalidRegionRegex {
                name: region.name.clone(),
                error: e.to_string(),
            });
        }
    }

    let custom_names: BTreeSet<&str> = cfg
        .custom_app_groups
        .iter()
        .map(|g| g.name.as_str())
        .collect();
    for name in custom_names.iter() {
        if cfg.app_groups.contains_key(*name) {
            issues.push(ConfigIssue::AmbiguousGroupName {
                name: (*name).to_string(),
            });
        }
    }

    let mut seen = BTreeSet::new();
    for entry in &cfg.group_order {
        if !seen.insert(entry.as_str()) {
            issues.push(ConfigIssue::DuplicateOrderEntry {
                name: entry.clone(),
            });
            continue;
        }
        if !cfg.app_groups.contains_key(entry) && !custom_names.contains(entry.as_str()) {
            issues.push(ConfigIssue::UnknownOrderEntry {
                name: entry.clone(),
            });
        }
    }

    for rule in &cfg.custom_global_rules {
        if !TERMINAL_POLICIES.contains(&rule.target.as_str()) {
            issues.push(ConfigIssue::InvalidGlobalTarget {
                target: rule.target.clone(),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PolicyGroup, RegionDef, Rule, RuleKind};

    #[test]
    fn default_config_is_clean() {
        assert!(validate(&PolicyConfig::default()).is_empty());
    }

    #[test]
    fn flags_bad_regex_and_order() {
        let mut cfg = PolicyConfig::default();
        cfg.lb_groups.push(RegionDef {
            name: "bad".into(),
            regex: "(".into(),
        });
        cfg.group_order.push("ghost".into());
        cfg.group_order.push("Claude".into()); // 重复
        let issues = validate(&cfg);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ConfigIssue::InvalidRegionRegex { name, .. } if name == "bad")));
        assert!(issues
            .iter()
            .any(|i| matches!(i, ConfigIssue::UnknownOrderEntry { name } if name == "ghost")));
        assert!(issues
            .iter()
            .any(|i| matches!(i, ConfigIssue::DuplicateOrderEntry { name } if name == "Claude")));
    }

    #[test]
    fn flags_non_terminal_global_target() {
        let mut cfg = PolicyConfig::default();
        cfg.custom_global_rules.push(Rule {
            kind: RuleKind::DomainSuffix,
            value: "example.com".into(),
            target: "Claude".into(),
            no_resolve: false,
        });
        let issues = validate(&cfg);
        assert_eq!(
            issues,
            vec![ConfigIssue::InvalidGlobalTarget {
                target: "Claude".into()
            }]
        );
    }

    #[test]
    fn flags_ambiguous_name() {
        let mut cfg = PolicyConfig::default();
        cfg.custom_app_groups.push(PolicyGroup {
            name: "Claude".into(),
            targets: vec![],
            rules: vec![],
        });
        cfg.group_order.push("Extra".into());
        cfg.custom_app_groups.push(PolicyGroup {
            name: "Extra".into(),
            targets: vec![],
            rules: vec![],
        });
        let issues = validate(&cfg);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ConfigIssue::AmbiguousGroupName { name } if name == "Claude")));
    }
}
