//! Policy configuration for the NextReia subscription converter.
//!
//! Holds the user-authored side of the system: regions, policy groups,
//! custom rules and their ordering. The composition engine in
//! `nr-subscribe` reads a [`PolicyConfig`] snapshot per request and never
//! writes back.

pub mod defaults;
pub mod merge;
pub mod model;
pub mod validate;

pub use merge::{load_stored, merge, PolicyPatch};
pub use model::{
    DnsSettings, FallbackFilter, GroupEntry, PolicyConfig, PolicyGroup, RegionDef, Rule, RuleKind,
    TERMINAL_POLICIES,
};
pub use validate::{validate, ConfigIssue};

use std::collections::BTreeMap;

/// Explicit name → group resolution table. Group names are string keys
/// throughout the stored config; this is the single place they are resolved,
/// and callers tolerate missing keys instead of indexing.
pub fn group_lookup(cfg: &PolicyConfig) -> BTreeMap<&str, GroupEntry<'_>> {
    let mut map: BTreeMap<&str, GroupEntry<'_>> = BTreeMap::new();
    for (name, targets) in &cfg.app_groups {
        map.insert(name.as_str(), GroupEntry::BuiltIn { targets });
    }
    // 自定义组与内置组同名时以内置为准（validate 会标记 AmbiguousGroupName）
    for g in &cfg.custom_app_groups {
        map.entry(g.name.as_str()).or_insert(GroupEntry::Custom(g));
    }
    map
}

/// Rename a custom group, updating its definition, its `group_order` entry
/// and every custom rule that targeted the old name in one step. Returns
/// false (config untouched) when `old` is missing or built-in, or `new`
/// collides with an existing group.
pub fn rename_custom_group(cfg: &mut PolicyConfig, old: &str, new: &str) -> bool {
    if new.trim().is_empty() || old == new {
        return false;
    }
    if cfg.app_groups.contains_key(old) || cfg.app_groups.contains_key(new) {
        return false;
    }
    if cfg.custom_app_groups.iter().any(|g| g.name == new) {
        return false;
    }
    let Some(group) = cfg.custom_app_groups.iter_mut().find(|g| g.name == old) else {
        return false;
    };
    group.name = new.to_string();
    for rule in group.rules.iter_mut() {
        if rule.target == old {
            rule.target = new.to_string();
        }
    }
    for entry in cfg.group_order.iter_mut() {
        if entry == old {
            *entry = new.to_string();
        }
    }
    true
}

/// Delete a custom group: removes both the definition and its order entry.
pub fn remove_custom_group(cfg: &mut PolicyConfig, name: &str) -> bool {
    let before = cfg.custom_app_groups.len();
    cfg.custom_app_groups.retain(|g| g.name != name);
    if cfg.custom_app_groups.len() == before {
        return false;
    }
    cfg.group_order.retain(|entry| entry != name);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{PolicyGroup, Rule, RuleKind};

    fn cfg_with_custom(name: &str) -> PolicyConfig {
        let mut cfg = PolicyConfig::default();
        cfg.custom_app_groups.push(PolicyGroup {
            name: name.into(),
            targets: vec!["🇯🇵 日本".into()],
            rules: vec![Rule {
                kind: RuleKind::DomainSuffix,
                value: "example.com".into(),
                target: name.into(),
                no_resolve: false,
            }],
        });
        cfg.group_order.push(name.into());
        cfg
    }

    #[test]
    fn rename_updates_every_reference() {
        let mut cfg = cfg_with_custom("MyApp");
        assert!(rename_custom_group(&mut cfg, "MyApp", "MyApp2"));
        assert!(cfg.custom_app_groups.iter().any(|g| g.name == "MyApp2"));
        assert!(cfg.group_order.iter().any(|e| e == "MyApp2"));
        assert!(!cfg.group_order.iter().any(|e| e == "MyApp"));
        assert_eq!(cfg.custom_app_groups[0].rules[0].target, "MyApp2");
    }

    #[test]
    fn rename_refuses_builtin_and_collisions() {
        let mut cfg = cfg_with_custom("MyApp");
        assert!(!rename_custom_group(&mut cfg, "Claude", "X"));
        assert!(!rename_custom_group(&mut cfg, "MyApp", "Claude"));
        assert!(!rename_custom_group(&mut cfg, "Missing", "X"));
        // 失败时配置保持原样
        assert_eq!(cfg.custom_app_groups[0].name, "MyApp");
    }

    #[test]
    fn remove_drops_definition_and_order_entry() {
        let mut cfg = cfg_with_custom("MyApp");
        assert!(remove_custom_group(&mut cfg, "MyApp"));
        assert!(cfg.custom_app_groups.is_empty());
        assert!(!cfg.group_order.iter().any(|e| e == "MyApp"));
        assert!(!remove_custom_group(&mut cfg, "MyApp"));
    }

    #[test]
    fn lookup_resolves_builtin_and_custom() {
        let cfg = cfg_with_custom("MyApp");
        let lookup = group_lookup(&cfg);
        assert!(matches!(lookup.get("Claude"), Some(GroupEntry::BuiltIn { .. })));
        assert!(matches!(lookup.get("MyApp"), Some(GroupEntry::Custom(_))));
        assert!(lookup.get("ghost").is_none());
    }

    #[test]
    fn rule_line_serialization() {
        let r = Rule {
            kind: RuleKind::IpCidr,
            value: "192.168.0.0/16".into(),
            target: "DIRECT".into(),
            no_resolve: true,
        };
        assert_eq!(r.to_line(), "IP-CIDR,192.168.0.0/16,DIRECT,no-resolve");

        let m = Rule {
            kind: RuleKind::Match,
            value: String::new(),
            target: "ReiaNEXT".into(),
            no_resolve: false,
        };
        assert_eq!(m.to_line(), "MATCH,ReiaNEXT");
    }
}
