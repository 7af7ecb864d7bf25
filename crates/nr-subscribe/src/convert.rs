//! Document assembler: the one entry point of the conversion pipeline.
//!
//! Deterministic by construction: no timestamps, no randomness, and
//! `serde_yaml::Mapping` preserves key insertion order, so identical inputs
//! produce byte-identical output.

use serde_yaml::Value;

use nr_config::PolicyConfig;

use crate::compose::compose_groups;
use crate::inject::inject_rules;
use crate::model::SubsError;
use crate::parse_clash::{load_doc, ClashDoc};
use crate::regions::build_region_groups;

/// Counters for logging and the admin surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub regions: usize,
    pub groups: usize,
    pub injected_rules: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone)]
pub struct Generated {
    /// Re-serialized document, ready for `text/yaml` delivery.
    pub yaml: String,
    pub summary: ConvertSummary,
}

/// Transform a fetched subscription body according to `cfg`.
pub fn generate(text: &str, cfg: &PolicyConfig) -> Result<Generated, SubsError> {
    let doc = load_doc(text)?;
    generate_doc(doc, cfg)
}

/// Same as [`generate`] for an already-parsed document.
pub fn generate_doc(mut doc: ClashDoc, cfg: &PolicyConfig) -> Result<Generated, SubsError> {
    // 1) DNS 覆写：整块替换
    if cfg.dns_settings.enable {
        let dns = serde_yaml::to_value(&cfg.dns_settings)
            .map_err(|e| SubsError::Parse(e.to_string()))?;
        doc.doc.insert(Value::from("dns"), dns);
    }

    // 2) 地区负载均衡组
    let outcome =
        build_region_groups(&cfg.lb_groups, &doc.proxy_names, cfg.health_check_interval);

    // 3) 策略组组装
    let groups = compose_groups(cfg, &outcome.groups, &outcome.unmatched, &doc.proxy_names);

    // 4) 规则注入
    let original_rules = doc.original_rules();
    let rules = inject_rules(cfg, &original_rules);
    let injected = rules.len() - original_rules.len();

    let summary = ConvertSummary {
        regions: outcome.groups.len(),
        groups: groups.len(),
        injected_rules: injected,
        unmatched: outcome.unmatched.len(),
    };

    let groups_value =
        serde_yaml::to_value(&groups).map_err(|e| SubsError::Parse(e.to_string()))?;
    doc.doc.insert(Value::from("proxy-groups"), groups_value);
    let rules_value = Value::Sequence(rules.into_iter().map(Value::from).collect());
    doc.doc.insert(Value::from("rules"), rules_value);

    let yaml = serde_yaml::to_string(&Value::Mapping(doc.doc))
        .map_err(|e| SubsError::Parse(e.to_string()))?;
    Ok(Generated { yaml, summary })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_DOC: &str = r#"
proxies:
  - { name: "JP-1", type: "ss", server: "1.2.3.4", port: 443 }
  - { name: "US-1", type: "ss", server: "1.2.3.5", port: 443 }
rules:
  - MATCH,DIRECT
"#;

    #[test]
    fn generate_is_idempotent() {
        let cfg = PolicyConfig::default();
        let a = generate(MIN_DOC, &cfg).unwrap();
        let b = generate(MIN_DOC, &cfg).unwrap();
        assert_eq!(a.yaml, b.yaml);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn output_replaces_groups_and_rules() {
        let cfg = PolicyConfig::default();
        let out = generate(MIN_DOC, &cfg).unwrap();
        let reparsed: serde_yaml::Value = serde_yaml::from_str(&out.yaml).unwrap();
        assert!(reparsed.get("proxy-groups").is_some());
        // 原始规则保留在末尾
        let rules = reparsed.get("rules").unwrap().as_sequence().unwrap();
        assert_eq!(rules.last().unwrap().as_str(), Some("MATCH,DIRECT"));
        // DNS 覆写生效
        let mode = reparsed
            .get("dns")
            .and_then(|d| d.get("enhanced-mode"))
            .and_then(|v| v.as_str());
        assert_eq!(mode, Some("fake-ip"));
    }

    #[test]
    fn dns_untouched_when_disabled() {
        let mut cfg = PolicyConfig::default();
        cfg.dns_settings.enable = false;
        let out = generate(MIN_DOC, &cfg).unwrap();
        let reparsed: serde_yaml::Value = serde_yaml::from_str(&out.yaml).unwrap();
        assert!(reparsed.get("dns").is_none());
    }
}
