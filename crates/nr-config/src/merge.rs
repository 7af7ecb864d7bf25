//! 合并策略：把外部存储的（可能不完整的）配置合并进默认配置。
//! 约定：
//! - 存储值存在则覆盖默认值，整字段替换（列表不做逐项合并）
//! - `dnsSettings` 按字段合并，旧存档缺少的新增字段沿用默认
//! - 其余字段沿用默认

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::model::{DnsSettings, FallbackFilter, PolicyConfig, PolicyGroup, RegionDef, Rule};

/// Partial stored config. Every field optional so that configs written by
/// older versions (or hand-edited ones) keep loading.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyPatch {
    pub lb_groups: Option<Vec<RegionDef>>,
    pub app_groups: Option<BTreeMap<String, Vec<String>>>,
    pub custom_app_groups: Option<Vec<PolicyGroup>>,
    pub custom_global_rules: Option<Vec<Rule>>,
    pub group_order: Option<Vec<String>>,
    pub include_unmatched: Option<bool>,
    pub health_check_interval: Option<u32>,
    pub dns_settings: Option<DnsPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DnsPatch {
    pub enable: Option<bool>,
    pub ipv6: Option<bool>,
    #[serde(rename = "default-nameserver")]
    pub default_nameserver: Option<Vec<String>>,
    #[serde(rename = "enhanced-mode")]
    pub enhanced_mode: Option<String>,
    #[serde(rename = "fake-ip-range")]
    pub fake_ip_range: Option<String>,
    #[serde(rename = "use-hosts")]
    pub use_hosts: Option<bool>,
    pub nameserver: Option<Vec<String>>,
    pub fallback: Option<Vec<String>>,
    #[serde(rename = "fallback-filter")]
    pub fallback_filter: Option<FallbackFilter>,
}

/// 非破坏性合并：返回新 PolicyConfig
pub fn merge(base: PolicyConfig, stored: PolicyPatch) -> PolicyConfig {
    let mut out = base;
    if let Some(v) = stored.lb_groups {
        out.lb_groups = v;
    }
    if let Some(v) = stored.app_groups {
        out.app_groups = v;
    }
    if let Some(v) = stored.custom_app_groups {
        out.custom_app_groups = v;
    }
    if let Some(v) = stored.custom_global_rules {
        out.custom_global_rules = v;
    }
    if let Some(v) = stored.group_order {
        out.group_order = v;
    }
    if let Some(v) = stored.include_unmatched {
        out.include_unmatched = v;
    }
    if let Some(v) = stored.health_check_interval {
        out.health_check_interval = v;
    }
    if let Some(dns) = stored.dns_settings {
        let d = &mut out.dns_settings;
        if let Some(v) = dns.enable {
            d.enable = v;
        }
        if let Some(v) = dns.ipv6 {
            d.ipv6 = v;
        }
        if let Some(v) = dns.default_nameserver {
            d.default_nameserver = v;
        }
        if let Some(v) = dns.enhanced_mode {
            d.enhanced_mode = v;
        }
        if let Some(v) = dns.fake_ip_range {
            d.fake_ip_range = v;
        }
        if let Some(v) = dns.use_hosts {
            d.use_hosts = v;
        }
        if let Some(v) = dns.nameserver {
            d.nameserver = v;
        }
        if let Some(v) = dns.fallback {
            d.fallback = v;
        }
        if let Some(v) = dns.fallback_filter {
            d.fallback_filter = v;
        }
    }
    out
}

/// Parse stored JSON and merge it over the defaults. An unreadable blob is
/// a parse error; an empty/partial one degrades to defaults field by field.
pub fn load_stored(json: &str) -> Result<PolicyConfig, serde_json::Error> {
    let patch: PolicyPatch = serde_json::from_str(json)?;
    Ok(merge(PolicyConfig::default(), patch))
}
