//! Built-in policy defaults, mirroring the original deployment.

use std::collections::BTreeMap;

use crate::model::{DnsSettings, FallbackFilter, PolicyConfig, RegionDef};

pub fn default_health_check_interval() -> u32 {
    120
}

fn region(name: &str, regex: &str) -> RegionDef {
    RegionDef {
        name: name.to_string(),
        regex: regex.to_string(),
    }
}

pub fn default_regions() -> Vec<RegionDef> {
    vec![
        region("🇭🇰 香港", "HK|hong|🇭🇰"),
        region("🇯🇵 日本", "JP|japan|🇯🇵"),
        region("🇨🇦 加拿大", "CA|canada|🇨🇦"),
    ]
}

pub fn default_app_groups() -> BTreeMap<String, Vec<String>> {
    let list = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    BTreeMap::from([
        (
            "Sora&ChatGPT".to_string(),
            list(&["🇯🇵 日本", "🇨🇦 加拿大", "🇺🇸 美国", "🇹🇼 台湾", "🇸🇬 新加坡"]),
        ),
        ("ABEMA".to_string(), list(&["🇯🇵 日本"])),
        ("赛马娘PrettyDerby".to_string(), list(&["🇯🇵 日本"])),
        ("PJSK-JP".to_string(), list(&["🇯🇵 日本"])),
        (
            "Claude".to_string(),
            list(&["🇯🇵 日本", "🇨🇦 加拿大", "🇺🇸 美国", "🇬🇧 英国"]),
        ),
    ])
}

/// Built-in group emission order. `BTreeMap` sorts keys, so the intended
/// order has to be carried separately.
pub fn default_group_order() -> Vec<String> {
    ["Sora&ChatGPT", "ABEMA", "赛马娘PrettyDerby", "PJSK-JP", "Claude"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_dns_settings() -> DnsSettings {
    let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    DnsSettings {
        enable: true,
        ipv6: false,
        default_nameserver: list(&["223.5.5.5", "119.29.29.29"]),
        enhanced_mode: "fake-ip".to_string(),
        fake_ip_range: "198.18.0.1/16".to_string(),
        use_hosts: true,
        nameserver: list(&[
            "https://doh.pub/dns-query",
            "https://dns.alidns.com/dns-query",
        ]),
        fallback: list(&[
            "tls://8.8.4.4",
            "tls://1.1.1.1",
            "https://doh-pure.onedns.net/dns-query",
            "https://ada.openbld.net/dns-query",
        ]),
        fallback_filter: FallbackFilter {
            geoip: true,
            ipcidr: list(&["240.0.0.0/4", "0.0.0.0/32"]),
            domain: list(&["+.abema.tv", "+.abema.io", "+.ameba.jp", "+.hayabusa.io"]),
        },
    }
}

pub fn default_config() -> PolicyConfig {
    PolicyConfig {
        lb_groups: default_regions(),
        app_groups: default_app_groups(),
        custom_app_groups: Vec::new(),
        custom_global_rules: Vec::new(),
        group_order: default_group_order(),
        include_unmatched: true,
        health_check_interval: default_health_check_interval(),
        dns_settings: default_dns_settings(),
    }
}
