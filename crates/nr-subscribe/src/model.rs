use serde::Serialize;
use thiserror::Error;

/// Fatal errors of one conversion request. Non-fatal conditions (bad region
/// regex, dangling group references, unparseable import lines) degrade in
/// place and never surface here.
#[derive(Debug, Error)]
pub enum SubsError {
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("subscription has no proxies")]
    NoProxies,
}

/// Health probe target shared by every probing group.
pub const PROBE_URL: &str = "http://www.gstatic.com/generate_204";

/// 根策略组（所有策略组的兜底）
pub const MASTER_GROUP: &str = "ReiaNEXT";
pub const AUTO_SELECT_GROUP: &str = "♻️ 自动选择";
pub const FALLBACK_GROUP: &str = "🚫 故障转移";

/// url-test probes all nodes as a coarse backstop, independent of the
/// per-region health-check interval.
pub const AUTO_SELECT_INTERVAL: u32 = 86_400;
pub const FALLBACK_INTERVAL: u32 = 7_200;

/// One emitted `proxy-groups` entry. Serializes to the Clash schema; probe
/// fields are present only for probing group kinds.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProxyGroup {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub proxies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl ProxyGroup {
    pub fn select(name: impl Into<String>, proxies: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: "select".into(),
            proxies,
            url: None,
            interval: None,
            strategy: None,
        }
    }

    pub fn url_test(name: impl Into<String>, proxies: Vec<String>, interval: u32) -> Self {
        Self {
            name: name.into(),
            kind: "url-test".into(),
            proxies,
            url: Some(PROBE_URL.into()),
            interval: Some(interval),
            strategy: None,
        }
    }

    pub fn fallback(name: impl Into<String>, proxies: Vec<String>, interval: u32) -> Self {
        Self {
            name: name.into(),
            kind: "fallback".into(),
            proxies,
            url: Some(PROBE_URL.into()),
            interval: Some(interval),
            strategy: None,
        }
    }

    pub fn load_balance(name: impl Into<String>, proxies: Vec<String>, interval: u32) -> Self {
        Self {
            name: name.into(),
            kind: "load-balance".into(),
            proxies,
            url: Some(PROBE_URL.into()),
            interval: Some(interval),
            strategy: Some("round-robin".into()),
        }
    }
}
