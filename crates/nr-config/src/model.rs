//! Policy configuration data model.
//!
//! The stored shape is camelCase JSON (`lbGroups`, `appGroups`, ...) for
//! compatibility with configs written by earlier deployments. Regions and
//! rules here are *definitions*; the request-scoped derived groups live in
//! `nr-subscribe`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::defaults;

/// Terminal policies a global rule may target directly.
pub const TERMINAL_POLICIES: [&str; 5] = ["DIRECT", "REJECT", "REJECT-DROP", "PASS", "COMPATIBLE"];

/// A user-authored region: nodes are selected by case-insensitive regex
/// match against their names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionDef {
    /// Display name, e.g. "🇯🇵 日本". Must be non-empty.
    pub name: String,
    /// Pattern applied to proxy node names, e.g. "JP|japan|🇯🇵".
    pub regex: String,
}

/// Closed set of supported Clash rule matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "DOMAIN")]
    Domain,
    #[serde(rename = "DOMAIN-SUFFIX")]
    DomainSuffix,
    #[serde(rename = "DOMAIN-KEYWORD")]
    DomainKeyword,
    #[serde(rename = "DOMAIN-REGEX")]
    DomainRegex,
    #[serde(rename = "GEOSITE")]
    Geosite,
    #[serde(rename = "GEOIP")]
    Geoip,
    #[serde(rename = "IP-CIDR")]
    IpCidr,
    #[serde(rename = "IP-CIDR6")]
    IpCidr6,
    #[serde(rename = "IP-SUFFIX")]
    IpSuffix,
    #[serde(rename = "IP-ASN")]
    IpAsn,
    #[serde(rename = "SRC-IP-CIDR")]
    SrcIpCidr,
    #[serde(rename = "SRC-PORT")]
    SrcPort,
    #[serde(rename = "DST-PORT")]
    DstPort,
    #[serde(rename = "IN-PORT")]
    InPort,
    #[serde(rename = "IN-TYPE")]
    InType,
    #[serde(rename = "PROCESS-NAME")]
    ProcessName,
    #[serde(rename = "PROCESS-PATH")]
    ProcessPath,
    #[serde(rename = "PROCESS-PATH-REGEX")]
    ProcessPathRegex,
    #[serde(rename = "UID")]
    Uid,
    #[serde(rename = "NETWORK")]
    Network,
    #[serde(rename = "RULE-SET")]
    RuleSet,
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "NOT")]
    Not,
    #[serde(rename = "MATCH")]
    Match,
}

impl RuleKind {
    /// Canonical uppercase form used in Clash rule lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Domain => "DOMAIN",
            Self::DomainSuffix => "DOMAIN-SUFFIX",
            Self::DomainKeyword => "DOMAIN-KEYWORD",
            Self::DomainRegex => "DOMAIN-REGEX",
            Self::Geosite => "GEOSITE",
            Self::Geoip => "GEOIP",
            Self::IpCidr => "IP-CIDR",
            Self::IpCidr6 => "IP-CIDR6",
            Self::IpSuffix => "IP-SUFFIX",
            Self::IpAsn => "IP-ASN",
            Self::SrcIpCidr => "SRC-IP-CIDR",
            Self::SrcPort => "SRC-PORT",
            Self::DstPort => "DST-PORT",
            Self::InPort => "IN-PORT",
            Self::InType => "IN-TYPE",
            Self::ProcessName => "PROCESS-NAME",
            Self::ProcessPath => "PROCESS-PATH",
            Self::ProcessPathRegex => "PROCESS-PATH-REGEX",
            Self::Uid => "UID",
            Self::Network => "NETWORK",
            Self::RuleSet => "RULE-SET",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Match => "MATCH",
        }
    }

    /// Lookup by canonical (already-uppercased) text.
    pub fn from_canonical(s: &str) -> Option<Self> {
        Some(match s {
            "DOMAIN" => Self::Domain,
            "DOMAIN-SUFFIX" => Self::DomainSuffix,
            "DOMAIN-KEYWORD" => Self::DomainKeyword,
            "DOMAIN-REGEX" => Self::DomainRegex,
            "GEOSITE" => Self::Geosite,
            "GEOIP" => Self::Geoip,
            "IP-CIDR" => Self::IpCidr,
            "IP-CIDR6" => Self::IpCidr6,
            "IP-SUFFIX" => Self::IpSuffix,
            "IP-ASN" => Self::IpAsn,
            "SRC-IP-CIDR" => Self::SrcIpCidr,
            "SRC-PORT" => Self::SrcPort,
            "DST-PORT" => Self::DstPort,
            "IN-PORT" => Self::InPort,
            "IN-TYPE" => Self::InType,
            "PROCESS-NAME" => Self::ProcessName,
            "PROCESS-PATH" => Self::ProcessPath,
            "PROCESS-PATH-REGEX" => Self::ProcessPathRegex,
            "UID" => Self::Uid,
            "NETWORK" => Self::Network,
            "RULE-SET" => Self::RuleSet,
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "MATCH" => Self::Match,
            _ => return None,
        })
    }

    /// AND/OR/NOT embed parenthesized sub-rules in their value.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Not)
    }

    /// MATCH is the only kind without a value column.
    pub fn has_value(&self) -> bool {
        !matches!(self, Self::Match)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One routing rule. Global rules target a terminal policy; group-scoped
/// rules target their owning group (enforced at serialization time, see
/// [`Rule::line_with_target`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default)]
    pub value: String,
    pub target: String,
    #[serde(default, rename = "noResolve", skip_serializing_if = "is_false")]
    pub no_resolve: bool,
}

impl Rule {
    /// Serialize to a single Clash rule line with the rule's own target.
    pub fn to_line(&self) -> String {
        self.line_with_target(&self.target)
    }

    /// Serialize with an explicit target, overriding the stored one.
    /// Group-scoped emission always forces the group name here.
    pub fn line_with_target(&self, target: &str) -> String {
        let mut line = String::with_capacity(self.value.len() + target.len() + 24);
        line.push_str(self.kind.as_str());
        if self.kind.has_value() {
            line.push(',');
            line.push_str(&self.value);
        }
        line.push(',');
        line.push_str(target);
        if self.no_resolve {
            line.push_str(",no-resolve");
        }
        line
    }
}

/// A custom policy group: user-named "select" target with its own rules.
/// Built-in groups (fixed name, no rules) live in
/// [`PolicyConfig::app_groups`] instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyGroup {
    pub name: String,
    /// Region names this group offers; dangling entries are dropped at
    /// composition time, never an error.
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Mihomo DNS overwrite block. Interpreted only through `enable`; the rest
/// is replaced wholesale into the generated document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnsSettings {
    pub enable: bool,
    #[serde(default)]
    pub ipv6: bool,
    #[serde(rename = "default-nameserver", default)]
    pub default_nameserver: Vec<String>,
    #[serde(rename = "enhanced-mode")]
    pub enhanced_mode: String,
    #[serde(rename = "fake-ip-range")]
    pub fake_ip_range: String,
    #[serde(rename = "use-hosts", default)]
    pub use_hosts: bool,
    #[serde(default)]
    pub nameserver: Vec<String>,
    #[serde(default)]
    pub fallback: Vec<String>,
    #[serde(rename = "fallback-filter", default)]
    pub fallback_filter: FallbackFilter,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FallbackFilter {
    #[serde(default)]
    pub geoip: bool,
    #[serde(default)]
    pub ipcidr: Vec<String>,
    #[serde(default)]
    pub domain: Vec<String>,
}

/// Full user policy, read fresh per request. The engine only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyConfig {
    /// Regions, in emission order.
    pub lb_groups: Vec<RegionDef>,
    /// Built-in app groups: name -> region targets. Names are identity,
    /// not renameable; emission order comes from `group_order`.
    pub app_groups: BTreeMap<String, Vec<String>>,
    /// Custom groups: renameable, deletable, carry their own rules.
    pub custom_app_groups: Vec<PolicyGroup>,
    /// Rules emitted ahead of everything else; targets are terminal policies.
    pub custom_global_rules: Vec<Rule>,
    /// Emission order of policy groups, interleaving built-ins and customs.
    pub group_order: Vec<String>,
    /// Expose nodes no region matched via the master group.
    pub include_unmatched: bool,
    /// Load-balance health probe interval, seconds.
    pub health_check_interval: u32,
    pub dns_settings: DnsSettings,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        defaults::default_config()
    }
}

/// Resolved view of one `group_order` entry.
#[derive(Debug, Clone, Copy)]
pub enum GroupEntry<'a> {
    /// Built-in: targets only, no own rules.
    BuiltIn { targets: &'a [String] },
    Custom(&'a PolicyGroup),
}

impl<'a> GroupEntry<'a> {
    pub fn targets(&self) -> &'a [String] {
        match *self {
            Self::BuiltIn { targets } => targets,
            Self::Custom(g) => &g.targets,
        }
    }

    pub fn rules(&self) -> &'a [Rule] {
        match *self {
            Self::BuiltIn { .. } => &[],
            Self::Custom(g) => &g.rules,
        }
    }
}
