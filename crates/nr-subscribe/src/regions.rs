//! Region matching and load-balance group construction.
//!
//! Regions classify proxy nodes by case-insensitive regex over their names.
//! Regions are not mutually exclusive; the used set exists only to compute
//! the unmatched list for the master group.

use regex::RegexBuilder;
use std::collections::BTreeSet;

use nr_config::RegionDef;

use crate::model::ProxyGroup;

/// 负载均衡组命名：`<地区> 自动负载`。
/// Downstream linkage is by exact string equality, so this is the single
/// place the name is produced.
pub fn lb_group_name(region: &str) -> String {
    format!("{region} 自动负载")
}

/// Stable subsequence of `nodes` matching `pattern`, case-insensitively.
pub fn match_nodes<'a>(nodes: &'a [String], pattern: &str) -> Result<Vec<&'a str>, regex::Error> {
    let re = RegexBuilder::new(pattern).case_insensitive(true).build()?;
    Ok(nodes
        .iter()
        .map(|n| n.as_str())
        .filter(|n| re.is_match(n))
        .collect())
}

#[derive(Debug, Clone, Default)]
pub struct RegionOutcome {
    /// Load-balance groups, one per region definition, in input order.
    pub groups: Vec<ProxyGroup>,
    /// Nodes no region matched, in document order.
    pub unmatched: Vec<String>,
}

/// Build one load-balance group per region. A region whose regex fails to
/// compile is treated as zero matches and must not break the others; an
/// empty region keeps a DIRECT placeholder so the emitted group is never
/// memberless.
pub fn build_region_groups(
    regions: &[RegionDef],
    nodes: &[String],
    health_check_interval: u32,
) -> RegionOutcome {
    let mut used: BTreeSet<&str> = BTreeSet::new();
    let mut groups = Vec::with_capacity(regions.len());

    for region in regions {
        let matched = match match_nodes(nodes, &region.regex) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(region=%region.name, pattern=%region.regex, error=%e,
                    "invalid region regex, treating as zero matches");
                Vec::new()
            }
        };
        used.extend(matched.iter().copied());
        let proxies = if matched.is_empty() {
            vec!["DIRECT".to_string()]
        } else {
            matched.iter().map(|s| s.to_string()).collect()
        };
        groups.push(ProxyGroup::load_balance(
            lb_group_name(&region.name),
            proxies,
            health_check_interval,
        ));
    }

    let unmatched = nodes
        .iter()
        .filter(|n| !used.contains(n.as_str()))
        .cloned()
        .collect();

    RegionOutcome { groups, unmatched }
}
