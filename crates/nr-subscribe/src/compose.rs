//! Policy group composer: emits the full selector-group list.
//!
//! Emission order is an observable contract (clients render selector UIs in
//! this order): master, policy groups in `group_order`, auto-select,
//! fallback, then the regional load-balance groups themselves.

use std::collections::BTreeSet;

use nr_config::{group_lookup, PolicyConfig};

use crate::model::{
    ProxyGroup, AUTO_SELECT_GROUP, AUTO_SELECT_INTERVAL, FALLBACK_GROUP, FALLBACK_INTERVAL,
    MASTER_GROUP,
};
use crate::regions::lb_group_name;

pub fn compose_groups(
    cfg: &PolicyConfig,
    region_groups: &[ProxyGroup],
    unmatched: &[String],
    all_nodes: &[String],
) -> Vec<ProxyGroup> {
    let region_names: BTreeSet<&str> = region_groups.iter().map(|g| g.name.as_str()).collect();
    let lookup = group_lookup(cfg);

    let mut groups = Vec::with_capacity(cfg.group_order.len() + region_groups.len() + 3);

    // 1) 根策略组
    let mut master = Vec::with_capacity(region_groups.len() + unmatched.len() + 2);
    master.push(AUTO_SELECT_GROUP.to_string());
    master.extend(region_groups.iter().map(|g| g.name.clone()));
    master.push(FALLBACK_GROUP.to_string());
    if cfg.include_unmatched {
        master.extend(unmatched.iter().cloned());
    }
    groups.push(ProxyGroup::select(MASTER_GROUP, master));

    // 2) 策略组，按 group_order 顺序
    for entry in &cfg.group_order {
        let Some(group) = lookup.get(entry.as_str()) else {
            tracing::warn!(group=%entry, "group order entry resolves to no group, skipping");
            continue;
        };
        let mut proxies: Vec<String> = group
            .targets()
            .iter()
            .map(|region| lb_group_name(region))
            .filter(|full| {
                let exists = region_names.contains(full.as_str());
                if !exists {
                    tracing::warn!(group=%entry, target=%full,
                        "policy group references a missing region, dropping");
                }
                exists
            })
            .collect();
        // 根组兜底，保证策略组永远可解析出至少一个成员
        proxies.push(MASTER_GROUP.to_string());
        groups.push(ProxyGroup::select(entry.clone(), proxies));
    }

    // 3) / 4) 全节点探测组
    groups.push(ProxyGroup::url_test(
        AUTO_SELECT_GROUP,
        all_nodes.to_vec(),
        AUTO_SELECT_INTERVAL,
    ));
    groups.push(ProxyGroup::fallback(
        FALLBACK_GROUP,
        all_nodes.to_vec(),
        FALLBACK_INTERVAL,
    ));

    // 5) 地区负载均衡组本体
    groups.extend(region_groups.iter().cloned());

    groups
}
