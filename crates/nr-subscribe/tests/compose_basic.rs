use std::collections::BTreeMap;

use nr_config::{PolicyConfig, RegionDef};
use nr_subscribe::compose::compose_groups;
use nr_subscribe::regions::build_region_groups;
use nr_subscribe::MASTER_GROUP;

fn cfg_jp_only() -> PolicyConfig {
    let mut cfg = PolicyConfig::default();
    cfg.lb_groups = vec![RegionDef {
        name: "JP".into(),
        regex: "JP|japan".into(),
    }];
    cfg.app_groups = BTreeMap::from([(
        "Claude".to_string(),
        vec!["JP".to_string(), "CA".to_string()],
    )]);
    cfg.group_order = vec!["Claude".into()];
    cfg
}

#[test]
fn dangling_region_dropped_master_appended() {
    let cfg = cfg_jp_only();
    let nodes: Vec<String> = vec!["JP-1".into(), "US-1".into()];
    let out = build_region_groups(&cfg.lb_groups, &nodes, 120);
    let groups = compose_groups(&cfg, &out.groups, &out.unmatched, &nodes);

    let claude = groups.iter().find(|g| g.name == "Claude").unwrap();
    // CA 地区不存在：静默丢弃，根组兜底
    assert_eq!(claude.proxies, vec!["JP 自动负载", MASTER_GROUP]);
}

#[test]
fn all_targets_dangling_still_leaves_master() {
    let mut cfg = cfg_jp_only();
    cfg.app_groups
        .insert("Ghost".into(), vec!["XX".into(), "YY".into()]);
    cfg.group_order = vec!["Ghost".into()];
    let nodes: Vec<String> = vec!["JP-1".into()];
    let out = build_region_groups(&cfg.lb_groups, &nodes, 120);
    let groups = compose_groups(&cfg, &out.groups, &out.unmatched, &nodes);

    let ghost = groups.iter().find(|g| g.name == "Ghost").unwrap();
    assert_eq!(ghost.proxies, vec![MASTER_GROUP]);
}

#[test]
fn probe_groups_cover_all_nodes_not_just_regions() {
    let cfg = cfg_jp_only();
    let nodes: Vec<String> = vec!["JP-1".into(), "US-1".into()];
    let out = build_region_groups(&cfg.lb_groups, &nodes, 120);
    let groups = compose_groups(&cfg, &out.groups, &out.unmatched, &nodes);

    let auto = groups.iter().find(|g| g.kind == "url-test").unwrap();
    assert_eq!(auto.proxies, nodes);
    assert_eq!(auto.interval, Some(86_400));
    let fb = groups.iter().find(|g| g.kind == "fallback").unwrap();
    assert_eq!(fb.proxies, nodes);
    assert_eq!(fb.interval, Some(7_200));
}

#[test]
fn composition_is_deterministic() {
    let cfg = cfg_jp_only();
    let nodes: Vec<String> = vec!["JP-1".into(), "US-1".into()];
    let out = build_region_groups(&cfg.lb_groups, &nodes, 120);
    let a = compose_groups(&cfg, &out.groups, &out.unmatched, &nodes);
    let b = compose_groups(&cfg, &out.groups, &out.unmatched, &nodes);
    assert_eq!(a, b);
}
