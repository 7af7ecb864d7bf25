use nr_config::RuleKind;
use nr_subscribe::{parse_rules, RuleScope};

fn global() -> RuleScope {
    RuleScope::Global {
        default_target: "Proxy".into(),
    }
}

#[test]
fn batch_with_bullets_comments_and_typos() {
    let text = "\
# 广告拦截
- DOMAIN-SUFFIX, openai.com, Proxy
* DOMAINKEYWORD tracker REJECT
IPCIDR,10.0.0.0/8,DIRECT,no-resolve  // 内网
junk line without any matcher
";
    let report = parse_rules(text, &global());
    assert_eq!(report.imported, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.rules[0].kind, RuleKind::DomainSuffix);
    assert_eq!(report.rules[1].kind, RuleKind::DomainKeyword);
    assert_eq!(report.rules[1].target, "REJECT");
    assert_eq!(report.rules[2].kind, RuleKind::IpCidr);
    assert!(report.rules[2].no_resolve);
}

#[test]
fn group_scope_forces_target_everywhere() {
    let text = "DOMAIN,a.example,Stale\nGEOIP,JP,AlsoStale,no-resolve\nMATCH,Whatever";
    let report = parse_rules(
        text,
        &RuleScope::Group {
            name: "MyApp".into(),
        },
    );
    assert_eq!(report.imported, 3);
    assert!(report.rules.iter().all(|r| r.target == "MyApp"));
}

#[test]
fn empty_result_is_not_an_error() {
    let report = parse_rules("# only\n// comments\n\n", &global());
    assert_eq!(report.imported, 0);
    assert_eq!(report.skipped, 0);
    assert!(report.rules.is_empty());
}

#[test]
fn imported_rules_round_trip_to_lines() {
    let report = parse_rules("DOMAINSUFFIX cdn.example DIRECT", &global());
    assert_eq!(report.rules[0].to_line(), "DOMAIN-SUFFIX,cdn.example,DIRECT");
}
