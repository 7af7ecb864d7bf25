//! 规则智能导入：把自由格式（可能残缺）的规则文本转成结构化规则。
//!
//! This is the one lenient parser in the system: pasted rule sets come with
//! comments, bullets, inconsistent delimiters and misspelled matcher names.
//! A bad line is dropped and counted, never an error; the whole function is
//! pure and total.

use nr_config::{Rule, RuleKind};

/// Import context. Group scope forces every rule's target to the group
/// name; pasted rule sets often carry a stale target column that must not
/// leak into a differently-scoped rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleScope {
    Global { default_target: String },
    Group { name: String },
}

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub rules: Vec<Rule>,
    /// Lines that produced a rule.
    pub imported: usize,
    /// Non-blank lines rejected (unknown matcher, missing value).
    pub skipped: usize,
}

/// Fixed typo table: hyphen-stripped forms and common aliases, applied
/// after uppercasing and before validation against the closed kind set.
fn normalize_kind(token: &str) -> Option<RuleKind> {
    let up = token.trim().to_ascii_uppercase();
    if let Some(kind) = RuleKind::from_canonical(&up) {
        return Some(kind);
    }
    let fixed = match up.as_str() {
        "DOMAINSUFFIX" => "DOMAIN-SUFFIX",
        "DOMAINKEYWORD" => "DOMAIN-KEYWORD",
        "DOMAINREGEX" => "DOMAIN-REGEX",
        "IPCIDR" => "IP-CIDR",
        "IPCIDR6" | "IP6-CIDR" | "IP-CIDR-6" => "IP-CIDR6",
        "IPSUFFIX" => "IP-SUFFIX",
        "IPASN" => "IP-ASN",
        "SRCIPCIDR" => "SRC-IP-CIDR",
        "SRCPORT" => "SRC-PORT",
        "DSTPORT" => "DST-PORT",
        "INPORT" => "IN-PORT",
        "INTYPE" => "IN-TYPE",
        "PROCESSNAME" => "PROCESS-NAME",
        "PROCESSPATH" => "PROCESS-PATH",
        "GEO-IP" => "GEOIP",
        "GEO-SITE" => "GEOSITE",
        "RULESET" => "RULE-SET",
        "FINAL" => "MATCH",
        _ => return None,
    };
    RuleKind::from_canonical(fixed)
}

/// Cut a trailing `#` or ` //` comment. `//` counts only at line start or
/// after whitespace, so `https://...` values survive.
fn strip_comment(line: &str) -> &str {
    let line = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    let bytes = line.as_bytes();
    let mut from = 0;
    while let Some(pos) = line[from..].find("//") {
        let at = from + pos;
        if at == 0 || bytes[at - 1].is_ascii_whitespace() {
            return &line[..at];
        }
        from = at + 2;
    }
    line
}

fn is_no_resolve(token: &str) -> bool {
    token.eq_ignore_ascii_case("no-resolve")
}

/// Balanced-paren span for composite (AND/OR/NOT) values, plus the tail
/// after the closing paren. Embedded commas must not split the value.
fn split_composite(rest: &str) -> Option<(&str, &str)> {
    let open = rest.find('(')?;
    let mut depth = 0usize;
    for (off, c) in rest[open..].char_indices() {
        let i = open + off;
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&rest[open..=i], &rest[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_line(line: &str, scope: &RuleScope) -> Option<Rule> {
    let no_resolve = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .any(is_no_resolve);

    // 有逗号按逗号切，否则按空白切：裸域名等值里没有逗号
    let tokens: Vec<&str> = if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    };
    let tokens: Vec<&str> = tokens
        .into_iter()
        .filter(|t| !t.is_empty() && !is_no_resolve(t))
        .collect();

    let kind = normalize_kind(tokens.first()?)?;

    let target_for = |column: Option<&&str>| -> String {
        match scope {
            RuleScope::Group { name } => name.clone(),
            RuleScope::Global { default_target } => column
                .map(|t| (*t).to_string())
                .unwrap_or_else(|| default_target.clone()),
        }
    };

    if kind.is_composite() {
        let (value, tail) = split_composite(line)?;
        let tail_token = tail
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .find(|t| !t.is_empty() && !is_no_resolve(t));
        return Some(Rule {
            kind,
            value: value.to_string(),
            target: target_for(tail_token.as_ref()),
            no_resolve,
        });
    }

    if kind == RuleKind::Match {
        // MATCH 没有值列，第二列即目标
        return Some(Rule {
            kind,
            value: String::new(),
            target: target_for(tokens.get(1)),
            no_resolve,
        });
    }

    let value = tokens.get(1)?;
    Some(Rule {
        kind,
        value: (*value).to_string(),
        target: target_for(tokens.get(2)),
        no_resolve,
    })
}

/// Parse free-form rule text. Never fails; malformed lines are skipped and
/// counted. A comment-only input yields an empty report.
pub fn parse_rules(text: &str, scope: &RuleScope) -> ImportReport {
    let mut report = ImportReport::default();
    for raw in text.lines() {
        // 先去行尾注释，再判空
        let mut line = strip_comment(raw).trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            line = rest.trim_start();
        }
        match parse_line(line, scope) {
            Some(rule) => {
                report.rules.push(rule);
                report.imported += 1;
            }
            None => {
                tracing::debug!(line=%line, "rule import: line skipped");
                report.skipped += 1;
            }
        }
    }
    report
}
