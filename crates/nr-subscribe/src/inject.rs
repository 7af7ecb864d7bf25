//! Rule injection: user rules go ahead of the subscription's own rules so
//! they win under first-match-wins evaluation. Global rules precede
//! group-scoped ones (hard exclusions beat app routing). No deduplication:
//! a conflicting duplicate stays visible in the output instead of silently
//! disappearing.

use nr_config::{group_lookup, PolicyConfig};

/// `[global] ++ [per group_order entry: its rules] ++ [original]`.
/// Group-scoped rules always emit with the group's name as target,
/// whatever target the stored rule carries.
pub fn inject_rules(cfg: &PolicyConfig, original: &[String]) -> Vec<String> {
    let lookup = group_lookup(cfg);
    let mut lines =
        Vec::with_capacity(cfg.custom_global_rules.len() + original.len() + 8);

    for rule in &cfg.custom_global_rules {
        lines.push(rule.to_line());
    }
    for entry in &cfg.group_order {
        let Some(group) = lookup.get(entry.as_str()) else {
            continue;
        };
        for rule in group.rules() {
            lines.push(rule.line_with_target(entry));
        }
    }
    lines.extend(original.iter().cloned());
    lines
}
