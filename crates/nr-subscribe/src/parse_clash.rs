//! Clash 文档解析：只取 `proxies[*].name` 与 `rules`，其余键原样保留。

use serde_yaml::{Mapping, Value};

use crate::model::SubsError;

/// A loaded subscription document: the full mapping (for pass-through) plus
/// the proxy names in document order.
#[derive(Debug, Clone)]
pub struct ClashDoc {
    pub doc: Mapping,
    pub proxy_names: Vec<String>,
}

impl ClashDoc {
    /// The document's own rule list, as lines. Non-string entries are
    /// dropped rather than failing the request.
    pub fn original_rules(&self) -> Vec<String> {
        match self.doc.get(&Value::from("rules")) {
            Some(Value::Sequence(seq)) => seq
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

pub fn load_doc(text: &str) -> Result<ClashDoc, SubsError> {
    let value: Value =
        serde_yaml::from_str(text).map_err(|e| SubsError::Parse(e.to_string()))?;
    let Value::Mapping(doc) = value else {
        return Err(SubsError::Parse("document is not a YAML mapping".into()));
    };
    let Some(Value::Sequence(proxies)) = doc.get(&Value::from("proxies")) else {
        return Err(SubsError::Parse("document has no `proxies` list".into()));
    };
    let proxy_names: Vec<String> = proxies
        .iter()
        .filter_map(|p| p.get("name").and_then(|n| n.as_str()))
        .map(|s| s.to_string())
        .collect();
    if proxy_names.is_empty() {
        return Err(SubsError::NoProxies);
    }
    Ok(ClashDoc { doc, proxy_names })
}
