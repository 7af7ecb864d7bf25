//! Upstream subscription fetch. Bounded by a fixed timeout; no retries —
//! a failed fetch fails the request.

use std::time::Duration;

use crate::model::SubsError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Airports vary output by UA; ClashMeta gets the Clash-dialect document.
const FETCH_USER_AGENT: &str = "ClashMeta";

#[derive(Debug, Clone)]
pub struct FetchedDoc {
    pub body: String,
    /// `subscription-userinfo` response header, passed through to clients
    /// so traffic quota display keeps working.
    pub userinfo: Option<String>,
}

pub async fn fetch_subscription(url: &str) -> Result<FetchedDoc, SubsError> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(FETCH_USER_AGENT)
        .build()
        .map_err(|e| SubsError::Fetch(e.to_string()))?;
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| SubsError::Fetch(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(SubsError::Fetch(format!(
            "upstream returned {}",
            resp.status()
        )));
    }
    let userinfo = resp
        .headers()
        .get("subscription-userinfo")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let body = resp
        .text()
        .await
        .map_err(|e| SubsError::Fetch(e.to_string()))?;
    Ok(FetchedDoc { body, userinfo })
}
