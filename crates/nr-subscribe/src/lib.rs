//! Proxy-group & rule composition engine for Clash-family subscriptions.
//!
//! Given a subscription document and a [`nr_config::PolicyConfig`], the
//! engine rewrites `proxy-groups` and `rules` and hands the document back.
//! Pipeline: [`regions`] → [`compose`] → [`convert`] ← [`inject`];
//! [`import`] is the editor-time rule-text parser and not on the request
//! path. Everything is a pure function of its inputs; the engine holds no
//! state across requests.

pub mod compose;
pub mod convert;
#[cfg(feature = "http")]
pub mod http;
pub mod import;
pub mod inject;
pub mod model;
pub mod parse_clash;
pub mod regions;

pub use convert::{generate, ConvertSummary, Generated};
pub use import::{parse_rules, ImportReport, RuleScope};
pub use model::{ProxyGroup, SubsError, MASTER_GROUP};
