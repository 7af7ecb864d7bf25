use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use nr_config::PolicyConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "convert")]
#[command(about = "Convert a subscription document", long_about = None)]
pub struct ConvertArgs {
    /// Upstream subscription URL
    #[arg(long, conflicts_with = "input")]
    pub url: Option<String>,
    /// Read the subscription document from a local file instead
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,
    /// Policy config JSON; defaults apply when omitted
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Output path; stdout when omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: ConvertArgs) -> Result<()> {
    let cfg = load_policy(args.config.as_deref())?;

    let body = match (&args.url, &args.input) {
        (Some(url), None) => {
            let fetched = nr_subscribe::http::fetch_subscription(url).await?;
            if let Some(info) = &fetched.userinfo {
                tracing::info!(userinfo=%info, "upstream subscription-userinfo");
            }
            fetched.body
        }
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
        _ => return Err(anyhow!("exactly one of --url or --input is required")),
    };

    let generated = nr_subscribe::generate(&body, &cfg)?;
    let s = generated.summary;
    tracing::info!(
        regions = s.regions,
        groups = s.groups,
        injected_rules = s.injected_rules,
        unmatched = s.unmatched,
        "conversion done"
    );

    match &args.output {
        Some(path) => fs::write(path, generated.yaml)
            .with_context(|| format!("write {}", path.display()))?,
        None => print!("{}", generated.yaml),
    }
    Ok(())
}

pub(crate) fn load_policy(path: Option<&std::path::Path>) -> Result<PolicyConfig> {
    match path {
        Some(p) => {
            let json =
                fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
            nr_config::load_stored(&json).with_context(|| format!("parse {}", p.display()))
        }
        None => Ok(PolicyConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_policy_defaults_when_no_path() {
        let cfg = load_policy(None).unwrap();
        assert_eq!(cfg, PolicyConfig::default());
    }

    #[test]
    fn load_policy_merges_partial_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"includeUnmatched": false}}"#).unwrap();
        let cfg = load_policy(Some(f.path())).unwrap();
        assert!(!cfg.include_unmatched);
        // 未覆盖字段取默认
        assert_eq!(cfg.health_check_interval, 120);
    }

    #[test]
    fn load_policy_rejects_garbage() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(load_policy(Some(f.path())).is_err());
    }
}
