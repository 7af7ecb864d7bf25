use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "check")]
#[command(about = "Validate a policy config", long_about = None)]
pub struct CheckArgs {
    /// Policy config JSON; defaults are checked when omitted
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

/// Returns the process exit code: 0 clean, 1 issues found.
pub fn run(args: CheckArgs) -> Result<i32> {
    let cfg = super::convert::load_policy(args.config.as_deref())?;
    let issues = nr_config::validate(&cfg);
    if issues.is_empty() {
        println!("ok: no issues");
        return Ok(0);
    }
    for issue in &issues {
        println!("issue: {issue}");
    }
    Ok(1)
}
