use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use nr_subscribe::{parse_rules, RuleScope};

#[derive(Parser, Debug, Clone)]
#[command(name = "import")]
#[command(about = "Parse free-form rule text into structured rules", long_about = None)]
pub struct ImportArgs {
    /// "global" or a policy group name
    #[arg(long, default_value = "global")]
    pub scope: String,
    /// Target for global rules with no target column
    #[arg(long, default_value = "DIRECT")]
    pub default_target: String,
    /// Rule text file; stdin when omitted
    pub file: Option<PathBuf>,
    /// Emit structured rules as JSON instead of rule lines
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ImportArgs) -> Result<()> {
    let text = match &args.file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin")?;
            buf
        }
    };

    let scope = if args.scope.eq_ignore_ascii_case("global") {
        RuleScope::Global {
            default_target: args.default_target.clone(),
        }
    } else {
        RuleScope::Group {
            name: args.scope.clone(),
        }
    };

    let report = parse_rules(&text, &scope);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.rules)?);
    } else {
        for rule in &report.rules {
            println!("{}", rule.to_line());
        }
    }
    tracing::info!(
        imported = report.imported,
        skipped = report.skipped,
        "rule import finished"
    );
    Ok(())
}
